use anyhow::{Result, bail};
use log::{info, warn};
use rayon::prelude::*;
use std::path::PathBuf;

use super::gif::load_sprite;
use crate::model::sprite::SpriteLibrary;

/// Decodes every source in parallel. Files that fail to decode are skipped;
/// the order of the remaining sprites follows `sources`.
pub fn load_library(sources: &[PathBuf], scale: f32) -> Result<SpriteLibrary> {
    let results: Vec<_> = sources
        .par_iter()
        .map(|path| (path, load_sprite(path, scale)))
        .collect();

    let mut sprites = Vec::with_capacity(results.len());
    for (path, result) in results {
        match result {
            Ok(sprite) => {
                info!("Loaded {}", sprite.info());
                sprites.push(sprite);
            }
            Err(e) => warn!("Skipping {}: {:#}", path.display(), e),
        }
    }

    if sprites.is_empty() {
        bail!("Image / GIF files failed to load");
    }

    Ok(SpriteLibrary::new(sprites))
}
