use anyhow::{Context, Result, bail};
use image::codecs::gif::GifDecoder;
use image::imageops::FilterType;
use image::AnimationDecoder;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::discover::SpriteKind;
use crate::model::sprite::{Sprite, SpriteFrame};

pub fn decode_gif(path: &Path) -> Result<Vec<SpriteFrame>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let decoder = GifDecoder::new(BufReader::new(file))
        .with_context(|| format!("Failed to read GIF header of {}", path.display()))?;

    let frames = decoder
        .into_frames()
        .collect_frames()
        .with_context(|| format!("Failed to decode GIF frames of {}", path.display()))?;

    if frames.is_empty() {
        bail!("GIF has no frames: {}", path.display());
    }

    Ok(frames
        .into_iter()
        .map(|frame| SpriteFrame {
            image: frame.into_buffer(),
        })
        .collect())
}

pub fn decode_still(path: &Path) -> Result<Vec<SpriteFrame>> {
    let image = image::open(path).with_context(|| format!("Failed to decode {}", path.display()))?;
    Ok(vec![SpriteFrame {
        image: image.to_rgba8(),
    }])
}

pub fn scale_frames(frames: &mut [SpriteFrame], scale: f32) {
    for frame in frames {
        let width = ((frame.image.width() as f32 * scale).round() as u32).max(1);
        let height = ((frame.image.height() as f32 * scale).round() as u32).max(1);

        frame.image = image::imageops::resize(&frame.image, width, height, FilterType::Lanczos3);
    }
}

pub fn load_sprite(path: &Path, scale: f32) -> Result<Sprite> {
    let kind = SpriteKind::detect(path)
        .ok_or_else(|| anyhow::anyhow!("Unsupported sprite format: {}", path.display()))?;

    let mut frames = match kind {
        SpriteKind::Animated => decode_gif(path)?,
        SpriteKind::Still => decode_still(path)?,
    };

    if (scale - 1.0).abs() > f32::EPSILON {
        scale_frames(&mut frames, scale);
    }

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sprite")
        .to_string();

    Ok(Sprite {
        name,
        frames,
        src_path: Some(path.to_path_buf()),
    })
}
