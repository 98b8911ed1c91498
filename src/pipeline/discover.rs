// Sprite file discovery

use anyhow::{Context, Result, bail};
use log::warn;
use std::env;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::SpriteConfig;

pub const SPRITE_DIR: &str = "sprites";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Animated,
    Still,
}

impl SpriteKind {
    pub fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "gif" => Some(SpriteKind::Animated),
            "png" | "jpg" | "jpeg" | "bmp" => Some(SpriteKind::Still),
            _ => None,
        }
    }
}

/// Picks the sprite directory: explicit choice, then the configured one,
/// then `sprites/` next to the executable, then `sprites/` in the working
/// directory.
pub fn resolve_sprite_dir(cli_dir: Option<&Path>, config_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = cli_dir.or(config_dir) {
        return dir.to_path_buf();
    }

    let bundled = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join(SPRITE_DIR)));
    match bundled {
        Some(dir) if dir.is_dir() => dir,
        _ => PathBuf::from(SPRITE_DIR),
    }
}

pub fn scan_sprite_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Sprite directory not found: {}", dir.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to scan {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && SpriteKind::detect(path).is_some() {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Keeps the paths that exist, warning about the rest.
pub fn existing_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    paths
        .iter()
        .filter(|path| {
            let found = path.is_file();
            if !found {
                warn!("{} not found", path.display());
            }
            found
        })
        .cloned()
        .collect()
}

/// Every sprite file to load, in display order.
pub fn sprite_sources(config: &SpriteConfig, cli_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    let sources = if cli_dir.is_none() && !config.paths.is_empty() {
        existing_paths(&config.paths)
    } else {
        let dir = resolve_sprite_dir(cli_dir, config.dir.as_deref());
        scan_sprite_dir(&dir)?
    };

    if sources.is_empty() {
        bail!("No sprite files (.gif, .png, .jpg, .bmp) found");
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_kind_detection() {
        assert_eq!(SpriteKind::detect(Path::new("cat.GIF")), Some(SpriteKind::Animated));
        assert_eq!(SpriteKind::detect(Path::new("cat.png")), Some(SpriteKind::Still));
        assert_eq!(SpriteKind::detect(Path::new("notes.txt")), None);
        assert_eq!(SpriteKind::detect(Path::new("README")), None);
    }

    #[test]
    fn test_scan_is_sorted_and_shallow() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.gif"), b"").unwrap();
        fs::write(dir.path().join("a.png"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.gif"), b"").unwrap();

        let files = scan_sprite_dir(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["a.png", "b.gif"]);
    }

    #[test]
    fn test_sources_prefer_cli_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.gif"), b"").unwrap();

        let config = SpriteConfig {
            paths: vec![PathBuf::from("/definitely/missing.gif")],
            ..SpriteConfig::default()
        };
        let sources = sprite_sources(&config, Some(dir.path())).unwrap();
        assert_eq!(sources, vec![dir.path().join("a.gif")]);

        // configured paths that do not exist leave nothing to load
        assert!(sprite_sources(&config, None).is_err());
    }

    #[test]
    fn test_resolve_prefers_explicit() {
        let cli = Path::new("/cli");
        let cfg = Path::new("/cfg");
        assert_eq!(resolve_sprite_dir(Some(cli), Some(cfg)), PathBuf::from("/cli"));
        assert_eq!(resolve_sprite_dir(None, Some(cfg)), PathBuf::from("/cfg"));
    }
}
