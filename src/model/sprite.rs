use image::RgbaImage;
use std::path::PathBuf;

/// One decoded frame. Frames advance on the pet's fixed frame interval, so the
/// GIF's own delays are not kept.
#[derive(Clone, Debug)]
pub struct SpriteFrame {
    pub image: RgbaImage,
}

#[derive(Clone, Debug)]
pub struct Sprite {
    pub name: String,
    pub frames: Vec<SpriteFrame>,
    pub src_path: Option<PathBuf>,
}

impl Sprite {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Pixel size of the first frame; all frames of a sprite share it.
    pub fn size(&self) -> (u32, u32) {
        self.frames
            .first()
            .map(|f| f.image.dimensions())
            .unwrap_or((0, 0))
    }

    pub fn info(&self) -> String {
        let (w, h) = self.size();
        let src = self
            .src_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or("None".to_string());
        format!("{} ({}x{}, {} frames) - Src: {}", self.name, w, h, self.frame_count(), src)
    }
}

/// The ordered set of sprites the pet can switch between.
#[derive(Clone, Debug, Default)]
pub struct SpriteLibrary {
    pub sprites: Vec<Sprite>,
}

impl SpriteLibrary {
    pub fn new(sprites: Vec<Sprite>) -> Self {
        Self { sprites }
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Frame count and pixel size per sprite, the only part the state machine needs.
    pub fn metrics(&self) -> Vec<SpriteMetrics> {
        self.sprites
            .iter()
            .map(|s| {
                let (width, height) = s.size();
                SpriteMetrics {
                    frames: s.frame_count(),
                    width,
                    height,
                }
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteMetrics {
    pub frames: usize,
    pub width: u32,
    pub height: u32,
}
