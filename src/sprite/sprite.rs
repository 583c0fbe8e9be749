use image::RgbaImage;
use std::path::PathBuf;

/// A decoded image waiting to be added to an atlas
#[derive(Debug, Clone)]
pub struct SourceSprite {
    /// Original file path
    pub path: PathBuf,
    /// Id the sprite is registered under (typically its relative path)
    pub name: String,
    pub image: RgbaImage,
}

impl SourceSprite {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }
}
