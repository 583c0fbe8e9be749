use anyhow::Result;
use log::{info, warn};

use super::{Atlas, Surface};
use crate::cli::{AllocatorKind, PackingHeuristic};
use crate::error::QuiltError;
use crate::packing::{MaxRectsPacker, RegionAllocator, ShelfPacker};
use crate::sprite::SourceSprite;

/// Atlas whose placement strategy is picked at runtime
pub type DynAtlas = Atlas<Box<dyn RegionAllocator>>;

/// Configuration for filling a single atlas from loaded sprites
#[derive(Debug, Clone)]
pub struct AtlasBuilder {
    pub size: u32,
    pub allocator: AllocatorKind,
    pub heuristic: PackingHeuristic,
}

/// Result of packing sprites into one atlas
#[derive(Debug)]
pub struct BuildOutcome {
    pub atlas: DynAtlas,
    /// Sprites that did not fit, in input order
    pub skipped: Vec<SourceSprite>,
}

impl AtlasBuilder {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            allocator: AllocatorKind::MaxRects,
            heuristic: PackingHeuristic::BestShortSideFit,
        }
    }

    pub fn allocator(mut self, allocator: AllocatorKind) -> Self {
        self.allocator = allocator;
        self
    }

    pub fn heuristic(mut self, heuristic: PackingHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Create an empty atlas with the configured strategy
    pub fn empty_atlas(&self) -> Result<DynAtlas, QuiltError> {
        let surface = Surface::square(self.size)?;
        let allocator: Box<dyn RegionAllocator> = match self.allocator {
            AllocatorKind::MaxRects => {
                Box::new(MaxRectsPacker::new(self.size, self.size, self.heuristic))
            }
            AllocatorKind::Shelf => Box::new(ShelfPacker::new(self.size, self.size)),
        };

        Atlas::with_allocator(surface, allocator)
    }

    /// Add every sprite in order, keeping the ones that do not fit aside
    pub fn build(&self, sprites: Vec<SourceSprite>) -> Result<BuildOutcome> {
        if sprites.is_empty() {
            return Err(QuiltError::NoImages.into());
        }

        let mut atlas = self.empty_atlas()?;
        let mut skipped = Vec::new();

        for sprite in sprites {
            match atlas.add(sprite.name.as_str(), &sprite.image) {
                Ok(_) => {}
                Err(e @ QuiltError::NoSpace { .. }) => {
                    warn!("Skipping {}", e);
                    skipped.push(sprite);
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(
            "Atlas {}x{} with {} sprites ({:.1}% efficiency, {:?})",
            self.size,
            self.size,
            atlas.len(),
            atlas.occupancy() * 100.0,
            self.allocator,
        );

        Ok(BuildOutcome { atlas, skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use image::{Rgba, RgbaImage};

    fn sprite(name: &str, width: u32, height: u32) -> SourceSprite {
        SourceSprite {
            path: std::path::PathBuf::from(format!("{}.png", name)),
            name: name.to_string(),
            image: RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255])),
        }
    }

    #[test]
    fn test_build_packs_all_sprites() {
        let sprites = (0..4)
            .map(|i| sprite(&format!("sprite_{}", i), 20, 20))
            .collect();

        let outcome = AtlasBuilder::new(64).build(sprites).unwrap();

        assert_eq!(outcome.atlas.len(), 4);
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.atlas.bounds().width, 64);
    }

    #[test]
    fn test_build_skips_sprites_that_do_not_fit() {
        let sprites = vec![sprite("big", 60, 60), sprite("huge", 100, 10), sprite("small", 4, 4)];

        let outcome = AtlasBuilder::new(64)
            .allocator(AllocatorKind::Shelf)
            .build(sprites)
            .unwrap();

        let names: Vec<&str> = outcome.skipped.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["huge"]);
        assert!(outcome.atlas.get_by_id("small").is_ok());
    }

    #[test]
    fn test_build_rejects_empty_input() {
        let result = AtlasBuilder::new(64).build(Vec::new());
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QuiltError>(),
            Some(QuiltError::NoImages)
        ));
    }

    #[test]
    fn test_zero_size_is_invalid() {
        assert!(matches!(
            AtlasBuilder::new(0).empty_atlas(),
            Err(QuiltError::InvalidSize(0))
        ));
    }

    #[test]
    fn test_oversized_atlas_is_invalid() {
        let builder = AtlasBuilder::new(u32::MAX).allocator(AllocatorKind::Shelf);
        assert!(matches!(
            builder.empty_atlas(),
            Err(QuiltError::InvalidSize(u32::MAX))
        ));
    }

    #[test]
    fn test_every_heuristic_builds() {
        for heuristic in [
            PackingHeuristic::BestShortSideFit,
            PackingHeuristic::BestLongSideFit,
            PackingHeuristic::BestAreaFit,
            PackingHeuristic::BottomLeft,
            PackingHeuristic::ContactPoint,
        ] {
            let sprites = vec![sprite("a", 30, 20), sprite("b", 25, 15), sprite("c", 15, 35)];
            let outcome = AtlasBuilder::new(64)
                .heuristic(heuristic)
                .build(sprites)
                .unwrap();
            assert_eq!(outcome.atlas.len(), 3, "{:?}", heuristic);
        }
    }
}
