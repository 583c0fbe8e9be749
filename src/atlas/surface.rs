use std::cell::RefCell;
use std::rc::Rc;

use image::{Rgba, RgbaImage};

use crate::canvas::Canvas;
use crate::error::QuiltError;
use crate::packing::Rect;

/// Handle shared by an atlas and every sub-image cut from it
pub type SharedSurface = Rc<RefCell<Surface>>;

/// Pixel storage placed at an absolute origin.
///
/// Storage is indexed from zero; the origin is added on the way out, so
/// bounds and every pixel accessor speak absolute coordinates.
#[derive(Clone, PartialEq)]
pub struct Surface {
    image: RgbaImage,
    origin_x: u32,
    origin_y: u32,
}

impl Surface {
    /// Transparent surface at origin (0, 0)
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_image(RgbaImage::new(width, height))
    }

    /// Transparent `size` x `size` surface, rejecting sizes that are zero or
    /// too large to address as an RGBA buffer
    pub fn square(size: u32) -> Result<Self, QuiltError> {
        let byte_len = usize::try_from(size)
            .ok()
            .and_then(|side| side.checked_mul(side))
            .and_then(|pixels| pixels.checked_mul(4));

        match byte_len {
            Some(len) if len > 0 => Ok(Self::new(size, size)),
            _ => Err(QuiltError::InvalidSize(size)),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            image,
            origin_x: 0,
            origin_y: 0,
        }
    }

    /// Place `image` at an absolute origin; the far corner must stay within `u32`
    pub fn with_origin(image: RgbaImage, origin_x: u32, origin_y: u32) -> Result<Self, QuiltError> {
        let (width, height) = image.dimensions();
        if origin_x.checked_add(width).is_none() || origin_y.checked_add(height).is_none() {
            return Err(QuiltError::InvalidOrigin {
                x: origin_x,
                y: origin_y,
                width,
                height,
            });
        }

        Ok(Self {
            image,
            origin_x,
            origin_y,
        })
    }

    pub fn origin(&self) -> (u32, u32) {
        (self.origin_x, self.origin_y)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub(crate) fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Read the pixel at absolute coordinates
    pub fn pixel_at(&self, x: u32, y: u32) -> Rgba<u8> {
        let (sx, sy) = self.storage_index(x, y);
        *self.image.get_pixel(sx, sy)
    }

    /// Write the pixel at absolute coordinates
    pub fn set_pixel_at(&mut self, x: u32, y: u32, pixel: Rgba<u8>) {
        let (sx, sy) = self.storage_index(x, y);
        self.image.put_pixel(sx, sy, pixel);
    }

    fn storage_index(&self, x: u32, y: u32) -> (u32, u32) {
        assert!(
            x >= self.origin_x && y >= self.origin_y,
            "Surface coordinate ({}, {}) out of bounds {:?}",
            x,
            y,
            self.bounds()
        );
        (x - self.origin_x, y - self.origin_y)
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("bounds", &self.bounds())
            .finish_non_exhaustive()
    }
}

impl Canvas for Surface {
    fn bounds(&self) -> Rect {
        Rect::new(
            self.origin_x,
            self.origin_y,
            self.image.width(),
            self.image.height(),
        )
    }

    fn pixel_origin(&self) -> (u32, u32) {
        self.origin()
    }

    fn get_pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        self.pixel_at(x, y)
    }

    fn put_pixel(&mut self, x: u32, y: u32, pixel: Rgba<u8>) {
        self.set_pixel_at(x, y, pixel);
    }
}
