use std::rc::Rc;

use image::{Rgba, RgbaImage};

use super::surface::SharedSurface;
use crate::canvas::{Canvas, to_rgba_image};
use crate::packing::Rect;

/// A named window onto an atlas surface.
///
/// The view owns no pixels: reads and writes go straight to the atlas, so
/// changes made through a view show up in the atlas and the other way round.
/// Cloning a view clones the handle, not the pixel data.
#[derive(Clone)]
pub struct SubImageView {
    id: String,
    bounds: Rect,
    backing: SharedSurface,
}

impl SubImageView {
    pub(crate) fn new(id: String, bounds: Rect, backing: SharedSurface) -> Self {
        Self {
            id,
            bounds,
            backing,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True if both views share the same backing surface
    pub fn same_surface(&self, other: &SubImageView) -> bool {
        Rc::ptr_eq(&self.backing, &other.backing)
    }

    /// Owned copy of the pixels under this view
    pub fn to_image(&self) -> RgbaImage {
        to_rgba_image(self)
    }

    fn absolute(&self, x: u32, y: u32) -> (u32, u32) {
        assert!(
            x < self.bounds.width && y < self.bounds.height,
            "Sub-image coordinate ({}, {}) out of bounds for '{}' ({}x{})",
            x,
            y,
            self.id,
            self.bounds.width,
            self.bounds.height
        );
        (self.bounds.x + x, self.bounds.y + y)
    }
}

impl Canvas for SubImageView {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn get_pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        let (ax, ay) = self.absolute(x, y);
        self.backing.borrow().pixel_at(ax, ay)
    }

    fn put_pixel(&mut self, x: u32, y: u32, pixel: Rgba<u8>) {
        let (ax, ay) = self.absolute(x, y);
        self.backing.borrow_mut().set_pixel_at(ax, ay, pixel);
    }
}

impl std::fmt::Debug for SubImageView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubImageView")
            .field("id", &self.id)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}
