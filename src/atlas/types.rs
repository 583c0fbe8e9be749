use std::cell::RefCell;
use std::rc::Rc;

use image::{Rgba, RgbaImage, imageops};
use log::debug;

use super::{SharedSurface, SubImageView, Surface};
use crate::canvas::{Canvas, to_rgba_image};
use crate::cli::PackingHeuristic;
use crate::error::QuiltError;
use crate::packing::{MaxRectsPacker, Rect, RegionAllocator};

/// An image made of many smaller, named images.
///
/// Each call to [`Atlas::add`] asks the allocator for a free region, copies
/// the source pixels there and records a [`SubImageView`] onto the shared
/// surface. Regions are never moved or reclaimed.
pub struct Atlas<A: RegionAllocator = MaxRectsPacker> {
    surface: SharedSurface,
    views: Vec<SubImageView>,
    allocator: A,
}

impl Atlas<MaxRectsPacker> {
    /// Empty square atlas of `size` x `size` pixels with its origin at (0, 0)
    pub fn new(size: u32) -> Result<Self, QuiltError> {
        Self::with_heuristic(size, PackingHeuristic::default())
    }

    pub fn with_heuristic(size: u32, heuristic: PackingHeuristic) -> Result<Self, QuiltError> {
        let surface = Surface::square(size)?;
        let allocator = MaxRectsPacker::new(size, size, heuristic);
        Ok(Self::assemble(surface, allocator))
    }

    /// Use an existing image as the atlas surface.
    ///
    /// The image is assumed to be empty: the allocator knows nothing about
    /// its current content and will happily place sprites over it.
    pub fn from_image(image: RgbaImage) -> Self {
        Self::from_surface(Surface::from_image(image))
    }

    /// Same as [`Atlas::from_image`] for a surface with its own origin
    pub fn from_surface(surface: Surface) -> Self {
        let bounds = surface.bounds();
        let allocator =
            MaxRectsPacker::new(bounds.width, bounds.height, PackingHeuristic::default());
        Self::assemble(surface, allocator)
    }
}

impl<A: RegionAllocator> Atlas<A> {
    /// Build an atlas from a surface and a placement strategy.
    ///
    /// The allocator's bin may be smaller than the surface but never larger,
    /// otherwise it could hand out regions the surface cannot hold.
    pub fn with_allocator(surface: Surface, allocator: A) -> Result<Self, QuiltError> {
        let (bin_width, bin_height) = allocator.bin_size();
        let bounds = surface.bounds();
        if bin_width > bounds.width || bin_height > bounds.height {
            return Err(QuiltError::AllocatorMismatch {
                bin_width,
                bin_height,
                width: bounds.width,
                height: bounds.height,
            });
        }
        Ok(Self::assemble(surface, allocator))
    }

    fn assemble(surface: Surface, allocator: A) -> Self {
        Self {
            surface: Rc::new(RefCell::new(surface)),
            views: Vec::new(),
            allocator,
        }
    }

    /// Copy `image` into a free region and register it under `id`.
    ///
    /// Ids are not checked for uniqueness. On failure the atlas is left
    /// untouched.
    pub fn add<S>(&mut self, id: impl Into<String>, image: &S) -> Result<SubImageView, QuiltError>
    where
        S: Canvas + ?Sized,
    {
        let id = id.into();
        let (width, height) = (image.width(), image.height());

        let region = self
            .allocator
            .insert(width, height)
            .map_err(|source| QuiltError::NoSpace {
                id: id.clone(),
                width,
                height,
                source,
            })?;

        // Snapshot first: the source may itself be a view onto this surface
        let pixels = to_rgba_image(image);

        let bounds = {
            let mut surface = self.surface.borrow_mut();
            let (origin_x, origin_y) = surface.origin();
            imageops::replace(
                surface.image_mut(),
                &pixels,
                i64::from(region.x),
                i64::from(region.y),
            );
            region.translate(origin_x, origin_y)
        };

        debug!(
            "Placed '{}' ({}x{}) at ({}, {})",
            id, width, height, bounds.x, bounds.y
        );

        let view = SubImageView::new(id, bounds, Rc::clone(&self.surface));
        self.views.push(view.clone());
        Ok(view)
    }

    /// First sub-image added under `id`
    pub fn get_by_id(&self, id: &str) -> Result<SubImageView, QuiltError> {
        self.views
            .iter()
            .find(|view| view.id() == id)
            .cloned()
            .ok_or_else(|| QuiltError::NotFound { id: id.to_string() })
    }

    /// All sub-images in insertion order
    pub fn sub_images(&self) -> &[SubImageView] {
        &self.views
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Fraction of the surface covered by sub-images (0.0 to 1.0)
    pub fn occupancy(&self) -> f64 {
        let total = self.bounds().area();
        if total == 0 {
            return 0.0;
        }
        let used: u64 = self.views.iter().map(|v| v.bounds().area()).sum();
        used as f64 / total as f64
    }

    /// Owned copy of the whole surface
    pub fn to_image(&self) -> RgbaImage {
        self.surface.borrow().image().clone()
    }
}

impl<A: RegionAllocator> Canvas for Atlas<A> {
    fn bounds(&self) -> Rect {
        self.surface.borrow().bounds()
    }

    fn pixel_origin(&self) -> (u32, u32) {
        self.surface.borrow().origin()
    }

    fn get_pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        self.surface.borrow().pixel_at(x, y)
    }

    fn put_pixel(&mut self, x: u32, y: u32, pixel: Rgba<u8>) {
        self.surface.borrow_mut().set_pixel_at(x, y, pixel);
    }
}

impl<A: RegionAllocator> std::fmt::Debug for Atlas<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Atlas")
            .field("bounds", &self.bounds())
            .field("sub_images", &self.views)
            .finish_non_exhaustive()
    }
}
