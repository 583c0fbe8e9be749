use image::{Rgba, RgbaImage};

use crate::packing::Rect;

/// Anything that can be read and written pixel by pixel.
///
/// `bounds` reports where the image sits in its own coordinate space, which
/// for atlas sub-images is the atlas surface. Pixel accessors address the
/// rectangle starting at `pixel_origin`: a surface or atlas uses the same
/// absolute coordinates as its bounds, while a sub-image is addressed
/// locally from `(0, 0)` and maps each point onto the shared surface.
pub trait Canvas {
    fn bounds(&self) -> Rect;

    /// Coordinates of the top-left pixel as seen by `get_pixel`/`put_pixel`
    fn pixel_origin(&self) -> (u32, u32) {
        (0, 0)
    }

    fn get_pixel(&self, x: u32, y: u32) -> Rgba<u8>;

    fn put_pixel(&mut self, x: u32, y: u32, pixel: Rgba<u8>);

    fn width(&self) -> u32 {
        self.bounds().width
    }

    fn height(&self) -> u32 {
        self.bounds().height
    }
}

impl Canvas for RgbaImage {
    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }

    fn get_pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *RgbaImage::get_pixel(self, x, y)
    }

    fn put_pixel(&mut self, x: u32, y: u32, pixel: Rgba<u8>) {
        RgbaImage::put_pixel(self, x, y, pixel);
    }
}

/// Copy a canvas out into an owned image
pub fn to_rgba_image<C: Canvas + ?Sized>(canvas: &C) -> RgbaImage {
    let (ox, oy) = canvas.pixel_origin();
    RgbaImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        canvas.get_pixel(ox + x, oy + y)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_image_bounds_start_at_origin() {
        let img = RgbaImage::new(7, 3);
        assert_eq!(Canvas::bounds(&img), Rect::new(0, 0, 7, 3));
        assert_eq!(Canvas::width(&img), 7);
        assert_eq!(Canvas::height(&img), 3);
    }

    #[test]
    fn test_to_rgba_image() {
        let mut src = RgbaImage::new(2, 1);
        Canvas::put_pixel(&mut src, 1, 0, Rgba([1, 2, 3, 4]));

        let copy = to_rgba_image(&src);
        assert_eq!(copy, src);
    }
}
