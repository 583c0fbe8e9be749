use super::allocator::check_request;
use super::{PackError, Rect, RegionAllocator};

/// A horizontal strip of the bin
#[derive(Debug, Clone, Copy)]
struct Shelf {
    y: u32,
    height: u32,
    /// Next free x position
    cursor: u32,
}

/// First-fit shelf packer.
///
/// Cheap and predictable; wastes the space above short items on a tall shelf.
#[derive(Debug, Clone)]
pub struct ShelfPacker {
    bin_width: u32,
    bin_height: u32,
    shelves: Vec<Shelf>,
    next_y: u32,
    used_area: u64,
}

impl ShelfPacker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bin_width: width,
            bin_height: height,
            shelves: Vec::new(),
            next_y: 0,
            used_area: 0,
        }
    }
}

impl RegionAllocator for ShelfPacker {
    fn insert(&mut self, width: u32, height: u32) -> Result<Rect, PackError> {
        check_request(width, height, self.bin_width, self.bin_height)?;

        let bin_width = self.bin_width;
        let existing = self
            .shelves
            .iter_mut()
            .find(|shelf| shelf.height >= height && bin_width - shelf.cursor >= width);

        let rect = if let Some(shelf) = existing {
            let rect = Rect::new(shelf.cursor, shelf.y, width, height);
            shelf.cursor += width;
            rect
        } else if self.bin_height - self.next_y >= height {
            let rect = Rect::new(0, self.next_y, width, height);
            self.shelves.push(Shelf {
                y: self.next_y,
                height,
                cursor: width,
            });
            self.next_y += height;
            rect
        } else {
            return Err(PackError::NoSpace {
                width,
                height,
                bin_width: self.bin_width,
                bin_height: self.bin_height,
            });
        };

        self.used_area += rect.area();
        Ok(rect)
    }

    fn bin_size(&self) -> (u32, u32) {
        (self.bin_width, self.bin_height)
    }

    fn occupancy(&self) -> f64 {
        let total_area = u64::from(self.bin_width) * u64::from(self.bin_height);
        if total_area == 0 {
            return 0.0;
        }
        self.used_area as f64 / total_area as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_shelf_left_to_right() {
        let mut packer = ShelfPacker::new(100, 100);
        assert_eq!(packer.insert(30, 20).unwrap(), Rect::new(0, 0, 30, 20));
        assert_eq!(packer.insert(30, 10).unwrap(), Rect::new(30, 0, 30, 10));
        assert_eq!(packer.insert(40, 20).unwrap(), Rect::new(60, 0, 40, 20));
    }

    #[test]
    fn test_opens_new_shelf_when_row_is_full() {
        let mut packer = ShelfPacker::new(100, 100);
        packer.insert(60, 20).unwrap();
        let second = packer.insert(60, 30).unwrap();
        assert_eq!(second, Rect::new(0, 20, 60, 30));

        // Short item goes back to the first shelf with room
        let third = packer.insert(40, 15).unwrap();
        assert_eq!(third, Rect::new(60, 0, 40, 15));
    }

    #[test]
    fn test_exhaustion() {
        let mut packer = ShelfPacker::new(10, 10);
        packer.insert(10, 6).unwrap();
        assert!(matches!(
            packer.insert(10, 5),
            Err(PackError::NoSpace { width: 10, height: 5, .. })
        ));
        // Smaller request still fits below
        assert_eq!(packer.insert(10, 4).unwrap(), Rect::new(0, 6, 10, 4));
        assert!((packer.occupancy() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_oversized_and_empty() {
        let mut packer = ShelfPacker::new(10, 10);
        assert!(matches!(packer.insert(11, 1), Err(PackError::NoSpace { .. })));
        assert!(matches!(packer.insert(1, 0), Err(PackError::Empty { .. })));
        assert_eq!(packer.bin_size(), (10, 10));
    }
}
