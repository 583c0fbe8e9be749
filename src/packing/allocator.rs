use thiserror::Error;

use super::Rect;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    #[error("no space left for a {width}x{height} region in {bin_width}x{bin_height} bin")]
    NoSpace {
        width: u32,
        height: u32,
        bin_width: u32,
        bin_height: u32,
    },

    #[error("cannot place an empty {width}x{height} region")]
    Empty { width: u32, height: u32 },
}

/// Placement strategy for a fixed-size bin.
///
/// Implementations hand out regions of exactly the requested size and never
/// return two overlapping regions, nor one that leaves the bin. Space is
/// consumed monotonically; there is no way to give a region back.
pub trait RegionAllocator {
    /// Reserve a `width` x `height` region
    fn insert(&mut self, width: u32, height: u32) -> Result<Rect, PackError>;

    /// Bin dimensions this allocator was created for
    fn bin_size(&self) -> (u32, u32);

    /// Approximate fraction of the bin in use (0.0 to 1.0)
    fn occupancy(&self) -> f64;
}

/// Shared argument check for allocator implementations
pub(crate) fn check_request(
    width: u32,
    height: u32,
    bin_width: u32,
    bin_height: u32,
) -> Result<(), PackError> {
    if width == 0 || height == 0 {
        return Err(PackError::Empty { width, height });
    }
    if width > bin_width || height > bin_height {
        return Err(PackError::NoSpace {
            width,
            height,
            bin_width,
            bin_height,
        });
    }
    Ok(())
}

impl<A: RegionAllocator + ?Sized> RegionAllocator for Box<A> {
    fn insert(&mut self, width: u32, height: u32) -> Result<Rect, PackError> {
        (**self).insert(width, height)
    }

    fn bin_size(&self) -> (u32, u32) {
        (**self).bin_size()
    }

    fn occupancy(&self) -> f64 {
        (**self).occupancy()
    }
}
