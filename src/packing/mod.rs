mod allocator;
mod maxrects;
mod rect;
mod shelf;

pub use allocator::{PackError, RegionAllocator};
pub use maxrects::MaxRectsPacker;
pub use rect::Rect;
pub use shelf::ShelfPacker;
