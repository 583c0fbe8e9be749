pub mod atlas;
pub mod canvas;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod packing;
pub mod sprite;

pub use atlas::{Atlas, AtlasBuilder, SubImageView, Surface};
pub use canvas::Canvas;
pub use cli::{AllocatorKind, CliArgs, Command, PackArgs, PackingHeuristic};
pub use error::QuiltError;
pub use packing::{MaxRectsPacker, PackError, Rect, RegionAllocator, ShelfPacker};
pub use sprite::SourceSprite;
