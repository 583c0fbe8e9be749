mod builder;
mod surface;
mod types;
mod view;

pub use builder::{AtlasBuilder, BuildOutcome, DynAtlas};
pub use surface::{SharedSurface, Surface};
pub use types::Atlas;
pub use view::SubImageView;
