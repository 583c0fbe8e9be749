mod args;

pub use args::{AllocatorKind, CliArgs, Command, CompressionLevel, PackArgs, PackingHeuristic};
