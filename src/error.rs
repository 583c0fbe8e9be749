use std::path::PathBuf;
use thiserror::Error;

use crate::packing::PackError;

#[derive(Error, Debug)]
pub enum QuiltError {
    #[error("unable to add image '{id}' ({width}x{height}) to atlas: {source}")]
    NoSpace {
        id: String,
        width: u32,
        height: u32,
        source: PackError,
    },

    #[error("no sub-image with id '{id}' found")]
    NotFound { id: String },

    #[error("invalid atlas size {0}: must be at least 1 and fit in memory")]
    InvalidSize(u32),

    #[error("surface of {width}x{height} at ({x}, {y}) does not fit in u32 coordinates")]
    InvalidOrigin {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error(
        "allocator bin {bin_width}x{bin_height} does not fit surface {width}x{height}"
    )]
    AllocatorMismatch {
        bin_width: u32,
        bin_height: u32,
        width: u32,
        height: u32,
    },

    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("No valid images found in input")]
    NoImages,

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),
}
