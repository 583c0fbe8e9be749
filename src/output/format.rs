use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use image::{DynamicImage, ImageFormat, RgbImage};

use crate::atlas::Atlas;
use crate::cli::CompressionLevel;
use crate::error::QuiltError;
use crate::packing::RegionAllocator;

/// Save the atlas surface as PNG, optionally with compression
pub fn save_atlas_image<A: RegionAllocator>(
    atlas: &Atlas<A>,
    path: &Path,
    opaque: bool,
    compress: Option<CompressionLevel>,
) -> Result<()> {
    let png_data = encode_png(atlas, opaque).map_err(|e| QuiltError::ImageSave {
        path: path.to_path_buf(),
        source: e,
    })?;

    let output_data = if let Some(level) = compress {
        let opts = match level {
            CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
            CompressionLevel::Max => oxipng::Options::max_compression(),
        };
        oxipng::optimize_from_memory(&png_data, &opts).map_err(|e| QuiltError::PngCompress {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        png_data
    };

    fs::write(path, output_data).map_err(|e| QuiltError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Encode to PNG in memory
fn encode_png<A: RegionAllocator>(
    atlas: &Atlas<A>,
    opaque: bool,
) -> Result<Vec<u8>, image::ImageError> {
    let mut png_data = Cursor::new(Vec::new());
    let image = atlas.to_image();

    if opaque {
        let rgb: RgbImage = DynamicImage::ImageRgba8(image).into_rgb8();
        rgb.write_to(&mut png_data, ImageFormat::Png)?;
    } else {
        image.write_to(&mut png_data, ImageFormat::Png)?;
    }

    Ok(png_data.into_inner())
}
