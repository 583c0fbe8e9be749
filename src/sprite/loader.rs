use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::ImageReader;
use log::info;
use rayon::prelude::*;

use super::SourceSprite;
use crate::error::QuiltError;

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Image path with its base directory for computing relative names
struct ImagePath {
    path: PathBuf,
    base: Option<PathBuf>,
}

/// Load sprites from input paths (files or directories)
///
/// Files found inside a directory input are named by their path relative to
/// that directory. Individual file inputs are named relative to `base_dir`
/// when given, otherwise by file name. The result is ordered largest area
/// first, which packs better when sprites are added one after another.
pub fn load_sprites(
    inputs: &[impl AsRef<Path>],
    base_dir: Option<&Path>,
) -> Result<Vec<SourceSprite>> {
    let image_paths = collect_image_paths(inputs, base_dir)?;

    if image_paths.is_empty() {
        return Err(QuiltError::NoImages.into());
    }

    info!("Loading {} images...", image_paths.len());

    let mut sprites = image_paths
        .par_iter()
        .map(|img_path| load_single_sprite(&img_path.path, img_path.base.as_deref()))
        .collect::<Result<Vec<_>>>()?;

    sprites.sort_by(|a, b| b.area().cmp(&a.area()).then_with(|| a.name.cmp(&b.name)));

    Ok(sprites)
}

fn collect_image_paths(
    inputs: &[impl AsRef<Path>],
    base_dir: Option<&Path>,
) -> Result<Vec<ImagePath>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(QuiltError::InputNotFound(path.to_path_buf()).into());
        }

        if path.is_file() {
            if is_supported_image(path) {
                paths.push(ImagePath {
                    path: path.to_path_buf(),
                    base: base_dir.map(Path::to_path_buf),
                });
            }
        } else if path.is_dir() {
            collect_from_directory(path, path, &mut paths)?;
        }
    }

    Ok(paths)
}

fn collect_from_directory(base: &Path, dir: &Path, paths: &mut Vec<ImagePath>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();

        if path.is_file() && is_supported_image(&path) {
            paths.push(ImagePath {
                path,
                base: Some(base.to_path_buf()),
            });
        } else if path.is_dir() {
            collect_from_directory(base, &path, paths)?;
        }
    }

    Ok(())
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn sprite_name(path: &Path, base: Option<&Path>) -> String {
    match base.and_then(|base_dir| path.strip_prefix(base_dir).ok()) {
        // Forward slashes keep ids stable across platforms
        Some(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        None => path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string(),
    }
}

fn load_single_sprite(path: &Path, base: Option<&Path>) -> Result<SourceSprite> {
    let image = ImageReader::open(path)
        .map_err(|e| QuiltError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| QuiltError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?
        .into_rgba8();

    Ok(SourceSprite {
        path: path.to_path_buf(),
        name: sprite_name(path, base),
        image,
    })
}
