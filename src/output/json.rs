use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::atlas::{Atlas, SubImageView};
use crate::canvas::Canvas;
use crate::error::QuiltError;
use crate::output::atlas_png_filename;
use crate::packing::RegionAllocator;

#[derive(Serialize)]
struct JsonOutput {
    meta: Meta,
    image: String,
    size: Size,
    sprites: Vec<JsonSprite>,
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
    format: &'static str,
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct JsonSprite {
    name: String,
    frame: Frame,
}

#[derive(Serialize)]
struct Frame {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

/// Write `<base_name>.json` describing every sub-image in insertion order
pub fn write_json<A: RegionAllocator>(
    atlas: &Atlas<A>,
    output_dir: &Path,
    base_name: &str,
) -> Result<()> {
    let json_path = output_dir.join(format!("{}.json", base_name));
    let content = serde_json::to_string_pretty(&to_json(atlas, base_name))?;

    fs::write(&json_path, content).map_err(|e| QuiltError::OutputWrite {
        path: json_path,
        source: e,
    })?;

    Ok(())
}

fn to_json<A: RegionAllocator>(atlas: &Atlas<A>, base_name: &str) -> JsonOutput {
    let bounds = atlas.bounds();

    JsonOutput {
        meta: Meta {
            app: "quilt",
            version: env!("CARGO_PKG_VERSION"),
            format: "rgba8888",
        },
        image: atlas_png_filename(base_name),
        size: Size {
            w: bounds.width,
            h: bounds.height,
        },
        sprites: atlas.sub_images().iter().map(view_to_json).collect(),
    }
}

fn view_to_json(view: &SubImageView) -> JsonSprite {
    let bounds = view.bounds();

    JsonSprite {
        name: view.id().to_string(),
        frame: Frame {
            x: bounds.x,
            y: bounds.y,
            w: bounds.width,
            h: bounds.height,
        },
    }
}
