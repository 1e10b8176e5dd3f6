//! Writing the display image to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Result};
use lumen_renderer::DisplayImage;

/// Save as PPM for a `.ppm` extension, PNG otherwise.
///
/// The renderer stores row 0 at the bottom; files are written top-down.
pub fn save_image(image: &DisplayImage, path: &Path) -> Result<()> {
    if image.is_empty() {
        bail!("nothing was rendered ({}x{} image)", image.width, image.height);
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("ppm") => save_ppm(image, path),
        _ => save_png(image, path),
    }
}

fn top_down_rows(image: &DisplayImage) -> impl Iterator<Item = &[[u8; 4]]> {
    image.pixels.chunks_exact(image.width as usize).rev()
}

fn save_png(image: &DisplayImage, path: &Path) -> Result<()> {
    let row_bytes = image.width as usize * 4;
    let bytes: Vec<u8> = image
        .as_bytes()
        .chunks_exact(row_bytes)
        .rev()
        .flatten()
        .copied()
        .collect();

    image::save_buffer_with_format(
        path,
        &bytes,
        image.width,
        image.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )?;
    Ok(())
}

fn save_ppm(image: &DisplayImage, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for row in top_down_rows(image) {
        for [r, g, b, _] in row {
            writeln!(writer, "{} {} {}", r, g, b)?;
        }
    }

    writer.flush()?;
    Ok(())
}
