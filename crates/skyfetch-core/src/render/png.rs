use std::path::{Path, PathBuf};

use image::{ImageFormat, Luma};
use tracing::info;

use crate::error::Result;
use crate::frame::Frame;
use crate::render::stretch::Stretch;
use crate::render::{DisplayImage, Renderer};

/// Headless renderer: writes `<output_dir>/<file stem>.png` and returns immediately.
pub struct PngRenderer {
    output_dir: PathBuf,
    stretch: Stretch,
    /// Paths written so far, in render order.
    pub written: Vec<PathBuf>,
}

impl PngRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, stretch: Stretch) -> Self {
        Self {
            output_dir: output_dir.into(),
            stretch,
            written: Vec::new(),
        }
    }

    /// Output path for an image titled `title`.
    pub fn path_for(&self, title: &str) -> PathBuf {
        self.output_dir.join(format!("{}.png", png_stem(title)))
    }
}

impl Renderer for PngRenderer {
    fn render(&mut self, image: &DisplayImage) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        let frame = image.to_frame(&self.stretch);
        let path = self.path_for(&image.title);
        save_png(&frame, &path)?;
        info!(path = %path.display(), "Saved rendered image");
        self.written.push(path);
        Ok(())
    }
}

/// Save frame as 8-bit grayscale PNG.
pub fn save_png(frame: &Frame, path: &Path) -> Result<()> {
    let h = frame.height();
    let w = frame.width();
    let mut img = image::GrayImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            let val = (frame.data[[row, col]].clamp(0.0, 1.0) * 255.0).round() as u8;
            img.put_pixel(col as u32, row as u32, Luma([val]));
        }
    }

    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// File stem for a title: FITS extensions dropped, unsafe characters replaced.
fn png_stem(title: &str) -> String {
    let lower = title.to_ascii_lowercase();
    let cut = [".fits.gz", ".fits.fz", ".fits", ".fit", ".fts"]
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map_or(title.len(), |ext| title.len() - ext.len());
    let stem: String = title[..cut]
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "image".to_string()
    } else {
        stem
    }
}
