//! Chart rasterisation and PNG output.
//!
//! All charts are rendered into memory before any file is written, and
//! writes are staged, so neither a render failure nor a write failure
//! leaves a partial set on disk.

use crate::chart::{ChartKind, ChartRow, chart_payload};
use crate::error::{ChartError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Pixel dimensions of each rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 700,
            height: 500,
        }
    }
}

/// Render one chart to PNG bytes.
///
/// # Errors
///
/// Returns an error if the payload is invalid, the backend fails, or PNG
/// encoding fails.
pub fn render_chart_png(kind: ChartKind, rows: &[ChartRow], options: ChartOptions) -> Result<Vec<u8>> {
    use canvas_renderer::chart::{parse_chart_config, render_chart_to_buffer};

    let payload = chart_payload(kind, rows)?;
    let width = options.width.max(100);
    let height = options.height.max(100);

    let config = parse_chart_config(kind.chart_type(), &payload, width, height)
        .map_err(|e| ChartError::Render(format!("{}: {e}", kind.file_name())))?;
    let rgba = render_chart_to_buffer(&config)
        .map_err(|e| ChartError::Render(format!("{}: {e}", kind.file_name())))?;

    debug!(chart = kind.file_name(), width, height, "chart rasterised");
    encode_rgba_to_png(&rgba, width, height)
}

/// Render all four charts into memory, in [`ChartKind::ALL`] order.
///
/// # Errors
///
/// Returns the first chart error; no partial result is returned.
pub fn render_all(rows: &[ChartRow], options: ChartOptions) -> Result<Vec<(ChartKind, Vec<u8>)>> {
    ChartKind::ALL
        .iter()
        .map(|&kind| render_chart_png(kind, rows, options).map(|png| (kind, png)))
        .collect()
}

/// Render all four charts and write them into `out_dir`.
///
/// Returns the written paths in [`ChartKind::ALL`] order. Nothing is written
/// unless every chart rendered successfully. Files are staged under
/// temporary names and renamed into place once all four are on disk; on an
/// I/O failure every staged or already renamed file is removed again.
///
/// # Errors
///
/// Returns an error if rendering fails or a file cannot be written.
pub fn write_charts(rows: &[ChartRow], out_dir: &Path, options: ChartOptions) -> Result<Vec<PathBuf>> {
    let rendered = render_all(rows, options)?;

    std::fs::create_dir_all(out_dir)?;
    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(rendered.len());
    for (kind, png) in &rendered {
        let tmp = out_dir.join(format!(".{}.partial", kind.file_name()));
        if let Err(e) = std::fs::write(&tmp, png) {
            remove_all(staged.iter().map(|(tmp, _)| tmp).chain([&tmp]));
            return Err(e.into());
        }
        staged.push((tmp, out_dir.join(kind.file_name())));
    }

    for (i, (tmp, path)) in staged.iter().enumerate() {
        if let Err(e) = std::fs::rename(tmp, path) {
            remove_all(staged[..i].iter().map(|(_, path)| path));
            remove_all(staged[i..].iter().map(|(tmp, _)| tmp));
            return Err(e.into());
        }
    }

    let written: Vec<PathBuf> = staged.into_iter().map(|(_, path)| path).collect();
    for path in &written {
        info!(path = %path.display(), "chart written");
    }
    Ok(written)
}

fn remove_all<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) {
    for path in paths {
        if let Err(e) = std::fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "failed to remove chart file");
            }
        }
    }
}

/// Encode an RGBA pixel buffer to PNG bytes.
fn encode_rgba_to_png(rgba: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    use image::ImageEncoder;

    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    encoder
        .write_image(rgba, width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| ChartError::Encode(e.to_string()))?;
    Ok(buf)
}
