//! Pixel compositing of laid-out frames: each placed asset is scaled to fit
//! its rectangle, centered, and alpha-blended onto the background.

use std::path::{Path, PathBuf};

use adframe_core::Size;
use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::frame::{FrameLayout, Placement};

/// Something that turns a [`FrameLayout`] into a finished creative.
pub trait FrameRenderer {
    type Output;

    fn render(&self, layout: &FrameLayout) -> Result<Self::Output>;
}

/// Largest size with the original aspect ratio that fits inside `target`,
/// truncated to whole pixels.
pub fn fit_within(original: (u32, u32), target: Size) -> (u32, u32) {
    let (width, height) = original;
    if width == 0 || height == 0 || target.width <= 0.0 || target.height <= 0.0 {
        return (0, 0);
    }
    let ratio = (target.width / width as f64).min(target.height / height as f64);
    (
        (width as f64 * ratio) as u32,
        (height as f64 * ratio) as u32,
    )
}

/// `image`-backed compositor that loads assets from the filesystem.
#[derive(Debug, Clone, Default)]
pub struct ImageCompositor {
    asset_root: Option<PathBuf>,
}

impl ImageCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative asset references against `root`.
    pub fn with_asset_root(root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: Some(root.into()),
        }
    }

    fn resolve(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        match &self.asset_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn load(&self, reference: &str) -> Result<RgbaImage> {
        let path = self.resolve(reference);
        let image = image::open(&path)
            .with_context(|| format!("failed to load image {}", path.display()))?;
        Ok(image.to_rgba8())
    }

    fn paste(&self, canvas: &mut RgbaImage, placement: &Placement) -> Result<()> {
        let asset = self.load(&placement.local_ref)?;
        let (width, height) = fit_within(asset.dimensions(), placement.dimensions);
        if width == 0 || height == 0 {
            warn!(
                asset = %placement.local_ref,
                cell = %placement.cell,
                "placement too small to hold asset, skipped"
            );
            return Ok(());
        }

        let resized = imageops::resize(&asset, width, height, FilterType::Lanczos3);
        let x = placement.start_point.x + (placement.dimensions.width - width as f64) / 2.0;
        let y = placement.start_point.y + (placement.dimensions.height - height as f64) / 2.0;
        imageops::overlay(canvas, &resized, x as i64, y as i64);

        debug!(asset = %placement.local_ref, x, y, width, height, "pasted asset");
        Ok(())
    }

    /// Composite all placements onto the background, in placement order.
    pub fn compose(&self, layout: &FrameLayout) -> Result<RgbaImage> {
        let mut canvas = self.load(&layout.background_ref)?;
        for placement in &layout.placements {
            self.paste(&mut canvas, placement)?;
        }
        metrics::counter!("compositor.frames_rendered").increment(1);
        Ok(canvas)
    }

    /// Composite and write the frame to `path`; the format follows the extension.
    pub fn render_to_file(&self, layout: &FrameLayout, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let image = self.compose(layout)?;
        image
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(frame_id = %layout.id, path = %path.display(), "rendered frame");
        Ok(path.to_path_buf())
    }
}

impl FrameRenderer for ImageCompositor {
    type Output = RgbaImage;

    fn render(&self, layout: &FrameLayout) -> Result<RgbaImage> {
        self.compose(layout)
    }
}
