//! Composition Engine: renders the ordered slot collection into one PNG
//!
//! Cells are drawn strictly in slot order, one image load at a time. Each cell is
//! painted as a placeholder before its load starts, so a failed or timed-out load
//! only costs that cell its picture.

use crate::board::slot::{ImageSlot, SlotId};
use crate::compose::layout::{CanvasSize, CellRect, layout};
use crate::compose::surface::{GLYPH_SIZE, Surface, text_scale_for};
use crate::fetch::loader::ImageLoader;
use crate::io::configuration::{DEFAULT_GUTTER, EXPORT_PREFIX, IMAGE_LOAD_TIMEOUT, UNAVAILABLE_LABEL};
use crate::io::error::{MoodboardError, Result};
use crate::io::progress::ProgressManager;
use chrono::{DateTime, Utc};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Colors and spacing of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositionStyle {
    /// Canvas background, also shown in unused grid cells
    pub background: Rgba<u8>,
    /// Cell fill shown until (or instead of) the image
    pub placeholder: Rgba<u8>,
    /// Frame around unlocked cells
    pub border: Rgba<u8>,
    /// Frame around locked cells
    pub locked_border: Rgba<u8>,
    /// Lock badge fill
    pub badge: Rgba<u8>,
    /// Translucent strip behind the tag label
    pub label_strip: Rgba<u8>,
    /// Tag label text
    pub label_text: Rgba<u8>,
    /// "unavailable" text
    pub unavailable_text: Rgba<u8>,
    /// Space between neighbouring cells
    pub gutter: u32,
    /// Frame thickness
    pub border_width: u32,
}

impl Default for CompositionStyle {
    fn default() -> Self {
        Self {
            background: Rgba([249, 245, 255, 255]),
            placeholder: Rgba([243, 244, 246, 255]),
            border: Rgba([229, 231, 235, 255]),
            locked_border: Rgba([139, 92, 246, 255]),
            badge: Rgba([139, 92, 246, 255]),
            label_strip: Rgba([255, 255, 255, 204]),
            label_text: Rgba([31, 41, 55, 255]),
            unavailable_text: Rgba([248, 113, 113, 255]),
            gutter: DEFAULT_GUTTER,
            border_width: 2,
        }
    }
}

/// How one cell's image load settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellOutcome {
    /// The image was drawn
    Loaded,
    /// Loading failed; the placeholder was kept
    Failed {
        /// Human-readable failure
        reason: String,
    },
    /// No answer within the load timeout; the placeholder was kept
    TimedOut,
}

impl CellOutcome {
    /// Whether the slot's image made it onto the canvas
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }
}

/// Per-cell record of an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellReport {
    /// Slot rendered into the cell
    pub slot: SlotId,
    /// Slot position at export time
    pub position: usize,
    /// Cell geometry on the canvas
    pub rect: CellRect,
    /// How the load settled
    pub outcome: CellOutcome,
}

/// Finished export artifact
#[derive(Debug, Clone)]
pub struct Composition {
    /// Suggested, timestamp-qualified file name
    pub filename: String,
    /// Canvas width
    pub width: u32,
    /// Canvas height
    pub height: u32,
    /// PNG-encoded canvas
    pub bytes: Vec<u8>,
    /// One report per slot, in slot order
    pub cells: Vec<CellReport>,
}

impl Composition {
    /// Cells left with a placeholder
    pub fn failed_cells(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| !cell.outcome.is_loaded())
            .count()
    }

    /// Write the artifact into `directory` under its generated file name
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file cannot be written
    pub fn save_to(&self, directory: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(directory).map_err(|e| MoodboardError::FileSystem {
            path: directory.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
        let path = directory.join(&self.filename);
        std::fs::write(&path, &self.bytes).map_err(|e| MoodboardError::FileSystem {
            path: path.clone(),
            operation: "write moodboard",
            source: e,
        })?;
        Ok(path)
    }
}

/// Export file name for a composition made at `at`
pub fn export_filename(at: DateTime<Utc>) -> String {
    format!("{EXPORT_PREFIX}-{}.png", at.format("%Y%m%d-%H%M%S"))
}

/// Encode `image` as PNG bytes
///
/// # Errors
///
/// Returns an error if the encoder rejects the image
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Renders slot collections into exportable images
pub struct Composer {
    loader: Arc<dyn ImageLoader>,
    style: CompositionStyle,
    load_timeout: Duration,
    progress: Option<ProgressManager>,
}

impl Composer {
    /// Composer loading images through `loader` with default style and timeout
    pub fn new(loader: Arc<dyn ImageLoader>) -> Self {
        Self {
            loader,
            style: CompositionStyle::default(),
            load_timeout: IMAGE_LOAD_TIMEOUT,
            progress: None,
        }
    }

    /// Use `style` for colors and spacing
    #[must_use]
    pub const fn with_style(mut self, style: CompositionStyle) -> Self {
        self.style = style;
        self
    }

    /// Cut off each image load after `timeout`
    #[must_use]
    pub const fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    /// Report per-cell progress to `progress`
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressManager) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Style in force
    pub const fn style(&self) -> &CompositionStyle {
        &self.style
    }

    /// Render `slots` onto a `canvas`-sized surface and encode it
    ///
    /// Slots are drawn in `position` order. Image load failures never fail the
    /// export; they are recorded in [`Composition::cells`].
    ///
    /// # Errors
    ///
    /// Returns an error only if no surface can be obtained for `canvas` or the
    /// finished surface cannot be encoded
    pub async fn compose(&self, slots: &[ImageSlot], canvas: CanvasSize) -> Result<Composition> {
        let mut surface = Surface::acquire(canvas)?;
        surface.fill(self.style.background);

        let mut ordered: Vec<&ImageSlot> = slots.iter().collect();
        ordered.sort_by_key(|slot| slot.position);
        let rects = layout(ordered.len(), canvas);

        if let Some(progress) = &self.progress {
            progress.begin(ordered.len());
        }

        let mut cells = Vec::with_capacity(ordered.len());
        for (slot, rect) in ordered.into_iter().zip(rects) {
            if let Some(progress) = &self.progress {
                progress.start_cell(slot.position, &slot.tag);
            }
            let outcome = self.render_cell(&mut surface, slot, rect).await;
            if let Some(progress) = &self.progress {
                progress.complete_cell(outcome.is_loaded());
            }
            cells.push(CellReport {
                slot: slot.id,
                position: slot.position,
                rect,
                outcome,
            });
        }

        if let Some(progress) = &self.progress {
            progress.finish();
        }

        let bytes = encode_png(surface.pixels())?;
        let composition = Composition {
            filename: export_filename(Utc::now()),
            width: canvas.width,
            height: canvas.height,
            bytes,
            cells,
        };
        info!(
            cells = composition.cells.len(),
            failed = composition.failed_cells(),
            filename = %composition.filename,
            "moodboard composed"
        );
        Ok(composition)
    }

    async fn render_cell(
        &self,
        surface: &mut Surface,
        slot: &ImageSlot,
        rect: CellRect,
    ) -> CellOutcome {
        let style = &self.style;
        let frame = rect.inset(style.gutter / 2);
        let content = frame.inset(style.border_width);
        let frame_color = if slot.is_locked {
            style.locked_border
        } else {
            style.border
        };
        surface.fill_rect(frame, frame_color);
        surface.fill_rect(content, style.placeholder);

        let outcome =
            match tokio::time::timeout(self.load_timeout, self.loader.load(&slot.location)).await {
                Ok(Ok(image)) => {
                    surface.draw_image_cover(&image, content);
                    debug!(
                        slot = %slot.id,
                        location = %slot.location,
                        remote = slot.is_remote(),
                        "cell image drawn"
                    );
                    CellOutcome::Loaded
                }
                Ok(Err(error)) => {
                    warn!(slot = %slot.id, %error, "cell image failed to load");
                    CellOutcome::Failed {
                        reason: error.to_string(),
                    }
                }
                Err(_elapsed) => {
                    warn!(
                        slot = %slot.id,
                        location = %slot.location,
                        timeout = ?self.load_timeout,
                        "cell image load timed out"
                    );
                    CellOutcome::TimedOut
                }
            };

        let scale = text_scale_for(content);
        if !outcome.is_loaded() {
            surface.draw_text_centered(content, UNAVAILABLE_LABEL, style.unavailable_text, scale);
        }

        let strip = content.bottom_strip(GLYPH_SIZE * scale + 8);
        surface.blend_rect(strip, style.label_strip);
        surface.draw_text_centered(strip, &slot.tag, style.label_text, scale);

        if slot.is_locked {
            let side = (GLYPH_SIZE * scale + 4).min(content.width).min(content.height);
            let badge = CellRect::new(
                content.x + content.width.saturating_sub(side + 4),
                content.y + 4,
                side,
                side,
            );
            surface.fill_rect(badge, style.badge);
            surface.fill_rect(badge.inset(side / 4), style.label_strip);
        }

        outcome
    }
}
