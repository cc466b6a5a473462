//! Tests for ordered, fault-tolerant composition and export artifacts

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
    use moodboard::MoodboardError;
    use moodboard::board::slot::{ImageSlot, SlotIdAllocator, SlotOrigin};
    use moodboard::compose::engine::{
        CellOutcome, Composer, Composition, CompositionStyle, export_filename,
    };
    use moodboard::compose::layout::{CanvasSize, CellRect, GridShape, grid_cells};
    use moodboard::fetch::loader::{FsImageLoader, ImageLoader};
    use moodboard::io::error::LoadError;
    use moodboard::io::progress::ProgressManager;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const RED: Rgba<u8> = Rgba([220, 20, 20, 255]);

    /// `red:*` loads a red square, `slow:*` stalls, anything else is missing
    #[derive(Default)]
    struct ScriptedLoader {
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ImageLoader for ScriptedLoader {
        async fn load(&self, location: &str) -> Result<DynamicImage, LoadError> {
            self.requested
                .lock()
                .expect("loader log")
                .push(location.to_string());
            if location.starts_with("slow:") {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            if location.starts_with("red:") || location.starts_with("slow:") {
                return Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 48, RED)));
            }
            Err(LoadError::Io {
                location: location.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such image"),
            })
        }
    }

    fn slots(locations: &[&str]) -> Vec<ImageSlot> {
        let mut ids = SlotIdAllocator::new();
        locations
            .iter()
            .enumerate()
            .map(|(position, location)| ImageSlot {
                id: ids.allocate(),
                location: (*location).to_string(),
                tag: format!("tag {position}"),
                is_locked: false,
                position,
                origin: SlotOrigin::Fetched,
            })
            .collect()
    }

    fn content(rect: CellRect, style: &CompositionStyle) -> CellRect {
        rect.inset(style.gutter / 2).inset(style.border_width)
    }

    fn decode(composition: &Composition) -> RgbaImage {
        image::load_from_memory(&composition.bytes)
            .expect("valid png")
            .to_rgba8()
    }

    // Tests every load failing still yields a full image of placeholder cells
    // Verified by aborting on the first failed load
    #[tokio::test]
    async fn test_all_loads_fail() {
        let style = CompositionStyle::default();
        let composer = Composer::new(Arc::new(ScriptedLoader::default()));
        let board = slots(&["a", "b", "c", "d", "e", "f", "g"]);

        let composition = composer
            .compose(&board, CanvasSize::new(600, 600))
            .await
            .expect("surface available");

        assert_eq!(composition.cells.len(), 7);
        assert_eq!(composition.failed_cells(), 7);
        assert!(composition
            .cells
            .iter()
            .all(|cell| matches!(cell.outcome, CellOutcome::Failed { .. })));

        let image = decode(&composition);
        assert_eq!(image.dimensions(), (600, 600));
        for cell in &composition.cells {
            let inner = content(cell.rect, &style);
            assert_eq!(image.get_pixel(inner.x + 1, inner.y + 1), &style.placeholder);
            assert_eq!(image.get_pixel(cell.rect.x, cell.rect.y), &style.background);
            // The "unavailable" label inks the middle of the cell
            let middle_row = inner.y + inner.height / 2;
            let inked = (inner.x..inner.x + inner.width)
                .any(|x| image.get_pixel(x, middle_row) != &style.placeholder);
            assert!(inked);
        }
    }

    // Tests cells follow slot positions, not slice order, and loads run in that order
    // Verified by iterating the input slice directly
    #[tokio::test]
    async fn test_slot_order_and_mixed_outcomes() {
        let loader = Arc::new(ScriptedLoader::default());
        let composer = Composer::new(loader.clone());
        let mut board = slots(&["red:0", "missing:1", "red:2"]);
        board.reverse();

        let composition = composer
            .compose(&board, CanvasSize::new(300, 100))
            .await
            .expect("surface available");

        let positions: Vec<usize> = composition.cells.iter().map(|cell| cell.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(
            *loader.requested.lock().expect("loader log"),
            vec!["red:0", "missing:1", "red:2"]
        );
        assert!(composition.cells[0].outcome.is_loaded());
        assert!(!composition.cells[1].outcome.is_loaded());
        assert_eq!(composition.failed_cells(), 1);

        let image = decode(&composition);
        let first = content(composition.cells[0].rect, composer.style());
        let pixel = image.get_pixel(first.x + first.width / 2, first.y + 2);
        assert!(pixel[0] > 200 && pixel[1] < 40);
    }

    // Tests a stalled load is cut off and the remaining cells still render
    // Verified by awaiting the load without a timeout
    #[tokio::test]
    async fn test_load_timeout() {
        let composer = Composer::new(Arc::new(ScriptedLoader::default()))
            .with_load_timeout(Duration::from_millis(20));
        let board = slots(&["slow:0", "red:1"]);

        let composition = composer
            .compose(&board, CanvasSize::new(200, 100))
            .await
            .expect("surface available");

        assert_eq!(composition.cells[0].outcome, CellOutcome::TimedOut);
        assert_eq!(composition.cells[1].outcome, CellOutcome::Loaded);
    }

    // Tests a decode still running at the deadline is cut off
    // Verified by decoding on the async worker
    #[tokio::test]
    async fn test_load_timeout_during_decode() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("large.png");
        GrayImage::from_pixel(2500, 2500, Luma([128]))
            .save(&path)
            .expect("write fixture");
        let composer =
            Composer::new(Arc::new(FsImageLoader)).with_load_timeout(Duration::from_millis(1));
        let location = path.to_string_lossy().into_owned();
        let board = slots(&[location.as_str()]);

        let composition = composer
            .compose(&board, CanvasSize::new(200, 100))
            .await
            .expect("surface available");

        assert_eq!(composition.cells[0].outcome, CellOutcome::TimedOut);
    }

    // Tests a custom style reaches the canvas
    // Verified by ignoring the configured style
    #[tokio::test]
    async fn test_custom_style() {
        let style = CompositionStyle {
            background: Rgba([10, 20, 30, 255]),
            locked_border: Rgba([0, 200, 0, 255]),
            ..CompositionStyle::default()
        };
        let composer = Composer::new(Arc::new(ScriptedLoader::default())).with_style(style);
        assert_eq!(composer.style(), &style);
        let mut board = slots(&["a", "b", "c", "d", "e"]);
        board[0].is_locked = true;
        let canvas = CanvasSize::new(600, 400);

        let composition = composer
            .compose(&board, canvas)
            .await
            .expect("surface available");

        let image = decode(&composition);
        let spare = grid_cells(GridShape::for_count(5), canvas)[5];
        assert_eq!(
            image.get_pixel(spare.x + spare.width / 2, spare.y + spare.height / 2),
            &style.background
        );
        let frame = composition.cells[0].rect.inset(style.gutter / 2);
        assert_eq!(
            image.get_pixel(frame.x, frame.y + frame.height / 3),
            &style.locked_border
        );
    }

    // Tests locked cells get the locked frame color
    // Verified by framing every cell the same way
    #[tokio::test]
    async fn test_locked_frame() {
        let style = CompositionStyle::default();
        let composer = Composer::new(Arc::new(ScriptedLoader::default()));
        let mut board = slots(&["a", "b"]);
        board[1].is_locked = true;

        let composition = composer
            .compose(&board, CanvasSize::new(400, 200))
            .await
            .expect("surface available");

        let image = decode(&composition);
        let frame_pixel = |rect: CellRect| {
            let frame = rect.inset(style.gutter / 2);
            *image.get_pixel(frame.x, frame.y + frame.height / 3)
        };
        assert_eq!(frame_pixel(composition.cells[0].rect), style.border);
        assert_eq!(frame_pixel(composition.cells[1].rect), style.locked_border);
    }

    // Tests grid cells beyond the slot count keep the background
    // Verified by filling the whole grid with placeholders
    #[tokio::test]
    async fn test_unused_cells_background() {
        let style = CompositionStyle::default();
        let composer = Composer::new(Arc::new(ScriptedLoader::default()));
        let canvas = CanvasSize::new(600, 400);

        let composition = composer
            .compose(&slots(&["a", "b", "c", "d", "e"]), canvas)
            .await
            .expect("surface available");

        let spare = grid_cells(GridShape::for_count(5), canvas)[5];
        let image = decode(&composition);
        assert_eq!(
            image.get_pixel(spare.x + spare.width / 2, spare.y + spare.height / 2),
            &style.background
        );
    }

    // Tests an unobtainable surface is the one fatal error
    // Verified by clamping the canvas to one pixel
    #[tokio::test]
    async fn test_surface_unavailable() {
        let composer = Composer::new(Arc::new(ScriptedLoader::default()));

        let result = composer.compose(&slots(&["a"]), CanvasSize::new(0, 0)).await;
        assert!(matches!(result, Err(MoodboardError::SurfaceUnavailable { .. })));
    }

    // Tests an empty board still exports a blank canvas
    // Verified by refusing empty input
    #[tokio::test]
    async fn test_empty_board() {
        let composer = Composer::new(Arc::new(ScriptedLoader::default()));

        let composition = composer
            .compose(&[], CanvasSize::new(50, 40))
            .await
            .expect("surface available");

        assert!(composition.cells.is_empty());
        assert_eq!(decode(&composition).dimensions(), (50, 40));
    }

    // Tests progress reporting counts settled and failed cells
    // Verified by counting only loaded cells as settled
    #[tokio::test]
    async fn test_progress_reporting() {
        let progress = ProgressManager::hidden();
        let composer =
            Composer::new(Arc::new(ScriptedLoader::default())).with_progress(progress.clone());

        composer
            .compose(&slots(&["red:0", "x", "y", "red:3"]), CanvasSize::new(200, 200))
            .await
            .expect("surface available");

        assert_eq!(progress.completed_cells(), 4);
        assert_eq!(progress.failed_cells(), 2);
    }

    // Tests filenames carry a sortable UTC timestamp
    // Verified by formatting the month without padding
    #[test]
    fn test_export_filename() {
        let at = Utc
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .single()
            .expect("valid timestamp");

        assert_eq!(export_filename(at), "moodboard-20240309-140507.png");
    }

    // Tests saving writes the encoded bytes under the generated name
    // Verified by writing to the directory path itself
    #[tokio::test]
    async fn test_save_to() {
        let dir = tempfile::tempdir().expect("temp dir");
        let composer = Composer::new(Arc::new(ScriptedLoader::default()));
        let composition = composer
            .compose(&slots(&["a", "b"]), CanvasSize::new(120, 80))
            .await
            .expect("surface available");

        let path = composition
            .save_to(&dir.path().join("exports"))
            .expect("writable directory");

        assert_eq!(
            path.file_name().map(|name| name.to_string_lossy().into_owned()),
            Some(composition.filename.clone())
        );
        assert!(composition.filename.starts_with("moodboard-"));
        assert_eq!(std::fs::read(&path).expect("saved file"), composition.bytes);
    }
}
