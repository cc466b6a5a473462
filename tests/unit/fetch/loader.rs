//! Tests for file and HTTP image loading

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use moodboard::fetch::loader::{DefaultImageLoader, FsImageLoader, HttpImageLoader, ImageLoader};
    use moodboard::io::error::LoadError;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, String) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("red.png");
        RgbaImage::from_pixel(4, 3, Rgba([255, 0, 0, 255]))
            .save(&path)
            .expect("write fixture");
        (dir, path.to_string_lossy().into_owned())
    }

    // Tests plain paths and file URIs decode to the stored image
    // Verified by skipping the scheme strip
    #[tokio::test]
    async fn test_fs_loader() {
        let (_dir, path) = fixture();

        let image = FsImageLoader.load(&path).await.expect("readable image");
        assert_eq!((image.width(), image.height()), (4, 3));

        let uri = format!("file://{path}");
        let image = FsImageLoader.load(&uri).await.expect("readable image");
        assert_eq!(image.to_rgba8().get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    }

    // Tests missing files and undecodable bytes map to distinct errors
    // Verified by reporting every failure as I/O
    #[tokio::test]
    async fn test_fs_loader_errors() {
        let dir = tempfile::tempdir().expect("temp dir");
        let garbage = dir.path().join("garbage.png");
        std::fs::write(&garbage, b"definitely not a png").expect("write fixture");

        let missing = FsImageLoader
            .load(&dir.path().join("absent.png").to_string_lossy())
            .await;
        assert!(matches!(missing, Err(LoadError::Io { .. })));

        let undecodable = FsImageLoader.load(&garbage.to_string_lossy()).await;
        assert!(matches!(undecodable, Err(LoadError::Decode { .. })));
    }

    // Tests the default loader routes local paths to the file system
    // Verified by routing everything over HTTP
    #[tokio::test]
    async fn test_default_loader_routes() {
        let (_dir, path) = fixture();
        let loader = DefaultImageLoader::new();

        assert!(loader.load(&path).await.is_ok());

        let remote = loader.load("http://127.0.0.1:9/red.png").await;
        assert!(matches!(
            remote,
            Err(LoadError::Http { .. } | LoadError::Status { .. })
        ));
    }

    // Tests an unreachable server is an HTTP error
    // Verified by panicking on connection failure
    #[tokio::test]
    async fn test_http_loader_unreachable() {
        let loader = HttpImageLoader::with_client(reqwest::Client::new());

        let result = loader.load("http://127.0.0.1:9/a.png").await;
        assert!(matches!(result, Err(LoadError::Http { .. })));
    }
}
