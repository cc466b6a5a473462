//! Tests for error types including source chaining and message formatting

#[cfg(test)]
mod tests {
    use moodboard::MoodboardError;
    use moodboard::io::error::{FetchError, LoadError, invalid_parameter, surface_unavailable};
    use std::error::Error;

    // Tests error source chaining works correctly
    // Verified by breaking source chain
    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = MoodboardError::FileSystem {
            path: "/tmp/board.png".into(),
            operation: "write moodboard",
            source: io_error,
        };

        assert!(error.source().is_some());
        assert!(error.to_string().contains("/tmp/board.png"));
    }

    // Tests InvalidParameter error contains all fields
    // Verified by omitting value from message
    #[test]
    fn test_invalid_parameter_error() {
        let error = invalid_parameter("slot_count", &0, &"must lie within 1..=12");

        let message = error.to_string();
        assert!(message.contains("slot_count"));
        assert!(message.contains("'0'"));
        assert!(message.contains("1..=12"));
        assert!(error.source().is_none());
    }

    // Tests surface errors name the requested dimensions
    // Verified by swapping width and height
    #[test]
    fn test_surface_unavailable_error() {
        let error = surface_unavailable(0, 480, &"canvas has no area");

        let message = error.to_string();
        assert!(message.contains("0x480"));
        assert!(message.contains("canvas has no area"));
    }

    // Tests image errors convert into encode failures
    // Verified by mapping them to file system errors
    #[test]
    fn test_from_image_error() {
        let image_error = image::ImageError::IoError(std::io::Error::other("disk full"));
        let error = MoodboardError::from(image_error);

        assert!(matches!(error, MoodboardError::Encode { .. }));
        assert!(error.source().is_some());
    }

    // Tests fetch errors describe their cause
    // Verified by printing the same text for every variant
    #[test]
    fn test_fetch_error_messages() {
        assert!(FetchError::Status(503).to_string().contains("503"));
        assert!(FetchError::Timeout.to_string().contains("timed out"));
        assert!(FetchError::Payload("no images".into()).to_string().contains("no images"));

        let io = FetchError::from(std::io::Error::other("gone"));
        assert!(matches!(io, FetchError::Io(_)));
        assert!(io.source().is_some());
        assert!(FetchError::Status(500).source().is_none());
    }

    // Tests load errors name the failing location
    // Verified by dropping the location from the message
    #[test]
    fn test_load_error_messages() {
        let error = LoadError::Status {
            location: "https://img.test/a.png".into(),
            code: 404,
        };

        let message = error.to_string();
        assert!(message.contains("https://img.test/a.png"));
        assert!(message.contains("404"));
    }
}
