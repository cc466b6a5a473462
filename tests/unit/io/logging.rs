//! Tests for verbosity selection and subscriber installation

#[cfg(test)]
mod tests {
    use moodboard::io::logging::{Verbosity, init};

    // Tests flag combinations map to verbosity levels
    // Verified by letting verbose win over quiet
    #[test]
    fn test_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::default(), Verbosity::Normal);
    }

    // Tests default filter directives
    // Verified by mapping quiet to error
    #[test]
    fn test_directives() {
        assert_eq!(Verbosity::Quiet.directive(), "warn");
        assert_eq!(Verbosity::Normal.directive(), "info");
        assert_eq!(Verbosity::Verbose.directive(), "debug");
    }

    // Tests the global subscriber installs only once
    // Verified by reporting success on every call
    #[test]
    fn test_init_once() {
        init(Verbosity::Quiet);
        assert!(!init(Verbosity::Quiet));
    }
}
