//! Tests for error types.

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("poll interval cannot be 0");
        assert_eq!(
            err.to_string(),
            "configuration error: poll interval cannot be 0"
        );
    }

    #[test]
    fn test_invalid_path_display() {
        let err = WatcherError::invalid_path("s3://bucket", "missing object name");
        assert_eq!(
            err.to_string(),
            "invalid watch path 's3://bucket': missing object name"
        );
    }

    #[test]
    fn test_watcher_error_conversion() {
        let watch_err = WatcherError::UnsupportedScheme {
            path: "gs://bucket/key".to_string(),
            expected: "s3".to_string(),
        };
        let err: Error = watch_err.into();
        assert!(matches!(err, Error::Watcher(_)));
    }

    #[test]
    fn test_backend_code_preserved() {
        let err = SourceError::backend("s3://bucket/key", ErrorCode::NotFound, "no such key");
        assert_eq!(err.code(), Some(&ErrorCode::NotFound));
        assert_eq!(err.path(), "s3://bucket/key");
        assert_eq!(
            err.to_string(),
            "backend error [NotFound] for 's3://bucket/key': no such key"
        );
    }

    #[test]
    fn test_non_backend_errors_have_no_code() {
        let transport = SourceError::transport("s3://b/k", "dns failure");
        assert!(transport.code().is_none());

        let missing = SourceError::MissingFingerprint {
            path: "s3://b/k".to_string(),
        };
        assert!(missing.code().is_none());
        assert_eq!(missing.path(), "s3://b/k");
    }

    #[test]
    fn test_other_code_display() {
        let code = ErrorCode::Other("SlowDown".to_string());
        assert_eq!(code.to_string(), "SlowDown");
    }

    #[test]
    fn test_timeout_display() {
        let err = SourceError::Timeout {
            path: "s3://b/k".to_string(),
            timeout: std::time::Duration::from_secs(30),
        };
        assert!(err.to_string().contains("timed out after 30s"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(Error::config("test error"))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }

    #[test]
    fn test_error_debug_format() {
        let err = Error::Internal("something went wrong".to_string());
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("Internal"));
        assert!(debug_str.contains("something went wrong"));
    }
}
