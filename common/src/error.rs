//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown item kind: {0}. Use barcode, pdf417, checkbook, card_front or card_back")]
    UnknownKind(String),

    #[error("Invalid report state: {0}")]
    InvalidState(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_display_unknown_kind() {
        let error = Error::UnknownKind("passport".to_string());
        let display = format!("{}", error);
        assert!(display.starts_with("Unknown item kind: passport"));
        assert!(display.contains("card_back"));
    }

    #[test]
    fn test_error_display_invalid_state() {
        let error = Error::InvalidState("selection is not open".to_string());
        assert_eq!(format!("{}", error), "Invalid report state: selection is not open");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }
}
