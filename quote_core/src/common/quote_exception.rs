use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Error codes for the quote system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[repr(i32)]
pub enum ErrCode {
    // Argument errors (0-99)
    #[strum(serialize = "INVALID_ARGUMENT")]
    InvalidArgument = 5,
    #[strum(serialize = "CONFIG_ERROR")]
    ConfigError = 17,
}

#[derive(Debug, Error)]
#[error("{errcode}: {msg}")]
pub struct QuoteException {
    pub errcode: ErrCode,
    pub msg: String,
}

impl QuoteException {
    pub fn new(message: impl Into<String>, code: ErrCode) -> Self {
        Self {
            errcode: code,
            msg: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(message, ErrCode::InvalidArgument)
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::new(message, ErrCode::ConfigError)
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.errcode == ErrCode::InvalidArgument
    }
}

pub type QuoteResult<T> = Result<T, QuoteException>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_carries_code() {
        let err = QuoteException::invalid_argument("window_size must be positive");
        assert_eq!(
            err.to_string(),
            "INVALID_ARGUMENT: window_size must be positive"
        );
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_config_error() {
        let err = QuoteException::config_error("unknown para = foo");
        assert_eq!(err.errcode, ErrCode::ConfigError);
        assert_eq!(err.errcode as i32, 17);
        assert!(!err.is_invalid_argument());
        assert_eq!(err.to_string(), "CONFIG_ERROR: unknown para = foo");
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(
            ErrCode::from_str("CONFIG_ERROR").unwrap(),
            ErrCode::ConfigError
        );
        assert!(ErrCode::from_str("NOPE").is_err());
    }
}
