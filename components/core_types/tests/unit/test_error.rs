//! Unit tests for PromiseError, ErrorKind and ConfigError

use core_types::{ConfigError, ErrorKind, PromiseError};

#[cfg(test)]
mod error_kind_tests {
    use super::*;

    #[test]
    fn test_error_kind_is_copy() {
        let kind = ErrorKind::Thrown;
        let copy = kind;
        assert_eq!(kind, copy);
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        assert_ne!(ErrorKind::Rejected, ErrorKind::Thrown);
    }
}

#[cfg(test)]
mod promise_error_tests {
    use super::*;

    #[test]
    fn test_rejected_constructor() {
        let error = PromiseError::rejected("E1");
        assert_eq!(error.kind, ErrorKind::Rejected);
        assert_eq!(error.message, "E1");
    }

    #[test]
    fn test_thrown_constructor() {
        let error = PromiseError::thrown("lost result");
        assert_eq!(error.kind, ErrorKind::Thrown);
        assert_eq!(error.to_string(), "thrown: lost result");
    }

    #[test]
    fn test_new_accepts_owned_string() {
        let error = PromiseError::new(ErrorKind::Rejected, String::from("owned"));
        assert_eq!(error.message, "owned");
    }

    #[test]
    fn test_clone_is_equal() {
        let error = PromiseError::thrown("boom");
        assert_eq!(error.clone(), error);
    }

    #[test]
    fn test_is_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(PromiseError::rejected("x"));
        assert_eq!(error.to_string(), "rejected: x");
    }
}

#[cfg(test)]
mod config_error_tests {
    use super::*;

    #[test]
    fn test_parse_display() {
        let error = ConfigError::Parse("expected value at line 1".to_string());
        assert_eq!(
            error.to_string(),
            "invalid scheduler config: expected value at line 1"
        );
    }

    #[test]
    fn test_invalid_display() {
        let error = ConfigError::Invalid {
            field: "default_delay_ms",
            reason: "too large".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "invalid value for `default_delay_ms`: too large"
        );
    }
}
