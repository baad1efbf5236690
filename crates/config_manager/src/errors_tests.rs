//! Tests for configuration error types.

use crate::errors::*;

#[test]
fn configuration_error_file_not_found_display() {
    let error = ConfigurationError::FileNotFound {
        path: "config.toml".to_string(),
    };

    assert_eq!(error.to_string(), "Configuration file not found: config.toml");
}

#[test]
fn configuration_error_invalid_configuration_display() {
    let error = ConfigurationError::InvalidConfiguration {
        field: "output_dir".to_string(),
        reason: "must not be empty".to_string(),
    };

    match &error {
        ConfigurationError::InvalidConfiguration { field, reason } => {
            assert_eq!(field, "output_dir");
            assert_eq!(reason, "must not be empty");
        }
        _ => panic!("Expected InvalidConfiguration"),
    }
    assert_eq!(
        error.to_string(),
        "Invalid configuration: output_dir - must not be empty"
    );
}

#[test]
fn configuration_error_is_cloneable_and_comparable() {
    let error = ConfigurationError::ParseError {
        reason: "expected `=`".to_string(),
    };

    assert_eq!(error.clone(), error);
}
