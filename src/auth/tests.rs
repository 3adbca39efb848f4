//! Tests for the auth module

use super::*;
use crate::error::Error;

#[test]
fn test_credentials_normalise_base_url() {
    let creds = Credentials::new("https://api.example.com/vipapi", "secret").unwrap();
    assert_eq!(creds.base_url(), "https://api.example.com/vipapi/");

    let creds = Credentials::new("https://api.example.com/vipapi/", "secret").unwrap();
    assert_eq!(creds.base_url(), "https://api.example.com/vipapi/");
}

#[test]
fn test_credentials_bearer_header() {
    let creds = Credentials::new("https://api.example.com/", "abc123").unwrap();
    assert_eq!(creds.bearer_header(), "Bearer abc123");
}

#[test]
fn test_credentials_missing_values() {
    assert!(matches!(
        Credentials::new("", "token"),
        Err(Error::Credential { .. })
    ));
    assert!(matches!(
        Credentials::new("https://api.example.com/", "   "),
        Err(Error::Credential { .. })
    ));
}

#[test]
fn test_credentials_bad_url() {
    assert!(matches!(
        Credentials::new("not a url", "token"),
        Err(Error::Credential { .. })
    ));
    assert!(matches!(
        Credentials::new("ftp://files.example.com/", "token"),
        Err(Error::Credential { .. })
    ));
}

#[test]
fn test_credentials_from_parts() {
    let err = Credentials::from_parts(None, None).unwrap_err();
    assert_eq!(err.to_string(), "Credential error: Missing credentials.");

    let err = Credentials::from_parts(Some("https://api.example.com/".into()), None).unwrap_err();
    assert!(matches!(err, Error::Credential { .. }));

    let creds =
        Credentials::from_parts(Some("https://api.example.com".into()), Some("t".into())).unwrap();
    assert_eq!(creds.base_url(), "https://api.example.com/");
}

#[test]
fn test_credentials_debug_redacts_token() {
    let creds = Credentials::new("https://api.example.com/", "very-secret").unwrap();
    let debug = format!("{creds:?}");
    assert!(!debug.contains("very-secret"));
    assert!(debug.contains("***"));
}
