//! Tests for environment configuration

use super::*;
use std::collections::HashMap;

fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn test_missing_port_uses_default() {
    let config = ApiConfig::from_lookup(lookup_from(&[])).unwrap();

    assert_eq!(config.port, 8880);
    assert_eq!(config, ApiConfig::default());
}

#[test]
fn test_port_read_from_api_port() {
    let config = ApiConfig::from_lookup(lookup_from(&[("API_PORT", "9000")])).unwrap();

    assert_eq!(config.port, 9000);
}

#[test]
fn test_other_variables_are_ignored() {
    let config = ApiConfig::from_lookup(lookup_from(&[("PORT", "9000")])).unwrap();

    assert_eq!(config.port, DEFAULT_PORT);
}

#[test]
fn test_non_numeric_port_is_rejected() {
    let err = ApiConfig::from_lookup(lookup_from(&[("API_PORT", "eighty")])).unwrap_err();

    assert_eq!(
        err,
        ConfigError::InvalidPort {
            value: "eighty".to_string()
        }
    );
    assert!(err.to_string().contains("API_PORT"));
    assert!(err.to_string().contains("eighty"));
}

#[test]
fn test_empty_port_is_rejected() {
    assert!(ApiConfig::from_lookup(lookup_from(&[("API_PORT", "")])).is_err());
}

#[test]
fn test_parse_port_bounds() {
    assert_eq!(parse_port("1"), Ok(1));
    assert_eq!(parse_port("65535"), Ok(65535));
    assert!(parse_port("0").is_err());
    assert!(parse_port("65536").is_err());
    assert!(parse_port("-1").is_err());
    assert!(parse_port("80.5").is_err());
}

#[test]
fn test_parse_port_trims_whitespace() {
    assert_eq!(parse_port(" 8081\n"), Ok(8081));
}

#[test]
fn test_socket_addr_binds_all_interfaces() {
    let addr = ApiConfig::new(12345).socket_addr();

    assert!(addr.ip().is_unspecified());
    assert_eq!(addr.port(), 12345);
}
