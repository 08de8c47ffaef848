//! Unit tests for configuration parsing and validation.

use courier_chat::config::GlobalConfig;
use courier_chat::AppError;

#[test]
fn minimal_config_applies_defaults() {
    let config = GlobalConfig::from_toml_str(r#"db_path = "/tmp/courier.db""#).expect("parse");
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.list_page_cap, 500);
    assert!(config.notify.webhook_url.is_empty());
}

#[test]
fn full_config_parses() {
    let config = GlobalConfig::from_toml_str(
        r#"
db_path = "/var/lib/courier/chat.db"
http_port = 9000
list_page_cap = 200

[notify]
webhook_url = "https://push.example.com/hook"
"#,
    )
    .expect("parse");

    assert_eq!(config.http_port, 9000);
    assert_eq!(config.list_page_cap, 200);
    assert_eq!(config.notify.webhook_url, "https://push.example.com/hook");
}

#[test]
fn empty_db_path_is_rejected() {
    let err = GlobalConfig::from_toml_str(r#"db_path = """#);
    assert!(matches!(err, Err(AppError::Config(_))));
}

#[test]
fn zero_page_cap_is_rejected() {
    let err = GlobalConfig::from_toml_str(
        r#"
db_path = "/tmp/courier.db"
list_page_cap = 0
"#,
    );
    assert!(matches!(err, Err(AppError::Config(_))));
}

#[test]
fn non_http_webhook_url_is_rejected() {
    let err = GlobalConfig::from_toml_str(
        r#"
db_path = "/tmp/courier.db"

[notify]
webhook_url = "ftp://push.example.com/hook"
"#,
    );
    assert!(matches!(err, Err(AppError::Config(_))));
}

#[test]
fn invalid_toml_is_a_config_error() {
    let err = GlobalConfig::from_toml_str("db_path = [");
    assert!(matches!(err, Err(AppError::Config(_))));
}
