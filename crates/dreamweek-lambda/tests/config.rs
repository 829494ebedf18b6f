use std::collections::HashMap;

use dreamweek_lambda::config::{Config, LogFormat, StoreKind};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn defaults_without_environment() {
    let config = Config::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config.bucket, "dreamweek");
    assert_eq!(config.store, StoreKind::S3);
    assert_eq!(config.log_format, LogFormat::Json);
    assert_eq!(config.bind.to_string(), "127.0.0.1:3000");
    assert!(config.region.is_none());
    assert!(!config.lambda);
}

#[test]
fn reads_overrides() {
    let config = Config::from_lookup(lookup(&[
        ("DREAMWEEK_BUCKET", "goals-prod"),
        ("DREAMWEEK_STORE", "memory"),
        ("DREAMWEEK_BIND", "0.0.0.0:8080"),
        ("DREAMWEEK_LOG_FORMAT", "text"),
        ("DREAMWEEK_REGION", "eu-west-1"),
        ("AWS_LAMBDA_RUNTIME_API", "127.0.0.1:9001"),
    ]))
    .unwrap();

    assert_eq!(config.bucket, "goals-prod");
    assert_eq!(config.store, StoreKind::Memory);
    assert_eq!(config.bind.port(), 8080);
    assert_eq!(config.log_format, LogFormat::Text);
    assert_eq!(config.region.as_deref(), Some("eu-west-1"));
    assert!(config.lambda);
}

#[test]
fn rejects_unknown_store() {
    let err = Config::from_lookup(lookup(&[("DREAMWEEK_STORE", "dynamo")])).unwrap_err();
    assert!(err.to_string().contains("dynamo"));
}

#[test]
fn rejects_bad_bind_address() {
    assert!(Config::from_lookup(lookup(&[("DREAMWEEK_BIND", "localhost")])).is_err());
}
