use std::env;
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    S3,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bucket: String,
    /// Pins the S3 client to a region instead of the default chain's.
    pub region: Option<String>,
    pub store: StoreKind,
    pub bind: SocketAddr,
    pub log_format: LogFormat,
    /// Running inside the Lambda runtime rather than as a local server.
    pub lambda: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let bucket = lookup("DREAMWEEK_BUCKET").unwrap_or_else(|| "dreamweek".to_string());

        let store = match lookup("DREAMWEEK_STORE").as_deref() {
            None | Some("s3") => StoreKind::S3,
            Some("memory") => StoreKind::Memory,
            Some(other) => eyre::bail!("DREAMWEEK_STORE must be `s3` or `memory`, got `{other}`"),
        };

        let bind = lookup("DREAMWEEK_BIND")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|e| eyre::eyre!("invalid DREAMWEEK_BIND: {e}"))?;

        let log_format = match lookup("DREAMWEEK_LOG_FORMAT").as_deref() {
            Some("text") => LogFormat::Text,
            _ => LogFormat::Json,
        };

        Ok(Self {
            bucket,
            region: lookup("DREAMWEEK_REGION"),
            store,
            bind,
            log_format,
            lambda: lookup("AWS_LAMBDA_RUNTIME_API").is_some(),
        })
    }
}
