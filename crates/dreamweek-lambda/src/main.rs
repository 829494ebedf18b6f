use tracing_subscriber::EnvFilter;

use dreamweek_lambda::config::{Config, LogFormat};
use dreamweek_lambda::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let config = Config::from_env()?;

    let subscriber = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());
    match config.log_format {
        // Structured JSON logging for CloudWatch
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }

    let state = AppState::from_config(&config).await;
    let app = dreamweek_lambda::app(state);

    if config.lambda {
        tracing::info!(bucket = %config.bucket, "starting lambda runtime");
        return lambda_http::run(app).await.map_err(|e| eyre::eyre!(e));
    }

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(addr = %config.bind, store = ?config.store, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
