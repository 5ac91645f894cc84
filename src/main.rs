//! CSV Insight server
//!
//! # Endpoints
//!
//! - `POST /v1/sessions`                    : new session id
//! - `PUT  /v1/sessions/{id}/table`         : raw CSV body → table overview
//! - `GET  /v1/sessions/{id}/options/{kind}`: selectable columns
//! - `POST /v1/sessions/{id}/plot`          : chart + PNG download link
//! - `GET  /v1/sessions/{id}/summary`       : summary statistics
//! - `POST /v1/sessions/{id}/ttest`         : two-sample t-test
//! - `GET  /v1/health`                      : server status

use clap::Parser;
use csv_insight::config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Config::parse();
    let app = csv_insight::web::app(&config);

    let addr = config.bind_addr()?;
    tracing::info!(
        %addr,
        max_upload_mb = config.max_upload_mb,
        plot_width = config.plot_width,
        plot_height = config.plot_height,
        version = env!("CARGO_PKG_VERSION"),
        "csv-insight starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
