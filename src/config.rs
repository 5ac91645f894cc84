//! Command-line configuration for the server binary.

use crate::charts::RenderOptions;
use clap::Parser;
use std::net::SocketAddr;

/// CSV Insight: upload a CSV, explore it with charts and basic statistics.
#[derive(Parser, Debug, Clone)]
#[command(name = "csv-insight", version, about)]
pub struct Config {
    /// Bind address.
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value = "8501")]
    pub port: u16,

    /// Maximum upload size in MiB.
    #[arg(long, default_value = "200")]
    pub max_upload_mb: usize,

    /// Width of rendered charts in pixels.
    #[arg(long, default_value = "1000")]
    pub plot_width: u32,

    /// Height of rendered charts in pixels.
    #[arg(long, default_value = "600")]
    pub plot_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_from(["csv-insight"])
    }
}

impl Config {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.plot_width,
            height: self.plot_height,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        // Clamp rather than overflow on absurd values.
        self.max_upload_mb.saturating_mul(1024).saturating_mul(1024)
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}
