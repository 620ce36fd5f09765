//! Tracing subscriber setup: an `EnvFilter`-gated console formatter, plus a
//! Loki shipper when `LOKI_ENABLED` is set and the `loki` feature is built.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: String,
    pub service: String,
    pub environment: String,
    /// Push endpoint; `None` keeps logging on the console only.
    pub loki_url: Option<Url>,
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let loki_enabled = lookup("LOKI_ENABLED")
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);
        let loki_url = match (loki_enabled, lookup("LOKI_URL")) {
            (false, _) => None,
            (true, None) => return Err("LOKI_ENABLED is true but LOKI_URL is not set".to_string()),
            (true, Some(raw)) => {
                Some(Url::parse(&raw).map_err(|e| format!("Invalid LOKI_URL {}: {}", raw, e))?)
            }
        };

        Ok(Self {
            filter: lookup("RUST_LOG").unwrap_or_else(|| "info,tower_http=debug".to_string()),
            service: lookup("SERVICE_NAME").unwrap_or_else(|| "stocktracker".to_string()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            loki_url,
        })
    }
}

pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::new(&config.filter))
        .with(tracing_subscriber::fmt::layer());

    #[cfg(feature = "loki")]
    let registry = registry.with(loki_layer(&config)?);

    registry.try_init()?;

    #[cfg(not(feature = "loki"))]
    {
        if config.loki_url.is_some() {
            tracing::warn!("LOKI_URL is set but the loki feature is not compiled in");
        }
    }

    tracing::info!(
        service = %config.service,
        environment = %config.environment,
        loki = config.loki_url.is_some(),
        "Logging initialized"
    );
    Ok(())
}

#[cfg(feature = "loki")]
fn loki_layer(config: &LoggingConfig) -> Result<Option<tracing_loki::Layer>, tracing_loki::Error> {
    let Some(url) = config.loki_url.clone() else {
        return Ok(None);
    };
    let (layer, task) = tracing_loki::builder()
        .label("service", &config.service)?
        .label("environment", &config.environment)?
        .build_url(url)?;
    tokio::spawn(task);
    Ok(Some(layer))
}
