use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use detail_library::Matcher;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Matcher instance (shared across requests); owns the catalog handle
    pub matcher: Arc<Matcher>,

    /// Prometheus recorder handle, present once a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl ServerState {
    /// Open the configured catalog and build the matcher over it
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let matcher = config
            .library
            .build()
            .map_err(|e| ServerError::Internal(format!("failed to initialise catalog: {e}")))?;
        Ok(Self::with_matcher(config, matcher))
    }

    /// Wrap an already constructed matcher
    pub fn with_matcher(config: ServerConfig, matcher: Matcher) -> Self {
        Self {
            config: Arc::new(config),
            matcher: Arc::new(matcher),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
