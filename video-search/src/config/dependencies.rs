//! Dependency initialization and wiring for the video search service.

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{error, info, warn};

use super::{Config, StartupMode};
use crate::loader::SearchLoader;
use crate::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::server::create_app;
use crate::source::{HttpSourceFetcher, SourceFetcher};
use crate::IndexingError;
use video_search_repository::opensearch::IndexConfig;
use video_search_repository::{
    IndexStatus, OpenSearchProvider, SearchIndexProvider, SearchIndexService,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Arc<Orchestrator>,
    /// The HTTP query façade.
    pub router: Router,
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,
}

impl Dependencies {
    /// Initialize all dependencies from the given configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If a client cannot be built, or the index
    ///   cannot be prepared in fail-fast mode
    pub async fn new(config: &Config) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %config.opensearch_url,
            index_name = %config.index_name,
            source_api_url = %config.source_api_url,
            startup_mode = ?config.startup_mode,
            sync_interval_secs = config.sync_interval.as_secs(),
            retry_interval_secs = config.retry_interval.as_secs(),
            "Initializing dependencies"
        );

        let provider = OpenSearchProvider::new(
            &config.opensearch_url,
            IndexConfig::new(config.index_name.clone()),
            config.request_timeouts(),
        )
        .map_err(|e| {
            IndexingError::config(format!("Failed to create OpenSearch provider: {}", e))
        })?;

        let fetcher = HttpSourceFetcher::new(&config.source_api_url, config.source_timeout)
            .map_err(|e| IndexingError::config(format!("Failed to create source client: {}", e)))?;

        info!(source_url = %fetcher.url(), "Source client created");

        Self::with_components(config, Arc::new(provider), Arc::new(fetcher)).await
    }

    /// Wire the service around already-built clients.
    pub async fn with_components(
        config: &Config,
        provider: Arc<dyn SearchIndexProvider>,
        fetcher: Arc<dyn SourceFetcher>,
    ) -> Result<Self, IndexingError> {
        let index_ready = Self::prepare_index(provider.as_ref(), config).await?;

        let loader = SearchLoader::new(Arc::clone(&provider));
        let orchestrator = Orchestrator::with_config(
            fetcher,
            loader,
            OrchestratorConfig {
                sync_interval: config.sync_interval,
            },
        );
        let orchestrator = if index_ready {
            orchestrator
        } else {
            orchestrator.require_index_check()
        };

        let router = create_app(SearchIndexService::new(provider));

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            router,
            listen_addr: config.listen_addr(),
        })
    }

    /// Ensure the index exists according to the startup mode.
    ///
    /// Returns whether the index was confirmed.
    async fn prepare_index(
        provider: &dyn SearchIndexProvider,
        config: &Config,
    ) -> Result<bool, IndexingError> {
        loop {
            match provider.ensure_index_exists().await {
                Ok(status) => {
                    match status {
                        IndexStatus::Created => info!("Created search index"),
                        IndexStatus::AlreadyExists => info!("Search index already exists"),
                    }
                    return Ok(true);
                }
                Err(e) => match config.startup_mode {
                    StartupMode::FailFast => {
                        error!(error = %e, "Failed to ensure search index exists");
                        return Err(e.into());
                    }
                    StartupMode::Retry => {
                        warn!(
                            opensearch_url = %config.opensearch_url,
                            error = %e,
                            retry_interval_secs = config.retry_interval.as_secs(),
                            "Failed to ensure search index exists, retrying..."
                        );
                        sleep(config.retry_interval).await;
                    }
                    StartupMode::Degraded => {
                        warn!(
                            error = %e,
                            "Search index not ready, starting degraded; sync cycles will retry"
                        );
                        return Ok(false);
                    }
                },
            }
        }
    }
}
