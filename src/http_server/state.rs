use std::sync::Arc;
use std::time::Duration;

use crate::config::MergeConfig;
use crate::ports::content_provider::ContentProvider;
use crate::services::merge::job::KEEPALIVE_INTERVAL;
use crate::services::merge::{MergeOptions, MergeService};

pub struct AppState {
    pub provider: Arc<dyn ContentProvider>,
    pub merge_service: Arc<MergeService<dyn ContentProvider>>,
    pub merge_config: MergeConfig,
    /// Silence on a merge stream before a ping is sent.
    pub keepalive: Duration,
}

impl AppState {
    pub fn new(provider: Arc<dyn ContentProvider>, merge_config: MergeConfig) -> Self {
        let merge_service = Arc::new(MergeService::new(
            provider.clone(),
            MergeOptions::from(&merge_config),
        ));
        Self {
            provider,
            merge_service,
            merge_config,
            keepalive: KEEPALIVE_INTERVAL,
        }
    }
}
