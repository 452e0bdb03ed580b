// Application state shared by command handlers
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::config::DashboardConfig;
use crate::infrastructure::endpoints::ApiEndpoints;
use crate::infrastructure::http_client::HttpClient;

#[derive(Clone)]
pub struct AppState {
    pub http: Arc<dyn HttpClient>,
    pub endpoints: ApiEndpoints,
    pub poll_interval: Duration,
    pub output_dir: PathBuf,
}

impl AppState {
    pub fn new(http: Arc<dyn HttpClient>, config: &DashboardConfig) -> Self {
        Self {
            http,
            endpoints: config.endpoints(),
            poll_interval: config.poll_interval(),
            output_dir: config.download.output_dir.clone(),
        }
    }
}
