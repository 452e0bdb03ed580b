// URL construction for the dashboard REST API
use std::fmt::Display;

/// Suffix selecting the server-side deduplicated variant of a dataset
pub const HIDDEN_SUFFIX: &str = "/hidden";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    base: String,
}

impl ApiEndpoints {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    /// `http://{host}:{port}/{base_path}`
    pub fn from_parts(host: &str, port: u16, base_path: &str) -> Self {
        Self::new(format!(
            "http://{}:{}/{}",
            host,
            port,
            base_path.trim_matches('/')
        ))
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn sensors(&self) -> String {
        format!("{}/sensors", self.base)
    }

    pub fn sensor_events(&self, sensor_id: impl Display) -> String {
        format!("{}/sensors/{}/events", self.base, sensor_id)
    }

    pub fn last_sensor_events(&self, sensor_id: impl Display, last: u32) -> String {
        format!("{}/sensors/{}/events/last/{}", self.base, sensor_id, last)
    }

    pub fn event_details(
        &self,
        sensor_id: impl Display,
        event_id: impl Display,
        hidden: bool,
    ) -> String {
        with_hidden(
            format!("{}/sensors/{}/events/{}", self.base, sensor_id, event_id),
            hidden,
        )
    }

    pub fn event_download(
        &self,
        sensor_id: impl Display,
        event_id: impl Display,
        hidden: bool,
    ) -> String {
        with_hidden(
            format!(
                "{}/sensors/{}/events/{}/download",
                self.base, sensor_id, event_id
            ),
            hidden,
        )
    }

    pub fn aux_sensors(&self) -> String {
        format!("{}/aux_sensors", self.base)
    }

    pub fn aux_data(&self, sensor_id: impl Display) -> String {
        format!("{}/sensors/{}/data", self.base, sensor_id)
    }
}

fn with_hidden(url: String, hidden: bool) -> String {
    if hidden {
        url + HIDDEN_SUFFIX
    } else {
        url
    }
}
