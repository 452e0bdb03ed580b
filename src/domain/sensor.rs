// Sensor domain model
use serde::Deserialize;

/// Event count reported for auxiliary sensors, which have no bounded event list
pub const AUX_EVENT_COUNT: i64 = -1;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorSummary {
    pub id: i64,
    #[serde(default, rename = "devEUI")]
    pub dev_eui: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub num_events: i64,
}

impl SensorSummary {
    pub fn is_auxiliary(&self) -> bool {
        self.num_events == AUX_EVENT_COUNT
    }

    /// DevEUI for torque sensors, name for auxiliary ones
    pub fn label(&self) -> &str {
        self.dev_eui
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("-")
    }

    /// Event id before `current`, if any. Event ids start at 1.
    pub fn prev_event(&self, current: i64) -> Option<i64> {
        (current > 1).then(|| current - 1)
    }

    /// Event id after `current`, bounded by `num_events`
    pub fn next_event(&self, current: i64) -> Option<i64> {
        if self.is_auxiliary() {
            return None;
        }
        (current < self.num_events).then(|| current + 1)
    }
}
