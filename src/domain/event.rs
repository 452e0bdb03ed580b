// Sensor event domain models
use serde::Deserialize;
use serde_json::{Map, Value};

use super::packet::{segment_samples, Packet, SegmentationError};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventSummary {
    pub id: i64,
    pub timestamp: String,
    #[serde(default, rename = "deviceinfoid")]
    pub device_info_id: Option<i64>,
    #[serde(default, rename = "devicedataid")]
    pub device_data_id: Option<i64>,
}

/// Events of one sensor plus trend arrays index-aligned with `event_datas`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorEvents {
    #[serde(default, rename = "event_datas")]
    pub event_datas: Vec<EventSummary>,
    #[serde(default)]
    pub battery_voltages: Vec<f64>,
    #[serde(default)]
    pub max_torques: Vec<f64>,
    #[serde(default)]
    pub stroke_times: Vec<f64>,
    #[serde(default)]
    pub temperatures: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendKind {
    BatteryVoltage,
    MaxTorque,
    StrokeTime,
    Temperature,
}

impl TrendKind {
    pub const ALL: [TrendKind; 4] = [
        TrendKind::BatteryVoltage,
        TrendKind::MaxTorque,
        TrendKind::StrokeTime,
        TrendKind::Temperature,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TrendKind::BatteryVoltage => "Battery Voltage",
            TrendKind::MaxTorque => "Maximum Torque",
            TrendKind::StrokeTime => "Stroke Time",
            TrendKind::Temperature => "Temperature",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            TrendKind::BatteryVoltage => "mV",
            TrendKind::MaxTorque => "µV",
            TrendKind::StrokeTime => "ms",
            TrendKind::Temperature => "C",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSummary {
    pub kind: TrendKind,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub latest: f64,
}

impl SensorEvents {
    pub fn trend(&self, kind: TrendKind) -> &[f64] {
        match kind {
            TrendKind::BatteryVoltage => &self.battery_voltages,
            TrendKind::MaxTorque => &self.max_torques,
            TrendKind::StrokeTime => &self.stroke_times,
            TrendKind::Temperature => &self.temperatures,
        }
    }

    /// Chart points for a trend, numbered from 1 like the event list
    pub fn trend_points(&self, kind: TrendKind) -> Vec<(usize, f64)> {
        self.trend(kind)
            .iter()
            .enumerate()
            .map(|(i, v)| (i + 1, *v))
            .collect()
    }

    /// None when the server sent no values for this trend
    pub fn trend_summary(&self, kind: TrendKind) -> Option<TrendSummary> {
        let values = self.trend(kind);
        let latest = *values.last()?;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(TrendSummary {
            kind,
            count: values.len(),
            min,
            max,
            latest,
        })
    }

    /// Timestamp of an event by its 1-based id position
    pub fn timestamp_of(&self, event_id: i64) -> Option<&str> {
        let index = usize::try_from(event_id.checked_sub(1)?).ok()?;
        self.event_datas.get(index).map(|e| e.timestamp.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeType {
    Unknown,
    Open,
    Closed,
}

impl StrokeType {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(StrokeType::Unknown),
            1 => Some(StrokeType::Open),
            2 => Some(StrokeType::Closed),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrokeType::Unknown => "N/A",
            StrokeType::Open => "Open",
            StrokeType::Closed => "Closed",
        }
    }
}

/// One event's telemetry: heartbeat record, data packets and event summary
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    #[serde(default)]
    pub torque_data: Option<Vec<f64>>,
    #[serde(default)]
    pub record_lengths: Option<Vec<usize>>,
    #[serde(default)]
    pub type_of_stroke: u8,
    #[serde(default)]
    pub is_streaming: bool,
    /// Remaining scalar and array telemetry fields, keyed as sent
    #[serde(flatten)]
    pub telemetry: Map<String, Value>,
}

impl EventDetails {
    pub fn stroke_type(&self) -> Option<StrokeType> {
        StrokeType::from_code(self.type_of_stroke)
    }

    /// Chart title suffix; anything but an open stroke is drawn as a close
    pub fn stroke_title(&self) -> &'static str {
        if self.stroke_type() == Some(StrokeType::Open) {
            "Open"
        } else {
            "Close"
        }
    }

    /// Packets for the torque chart, available once both arrays arrived
    pub fn packets(&self) -> Option<Result<Vec<Packet>, SegmentationError>> {
        match (&self.torque_data, &self.record_lengths) {
            (Some(torque), Some(lengths)) => Some(segment_samples(torque, lengths)),
            _ => None,
        }
    }
}
