// Text renderings of the dashboard pages
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::domain::auxiliary::AuxSample;
use crate::domain::event::{EventDetails, SensorEvents, TrendKind};
use crate::domain::auxiliary::aux_series;
use crate::domain::packet::{packets_from_segments, segment_ranges, SegmentationError};
use crate::domain::sensor::SensorSummary;

pub fn render_sensor_table(sensors: &[SensorSummary]) -> String {
    if sensors.is_empty() {
        return "No sensors available.\n".to_string();
    }

    let mut out = format!("{:<6} {:<24} {}\n", "ID", "DevEUI", "Events");
    for sensor in sensors {
        let events = if sensor.is_auxiliary() {
            "aux".to_string()
        } else {
            sensor.num_events.to_string()
        };
        let _ = writeln!(out, "{:<6} {:<24} {}", sensor.id, sensor.label(), events);
    }
    out
}

pub fn render_events(sensor_id: &str, events: &SensorEvents) -> String {
    let mut out = format!("Sensor {} - {} events\n", sensor_id, events.event_datas.len());

    for event in &events.event_datas {
        let _ = writeln!(out, "{:<6} {}", event.id, event.timestamp);
    }

    let trends: Vec<_> = TrendKind::ALL
        .iter()
        .filter_map(|kind| events.trend_summary(*kind))
        .collect();
    if !trends.is_empty() {
        out.push_str("\nTrends\n");
        for trend in trends {
            let unit = trend.kind.unit();
            let _ = writeln!(
                out,
                "{:<16} n={:<4} min={} {unit} max={} {unit} latest={} {unit}",
                trend.kind.label(),
                trend.count,
                trend.min,
                trend.max,
                trend.latest,
            );
        }
    }
    out
}

/// Every telemetry field except the raw torque samples, keyed as the
/// server names them. `torqueData` never lands in the flattened map.
pub fn telemetry_fields(details: &EventDetails) -> BTreeMap<String, String> {
    let mut fields: BTreeMap<String, String> = details
        .telemetry
        .iter()
        .map(|(key, value)| (key.clone(), display_value(value)))
        .collect();

    fields.insert("isStreaming".to_string(), details.is_streaming.to_string());
    fields.insert(
        "typeOfStroke".to_string(),
        details
            .stroke_type()
            .map(|s| s.name().to_string())
            .unwrap_or_else(|| details.type_of_stroke.to_string()),
    );
    if let Some(lengths) = &details.record_lengths {
        fields.insert("recordLengths".to_string(), join(lengths.iter()));
    }
    fields
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => join(items.iter().map(display_value)),
        other => other.to_string(),
    }
}

fn join<T: ToString>(items: impl Iterator<Item = T>) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
}

pub fn torque_title(details: &EventDetails) -> String {
    if details.is_streaming {
        "Torque Signature Data - Receiving...".to_string()
    } else {
        format!("Torque Signature Data - {}", details.stroke_title())
    }
}

/// Torque signature summary, one line per stroke segment
pub fn render_torque(details: &EventDetails) -> Result<String, SegmentationError> {
    let mut out = format!("{}\n", torque_title(details));

    let (Some(torque), Some(lengths)) = (&details.torque_data, &details.record_lengths) else {
        out.push_str("No torque data.\n");
        return Ok(out);
    };

    let segments = segment_ranges(torque.len(), lengths).inspect_err(log_segmentation_error)?;
    let packets = packets_from_segments(torque, &segments);
    let _ = writeln!(out, "{} packets in {} segments", packets.len(), segments.len());

    for segment in &segments {
        let stroke = &packets[segment.range()];
        let (Some(first), Some(last)) = (stroke.first(), stroke.last()) else {
            let _ = writeln!(out, "  #{:<3} empty", segment.number);
            continue;
        };
        let min = stroke.iter().map(|p| p.torque).fold(f64::INFINITY, f64::min);
        let max = stroke.iter().map(|p| p.torque).fold(f64::NEG_INFINITY, f64::max);
        let _ = writeln!(
            out,
            "  #{:<3} samples {:>5}..={:<5} min={} max={}",
            segment.number, first.index, last.index, min, max
        );
    }
    Ok(out)
}

fn log_segmentation_error(err: &SegmentationError) {
    let SegmentationError::InvalidPacketLength {
        segment,
        cursor,
        length,
        available,
    } = err;
    tracing::error!(
        "Segment {} of length {} at sample {} runs past {} torque samples",
        segment,
        length,
        cursor,
        available
    );
}

pub fn render_event_details(
    sensor_id: &str,
    event_id: &str,
    timestamp: &str,
    details: &EventDetails,
) -> Result<String, SegmentationError> {
    let mut out = format!("Sensor {}, Event {} - {}\n\n", sensor_id, event_id, timestamp);
    out.push_str(&render_torque(details)?);

    out.push_str("\nLoRa Event Data\n");
    for (key, value) in telemetry_fields(details) {
        let _ = writeln!(out, "{}: {}", key, value);
    }
    Ok(out)
}

pub fn render_aux_data(sensor_id: &str, samples: &[AuxSample]) -> String {
    let mut out = format!("Aux Sensor {} Signature Data\n", sensor_id);
    if samples.is_empty() {
        out.push_str("No samples.\n");
        return out;
    }
    for ((index, percent), sample) in aux_series(samples).into_iter().zip(samples) {
        let _ = writeln!(out, "{:<5} {}  CO2: {}%", index, sample.timestamp, percent);
    }
    out
}
