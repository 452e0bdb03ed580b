// Resources served by the dashboard API
use bytes::Bytes;

use super::accessor::{decode_json, Accessor, Resource};
use crate::domain::auxiliary::AuxSample;
use crate::domain::event::{EventDetails, SensorEvents};
use crate::domain::sensor::SensorSummary;
use crate::infrastructure::endpoints::ApiEndpoints;
use crate::infrastructure::error::FetchResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorEventsParams {
    pub sensor_id: String,
    /// Restrict trend data to the last n events
    pub last: Option<u32>,
}

/// Addresses one event; shared by the details and download resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventParams {
    pub sensor_id: String,
    pub event_id: String,
    /// Request the deduplicated variant
    pub hidden: bool,
}

pub struct Sensors;

impl Resource for Sensors {
    type Params = ();
    type Value = Vec<SensorSummary>;

    const NAME: &'static str = "sensors";

    fn url(endpoints: &ApiEndpoints, _: &()) -> String {
        endpoints.sensors()
    }

    fn decode(url: &str, body: Bytes) -> FetchResult<Self::Value> {
        decode_json(url, &body)
    }
}

pub struct SensorEventsResource;

impl Resource for SensorEventsResource {
    type Params = SensorEventsParams;
    type Value = SensorEvents;

    const NAME: &'static str = "sensor events";

    fn url(endpoints: &ApiEndpoints, params: &SensorEventsParams) -> String {
        match params.last {
            Some(last) => endpoints.last_sensor_events(&params.sensor_id, last),
            None => endpoints.sensor_events(&params.sensor_id),
        }
    }

    fn decode(url: &str, body: Bytes) -> FetchResult<Self::Value> {
        decode_json(url, &body)
    }
}

pub struct EventDetailsResource;

impl Resource for EventDetailsResource {
    type Params = EventParams;
    type Value = EventDetails;

    const NAME: &'static str = "event details";

    fn url(endpoints: &ApiEndpoints, params: &EventParams) -> String {
        endpoints.event_details(&params.sensor_id, &params.event_id, params.hidden)
    }

    fn decode(url: &str, body: Bytes) -> FetchResult<Self::Value> {
        decode_json(url, &body)
    }
}

/// Event CSV as an opaque blob; `None` until something was downloaded
pub struct EventDownload;

impl Resource for EventDownload {
    type Params = EventParams;
    type Value = Option<Bytes>;

    const NAME: &'static str = "event download";

    fn url(endpoints: &ApiEndpoints, params: &EventParams) -> String {
        endpoints.event_download(&params.sensor_id, &params.event_id, params.hidden)
    }

    fn decode(_: &str, body: Bytes) -> FetchResult<Self::Value> {
        Ok(Some(body))
    }
}

pub struct AuxSensors;

impl Resource for AuxSensors {
    type Params = ();
    type Value = Vec<SensorSummary>;

    const NAME: &'static str = "aux sensors";

    fn url(endpoints: &ApiEndpoints, _: &()) -> String {
        endpoints.aux_sensors()
    }

    fn decode(url: &str, body: Bytes) -> FetchResult<Self::Value> {
        decode_json(url, &body)
    }
}

pub struct AuxData;

impl Resource for AuxData {
    /// Sensor id
    type Params = String;
    type Value = Vec<AuxSample>;

    const NAME: &'static str = "aux data";

    fn url(endpoints: &ApiEndpoints, sensor_id: &String) -> String {
        endpoints.aux_data(sensor_id)
    }

    fn decode(url: &str, body: Bytes) -> FetchResult<Self::Value> {
        decode_json(url, &body)
    }
}

pub type SensorsAccessor = Accessor<Sensors>;
pub type SensorEventsAccessor = Accessor<SensorEventsResource>;
pub type EventDetailsAccessor = Accessor<EventDetailsResource>;
pub type EventDownloadAccessor = Accessor<EventDownload>;
pub type AuxSensorsAccessor = Accessor<AuxSensors>;
pub type AuxDataAccessor = Accessor<AuxData>;
