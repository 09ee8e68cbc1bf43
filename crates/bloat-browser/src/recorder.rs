use bloat_core::trace::{Phase, RawTraceEvent};
use serde_json::{Map, Value, json};
use std::collections::HashMap;

/// Turns Network domain events into phase-tagged trace events
///
/// Chrome reports decoded body bytes incrementally through `dataReceived`,
/// so those are summed per request and written with the finish event.
#[derive(Debug, Default)]
pub struct NetworkRecorder {
    events: Vec<RawTraceEvent>,
    decoded_lengths: HashMap<String, u64>,
}

impl NetworkRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_sent(&mut self, request_id: &str, url: &str) {
        // redirects reuse the request id, so the body count starts over
        self.decoded_lengths.remove(request_id);
        self.push(Phase::RequestStart, request_id, json!({ "url": url }));
    }

    pub fn response_received(&mut self, request_id: &str, url: &str, mime_type: &str, status: i64) {
        self.push(
            Phase::ResponseStart,
            request_id,
            json!({ "url": url, "mimeType": mime_type, "statusCode": status }),
        );
    }

    pub fn data_received(&mut self, request_id: &str, data_length: i64) {
        let length = u64::try_from(data_length).unwrap_or(0);
        *self
            .decoded_lengths
            .entry(request_id.to_string())
            .or_insert(0) += length;
    }

    pub fn loading_finished(&mut self, request_id: &str, encoded_data_length: f64) {
        let decoded = self.decoded_lengths.remove(request_id).unwrap_or(0);
        self.push(
            Phase::RequestFinish,
            request_id,
            json!({
                "encodedDataLength": encoded_data_length.max(0.0).round() as u64,
                "decodedBodyLength": decoded,
                "didFail": false,
            }),
        );
    }

    pub fn loading_failed(&mut self, request_id: &str, error_text: &str) {
        self.decoded_lengths.remove(request_id);
        self.push(
            Phase::RequestFinish,
            request_id,
            json!({
                "encodedDataLength": 0,
                "decodedBodyLength": 0,
                "didFail": true,
                "errorText": error_text,
            }),
        );
    }

    pub fn count(&self) -> usize {
        self.events.len()
    }

    pub fn into_events(self) -> Vec<RawTraceEvent> {
        self.events
    }

    fn push(&mut self, phase: Phase, request_id: &str, data: Value) {
        let fields = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.events.push(RawTraceEvent::new(phase, request_id, fields));
    }
}
