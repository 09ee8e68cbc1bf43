use super::types::{Phase, RawTraceEvent};
use crate::resource::{ResourceRecord, ResourceRecordSet};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Fields a merged request must carry to become a resource record
#[derive(Debug, Deserialize)]
struct MergedFields {
    url: String,
    #[serde(rename = "mimeType")]
    mime_type: String,
    #[serde(rename = "encodedDataLength")]
    encoded_data_length: u64,
    #[serde(rename = "decodedBodyLength")]
    decoded_body_length: u64,
}

type PhaseMap<'a> = IndexMap<&'a str, &'a Map<String, Value>>;

/// Joins request-start, response-start and request-finish events into
/// per-request resource records
pub struct TraceCorrelator;

impl TraceCorrelator {
    pub fn correlate(events: &[RawTraceEvent]) -> Result<ResourceRecordSet> {
        let mut starts: PhaseMap = IndexMap::new();
        let mut responses: PhaseMap = IndexMap::new();
        let mut finishes: PhaseMap = IndexMap::new();

        // Last occurrence of a request id wins within each phase
        for event in events {
            let phase_map = match event.phase {
                Phase::RequestStart => &mut starts,
                Phase::ResponseStart => &mut responses,
                Phase::RequestFinish => &mut finishes,
            };
            phase_map.insert(event.request_id.as_str(), &event.fields);
        }

        tracing::debug!(
            "Routed trace events: {} starts, {} responses, {} finishes",
            starts.len(),
            responses.len(),
            finishes.len()
        );

        let mut records = ResourceRecordSet::new();
        let mut dropped = 0usize;

        for (request_id, finish) in &finishes {
            let Some(start) = starts.get(request_id) else {
                dropped += 1;
                continue;
            };
            if did_fail(request_id, finish)? {
                dropped += 1;
                continue;
            }

            let mut merged = (*start).clone();
            if let Some(response) = responses.get(request_id) {
                merged.extend(response.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            merged.extend(finish.iter().map(|(k, v)| (k.clone(), v.clone())));

            let fields = MergedFields::deserialize(Value::Object(merged)).map_err(|e| {
                Error::MalformedTrace(format!("request {}: {}", request_id, e))
            })?;

            records.insert(ResourceRecord {
                url: fields.url,
                mime_type: fields.mime_type,
                encoded_bytes: fields.encoded_data_length,
                decoded_bytes: fields.decoded_body_length,
                failed: false,
            });
        }

        tracing::info!(
            "Correlated {} resources ({} requests failed or incomplete)",
            records.len(),
            dropped
        );

        Ok(records)
    }
}

fn did_fail(request_id: &str, finish: &Map<String, Value>) -> Result<bool> {
    match finish.get("didFail") {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(failed)) => Ok(*failed),
        Some(other) => Err(Error::MalformedTrace(format!(
            "request {}: didFail is not a boolean: {}",
            request_id, other
        ))),
    }
}
