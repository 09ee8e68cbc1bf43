use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key carrying the request identifier inside an event payload
pub const REQUEST_ID_KEY: &str = "requestId";

/// Lifecycle phase of a network request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    RequestStart,
    ResponseStart,
    RequestFinish,
}

impl Phase {
    /// Map a trace event name to a phase
    ///
    /// Chrome's devtools.timeline names are the primary form; the abstract
    /// phase names are accepted as well. Anything else is not a network event.
    pub fn from_event_name(name: &str) -> Option<Self> {
        match name {
            "ResourceSendRequest" | "RequestStart" => Some(Phase::RequestStart),
            "ResourceReceiveResponse" | "ResponseStart" => Some(Phase::ResponseStart),
            "ResourceFinish" | "RequestFinish" => Some(Phase::RequestFinish),
            _ => None,
        }
    }

    /// Event name written to trace files
    pub fn event_name(&self) -> &'static str {
        match self {
            Phase::RequestStart => "ResourceSendRequest",
            Phase::ResponseStart => "ResourceReceiveResponse",
            Phase::RequestFinish => "ResourceFinish",
        }
    }
}

/// One phase-tagged network event for a single request
#[derive(Debug, Clone, PartialEq)]
pub struct RawTraceEvent {
    pub phase: Phase,
    pub request_id: String,
    /// The event's data payload, `requestId` included
    pub fields: Map<String, Value>,
}

impl RawTraceEvent {
    pub fn new(phase: Phase, request_id: impl Into<String>, mut fields: Map<String, Value>) -> Self {
        let request_id = request_id.into();
        fields.insert(REQUEST_ID_KEY.to_string(), Value::String(request_id.clone()));
        Self {
            phase,
            request_id,
            fields,
        }
    }

    /// Convert a wire event, returning `None` for events that are not network phases
    pub fn from_wire(event: &WireEvent) -> Result<Option<Self>> {
        let Some(phase) = Phase::from_event_name(&event.name) else {
            return Ok(None);
        };

        let data = event
            .args
            .get("data")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                Error::MalformedTrace(format!("{} event has no args.data object", event.name))
            })?;

        let request_id = data
            .get(REQUEST_ID_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::MalformedTrace(format!("{} event has no string requestId", event.name))
            })?;

        Ok(Some(Self {
            phase,
            request_id: request_id.to_string(),
            fields: data.clone(),
        }))
    }

    pub fn to_wire(&self) -> WireEvent {
        let mut args = Map::new();
        args.insert("data".to_string(), Value::Object(self.fields.clone()));
        WireEvent {
            name: self.phase.event_name().to_string(),
            args: Value::Object(args),
        }
    }
}

/// A trace event as it appears on disk
///
/// Only `name` and `args` are read; the remaining trace-event keys
/// (`ph`, `ts`, `pid`, ...) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireEvent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub args: Value,
}

/// Top-level trace document: a bare event array or Chrome's object form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraceDocument {
    Object {
        #[serde(rename = "traceEvents")]
        trace_events: Vec<WireEvent>,
    },
    Array(Vec<WireEvent>),
}

impl TraceDocument {
    pub fn events(&self) -> &[WireEvent] {
        match self {
            TraceDocument::Object { trace_events } => trace_events,
            TraceDocument::Array(events) => events,
        }
    }
}
