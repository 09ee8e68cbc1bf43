use super::types::{RawTraceEvent, TraceDocument};
use crate::Result;
use std::fs;
use std::path::Path;

pub struct TraceReader;

impl TraceReader {
    /// Read the network events of a trace file
    ///
    /// A missing or unreadable file yields no events rather than an error: the
    /// page may simply not have been captured yet. Content that is present but
    /// not a valid trace is an error.
    pub fn from_file(path: &Path) -> Result<Vec<RawTraceEvent>> {
        tracing::debug!("Reading trace file from: {}", path.display());

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Trace file {} unavailable: {}", path.display(), e);
                return Ok(Vec::new());
            }
        };

        let events = Self::from_slice(&bytes)?;

        tracing::info!(
            "Read {} network events from {}",
            events.len(),
            path.display()
        );

        Ok(events)
    }

    /// Parse trace events from a JSON string
    pub fn from_str(content: &str) -> Result<Vec<RawTraceEvent>> {
        Self::from_slice(content.as_bytes())
    }

    fn from_slice(bytes: &[u8]) -> Result<Vec<RawTraceEvent>> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            tracing::debug!("Trace content is empty");
            return Ok(Vec::new());
        }

        let document: TraceDocument = serde_json::from_slice(bytes)?;
        let wire_events = document.events();

        let mut events = Vec::new();
        for wire in wire_events {
            if let Some(event) = RawTraceEvent::from_wire(wire)? {
                events.push(event);
            }
        }

        tracing::debug!(
            "Kept {} of {} trace events as network phases",
            events.len(),
            wire_events.len()
        );

        Ok(events)
    }
}
