use super::types::{RawTraceEvent, TraceDocument};
use crate::Result;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub struct TraceWriter;

impl TraceWriter {
    /// Write network events to a trace file in `{"traceEvents": [...]}` form
    pub fn to_file(events: &[RawTraceEvent], path: &Path) -> Result<()> {
        tracing::debug!("Writing trace file to: {}", path.display());

        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer(writer, &Self::document(events))?;

        tracing::info!(
            "Wrote trace file with {} events to {}",
            events.len(),
            path.display()
        );

        Ok(())
    }

    /// Convert network events to a pretty-printed trace document
    pub fn to_string(events: &[RawTraceEvent]) -> Result<String> {
        Ok(serde_json::to_string_pretty(&Self::document(events))?)
    }

    fn document(events: &[RawTraceEvent]) -> TraceDocument {
        TraceDocument::Object {
            trace_events: events.iter().map(RawTraceEvent::to_wire).collect(),
        }
    }
}
