mod correlate;
mod reader;
mod types;
mod writer;

pub use correlate::TraceCorrelator;
pub use reader::TraceReader;
pub use types::*;
pub use writer::TraceWriter;
