mod chrome_finder;
mod driver;
mod error;
mod recorder;

pub use chrome_finder::ChromeFinder;
pub use driver::{CaptureOptions, CaptureSummary, CdpPageDriver, PageDriver};
pub use error::{Error, Result};
pub use recorder::NetworkRecorder;
