pub mod analyze;
pub mod completion;
pub mod crawl;
pub mod pending;
