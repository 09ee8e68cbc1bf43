pub mod analysis;
pub mod classify;
pub mod config;
pub mod crawl;
pub mod error;
pub mod pipeline;
pub mod resource;
pub mod score;
pub mod trace;

pub use error::{Error, Result};
