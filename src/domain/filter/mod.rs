pub mod service;

pub use service::{ContentFilter, FilterResult};
