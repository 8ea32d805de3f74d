pub mod error;
pub mod service;

pub use error::TtsServiceError;
pub use service::{ServiceInfo, TtsManager};
