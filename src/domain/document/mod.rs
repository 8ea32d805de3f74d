pub mod error;
pub mod model;
pub mod service;

pub use error::DocumentServiceError;
pub use model::{BookSection, DocumentMetadata, PageContent, SectionType};
pub use service::DocumentService;
