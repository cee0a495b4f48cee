//! SDK resource modules
//!
//! Resource-specific clients for the data service endpoints.

pub mod batches;
pub mod records;
pub mod templates;

pub use batches::BatchesClient;
pub use records::RecordsClient;
pub use templates::TemplatesClient;
