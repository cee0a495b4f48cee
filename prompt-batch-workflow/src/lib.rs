pub mod builder;
pub mod data_model;
pub mod engine;
pub mod template_model;

pub use builder::*;
pub use data_model::*;
pub use engine::*;
pub use template_model::*;
