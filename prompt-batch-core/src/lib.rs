pub mod domain;
pub mod error;
pub mod traits;
pub mod transcript;

pub use domain::*;
pub use error::*;
pub use traits::*;
pub use transcript::*;
