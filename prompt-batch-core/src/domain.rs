pub mod batch;
pub mod config;
pub mod filter;
pub mod ids;
pub mod layout;
pub mod pagination;
pub mod record;
pub mod template;
pub mod test_type;

pub use batch::*;
pub use config::*;
pub use filter::*;
pub use ids::*;
pub use layout::*;
pub use pagination::*;
pub use record::*;
pub use template::*;
pub use test_type::*;
