pub mod config;
pub mod error;
pub mod models;
pub mod utils;

pub use models::{ApiResponse, GradedResult, ParsedResult};
pub use utils::credits::CreditTable;
pub use utils::extract::extract;
pub use utils::grading::grade;
pub use utils::process;
