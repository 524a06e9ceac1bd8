pub mod cors;
pub mod response;

pub use cors::create_cors;
pub use response::{ApiResponse, ApiResult};
