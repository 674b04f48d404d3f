pub mod handlers;
pub mod rate_limit;

pub use handlers::{AppState, DEFAULT_QUERY_CUTOFF, DEFAULT_QUERY_LIMIT, router};
pub use rate_limit::ThrottleLayer;
