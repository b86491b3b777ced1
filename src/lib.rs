pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used items
pub use api::error::ApiError;
pub use api::openwall::OpenwallApi;
pub use config::Config;
pub use models::cache::{cache_key, CacheKey, ResponseCache};
pub use models::params::{ParamValue, Params};
pub use services::content_service::ContentService;
