pub mod config;
pub mod error;
pub mod http_client;
pub mod models;
pub mod pages;
pub mod services;
pub mod session;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use http_client::{ApiClient, Transport};
pub use session::{Session, SessionUser};
