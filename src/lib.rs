pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod interface;
pub mod model;

pub use auth::{AuthContext, SessionStore};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{Error, ErrorKind, Result};
