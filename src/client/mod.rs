//! Client module - HTTP access to the enrollment REST API
//!
//! The reqwest-backed [`request::ApiClient`] implements
//! [`crate::interface::RequestApi`]; the workflow code in [`crate::app`] only
//! sees the trait.

pub mod request;

pub use request::ApiClient;
