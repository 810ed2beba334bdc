//! Authorization gate extractors and the HTTP error mapping.

pub mod auth;
pub mod error;
