//! # Quill Core
//!
//! The domain layer of the Quill blogging backend.
//! This crate contains the post aggregate rules with zero infrastructure dependencies;
//! storage, identity and blob handling are reached through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
