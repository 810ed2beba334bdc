//! Request correlation.

mod request_id;

pub use request_id::request_id;
