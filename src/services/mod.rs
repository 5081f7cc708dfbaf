// Service exports
pub mod api;

pub use api::{ApiError, DatingApi, HttpDatingApi, MockDatingApi};
