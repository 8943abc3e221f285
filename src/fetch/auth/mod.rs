//! Request decorators for authenticated endpoints.

mod api_key;

pub use api_key::ApiKey;
