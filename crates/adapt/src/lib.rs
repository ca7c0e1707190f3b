pub mod content;
pub mod gateway;

pub use gateway::{FetchOptions, GatewayError, KurocoGateway};
