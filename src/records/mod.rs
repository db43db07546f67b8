//! Event records and the decoder that produces them from backend responses.

mod decode;
mod models;

pub use decode::*;
pub use models::*;
