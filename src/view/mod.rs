//! View state machine and pagination.

mod pagination;
mod state;

pub use state::*;
