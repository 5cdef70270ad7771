//! Persisted game sessions: the record layout, the storage contract and the
//! orchestrator that turns requests into versioned commits.

pub use error::*;
pub use record::*;
pub use session::*;
pub use store::*;

mod error;
mod mapper;
mod record;
mod session;
mod store;
