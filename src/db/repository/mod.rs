//! Repository layer — entity-scoped database operations.
//!
//! All functions take a `&rusqlite::Connection` and commit as short atomic
//! units; multi-statement writes use a transaction. Public functions are
//! re-exported here.

mod account;
mod analysis;
mod assignment;
mod doctor_profile;

pub use account::*;
pub use analysis::*;
pub use assignment::*;
pub use doctor_profile::*;
