//! Dashboard state: the four slots, the selection controller that mutates
//! them, and the pure projections the UI draws from.

mod controller;
pub mod projection;
mod store;

pub use controller::Dashboard;
pub use store::{Selection, Store};

#[cfg(test)]
pub(crate) mod testing;
