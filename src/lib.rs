//! `resview` is an embeddable, in-memory resource view engine for
//! distributed-application dashboards.
//!
//! It ingests an initial snapshot plus an ordered change feed from an
//! external [`ResourceProvider`], maintains a concurrent name-keyed index,
//! and serves filtered, nested, paged views of it: a table-style paged
//! query, a graph projection, a stable selection and per-application
//! error counts. It performs no network I/O and persists nothing.

pub mod constants;

mod config;
mod errors;
mod feed;
mod model;
mod session;
mod store;
mod view;

pub use config::*;
pub use errors::*;
pub use feed::*;
pub use model::*;
pub use session::*;
pub use store::*;
pub use view::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
