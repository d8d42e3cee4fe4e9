mod error_counts;
mod graph;
mod nesting;
mod selection;
mod visibility;

pub use error_counts::*;
pub use graph::*;
pub use nesting::*;
pub use selection::*;
pub use visibility::*;

#[cfg(test)]
mod nesting_test;
