mod commands;
mod provider;
mod subscriber;

pub use commands::*;
pub use provider::*;
pub use subscriber::*;

#[cfg(test)]
mod commands_test;
#[cfg(test)]
mod subscriber_test;
