#[macro_use]
extern crate quick_error;

#[macro_use]
extern crate slog_global;

#[macro_use]
pub mod paxos;

pub mod conf;
pub mod store;

mod acceptor;
pub use acceptor::*;

#[cfg(test)]
mod testutil;
