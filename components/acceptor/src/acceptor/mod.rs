mod acceptor;
mod decision;
mod errors;
mod retransmit;

pub use acceptor::*;
pub use decision::*;
pub use errors::*;

#[cfg(test)]
#[path = "./tests/decision_tests.rs"]
mod decision_tests;

#[cfg(test)]
#[path = "./tests/acceptor_tests.rs"]
mod acceptor_tests;
