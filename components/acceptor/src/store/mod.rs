mod errors;
mod store;

pub use errors::*;
pub use store::*;

#[cfg(test)]
#[path = "./tests/store_tests.rs"]
mod tests;
