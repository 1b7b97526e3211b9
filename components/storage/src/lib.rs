#[macro_use]
extern crate quick_error;

#[macro_use]
extern crate slog_global;

mod errors;
pub use errors::*;

mod durability;
pub use durability::*;

mod rocks_engine;
pub use rocks_engine::*;

mod traits;
pub use traits::*;

mod mem_engine;
pub use mem_engine::*;

mod txn;
pub use txn::*;

#[cfg(test)]
mod test_engine;
