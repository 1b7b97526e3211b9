mod server;
mod transport;

pub use server::*;
pub use transport::*;
