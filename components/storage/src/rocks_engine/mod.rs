use rocksdb::DB;

use crate::Durability;

mod rocks;
pub use rocks::*;

mod engine;
pub use engine::*;

pub struct RocksDBEngine {
    db: DB,
    durability: Durability,
}
