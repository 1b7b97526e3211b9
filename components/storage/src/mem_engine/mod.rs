use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

mod memdb;
pub use memdb::*;

/// MemEngine keeps every column family in a BTreeMap in process memory.
/// Nothing survives a restart.
pub struct MemEngine {
    _db: Mutex<HashMap<&'static str, BTreeMap<Vec<u8>, Vec<u8>>>>,
}
