use std::fmt::LowerHex;

use crate::StorageError;

/// DBColumnFamily defines several `table`:
/// Record stores one acceptor record per instance id.
/// Status stores process metadata, such as the identity of the owner of the storage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DBColumnFamily {
    Record,
    Status,
}

impl DBColumnFamily {
    pub fn all() -> Vec<DBColumnFamily> {
        vec![DBColumnFamily::Record, DBColumnFamily::Status]
    }
}

impl From<&DBColumnFamily> for &str {
    fn from(cf: &DBColumnFamily) -> Self {
        match cf {
            DBColumnFamily::Record => return "record",
            DBColumnFamily::Status => return "status",
        }
    }
}

impl From<DBColumnFamily> for &str {
    fn from(cf: DBColumnFamily) -> Self {
        (&cf).into()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteEntry {
    Nil,
    Set(DBColumnFamily, Vec<u8>, Vec<u8>),
    Delete(DBColumnFamily, Vec<u8>),
}

/// make_fixed_key builds a key that sorts in the same order as `id`.
/// E.g. `make_fixed_key("/acceptor/record", 10)` is `/acceptor/record/000000000000000a`.
pub fn make_fixed_key<T>(prefix: &str, id: T) -> Vec<u8>
where
    T: LowerHex,
{
    format!("{}/{:016x}", prefix, id).into_bytes()
}

/// parse_fixed_key is the reverse of `make_fixed_key`.
pub fn parse_fixed_key(prefix: &str, key: &[u8]) -> Option<u64> {
    let pref = prefix.as_bytes();
    if key.len() != pref.len() + 17 || &key[..pref.len()] != pref || key[pref.len()] != b'/' {
        return None;
    }

    let s = std::str::from_utf8(&key[pref.len() + 1..]).ok()?;
    u64::from_str_radix(s, 16).ok()
}

pub trait ToKey {
    fn to_key(&self) -> Vec<u8>;
}

/// Base offer basic key-value access
pub trait Base: Send + Sync {
    /// set a new key-value
    fn set(&self, cf: DBColumnFamily, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// get an existing value with key
    fn get(&self, cf: DBColumnFamily, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// delete a key
    fn delete(&self, cf: DBColumnFamily, key: &[u8]) -> Result<(), StorageError>;

    /// prev returns a key-value pair smaller than the given one(include=false),
    /// or smaller or equal the given one(include=true)
    fn prev(&self, cf: DBColumnFamily, key: &[u8], include: bool) -> Option<(Vec<u8>, Vec<u8>)>;

    /// write_batch applies all entries atomically: after a crash either all of them or none of
    /// them are visible.
    fn write_batch(&self, entrys: &[WriteEntry]) -> Result<(), StorageError>;

    /// sync forces previously committed batches to stable media.
    /// Engines without a log to sync treat it as a no-op.
    fn sync(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
