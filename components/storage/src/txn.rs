use std::collections::BTreeMap;

use prost::Message;

use crate::{Base, DBColumnFamily, StorageError, WriteEntry};

/// Txn is an explicit transaction on a `Base` engine.
///
/// Writes are buffered in the Txn and reads see them. `commit()` applies all of them with one
/// `write_batch`, thus atomically. A Txn dropped without `commit()` is rolled back: nothing it
/// wrote reaches the engine.
pub struct Txn<'a> {
    engine: &'a dyn Base,
    pending: BTreeMap<(DBColumnFamily, Vec<u8>), Vec<u8>>,
    committed: bool,
}

impl<'a> Txn<'a> {
    pub fn new(engine: &'a dyn Base) -> Txn<'a> {
        Txn {
            engine,
            pending: BTreeMap::new(),
            committed: false,
        }
    }

    pub fn get(&self, cf: DBColumnFamily, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        if let Some(v) = self.pending.get(&(cf, key.to_vec())) {
            return Ok(Some(v.clone()));
        }
        self.engine.get(cf, key)
    }

    pub fn set(&mut self, cf: DBColumnFamily, key: &[u8], value: &[u8]) {
        self.pending.insert((cf, key.to_vec()), value.to_vec());
    }

    pub fn get_obj<V: Message + Default>(
        &self,
        cf: DBColumnFamily,
        key: &[u8],
    ) -> Result<Option<V>, StorageError> {
        let val = match self.get(cf, key)? {
            Some(v) => v,
            None => return Ok(None),
        };

        Ok(Some(V::decode(val.as_slice())?))
    }

    pub fn set_obj<V: Message>(
        &mut self,
        cf: DBColumnFamily,
        key: &[u8],
        v: &V,
    ) -> Result<(), StorageError> {
        let mut value = Vec::with_capacity(v.encoded_len());
        v.encode(&mut value)?;
        self.set(cf, key, &value);
        Ok(())
    }

    /// n_pending returns the number of keys written in this transaction.
    pub fn n_pending(&self) -> usize {
        self.pending.len()
    }

    /// commit writes all pending writes in one batch.
    /// A read-only transaction commits without touching the engine.
    pub fn commit(mut self) -> Result<(), StorageError> {
        self.committed = true;

        if self.pending.is_empty() {
            return Ok(());
        }

        let pending = std::mem::replace(&mut self.pending, BTreeMap::new());
        let entrys: Vec<WriteEntry> = pending
            .into_iter()
            .map(|((cf, k), v)| WriteEntry::Set(cf, k, v))
            .collect();

        self.engine.write_batch(&entrys)
    }
}

impl<'a> Drop for Txn<'a> {
    fn drop(&mut self) {
        if !self.committed && !self.pending.is_empty() {
            warn!("transaction rolled back"; "n_pending" => self.pending.len());
        }
    }
}
