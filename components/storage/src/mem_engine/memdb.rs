use std::collections::{BTreeMap, HashMap};
use std::ops::Bound::Included;
use std::ops::Bound::Unbounded;
use std::sync::{Mutex, MutexGuard};

use crate::{Base, DBColumnFamily, MemEngine, StorageError, WriteEntry};

type Tables = HashMap<&'static str, BTreeMap<Vec<u8>, Vec<u8>>>;

impl MemEngine {
    pub fn new() -> Result<MemEngine, StorageError> {
        let db = HashMap::new();
        Ok(MemEngine {
            _db: Mutex::new(db),
        })
    }

    fn _lock(&self) -> Result<MutexGuard<Tables>, StorageError> {
        self._db
            .lock()
            .map_err(|e| StorageError::DBError(format!("mem engine lock poisoned: {}", e)))
    }
}

fn table(cfs: &mut Tables, cf: DBColumnFamily) -> &mut BTreeMap<Vec<u8>, Vec<u8>> {
    cfs.entry(cf.into()).or_insert_with(BTreeMap::new)
}

impl Base for MemEngine {
    fn set(&self, cf: DBColumnFamily, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        let mut cfs = self._lock()?;
        table(&mut cfs, cf).insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, cf: DBColumnFamily, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let mut cfs = self._lock()?;
        Ok(table(&mut cfs, cf).get(key).cloned())
    }

    fn delete(&self, cf: DBColumnFamily, key: &[u8]) -> Result<(), StorageError> {
        let mut cfs = self._lock()?;
        table(&mut cfs, cf).remove(key);
        Ok(())
    }

    fn prev(&self, cf: DBColumnFamily, key: &[u8], include: bool) -> Option<(Vec<u8>, Vec<u8>)> {
        let mut cfs = self._lock().ok()?;
        let bt = table(&mut cfs, cf);

        for (k, v) in bt.range::<[u8], _>((Unbounded, Included(key))).rev() {
            if !include && key == k.as_slice() {
                continue;
            }

            return Some((k.to_vec(), v.to_vec()));
        }

        None
    }

    // The lock is held for the whole batch so that no reader observes half of it.
    fn write_batch(&self, entrys: &[WriteEntry]) -> Result<(), StorageError> {
        let mut cfs = self._lock()?;

        for en in entrys {
            match en {
                WriteEntry::Nil => {}
                WriteEntry::Set(cf, k, v) => {
                    table(&mut cfs, *cf).insert(k.clone(), v.clone());
                }
                WriteEntry::Delete(cf, k) => {
                    table(&mut cfs, *cf).remove(k);
                }
            }
        }

        Ok(())
    }
}
