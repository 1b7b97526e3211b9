use super::open;
use crate::DBColumnFamily;
use crate::Durability;
use crate::WriteEntry;
use crate::{Base, RocksDBEngine, StorageError};
use rocksdb::{CFHandle, SeekKey, Writable, WriteBatch, WriteOptions};

impl RocksDBEngine {
    /// Open or create a fully synchronous engine.
    ///
    /// # Examples:
    /// ```
    /// use tempfile::Builder;
    /// use crate::storage::RocksDBEngine;
    ///
    /// let tmp_root = Builder::new().tempdir().unwrap();
    /// let db_path = format!("{}/test", tmp_root.path().display());
    ///
    /// let my_eng;
    /// match RocksDBEngine::new(&db_path) {
    ///     Ok(eng) => my_eng = eng,
    ///     Err(err) => println!("failed to get rocksdb engine, failed: {}", err),
    /// };
    /// ```
    pub fn new(path: &str) -> Result<RocksDBEngine, StorageError> {
        RocksDBEngine::open(path, Durability::TransactionalSync, true)
    }

    /// Open an engine whose commits follow `durability`.
    /// With `create=false` it fails if there is no db at `path`.
    pub fn open(
        path: &str,
        durability: Durability,
        create: bool,
    ) -> Result<RocksDBEngine, StorageError> {
        if !durability.is_persistent() {
            return Err(format!("rocksdb can not be opened with durability {}", durability).into());
        }

        let db = open(path, create)?;

        Ok(RocksDBEngine { db, durability })
    }

    pub fn durability(&self) -> Durability {
        self.durability
    }

    /// make rocksdb column family handle
    fn _make_cf_handle(&self, cf: DBColumnFamily) -> Result<&CFHandle, StorageError> {
        match self.db.cf_handle(cf.into()) {
            Some(h) => Ok(h),
            None => Err(format!("got column family {:?} handle failed", cf).into()),
        }
    }

    fn _write_opts(&self) -> WriteOptions {
        let mut opts = WriteOptions::new();
        opts.set_sync(self.durability.sync_on_commit());
        opts.disable_wal(!self.durability.write_ahead_log());
        opts
    }

    /// flush every column family to sst files and wait for it.
    fn _flush_all(&self) -> Result<(), StorageError> {
        for cf in DBColumnFamily::all() {
            let cfh = self._make_cf_handle(cf)?;
            self.db.flush_cf(cfh, true)?;
        }
        Ok(())
    }
}

impl Base for RocksDBEngine {
    fn set(&self, cf: DBColumnFamily, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.write_batch(&[WriteEntry::Set(cf, key.to_vec(), value.to_vec())])
    }

    fn get(&self, cf: DBColumnFamily, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let cfh = self._make_cf_handle(cf)?;
        let r = self.db.get_cf(cfh, key)?;
        Ok(r.map(|x| x.to_vec()))
    }

    fn delete(&self, cf: DBColumnFamily, key: &[u8]) -> Result<(), StorageError> {
        self.write_batch(&[WriteEntry::Delete(cf, key.to_vec())])
    }

    fn prev(&self, cf: DBColumnFamily, key: &[u8], include: bool) -> Option<(Vec<u8>, Vec<u8>)> {
        let cf = self._make_cf_handle(cf).ok()?;
        let mut iter = self.db.iter_cf(cf);

        if !iter.seek_for_prev(SeekKey::from(key)).ok()? {
            return None;
        }

        let k = iter.key().to_vec();
        if include || k != key {
            return Some((k, iter.value().to_vec()));
        }

        if !iter.prev().ok()? {
            return None;
        }

        Some((iter.key().to_vec(), iter.value().to_vec()))
    }

    fn write_batch(&self, entrys: &[WriteEntry]) -> Result<(), StorageError> {
        let batch = WriteBatch::with_capacity(entrys.len());
        for en in entrys {
            match en {
                WriteEntry::Nil => {}
                WriteEntry::Set(cf, k, v) => {
                    let cfh = self._make_cf_handle(*cf)?;
                    batch.put_cf(cfh, k, v)?;
                }
                WriteEntry::Delete(cf, k) => {
                    let cfh = self._make_cf_handle(*cf)?;
                    batch.delete_cf(cfh, k)?;
                }
            }
        }

        self.db.write_opt(&batch, &self._write_opts())?;

        if self.durability.flush_on_commit() {
            self._flush_all()?;
        }

        Ok(())
    }

    fn sync(&self) -> Result<(), StorageError> {
        if self.durability.sync_on_tick() {
            self.db.sync_wal()?;
        }
        Ok(())
    }
}
