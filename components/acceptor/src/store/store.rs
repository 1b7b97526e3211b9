use std::fs;
use std::path::Path;

use prost::Message;
use storage::{
    db_exists, parse_fixed_key, Base, DBColumnFamily, Durability, MemEngine, RocksDBEngine,
    StorageError, ToKey, Txn,
};

use super::StoreError;
use crate::conf::AcceptorConf;
use crate::paxos::{record_key, AcceptorId, AcceptorRecord, Iid, RECORD_KEY_PREFIX};

/// Sub directory of the storage path that holds the record db.
pub const RECORD_DB_DIR: &str = "records";

const OWNER_KEY: &[u8] = b"/status/acceptor_id";

/// Owner is saved in the Status column family when a store is created, to refuse recovering
/// the storage of another acceptor.
#[derive(Clone, PartialEq, Message)]
struct Owner {
    #[prost(uint32, tag = "1")]
    acceptor_id: AcceptorId,
}

/// RecordStore is the durable `iid -> AcceptorRecord` mapping of one acceptor.
///
/// Every access goes through a `RecordTxn` returned by `begin()`. Since `begin()` borrows the
/// store mutably, there is at most one open transaction at a time.
pub struct RecordStore {
    engine: Box<dyn Base>,
    durability: Durability,
}

impl RecordStore {
    /// in_memory creates a store that keeps nothing across restart.
    pub fn in_memory() -> Result<RecordStore, StorageError> {
        Ok(RecordStore {
            engine: Box::new(MemEngine::new()?),
            durability: Durability::None,
        })
    }

    /// with_engine creates a store on an engine that is already open.
    #[cfg(test)]
    pub(crate) fn with_engine(engine: Box<dyn Base>, durability: Durability) -> RecordStore {
        RecordStore { engine, durability }
    }

    pub fn open_conf(conf: &AcceptorConf) -> Result<RecordStore, StoreError> {
        RecordStore::open(
            conf.acceptor_id,
            &conf.storage_path(),
            conf.durability,
            conf.recover,
        )
    }

    /// open opens the store of `acceptor_id` at directory `path`.
    ///
    /// Without `recover`, anything already at `path` is removed and an empty store is created.
    /// With `recover`, the store at `path` must exist and must belong to `acceptor_id`.
    pub fn open(
        acceptor_id: AcceptorId,
        path: &Path,
        durability: Durability,
        recover: bool,
    ) -> Result<RecordStore, StoreError> {
        info!("durability mode"; "durability" => %durability, "recover" => recover);

        if !durability.is_persistent() {
            if recover {
                return Err(StoreError::RecoverInMemory);
            }
            return Ok(RecordStore::in_memory()?);
        }

        let db_path = path.join(RECORD_DB_DIR);
        let db_path = db_path
            .to_str()
            .ok_or_else(|| StoreError::BadPath(format!("{}", db_path.display())))?;

        let dir_exists = path.is_dir();
        let rec_exists = db_exists(db_path).map_err(StorageError::DBError)?;

        if recover {
            if !dir_exists || !rec_exists {
                return Err(StoreError::RecoveryMissing(db_path.to_string()));
            }
        } else if dir_exists {
            warn!("removing existing storage for a fresh start"; "path" => %path.display());
            fs::remove_dir_all(path)?;
        }

        fs::create_dir_all(path)?;

        let engine = RocksDBEngine::open(db_path, durability, !recover)?;

        let mut store = RecordStore {
            engine: Box::new(engine),
            durability,
        };

        if recover {
            store.check_owner(acceptor_id)?;
            info!("record store recovered"; "path" => db_path, "max_iid" => ?store.max_iid());
        } else {
            store.set_owner(acceptor_id)?;
            info!("record store created"; "path" => db_path);
        }

        Ok(store)
    }

    fn set_owner(&mut self, acceptor_id: AcceptorId) -> Result<(), StorageError> {
        let mut txn = Txn::new(self.engine.as_ref());
        txn.set_obj(DBColumnFamily::Status, OWNER_KEY, &Owner { acceptor_id })?;
        txn.commit()
    }

    fn check_owner(&self, acceptor_id: AcceptorId) -> Result<(), StoreError> {
        let txn = Txn::new(self.engine.as_ref());
        let owner: Option<Owner> = txn.get_obj(DBColumnFamily::Status, OWNER_KEY)?;
        let stored = owner.map(|o| o.acceptor_id);

        if stored != Some(acceptor_id) {
            return Err(StoreError::IdentityMismatch(stored, acceptor_id));
        }
        Ok(())
    }

    pub fn durability(&self) -> Durability {
        self.durability
    }

    /// begin opens a transaction. Dropping it without commit discards its writes.
    pub fn begin(&mut self) -> RecordTxn<'_> {
        RecordTxn {
            txn: Txn::new(self.engine.as_ref()),
        }
    }

    /// sync forces committed records to stable media, for durability modes that delay it.
    pub fn sync(&self) -> Result<(), StorageError> {
        self.engine.sync()
    }

    /// max_iid returns the greatest instance id that has a record.
    pub fn max_iid(&self) -> Option<Iid> {
        let (k, _) = self
            .engine
            .prev(DBColumnFamily::Record, &record_key(Iid::MAX), true)?;
        parse_fixed_key(RECORD_KEY_PREFIX, &k)
    }

    /// close syncs and releases the underlying engine.
    pub fn close(self) -> Result<(), StorageError> {
        self.engine.sync()?;
        info!("record store closed");
        Ok(())
    }
}

/// RecordTxn reads and writes acceptor records atomically.
pub struct RecordTxn<'a> {
    txn: Txn<'a>,
}

impl<'a> RecordTxn<'a> {
    /// get returns the record of `iid`, or None if the instance has never been touched.
    /// A storage failure is an error, never a None.
    pub fn get(&self, iid: Iid) -> Result<Option<AcceptorRecord>, StorageError> {
        let rec: Option<AcceptorRecord> =
            self.txn.get_obj(DBColumnFamily::Record, &record_key(iid))?;

        if let Some(ref r) = rec {
            if r.iid != iid {
                return Err(StorageError::DBError(format!(
                    "record under iid:{} has iid:{}",
                    iid, r.iid
                )));
            }
        }

        Ok(rec)
    }

    /// put replaces the record of `rec.iid`.
    pub fn put(&mut self, rec: &AcceptorRecord) -> Result<(), StorageError> {
        self.txn.set_obj(DBColumnFamily::Record, &rec.to_key(), rec)
    }

    pub fn n_pending(&self) -> usize {
        self.txn.n_pending()
    }

    pub fn commit(self) -> Result<(), StorageError> {
        self.txn.commit()
    }
}
