use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use storage::{Base, DBColumnFamily, Durability, MemEngine, StorageError, WriteEntry};

use crate::paxos::{record_key, AcceptorRecord, Iid, PaxosMsg, MAX_MSG_SIZE};
use crate::store::RecordStore;
use crate::{Acceptor, Dest, Reply};

/// new_acceptor creates acceptor 0 with an in-memory store.
pub fn new_acceptor() -> Acceptor {
    Acceptor::new(0, RecordStore::in_memory().unwrap(), false, MAX_MSG_SIZE)
}

/// delivering_acceptor creates an in-memory acceptor that applies deliveries.
pub fn delivering_acceptor() -> Acceptor {
    Acceptor::new(0, RecordStore::in_memory().unwrap(), true, MAX_MSG_SIZE)
}

/// rocks_acceptor opens acceptor 0 on a RocksDB store at `path`.
pub fn rocks_acceptor(path: &Path, recover: bool) -> Acceptor {
    let sto = RecordStore::open(0, path, Durability::TransactionalSync, recover).unwrap();
    Acceptor::new(0, sto, false, MAX_MSG_SIZE)
}

/// faulty_acceptor creates a delivering acceptor whose storage fails as the returned `Faults`
/// tells it to.
pub fn faulty_acceptor() -> (Acceptor, Faults) {
    let faults = Faults::default();
    let sto = faulty_store(&faults);
    (Acceptor::new(0, sto, true, MAX_MSG_SIZE), faults)
}

pub fn faulty_store(faults: &Faults) -> RecordStore {
    let eng = FaultyEngine {
        inner: MemEngine::new().unwrap(),
        faults: faults.clone(),
    };
    RecordStore::with_engine(Box::new(eng), Durability::None)
}

pub const READ_FAILURE: &str = "read failure of record";
pub const WRITE_FAILURE: &str = "write failure";

/// Faults is shared by a test and its FaultyEngine, to switch failures on and off after the
/// engine is moved into a store.
#[derive(Clone, Default)]
pub struct Faults {
    unreadable: Arc<Mutex<Option<Vec<u8>>>>,
    read_only: Arc<AtomicBool>,
}

impl Faults {
    /// fail_get makes reading the record of `iid` fail. Other records are read as usual.
    pub fn fail_get(&self, iid: Iid) {
        *self.unreadable.lock().unwrap() = Some(record_key(iid));
    }

    /// fail_write makes every `write_batch` and `sync` fail, without writing anything.
    pub fn fail_write(&self, fail: bool) {
        self.read_only.store(fail, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        *self.unreadable.lock().unwrap() = None;
        self.fail_write(false);
    }

    fn check_get(&self, key: &[u8]) -> Result<(), StorageError> {
        if self.unreadable.lock().unwrap().as_deref() == Some(key) {
            return Err(StorageError::DBError(READ_FAILURE.to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StorageError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StorageError::DBError(WRITE_FAILURE.to_string()));
        }
        Ok(())
    }
}

/// FaultyEngine is a MemEngine that fails on demand.
pub struct FaultyEngine {
    inner: MemEngine,
    faults: Faults,
}

impl Base for FaultyEngine {
    fn set(&self, cf: DBColumnFamily, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.faults.check_write()?;
        self.inner.set(cf, key, value)
    }

    fn get(&self, cf: DBColumnFamily, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        self.faults.check_get(key)?;
        self.inner.get(cf, key)
    }

    fn delete(&self, cf: DBColumnFamily, key: &[u8]) -> Result<(), StorageError> {
        self.faults.check_write()?;
        self.inner.delete(cf, key)
    }

    fn prev(&self, cf: DBColumnFamily, key: &[u8], include: bool) -> Option<(Vec<u8>, Vec<u8>)> {
        self.inner.prev(cf, key, include)
    }

    fn write_batch(&self, entrys: &[WriteEntry]) -> Result<(), StorageError> {
        self.faults.check_write()?;
        self.inner.write_batch(entrys)
    }

    fn sync(&self) -> Result<(), StorageError> {
        self.faults.check_write()?;
        self.inner.sync()
    }
}

/// acks_to returns the ack entries of `reply` and checks it is sent to `dest`.
/// No reply yields no acks.
pub fn acks_to(dest: Dest, reply: Option<Reply>) -> Vec<AcceptorRecord> {
    match reply {
        None => vec![],
        Some(r) => {
            assert_eq!(dest, r.to);
            r.msg.acks().unwrap().to_vec()
        }
    }
}

/// handle is a shortcut of `handle_msg` for a message that must not fail.
pub fn handle(acc: &mut Acceptor, msg: PaxosMsg) -> Option<Reply> {
    acc.handle_msg(msg).unwrap()
}
