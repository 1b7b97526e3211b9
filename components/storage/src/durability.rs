use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Durability selects how strongly a committed write batch survives a crash.
///
/// It trades commit latency for the strength of the recovery guarantee. It never changes what
/// is written, only when the written bytes reach stable media.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Durability {
    /// Records live in process memory only and are lost on any crash.
    None,

    /// Write-ahead log is written on commit but never fsynced.
    /// Survives a process crash, not a machine crash.
    TransactionalAsync,

    /// Like `TransactionalAsync`, but the log is fsynced when `Base::sync()` is called,
    /// e.g. on a periodic timer.
    TransactionalSyncDelayed,

    /// Write-ahead log is fsynced before a commit returns.
    TransactionalSync,

    /// No write-ahead log. Every commit is followed by a synchronous flush of the memtable.
    ManualFlush,
}

impl Default for Durability {
    fn default() -> Self {
        Durability::TransactionalSync
    }
}

impl Durability {
    pub fn all() -> Vec<Durability> {
        vec![
            Durability::None,
            Durability::TransactionalAsync,
            Durability::TransactionalSyncDelayed,
            Durability::TransactionalSync,
            Durability::ManualFlush,
        ]
    }

    /// is_persistent returns true if records are written to a directory on disk.
    pub fn is_persistent(&self) -> bool {
        *self != Durability::None
    }

    /// write_ahead_log returns true if commits go through the write-ahead log.
    pub fn write_ahead_log(&self) -> bool {
        match self {
            Durability::TransactionalAsync
            | Durability::TransactionalSyncDelayed
            | Durability::TransactionalSync => true,
            Durability::None | Durability::ManualFlush => false,
        }
    }

    /// sync_on_commit returns true if a commit must not return before the log is on stable media.
    pub fn sync_on_commit(&self) -> bool {
        *self == Durability::TransactionalSync
    }

    pub fn flush_on_commit(&self) -> bool {
        *self == Durability::ManualFlush
    }

    pub fn sync_on_tick(&self) -> bool {
        *self == Durability::TransactionalSyncDelayed
    }
}

impl From<&Durability> for &str {
    fn from(d: &Durability) -> Self {
        match d {
            Durability::None => "none",
            Durability::TransactionalAsync => "transactional_async",
            Durability::TransactionalSyncDelayed => "transactional_sync_delayed",
            Durability::TransactionalSync => "transactional_sync",
            Durability::ManualFlush => "manual_flush",
        }
    }
}

impl fmt::Display for Durability {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s: &str = self.into();
        write!(f, "{}", s)
    }
}

impl FromStr for Durability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for d in Durability::all() {
            let name: &str = (&d).into();
            if name == s {
                return Ok(d);
            }
        }
        Err(format!("unknown durability mode: {}", s))
    }
}
