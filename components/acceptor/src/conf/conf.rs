use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use storage::Durability;

use super::errors::ConfError;
use crate::paxos::{AcceptorId, MAX_ACCEPTORS, MAX_MSG_SIZE};

fn default_retransmit_interval_ms() -> u64 {
    1000
}

fn default_max_msg_size() -> usize {
    MAX_MSG_SIZE
}

fn default_log_path() -> PathBuf {
    PathBuf::from("acceptor.log")
}

fn default_log_level() -> String {
    "info".into()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LogConf {
    #[serde(default = "default_log_path")]
    pub path: PathBuf,

    /// One of slog level names: critical, error, warn, info, debug, trace.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConf {
    fn default() -> Self {
        LogConf {
            path: default_log_path(),
            level: default_log_level(),
        }
    }
}

impl LogConf {
    pub fn slog_level(&self) -> Result<slog::Level, ConfError> {
        slog::Level::from_str(&self.level)
            .map_err(|_| ConfError::Invalid("log.level", self.level.clone()))
    }
}

/// AcceptorConf is everything an acceptor process needs to start.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AcceptorConf {
    pub acceptor_id: AcceptorId,

    /// Total number of acceptors in the deployment.
    pub n_acceptors: u32,

    /// Address to receive requests on. A multicast address joins the group.
    pub listen: SocketAddr,

    /// Where prepare acknowledgements are sent.
    pub proposers: SocketAddr,

    /// Where accept acknowledgements are sent.
    pub learners: SocketAddr,

    #[serde(default)]
    pub durability: Durability,

    /// Directory of the durable record store. Defaults to `acceptor_<id>`.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,

    /// Open an existing record store instead of creating an empty one.
    #[serde(default)]
    pub recover: bool,

    #[serde(default = "default_retransmit_interval_ms")]
    pub retransmit_interval_ms: u64,

    /// Overwrite the local record with the decided value when a co-located learner delivers.
    #[serde(default)]
    pub update_on_deliver: bool,

    #[serde(default = "default_max_msg_size")]
    pub max_msg_size: usize,

    #[serde(default)]
    pub log: LogConf,
}

impl AcceptorConf {
    /// from_file read acceptor conf yaml from a local file.
    /// The result is not checked: call `check()` once all overrides are applied.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<AcceptorConf, ConfError> {
        let content = fs::read_to_string(path)?;
        AcceptorConf::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<AcceptorConf, ConfError> {
        let conf: AcceptorConf = serde_yaml::from_str(content)?;
        Ok(conf)
    }

    /// override_with replaces values from the file with the ones given on command line.
    pub fn override_with(&mut self, acceptor_id: Option<AcceptorId>, recover: bool) {
        if let Some(id) = acceptor_id {
            self.acceptor_id = id;
        }
        if recover {
            self.recover = true;
        }
    }

    /// check rejects a conf an acceptor must not start with.
    pub fn check(&self) -> Result<(), ConfError> {
        if self.n_acceptors == 0 || self.n_acceptors > MAX_ACCEPTORS {
            return Err(ConfError::TooManyAcceptors(self.n_acceptors, MAX_ACCEPTORS));
        }

        if self.acceptor_id >= self.n_acceptors {
            return Err(ConfError::InvalidAcceptorId(
                self.acceptor_id,
                self.n_acceptors,
            ));
        }

        if self.recover && !self.durability.is_persistent() {
            return Err(ConfError::RecoverWithoutDurability);
        }

        if self.retransmit_interval_ms == 0 {
            return Err(ConfError::Invalid(
                "retransmit_interval_ms",
                "must be greater than 0".into(),
            ));
        }

        if self.max_msg_size == 0 {
            return Err(ConfError::Invalid(
                "max_msg_size",
                "must be greater than 0".into(),
            ));
        }

        self.log.slog_level()?;

        Ok(())
    }

    pub fn storage_path(&self) -> PathBuf {
        match self.storage_path {
            Some(ref p) => p.clone(),
            None => PathBuf::from(format!("acceptor_{}", self.acceptor_id)),
        }
    }

    pub fn retransmit_interval(&self) -> Duration {
        Duration::from_millis(self.retransmit_interval_ms)
    }
}
