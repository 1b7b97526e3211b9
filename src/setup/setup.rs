use std::fs::{self, File, OpenOptions};
use std::io::{self, Error, ErrorKind};
use std::path::Path;

use slog::Drain;

use acceptor::conf::LogConf;
use acceptor::paxos::AcceptorId;

use super::log_format::PaccFormat;
use crate::ServerError;

/// init_logger installs the global logger that writes to `conf.path`, with every line tagged
/// by `acceptor_id`. Records below `conf.level` are discarded.
pub fn init_logger(conf: &LogConf, acceptor_id: AcceptorId) -> Result<(), ServerError> {
    let level = conf.slog_level()?;
    let file = open_log_file(&conf.path)?;

    let decorator = slog_term::PlainDecorator::new(file);
    let drain = PaccFormat::new(decorator, acceptor_id).fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = drain.filter_level(level).fuse();

    let logger = slog::Logger::root(drain, slog::o!());

    slog_global::set_global(logger);

    info!("logger ready"; "path" => %conf.path.display(), "level" => %conf.level);
    Ok(())
}

/// Opens log file with append mode. Creates a new log file if it doesn't exist.
fn open_log_file<P: AsRef<Path>>(path: P) -> io::Result<File> {
    let path = path.as_ref();
    let parent = path.parent().ok_or_else(|| {
        Error::new(
            ErrorKind::Other,
            "Unable to get parent directory of log file",
        )
    })?;
    if !parent.as_os_str().is_empty() && !parent.is_dir() {
        fs::create_dir_all(parent)?
    }
    OpenOptions::new().append(true).create(true).open(path)
}
