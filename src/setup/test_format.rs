use std::io::{self, Write};
use std::str::from_utf8;
use std::sync::{Arc, Mutex};

use chrono::DateTime;
use slog::{slog_error, slog_info, slog_warn, Drain};

use super::log_format::PaccFormat;
use super::log_format::TIMESTAMP_FORMAT;

use pretty_assertions::assert_eq;

/// LogBuf collects formatted log lines in memory.
#[derive(Clone, Default)]
struct LogBuf(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogBuf {
    fn lines(&self) -> Vec<String> {
        let buf = self.0.lock().unwrap();
        from_utf8(&*buf)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }
}

fn new_logger(acceptor_id: u32) -> (LogBuf, slog::Logger) {
    let buf = LogBuf::default();
    let decorator = slog_term::PlainSyncDecorator::new(buf.clone());
    let drain = PaccFormat::new(decorator, acceptor_id).fuse();
    (buf, slog::Logger::root(drain, slog::o!()))
}

/// Line is a log line cut into the parts of its header.
#[derive(Debug, PartialEq)]
struct Line {
    level: String,
    acceptor: String,
    file: String,
    line: u32,
    msg: String,
}

fn parse_line(l: &str) -> Line {
    let parts: Vec<&str> = l.splitn(5, "] ").collect();
    assert_eq!(5, parts.len(), "line: {}", l);

    let ts = &parts[0][1..];
    assert!(
        DateTime::parse_from_str(ts, TIMESTAMP_FORMAT).is_ok(),
        "timestamp: {}",
        ts
    );

    let loc: Vec<&str> = parts[3][1..].rsplitn(2, ':').collect();

    Line {
        level: parts[1][1..].to_string(),
        acceptor: parts[2][1..].to_string(),
        file: loc[1].to_string(),
        line: loc[0].parse().unwrap(),
        msg: parts[4].to_string(),
    }
}

fn want(level: &str, acceptor_id: u32, line: u32, msg: &str) -> Line {
    Line {
        level: level.to_string(),
        acceptor: format!("acceptor:{}", acceptor_id),
        file: "src/setup/test_format.rs".to_string(),
        line,
        msg: msg.to_string(),
    }
}

#[test]
fn test_pacc_format_header() {
    let (buf, logger) = new_logger(3);

    let l1 = line!() + 1;
    slog_info!(logger, "logger ready");
    let l2 = line!() + 1;
    slog_warn!(logger, "drop datagram from {}", "127.0.0.1:4000");
    let l3 = line!() + 1;
    slog_error!(logger, "acceptor state is unknown, stop");

    let got: Vec<Line> = buf.lines().iter().map(|l| parse_line(l)).collect();
    assert_eq!(
        vec![
            want("INFO", 3, l1, "logger ready"),
            want("WARN", 3, l2, "drop datagram from 127.0.0.1:4000"),
            want("ERRO", 3, l3, "acceptor state is unknown, stop"),
        ],
        got
    );
}

#[test]
fn test_pacc_format_fields() {
    let (buf, logger) = new_logger(0);

    let l1 = line!() + 1;
    slog_info!(logger, "prepare batch done"; "n_reqs" => 3, "n_acks" => 2);
    let l2 = line!() + 1;
    slog_warn!(logger, "drop datagram"; "size" => 17);
    let l3 = line!() + 1;
    slog_error!(logger, "skip accept";
                    "is_final" => true,
                    "value_ballot" => None as Option<u8>,
                    "iids" => ?[1, 2], // `?[xxx]` is translated to `format("{:?}", [xxx])`
    );

    let got: Vec<Line> = buf.lines().iter().map(|l| parse_line(l)).collect();
    assert_eq!(
        vec![
            want("INFO", 0, l1, "prepare batch done, n_reqs: 3, n_acks: 2"),
            want("WARN", 0, l2, "drop datagram, size: 17"),
            want(
                "ERRO",
                0,
                l3,
                "skip accept, is_final: true, value_ballot: None, iids: [1, 2]"
            ),
        ],
        got
    );
}
