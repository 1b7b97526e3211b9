use std::io;

use slog::{Drain, OwnedKVList, Record, KV};
use slog_term::{Decorator, RecordDecorator, Serializer};

use acceptor::paxos::AcceptorId;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// PaccFormat writes one line per record, tagged with the acceptor that wrote it, so that
/// the logs of several acceptors can be merged:
///
/// `[2020-05-03T10:13:55.035+08:00] [INFO] [acceptor:3] [src/server/server.rs:57] msg, k: v`
pub struct PaccFormat<D>
where
    D: Decorator,
{
    decorator: D,
    acceptor_id: AcceptorId,
}

impl<D> PaccFormat<D>
where
    D: Decorator,
{
    pub fn new(decorator: D, acceptor_id: AcceptorId) -> PaccFormat<D> {
        PaccFormat {
            decorator,
            acceptor_id,
        }
    }

    fn write_header(&self, rd: &mut dyn RecordDecorator, record: &Record) -> io::Result<()> {
        rd.start_timestamp()?;
        write!(rd, "[{}]", chrono::Local::now().format(TIMESTAMP_FORMAT))?;

        rd.start_whitespace()?;
        write!(rd, " ")?;

        rd.start_level()?;
        write!(rd, "[{}]", record.level().as_short_str())?;

        rd.start_whitespace()?;
        write!(rd, " ")?;

        // there is no `start_line()` or `start_file()`
        rd.start_msg()?;
        write!(
            rd,
            "[acceptor:{}] [{}:{}]",
            self.acceptor_id,
            record.file(),
            record.line()
        )
    }
}

impl<D> Drain for PaccFormat<D>
where
    D: Decorator,
{
    type Ok = ();
    type Err = io::Error;

    fn log(&self, record: &Record, values: &OwnedKVList) -> io::Result<()> {
        self.decorator.with_record(record, values, |rd| {
            self.write_header(rd, record)?;

            rd.start_whitespace()?;
            write!(rd, " ")?;

            rd.start_msg()?;
            write!(rd, "{}", record.msg())?;

            // fields follow the msg after a comma, in the order they are written
            let mut serializer = Serializer::new(rd, true, true);
            record.kv().serialize(record, &mut serializer)?;
            values.serialize(record, &mut serializer)?;
            serializer.finish()?;

            rd.start_whitespace()?;
            writeln!(rd)?;

            rd.flush()
        })
    }
}
