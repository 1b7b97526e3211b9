/// Create an AcceptorRecord.
///
/// supported pattern:
/// record!(iid, ballot) // a promise, no value accepted
/// record!(iid, ballot, (value_ballot, "value"))
/// record!(iid, ballot, (value_ballot, "value"), "final")
#[macro_export]
macro_rules! record {
    ($iid:expr, $ballot:expr) => {
        $crate::paxos::AcceptorRecord::promise($iid, $ballot)
    };

    ($iid:expr, $ballot:expr, ($vballot:expr, $value:expr)) => {
        $crate::paxos::AcceptorRecord {
            iid: $iid,
            ballot: $ballot,
            value_ballot: $vballot,
            value: $value.as_bytes().to_vec(),
            is_final: false,
        }
    };

    ($iid:expr, $ballot:expr, ($vballot:expr, $value:expr), "final") => {
        $crate::paxos::AcceptorRecord {
            is_final: true,
            ..$crate::record!($iid, $ballot, ($vballot, $value))
        }
    };
}

/// Create a Vec<PrepareReq>: prepares![(iid, ballot), ...]
#[macro_export]
macro_rules! prepares {
    [$(($iid:expr, $ballot:expr)),* $(,)*] => {
        vec![$(
            $crate::paxos::PrepareReq {
                iid: $iid,
                ballot: $ballot,
            }
        ),*]
    };
}

/// Create a Vec<AcceptReq>: accepts![(iid, ballot, "value"), ...]
#[macro_export]
macro_rules! accepts {
    [$(($iid:expr, $ballot:expr, $value:expr)),* $(,)*] => {
        vec![$(
            $crate::paxos::AcceptReq {
                iid: $iid,
                ballot: $ballot,
                value: $value.as_bytes().to_vec(),
            }
        ),*]
    };
}
