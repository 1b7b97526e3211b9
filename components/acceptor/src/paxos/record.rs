use std::fmt;

use prost::Message;
use storage::make_fixed_key;
use storage::ToKey;

use super::{Ballot, Iid};

pub const RECORD_KEY_PREFIX: &str = "/acceptor/record";

/// AcceptorRecord is what an acceptor remembers about one instance.
/// It is stored as is and it is also the entry of a prepare or accept acknowledgement.
#[derive(Clone, PartialEq, Message)]
pub struct AcceptorRecord {
    #[prost(uint64, tag = "1")]
    pub iid: Iid,

    /// The highest ballot promised or accepted for this instance.
    #[prost(uint64, tag = "2")]
    pub ballot: Ballot,

    /// The ballot `value` was accepted with. 0 if no value was accepted.
    /// Proposers use ballots greater than 0, so a non-empty `value` always has a non-zero
    /// `value_ballot`.
    #[prost(uint64, tag = "3")]
    pub value_ballot: Ballot,

    #[prost(bytes, tag = "4")]
    pub value: Vec<u8>,

    /// Set once the instance is known to be decided.
    #[prost(bool, tag = "5")]
    pub is_final: bool,
}

impl AcceptorRecord {
    /// promise creates the record of an instance seen for the first time by a prepare.
    pub fn promise(iid: Iid, ballot: Ballot) -> AcceptorRecord {
        AcceptorRecord {
            iid,
            ballot,
            value_ballot: 0,
            value: vec![],
            is_final: false,
        }
    }

    /// accepted creates a record with `value` accepted at `ballot`.
    pub fn accepted(iid: Iid, ballot: Ballot, value: &[u8]) -> AcceptorRecord {
        AcceptorRecord {
            iid,
            ballot,
            value_ballot: ballot,
            value: value.to_vec(),
            is_final: false,
        }
    }

    /// has_value returns true if there is something worth sending to a learner.
    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }
}

pub fn record_key(iid: Iid) -> Vec<u8> {
    make_fixed_key(RECORD_KEY_PREFIX, iid)
}

impl ToKey for AcceptorRecord {
    fn to_key(&self) -> Vec<u8> {
        record_key(self.iid)
    }
}

impl fmt::Display for AcceptorRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{{iid:{}, ballot:{}, value_ballot:{}, value_size:{}, final:{}}}",
            self.iid,
            self.ballot,
            self.value_ballot,
            self.value.len(),
            self.is_final
        )
    }
}
