//! Data types shared by every paxos role: instance ids, ballots, the acceptor record and the
//! messages exchanged over the wire.

#[macro_use]
pub mod macros;

mod errors;
mod message;
mod record;

pub use errors::*;
pub use message::*;
pub use record::*;

#[cfg(test)]
#[path = "./tests/message_tests.rs"]
mod message_tests;

#[cfg(test)]
#[path = "./tests/record_tests.rs"]
mod record_tests;

/// Iid identifies one instance of the protocol, i.e. one slot in the decided sequence.
pub type Iid = u64;

/// Ballot is a proposer-chosen round number. Acceptors only compare ballots.
pub type Ballot = u64;

/// AcceptorId is in `[0, n_acceptors)`.
pub type AcceptorId = u32;

/// MAX_ACCEPTORS is the bit width of the mask learners use to count a quorum of acceptors.
pub const MAX_ACCEPTORS: u32 = 32;

/// MAX_MSG_SIZE is the largest datagram payload sent or expected.
pub const MAX_MSG_SIZE: usize = 65000;
