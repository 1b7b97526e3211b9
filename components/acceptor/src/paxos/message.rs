use prost::Message;

use self::paxos_msg::Body;
use super::{AcceptorId, AcceptorRecord, Ballot, Iid, MessageError};

/// Phase-1a request for one instance.
#[derive(Clone, PartialEq, Message)]
pub struct PrepareReq {
    #[prost(uint64, tag = "1")]
    pub iid: Iid,
    #[prost(uint64, tag = "2")]
    pub ballot: Ballot,
}

/// Phase-2a request for one instance.
#[derive(Clone, PartialEq, Message)]
pub struct AcceptReq {
    #[prost(uint64, tag = "1")]
    pub iid: Iid,
    #[prost(uint64, tag = "2")]
    pub ballot: Ballot,
    #[prost(bytes, tag = "3")]
    pub value: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct PrepareReqBatch {
    #[prost(message, repeated, tag = "1")]
    pub reqs: Vec<PrepareReq>,
}

#[derive(Clone, PartialEq, Message)]
pub struct AcceptReqBatch {
    #[prost(message, repeated, tag = "1")]
    pub reqs: Vec<AcceptReq>,
}

/// A learner asks for the accepted value of these instances again.
#[derive(Clone, PartialEq, Message)]
pub struct RepeatReqBatch {
    #[prost(uint64, repeated, tag = "1")]
    pub iids: Vec<Iid>,
}

/// Prepare or accept acknowledgements. Every entry echoes the record after the change.
#[derive(Clone, PartialEq, Message)]
pub struct AckBatch {
    #[prost(message, repeated, tag = "1")]
    pub acks: Vec<AcceptorRecord>,
}

/// PaxosMsg is the content of one datagram.
#[derive(Clone, PartialEq, Message)]
pub struct PaxosMsg {
    /// The sender identity, set on acknowledgements.
    #[prost(uint32, tag = "1")]
    pub acceptor_id: AcceptorId,

    #[prost(oneof = "paxos_msg::Body", tags = "2, 3, 4, 5, 6")]
    pub body: Option<paxos_msg::Body>,
}

pub mod paxos_msg {
    use super::*;

    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Body {
        #[prost(message, tag = "2")]
        PrepareReqs(PrepareReqBatch),
        #[prost(message, tag = "3")]
        AcceptReqs(AcceptReqBatch),
        #[prost(message, tag = "4")]
        RepeatReqs(RepeatReqBatch),
        #[prost(message, tag = "5")]
        PrepareAcks(AckBatch),
        #[prost(message, tag = "6")]
        AcceptAcks(AckBatch),
    }
}

impl Body {
    pub fn kind(&self) -> &'static str {
        match self {
            Body::PrepareReqs(_) => "prepare_reqs",
            Body::AcceptReqs(_) => "accept_reqs",
            Body::RepeatReqs(_) => "repeat_reqs",
            Body::PrepareAcks(_) => "prepare_acks",
            Body::AcceptAcks(_) => "accept_acks",
        }
    }
}

impl PaxosMsg {
    pub fn prepare_reqs(reqs: Vec<PrepareReq>) -> PaxosMsg {
        PaxosMsg {
            acceptor_id: 0,
            body: Some(Body::PrepareReqs(PrepareReqBatch { reqs })),
        }
    }

    pub fn accept_reqs(reqs: Vec<AcceptReq>) -> PaxosMsg {
        PaxosMsg {
            acceptor_id: 0,
            body: Some(Body::AcceptReqs(AcceptReqBatch { reqs })),
        }
    }

    pub fn repeat_reqs(iids: Vec<Iid>) -> PaxosMsg {
        PaxosMsg {
            acceptor_id: 0,
            body: Some(Body::RepeatReqs(RepeatReqBatch { iids })),
        }
    }

    pub fn prepare_acks(acceptor_id: AcceptorId, acks: Vec<AcceptorRecord>) -> PaxosMsg {
        PaxosMsg {
            acceptor_id,
            body: Some(Body::PrepareAcks(AckBatch { acks })),
        }
    }

    pub fn accept_acks(acceptor_id: AcceptorId, acks: Vec<AcceptorRecord>) -> PaxosMsg {
        PaxosMsg {
            acceptor_id,
            body: Some(Body::AcceptAcks(AckBatch { acks })),
        }
    }

    /// from_datagram decodes one received datagram.
    pub fn from_datagram(buf: &[u8]) -> Result<PaxosMsg, MessageError> {
        let msg = PaxosMsg::decode(buf)?;
        if msg.body.is_none() {
            return Err(MessageError::NoBody);
        }
        Ok(msg)
    }

    pub fn to_datagram(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        // encoding into a Vec only fails if the Vec can not grow.
        self.encode(&mut buf)
            .expect("Vec<u8> has enough capacity for encoding");
        buf
    }

    /// acks returns the acknowledgement entries if it is an ack message.
    pub fn acks(&self) -> Option<&[AcceptorRecord]> {
        match self.body {
            Some(Body::PrepareAcks(ref b)) | Some(Body::AcceptAcks(ref b)) => Some(&b.acks),
            _ => None,
        }
    }

    /// split an ack message into several messages, each of them encodes to at most `max_size`
    /// bytes, unless a single entry alone is larger. Entry order is kept.
    /// Other kinds of message are returned as is.
    pub fn split(self, max_size: usize) -> Vec<PaxosMsg> {
        let acceptor_id = self.acceptor_id;

        match self.body {
            Some(Body::PrepareAcks(_)) | Some(Body::AcceptAcks(_)) => {}
            _ => return vec![self],
        }

        let (prepare, acks) = match self.body {
            Some(Body::PrepareAcks(b)) => (true, b.acks),
            Some(Body::AcceptAcks(b)) => (false, b.acks),
            _ => (false, vec![]),
        };

        split_acks(acceptor_id, acks, max_size)
            .into_iter()
            .map(|part| {
                if prepare {
                    PaxosMsg::prepare_acks(acceptor_id, part)
                } else {
                    PaxosMsg::accept_acks(acceptor_id, part)
                }
            })
            .collect()
    }
}

/// split_acks groups `acks` so that a PaxosMsg carrying one group is no larger than
/// `max_size`.
fn split_acks(
    acceptor_id: AcceptorId,
    acks: Vec<AcceptorRecord>,
    max_size: usize,
) -> Vec<Vec<AcceptorRecord>> {
    // acceptor id, body tag and body length, ack batch tag and length.
    let header = PaxosMsg::accept_acks(acceptor_id, vec![]).encoded_len() + 2 * 10;

    let mut parts = vec![];
    let mut part = vec![];
    let mut size = header;

    for a in acks {
        let l = a.encoded_len();
        // field key and length prefix of a repeated entry
        let l = l + 1 + prost::encoding::encoded_len_varint(l as u64);

        if !part.is_empty() && size + l > max_size {
            parts.push(std::mem::replace(&mut part, vec![]));
            size = header;
        }

        size += l;
        part.push(a);
    }

    if !part.is_empty() {
        parts.push(part);
    }

    parts
}
