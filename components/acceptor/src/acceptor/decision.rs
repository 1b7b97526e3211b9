//! The acceptance rules of phase 1 and phase 2.
//!
//! These functions only compute the next record of an instance. Reading the current record
//! and persisting the new one is up to the caller.

use crate::paxos::{AcceptReq, AcceptorRecord, Ballot, Iid, PrepareReq};

/// apply_prepare returns the promise record for `req`, or None if it must be rejected.
///
/// A prepare is rejected if the instance is final, or if a ballot not less than
/// `req.ballot` has already been promised. An accepted value is kept in the promise, so that
/// the proposer learns about it.
pub fn apply_prepare(req: &PrepareReq, cur: Option<&AcceptorRecord>) -> Option<AcceptorRecord> {
    let cur = match cur {
        Some(c) => c,
        None => return Some(AcceptorRecord::promise(req.iid, req.ballot)),
    };

    if cur.is_final {
        debug!("prepare rejected, instance is final"; "iid" => req.iid, "ballot" => req.ballot);
        return None;
    }

    if cur.ballot >= req.ballot {
        debug!("prepare rejected, stale ballot";
               "iid" => req.iid, "ballot" => req.ballot, "promised" => cur.ballot);
        return None;
    }

    Some(AcceptorRecord {
        ballot: req.ballot,
        ..cur.clone()
    })
}

/// apply_accept returns the record with `req.value` accepted, or None if it must be rejected.
///
/// An accept at exactly the promised ballot succeeds. A final instance rejects any accept:
/// its value is decided and must not be replaced by a late proposal.
///
/// Ballot 0 and an empty value are rejected: a record has `value_ballot == 0` exactly when it
/// has no value.
pub fn apply_accept(req: &AcceptReq, cur: Option<&AcceptorRecord>) -> Option<AcceptorRecord> {
    if req.ballot == 0 || req.value.is_empty() {
        debug!("accept rejected, zero ballot or empty value";
               "iid" => req.iid, "ballot" => req.ballot, "value_size" => req.value.len());
        return None;
    }

    if let Some(cur) = cur {
        if cur.is_final {
            debug!("accept rejected, instance is final"; "iid" => req.iid, "ballot" => req.ballot);
            return None;
        }

        if cur.ballot > req.ballot {
            debug!("accept rejected, stale ballot";
                   "iid" => req.iid, "ballot" => req.ballot, "promised" => cur.ballot);
            return None;
        }
    }

    Some(AcceptorRecord::accepted(req.iid, req.ballot, &req.value))
}

/// apply_final_delivery returns the record of an instance a learner has seen decided with
/// `value` at `ballot`. It replaces whatever was accepted locally.
///
/// The promised ballot never goes back: if a greater ballot is already promised, it is kept.
pub fn apply_final_delivery(
    value: &[u8],
    iid: Iid,
    ballot: Ballot,
    cur: Option<&AcceptorRecord>,
) -> AcceptorRecord {
    let promised = cur.map(|c| c.ballot).unwrap_or(0);

    AcceptorRecord {
        iid,
        ballot: std::cmp::max(promised, ballot),
        value_ballot: ballot,
        value: value.to_vec(),
        is_final: true,
    }
}
