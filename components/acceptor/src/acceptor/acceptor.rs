use storage::StorageError;

use super::{apply_accept, apply_final_delivery, apply_prepare, AcceptorError};
use crate::conf::AcceptorConf;
use crate::paxos::paxos_msg::Body;
use crate::paxos::{
    AcceptReq, AcceptorId, AcceptorRecord, Ballot, Iid, MessageError, PaxosMsg, PrepareReq,
};
use crate::store::RecordStore;

/// Dest is the group of peers a reply is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dest {
    Proposers,
    Learners,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub to: Dest,
    pub msg: PaxosMsg,
}

/// Acceptor applies paxos requests to its record store.
///
/// It is owned by a single task and handles one message at a time, thus every field is
/// accessed without lock.
pub struct Acceptor {
    id: AcceptorId,
    store: RecordStore,

    /// The greatest iid a value is accepted for since this process started.
    /// It is the instance to retransmit and it is not persisted.
    pub(crate) highest_accepted_iid: Iid,

    update_on_deliver: bool,

    /// Accept requests carrying a larger value are rejected, since the ack could not be sent.
    max_value_size: usize,
}

impl Acceptor {
    pub fn new(
        id: AcceptorId,
        store: RecordStore,
        update_on_deliver: bool,
        max_value_size: usize,
    ) -> Acceptor {
        Acceptor {
            id,
            store,
            highest_accepted_iid: 0,
            update_on_deliver,
            max_value_size,
        }
    }

    /// open creates an acceptor and its record store as `conf` describes.
    pub fn open(conf: &AcceptorConf) -> Result<Acceptor, AcceptorError> {
        let store = RecordStore::open_conf(conf)?;

        info!("acceptor ready";
              "acceptor_id" => conf.acceptor_id,
              "n_acceptors" => conf.n_acceptors,
              "durability" => %store.durability());

        Ok(Acceptor::new(
            conf.acceptor_id,
            store,
            conf.update_on_deliver,
            conf.max_msg_size,
        ))
    }

    pub fn id(&self) -> AcceptorId {
        self.id
    }

    pub fn highest_accepted_iid(&self) -> Iid {
        self.highest_accepted_iid
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }

    /// record reads the current record of `iid` in its own transaction.
    pub fn record(&mut self, iid: Iid) -> Result<Option<AcceptorRecord>, StorageError> {
        let txn = self.store.begin();
        let rec = txn.get(iid)?;
        txn.commit()?;
        Ok(rec)
    }

    /// close releases the record store.
    pub fn close(self) -> Result<(), AcceptorError> {
        self.store.close()?;
        Ok(())
    }

    /// handle_msg dispatches a received message to the handler of its kind.
    ///
    /// It returns the reply to send, if any. An Err means the state of the acceptor is unknown
    /// and it must not go on.
    pub fn handle_msg(&mut self, msg: PaxosMsg) -> Result<Option<Reply>, AcceptorError> {
        let body = match msg.body {
            Some(b) => b,
            None => {
                warn!("drop message without body"; "from_acceptor" => msg.acceptor_id);
                return Ok(None);
            }
        };

        let kind = body.kind();
        debug!("handle message"; "kind" => kind);

        match body {
            Body::PrepareReqs(b) => self.handle_prepare_batch(&b.reqs),
            Body::AcceptReqs(b) => self.handle_accept_batch(&b.reqs),
            Body::RepeatReqs(b) => self.handle_repeat_batch(&b.iids),
            Body::PrepareAcks(_) | Body::AcceptAcks(_) => {
                warn!("drop message"; "err" => %MessageError::UnexpectedKind(kind));
                Ok(None)
            }
        }
    }

    /// handle_prepare_batch promises every request that can be promised, in one transaction.
    /// Rejected requests are absent from the acks.
    pub fn handle_prepare_batch(
        &mut self,
        reqs: &[PrepareReq],
    ) -> Result<Option<Reply>, AcceptorError> {
        let mut acks = Vec::with_capacity(reqs.len());
        let mut txn = self.store.begin();

        for req in reqs {
            let cur = match txn.get(req.iid) {
                Ok(c) => c,
                Err(e) => {
                    error!("skip prepare, failed to read record"; "iid" => req.iid, "err" => %e);
                    continue;
                }
            };

            if let Some(rec) = apply_prepare(req, cur.as_ref()) {
                txn.put(&rec)?;
                acks.push(rec);
            }
        }

        txn.commit()?;

        debug!("prepare batch done"; "n_reqs" => reqs.len(), "n_acks" => acks.len());

        if acks.is_empty() {
            return Ok(None);
        }

        Ok(Some(Reply {
            to: Dest::Proposers,
            msg: PaxosMsg::prepare_acks(self.id, acks),
        }))
    }

    /// handle_accept_batch accepts every request that can be accepted, in one transaction.
    /// Rejected requests are absent from the acks.
    pub fn handle_accept_batch(
        &mut self,
        reqs: &[AcceptReq],
    ) -> Result<Option<Reply>, AcceptorError> {
        let mut acks = Vec::with_capacity(reqs.len());
        let mut highest = self.highest_accepted_iid;
        let mut txn = self.store.begin();

        for req in reqs {
            if req.value.len() > self.max_value_size {
                warn!("accept rejected, value too large";
                      "iid" => req.iid, "size" => req.value.len(), "max" => self.max_value_size);
                continue;
            }

            let cur = match txn.get(req.iid) {
                Ok(c) => c,
                Err(e) => {
                    error!("skip accept, failed to read record"; "iid" => req.iid, "err" => %e);
                    continue;
                }
            };

            if let Some(rec) = apply_accept(req, cur.as_ref()) {
                txn.put(&rec)?;
                highest = std::cmp::max(highest, rec.iid);
                acks.push(rec);
            }
        }

        txn.commit()?;

        // Only what is committed can be retransmitted.
        self.highest_accepted_iid = highest;

        debug!("accept batch done"; "n_reqs" => reqs.len(), "n_acks" => acks.len());

        if acks.is_empty() {
            return Ok(None);
        }

        Ok(Some(Reply {
            to: Dest::Learners,
            msg: PaxosMsg::accept_acks(self.id, acks),
        }))
    }

    /// handle_repeat_batch acks again the instances in `iids` that have an accepted value.
    /// It never changes any record.
    pub fn handle_repeat_batch(&mut self, iids: &[Iid]) -> Result<Option<Reply>, AcceptorError> {
        let mut acks = Vec::with_capacity(iids.len());
        let txn = self.store.begin();

        for iid in iids {
            match txn.get(*iid) {
                Ok(Some(rec)) => {
                    if rec.has_value() {
                        acks.push(rec);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    error!("skip repeat, failed to read record"; "iid" => *iid, "err" => %e);
                }
            }
        }

        txn.commit()?;

        debug!("repeat batch done"; "n_reqs" => iids.len(), "n_acks" => acks.len());

        if acks.is_empty() {
            return Ok(None);
        }

        Ok(Some(Reply {
            to: Dest::Learners,
            msg: PaxosMsg::accept_acks(self.id, acks),
        }))
    }

    /// deliver is called when a learner in this process sees `iid` decided with `value` at
    /// `ballot`. The local record is made final, if `update_on_deliver` is set.
    pub fn deliver(&mut self, value: &[u8], iid: Iid, ballot: Ballot) -> Result<(), AcceptorError> {
        if !self.update_on_deliver {
            warn!("delivery ignored, update_on_deliver is off"; "iid" => iid);
            return Ok(());
        }

        let mut txn = self.store.begin();

        let cur = match txn.get(iid) {
            Ok(c) => c,
            Err(e) => {
                error!("skip delivery, failed to read record"; "iid" => iid, "err" => %e);
                return Ok(());
            }
        };

        let rec = apply_final_delivery(value, iid, ballot, cur.as_ref());
        txn.put(&rec)?;
        txn.commit()?;

        debug!("instance final"; "rec" => %rec);

        Ok(())
    }
}
