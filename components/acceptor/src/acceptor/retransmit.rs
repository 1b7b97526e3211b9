use super::{Acceptor, AcceptorError, Dest, Reply};
use crate::paxos::PaxosMsg;

impl Acceptor {
    /// retransmit_latest acks again the latest accepted instance to learners, so that a lost
    /// ack of the latest instance does not stall them.
    /// Older instances are only sent again on a repeat request.
    pub fn retransmit_latest(&mut self) -> Result<Option<Reply>, AcceptorError> {
        let iid = self.highest_accepted_iid;
        if iid == 0 {
            return Ok(None);
        }

        let rec = match self.record(iid) {
            Ok(Some(rec)) => rec,
            Ok(None) => {
                error!("accepted record not found"; "iid" => iid);
                return Ok(None);
            }
            Err(e) => {
                error!("skip retransmit, failed to read record"; "iid" => iid, "err" => %e);
                return Ok(None);
            }
        };

        debug!("retransmit"; "rec" => %rec);

        Ok(Some(Reply {
            to: Dest::Learners,
            msg: PaxosMsg::accept_acks(self.id(), vec![rec]),
        }))
    }

    /// on_tick is the periodic job: it syncs the records that durability mode delays, then
    /// retransmits the latest instance.
    pub fn on_tick(&mut self) -> Result<Option<Reply>, AcceptorError> {
        self.store_mut().sync()?;
        self.retransmit_latest()
    }
}
