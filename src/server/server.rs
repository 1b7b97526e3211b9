use std::io;
use std::net::SocketAddr;

// for boxed()
use futures::future::FutureExt;
use futures::Future;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time::{interval_at, Instant};

use acceptor::conf::AcceptorConf;
use acceptor::paxos::{Ballot, Iid, PaxosMsg, MAX_MSG_SIZE};
use acceptor::{Acceptor, AcceptorError};

use super::Transport;
use crate::ServerError;

/// Delivery tells the acceptor that `iid` is decided with `value` at `ballot`.
/// It is sent by a learner running in the same process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub iid: Iid,
    pub ballot: Ballot,
    pub value: Vec<u8>,
}

/// What woke up the event loop.
enum Event {
    Shutdown,
    Datagram(usize, SocketAddr),
    RecvError(io::Error),
    Tick,
    Deliver(Delivery),
}

/// Server runs an acceptor on UDP: requests, the retransmission timer and deliveries are all
/// handled one at a time by a single task.
pub struct Server {
    conf: AcceptorConf,
    acceptor: Acceptor,
    transport: Transport,
    delivery_tx: UnboundedSender<Delivery>,
    delivery_rx: UnboundedReceiver<Delivery>,
}

impl Server {
    /// new opens the record store and binds the sockets. Any failure here means the acceptor
    /// must not start. `conf` must have passed `AcceptorConf::check()`.
    pub fn new(conf: AcceptorConf) -> Result<Server, ServerError> {
        let acceptor = Acceptor::open(&conf)?;
        let transport = Transport::bind(&conf)?;
        let listen = transport.local_addr()?;

        info!("acceptor bound";
              "acceptor_id" => conf.acceptor_id,
              "listen" => %listen,
              "proposers" => %conf.proposers,
              "learners" => %conf.learners);

        let (delivery_tx, delivery_rx) = unbounded_channel();

        Ok(Server {
            conf,
            acceptor,
            transport,
            delivery_tx,
            delivery_rx,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.transport.local_addr()?)
    }

    /// deliverer returns a sender to notify the acceptor of decided instances.
    pub fn deliverer(&self) -> UnboundedSender<Delivery> {
        self.delivery_tx.clone()
    }

    /// serve_with_shutdown runs the acceptor until `signal` resolves.
    ///
    /// It returns an error if a change could not be persisted. Nothing is acked after such an
    /// error.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<(), ServerError>
    where
        F: Future + Send,
    {
        // impl Unpin
        let mut sig = signal.boxed();

        let Server {
            conf,
            mut acceptor,
            transport,
            delivery_tx,
            mut delivery_rx,
        } = self;

        // keep the channel open even if no one else holds a sender
        let _delivery_tx = delivery_tx;

        let (mut recv, mut sender) = transport.register()?;

        let period = conf.retransmit_interval();
        let mut ticker = interval_at(Instant::now() + period, period);

        let mut buf = vec![0u8; std::cmp::max(conf.max_msg_size, MAX_MSG_SIZE)];

        info!("acceptor serving"; "acceptor_id" => acceptor.id());

        loop {
            let ev = tokio::select! {
                _v = (&mut sig) => Event::Shutdown,
                rst = recv.recv_from(&mut buf) => {
                    match rst {
                        Ok((n, from)) => Event::Datagram(n, from),
                        Err(e) => Event::RecvError(e),
                    }
                },
                _ = ticker.tick() => Event::Tick,
                Some(d) = delivery_rx.recv() => Event::Deliver(d),
            };

            match ev {
                Event::Shutdown => {
                    info!("shutdown signal received");
                    break;
                }
                Event::Datagram(n, from) => {
                    let msg = match PaxosMsg::from_datagram(&buf[..n]) {
                        Ok(m) => m,
                        Err(e) => {
                            warn!("drop datagram"; "from" => %from, "size" => n, "err" => %e);
                            continue;
                        }
                    };

                    let reply = acceptor.handle_msg(msg).map_err(fatal)?;
                    sender.send(reply).await;
                }
                Event::RecvError(e) => {
                    warn!("failed to receive"; "err" => %e);
                }
                Event::Tick => {
                    let reply = acceptor.on_tick().map_err(fatal)?;
                    sender.send(reply).await;
                }
                Event::Deliver(d) => {
                    acceptor
                        .deliver(&d.value, d.iid, d.ballot)
                        .map_err(fatal)?;
                }
            }
        }

        acceptor.close()?;
        info!("acceptor stopped");
        Ok(())
    }
}

fn fatal(e: AcceptorError) -> ServerError {
    crit!("acceptor state is unknown, stop"; "err" => %e);
    ServerError::Acceptor(e)
}
