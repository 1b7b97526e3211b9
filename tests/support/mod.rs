#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use acceptor::conf::{AcceptorConf, LogConf};
use acceptor::paxos::{PaxosMsg, MAX_MSG_SIZE};
use pacc::{Delivery, Server, ServerError};
use storage::Durability;

/// test_conf returns the conf of acceptor 0 listening on a random local port.
pub fn test_conf(proposers: SocketAddr, learners: SocketAddr) -> AcceptorConf {
    AcceptorConf {
        acceptor_id: 0,
        n_acceptors: 3,
        listen: "127.0.0.1:0".parse().unwrap(),
        proposers,
        learners,
        durability: Durability::None,
        storage_path: None,
        recover: false,
        retransmit_interval_ms: 60_000,
        update_on_deliver: false,
        max_msg_size: MAX_MSG_SIZE,
        log: LogConf::default(),
    }
}

/// UdpContext runs an acceptor in this process, with sockets playing a client, the
/// proposers and the learners.
pub struct UdpContext {
    pub acceptor_addr: SocketAddr,
    pub client: UdpSocket,
    pub proposers: UdpSocket,
    pub learners: UdpSocket,
    pub deliverer: UnboundedSender<Delivery>,
    stop_tx: Option<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<Result<(), ServerError>>>,
}

impl UdpContext {
    pub async fn new() -> UdpContext {
        UdpContext::with_conf(|_| {}).await
    }

    /// with_conf starts an acceptor with the default test conf modified by `f`.
    pub async fn with_conf<F>(f: F) -> UdpContext
    where
        F: FnOnce(&mut AcceptorConf),
    {
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let proposers = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let learners = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let mut conf = test_conf(
            proposers.local_addr().unwrap(),
            learners.local_addr().unwrap(),
        );
        f(&mut conf);
        conf.check().unwrap();

        let server = Server::new(conf).unwrap();
        let acceptor_addr = server.local_addr().unwrap();
        let deliverer = server.deliverer();

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let j = tokio::spawn(server.serve_with_shutdown(async {
            stop_rx.await.ok();
        }));

        UdpContext {
            acceptor_addr,
            client,
            proposers,
            learners,
            deliverer,
            stop_tx: Some(stop_tx),
            join_handle: Some(j),
        }
    }

    pub async fn send(&mut self, msg: &PaxosMsg) {
        let buf = msg.to_datagram();
        self.client
            .send_to(&buf, self.acceptor_addr)
            .await
            .unwrap();
    }

    pub async fn send_raw(&mut self, buf: &[u8]) {
        self.client.send_to(buf, self.acceptor_addr).await.unwrap();
    }

    /// stop shuts the acceptor down and returns what it ended with.
    pub async fn stop(&mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.stop_tx.take() {
            tx.send(()).unwrap();
        }
        let j = self.join_handle.take().unwrap();
        j.await.unwrap()
    }
}

/// recv_msg waits for one message on `sock`. It returns None on timeout.
pub async fn recv_msg(sock: &mut UdpSocket, wait: Duration) -> Option<PaxosMsg> {
    let mut buf = vec![0u8; MAX_MSG_SIZE];

    let (n, _from) = match timeout(wait, sock.recv_from(&mut buf)).await {
        Ok(rst) => rst.unwrap(),
        Err(_elapsed) => return None,
    };

    Some(PaxosMsg::from_datagram(&buf[..n]).unwrap())
}

pub fn tmp_storage_path(tmp_root: &tempfile::TempDir) -> PathBuf {
    tmp_root.path().join("acceptor_0")
}
