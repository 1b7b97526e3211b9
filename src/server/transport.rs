use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use net2::UdpBuilder;
use tokio::net::UdpSocket;

use acceptor::conf::AcceptorConf;
use acceptor::{Dest, Reply};

/// Transport holds the bound but not yet registered sockets of an acceptor.
/// Requests are received on one socket and replies are sent from another.
pub struct Transport {
    recv: std::net::UdpSocket,
    send: std::net::UdpSocket,
    peers: Peers,
}

/// Peers is where replies go.
#[derive(Debug, Clone, Copy)]
struct Peers {
    proposers: SocketAddr,
    learners: SocketAddr,
    max_msg_size: usize,
}

impl Transport {
    /// bind creates the sockets described by `conf`. A multicast `listen` address binds the
    /// port on every interface and joins the group.
    pub fn bind(conf: &AcceptorConf) -> io::Result<Transport> {
        let listen = conf.listen;

        let recv = if listen.ip().is_multicast() {
            let any = SocketAddr::new(unspecified(&listen), listen.port());
            let sock = bind_reusable(&any)?;

            match listen.ip() {
                IpAddr::V4(group) => sock.join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED)?,
                IpAddr::V6(group) => sock.join_multicast_v6(&group, 0)?,
            }

            info!("joined multicast group"; "group" => %listen);
            sock
        } else {
            bind_reusable(&listen)?
        };

        let send = bind_reusable(&SocketAddr::new(unspecified(&conf.proposers), 0))?;

        Ok(Transport {
            recv,
            send,
            peers: Peers {
                proposers: conf.proposers,
                learners: conf.learners,
                max_msg_size: conf.max_msg_size,
            },
        })
    }

    /// local_addr is the address requests are received on.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.recv.local_addr()
    }

    /// register hands the sockets to the tokio reactor. It must be called in a runtime.
    pub(crate) fn register(self) -> io::Result<(UdpSocket, Sender)> {
        let recv = UdpSocket::from_std(self.recv)?;
        let send = UdpSocket::from_std(self.send)?;

        Ok((
            recv,
            Sender {
                sock: send,
                peers: self.peers,
            },
        ))
    }
}

/// Sender sends replies to proposers or learners. Sending is best effort: a failure is
/// logged and the reply is lost, as a lost datagram would be.
pub(crate) struct Sender {
    sock: UdpSocket,
    peers: Peers,
}

impl Sender {
    pub(crate) async fn send(&mut self, reply: Option<Reply>) {
        let reply = match reply {
            Some(r) => r,
            None => return,
        };

        let to = match reply.to {
            Dest::Proposers => self.peers.proposers,
            Dest::Learners => self.peers.learners,
        };

        for msg in reply.msg.split(self.peers.max_msg_size) {
            let buf = msg.to_datagram();

            if let Err(e) = self.sock.send_to(&buf, to).await {
                warn!("failed to send"; "to" => %to, "size" => buf.len(), "err" => %e);
            }
        }
    }
}

fn unspecified(addr: &SocketAddr) -> IpAddr {
    match addr {
        SocketAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        SocketAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
    }
}

fn bind_reusable(addr: &SocketAddr) -> io::Result<std::net::UdpSocket> {
    let builder = match addr {
        SocketAddr::V4(_) => UdpBuilder::new_v4()?,
        SocketAddr::V6(_) => UdpBuilder::new_v6()?,
    };
    builder.reuse_address(true)?;
    builder.bind(addr)
}
