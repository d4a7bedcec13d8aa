//! UDP listener adapter.
//!
//! Binds a tokio [`UdpSocket`], then serves datagrams on a background task
//! until the [`ListenerHandle`] is shut down or dropped.

use super::wire::MAX_PACKET_SIZE;
use crate::config::ListenConfig;
use crate::domain::{DiscoveryError, NatMode, Netlist, NodeRecord};
use crate::service::DiscoveryService;
use bootnet_crypto::NodeKey;
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Bind the discovery socket and start serving.
///
/// NAT mode and restriction list are parsed before binding. The advertised
/// record uses the NAT external IP when one is configured, otherwise the
/// bound address (which may be a wildcard).
pub async fn listen_udp(
    key: &NodeKey,
    config: &ListenConfig,
) -> Result<ListenerHandle, DiscoveryError> {
    let nat = NatMode::parse(&config.nat)?;
    let restrict = match config.restrict.trim() {
        "" => None,
        list => Some(Netlist::parse(list)?),
    };

    let socket = UdpSocket::bind(config.listen_addr)
        .await
        .map_err(|source| DiscoveryError::Bind {
            addr: config.listen_addr,
            source,
        })?;
    let local_addr = socket.local_addr().map_err(DiscoveryError::LocalAddr)?;

    let advertised_ip = nat.external_ip().unwrap_or(local_addr.ip());
    let record = NodeRecord::new(key.public_key(), SocketAddr::new(advertised_ip, local_addr.port()));

    let service = Arc::new(Mutex::new(DiscoveryService::new(
        record,
        config.bucket_size,
        restrict,
    )));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(serve(socket, Arc::clone(&service), shutdown_rx));

    info!("[discovery] listening on {} as {:?}", local_addr, record.node_id());

    Ok(ListenerHandle {
        record,
        local_addr,
        service,
        shutdown_tx,
        task: Some(task),
    })
}

async fn serve(
    socket: UdpSocket,
    service: Arc<Mutex<DiscoveryService>>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut buf = vec![0u8; MAX_PACKET_SIZE + 1];
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                debug!("[discovery] shutdown signal received");
                break;
            }
            received = socket.recv_from(&mut buf) => {
                let (len, from) = match received {
                    Ok(r) => r,
                    Err(e) => {
                        // ICMP errors surface here on some platforms; keep serving.
                        debug!("[discovery] recv error: {}", e);
                        continue;
                    }
                };

                let reply = service.lock().handle(&buf[..len], from);
                if let Some(reply) = reply {
                    if let Err(e) = socket.send_to(&reply.encode(), from).await {
                        warn!("[discovery] failed to reply to {}: {}", from, e);
                    }
                }
            }
        }
    }
}

/// Running listener. Dropping it stops the background task.
#[derive(Debug)]
pub struct ListenerHandle {
    record: NodeRecord,
    local_addr: SocketAddr,
    service: Arc<Mutex<DiscoveryService>>,
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl ListenerHandle {
    /// Advertised self record.
    pub fn self_record(&self) -> &NodeRecord {
        &self.record
    }

    /// Address the socket is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Peers currently in the routing table.
    pub fn peer_count(&self) -> usize {
        self.service.lock().table().len()
    }

    /// Whether the serve loop is still running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop serving and wait for the task to exit.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("[discovery] listener task ended abnormally: {}", e);
            }
        }
        info!("[discovery] listener on {} stopped", self.local_addr);
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::wire::Packet;
    use crate::domain::{NatError, NetlistError, NodeId};
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    fn loopback_config() -> ListenConfig {
        ListenConfig::with_addr(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
    }

    async fn exchange(target: SocketAddr, packet: &Packet) -> Option<Packet> {
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        client.send_to(&packet.encode(), target).await.unwrap();

        let mut buf = [0u8; MAX_PACKET_SIZE];
        let received =
            tokio::time::timeout(Duration::from_secs(2), client.recv_from(&mut buf)).await;
        match received {
            Ok(Ok((len, _))) => Some(Packet::decode(&buf[..len]).unwrap()),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_binds_ephemeral_port() {
        let key = NodeKey::generate();
        let handle = listen_udp(&key, &loopback_config()).await.unwrap();

        assert_ne!(handle.local_addr().port(), 0);
        assert_eq!(handle.self_record().udp_port, handle.local_addr().port());
        assert_eq!(handle.self_record().pubkey, key.public_key());
        assert!(handle.is_running());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_ping_pong_round_trip() {
        let key = NodeKey::generate();
        let handle = listen_udp(&key, &loopback_config()).await.unwrap();

        let peer = NodeKey::generate().public_key();
        let ping = Packet::Ping {
            sender: NodeId::from_public_key(&peer),
            pubkey: peer,
        };

        let reply = exchange(handle.local_addr(), &ping).await;
        assert_eq!(
            reply,
            Some(Packet::Pong {
                sender: NodeId::from_public_key(&key.public_key())
            })
        );
        assert_eq!(handle.peer_count(), 1);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_port_in_use() {
        let key = NodeKey::generate();
        let first = listen_udp(&key, &loopback_config()).await.unwrap();

        let err = listen_udp(&key, &ListenConfig::with_addr(first.local_addr()))
            .await
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::Bind { .. }));
    }

    #[tokio::test]
    async fn test_extip_is_advertised() {
        let ext = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 5));
        let config = ListenConfig {
            nat: format!("extip:{}", ext),
            ..loopback_config()
        };
        let handle = listen_udp(&NodeKey::generate(), &config).await.unwrap();

        assert_eq!(handle.self_record().ip, ext);
        assert_eq!(handle.local_addr().ip(), IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn test_unsupported_nat_fails_start() {
        let config = ListenConfig {
            nat: "upnp".to_string(),
            ..loopback_config()
        };
        let err = listen_udp(&NodeKey::generate(), &config).await.unwrap_err();

        assert!(matches!(
            err,
            DiscoveryError::Nat(NatError::Unsupported(ref m)) if m == "upnp"
        ));
    }

    #[tokio::test]
    async fn test_bad_restrict_list_fails_start() {
        let config = ListenConfig {
            restrict: "10.0.0.0/8, 10.0.0.0".to_string(),
            ..loopback_config()
        };
        let err = listen_udp(&NodeKey::generate(), &config).await.unwrap_err();

        assert!(matches!(
            err,
            DiscoveryError::Netlist(NetlistError::InvalidMask(_))
        ));
    }

    #[tokio::test]
    async fn test_restrict_list_filters_pings() {
        let config = ListenConfig {
            restrict: "192.0.2.0/24".to_string(),
            ..loopback_config()
        };
        let handle = listen_udp(&NodeKey::generate(), &config).await.unwrap();

        let peer = NodeKey::generate().public_key();
        let ping = Packet::Ping {
            sender: NodeId::from_public_key(&peer),
            pubkey: peer,
        };
        assert_eq!(exchange(handle.local_addr(), &ping).await, None);
        assert_eq!(handle.peer_count(), 0);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_no_reply_after_shutdown() {
        let handle = listen_udp(&NodeKey::generate(), &loopback_config())
            .await
            .unwrap();
        let target = handle.local_addr();
        handle.shutdown().await;

        let peer = NodeKey::generate().public_key();
        let ping = Packet::Ping {
            sender: NodeId::from_public_key(&peer),
            pubkey: peer,
        };
        assert_eq!(exchange(target, &ping).await, None);
    }
}
