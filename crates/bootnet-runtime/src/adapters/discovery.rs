//! UDP discovery listener adapter.

use crate::ports::DiscoveryPort;
use async_trait::async_trait;
use bootnet_crypto::NodeKey;
use bootnet_discovery::{listen_udp, DiscoveryError, ListenConfig, ListenerHandle};

/// [`DiscoveryPort`] backed by [`listen_udp`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpDiscovery;

#[async_trait]
impl DiscoveryPort for UdpDiscovery {
    async fn start(
        &self,
        key: &NodeKey,
        config: &ListenConfig,
    ) -> Result<ListenerHandle, DiscoveryError> {
        listen_udp(key, config).await
    }
}
