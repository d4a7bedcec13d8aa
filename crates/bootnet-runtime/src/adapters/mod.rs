//! # Adapter Implementations
//!
//! Production implementations of the [`crate::ports`] traits.
//!
//! | Port | Adapter | Backed by |
//! |------|---------|-----------|
//! | `DiscoveryPort` | `UdpDiscovery` | `bootnet_discovery::listen_udp` |
//! | `AccountStore` | `Web3Keystore` | `bootnet_crypto::store_key` |

pub mod discovery;
pub mod keystore;

pub use discovery::UdpDiscovery;
pub use keystore::Web3Keystore;
