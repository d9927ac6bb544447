use std::fmt;

use crate::error::TransportResult;
use crate::shape::RetainedPacket;

/// Identity of one connected client: its connection plus the sub-client id
/// used for split-screen players sharing a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId {
    pub connection: u64,
    pub sub_id: u8,
}

impl ClientId {
    pub fn new(connection: u64, sub_id: u8) -> Self {
        Self { connection, sub_id }
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.connection, self.sub_id)
    }
}

/// Callback invoked with the client that just finished initialization.
pub type JoinCallback = Box<dyn Fn(ClientId) + Send + Sync>;

/// Network side of the debug drawer, provided by the host.
///
/// Serialization and delivery are owned by the implementation. Sends are
/// fire-and-forget from the caller's point of view: an error is reported
/// back but never retried.
pub trait Transport: Send + Sync {
    /// Send `packet` to every connected client.
    fn send_to_all(&self, packet: &RetainedPacket) -> TransportResult<()>;

    /// Send `packet` to a single client.
    fn send_to(&self, client: ClientId, packet: &RetainedPacket) -> TransportResult<()>;

    /// Register `callback` to run each time a client finishes its
    /// post-connection initialization. Called once at startup.
    fn on_client_initialized(&self, callback: JoinCallback);
}
