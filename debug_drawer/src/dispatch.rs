use std::sync::mpsc;
use std::sync::Arc;

use crate::error::{TransportError, TransportResult};
use crate::shape::RetainedPacket;
use crate::transport::{ClientId, JoinCallback, Transport};

/// Sends built packets through a [`Transport`].
///
/// Empty packets are never sent. Transport failures are logged and
/// swallowed; callers only learn whether the packet was handed off.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Send `packet` to every connected client.
    ///
    /// Returns `true` if the transport accepted the packet.
    pub fn broadcast(&self, packet: &RetainedPacket) -> bool {
        if packet.is_empty() {
            return false;
        }
        log::trace!("Broadcasting packet with {} shapes", packet.len());
        match self.transport.send_to_all(packet) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Broadcast of {} shapes failed: {e}", packet.len());
                false
            }
        }
    }

    /// Send `packet` to `client` only.
    ///
    /// Returns `true` if the transport accepted the packet.
    pub fn replay_to(&self, client: ClientId, packet: &RetainedPacket) -> bool {
        if packet.is_empty() {
            return false;
        }
        match self.transport.send_to(client, packet) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Replay of {} shapes to client {client} failed: {e}", packet.len());
                false
            }
        }
    }
}

/// A send waiting in a [`DispatchQueue`].
enum QueuedSend {
    All(RetainedPacket),
    One(ClientId, RetainedPacket),
}

/// [`Transport`] decorator that defers every send to the network thread.
///
/// Sends are queued on a channel and performed by [`DispatchQueue::drain`],
/// in submission order. Join callbacks are registered on the inner transport
/// directly.
pub struct QueuedTransport {
    inner: Arc<dyn Transport>,
    sender: mpsc::Sender<QueuedSend>,
}

impl QueuedTransport {
    /// Wrap `inner`, returning the transport to hand to the dispatchers and
    /// the queue to drain on the network thread.
    pub fn new(inner: Arc<dyn Transport>) -> (Self, DispatchQueue) {
        let (sender, receiver) = mpsc::channel();
        let queue = DispatchQueue {
            inner: Arc::clone(&inner),
            receiver,
        };
        (Self { inner, sender }, queue)
    }

    fn enqueue(&self, send: QueuedSend) -> TransportResult<()> {
        self.sender.send(send).map_err(|_| TransportError::Closed)
    }
}

impl Transport for QueuedTransport {
    fn send_to_all(&self, packet: &RetainedPacket) -> TransportResult<()> {
        self.enqueue(QueuedSend::All(packet.clone()))
    }

    fn send_to(&self, client: ClientId, packet: &RetainedPacket) -> TransportResult<()> {
        self.enqueue(QueuedSend::One(client, packet.clone()))
    }

    fn on_client_initialized(&self, callback: JoinCallback) {
        self.inner.on_client_initialized(callback);
    }
}

/// Receiving end of a [`QueuedTransport`]. Owned by the network thread.
pub struct DispatchQueue {
    inner: Arc<dyn Transport>,
    receiver: mpsc::Receiver<QueuedSend>,
}

impl DispatchQueue {
    /// Perform every queued send on the calling thread.
    ///
    /// Returns the number of sends the inner transport accepted.
    pub fn drain(&self) -> usize {
        let mut delivered = 0;
        while let Ok(send) = self.receiver.try_recv() {
            let result = match &send {
                QueuedSend::All(packet) => self.inner.send_to_all(packet),
                QueuedSend::One(client, packet) => self.inner.send_to(*client, packet),
            };
            match result {
                Ok(()) => delivered += 1,
                Err(e) => log::warn!("Queued send failed: {e}"),
            }
        }
        delivered
    }
}
