use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};
use uuid::Uuid;

use super::registry::ConnectionRegistry;

/// Fan a serialized frame out to every other member of the sender's group.
///
/// The frame is forwarded verbatim, so recipients see exactly the bytes
/// the sender emitted. Delivery is fire-and-forget: a sender that never
/// joined has no group and the frame is dropped without error, and a
/// failed delivery to one peer never aborts delivery to the rest.
///
/// Returns the number of peers the frame was handed to.
pub async fn relay(registry: &ConnectionRegistry, sender_id: Uuid, frame: String) -> usize {
    let peers = registry.group_peers(sender_id).await;
    if peers.is_empty() {
        debug!("Dropping event from {}: no group members to relay to", sender_id);
        return 0;
    }

    let mut delivered = 0;
    for (peer_id, tx) in peers {
        match tx.try_send(frame.clone()) {
            Ok(()) => delivered += 1,
            Err(TrySendError::Full(_)) => {
                warn!("Outbound queue full for connection {}, dropping frame", peer_id);
            }
            Err(TrySendError::Closed(_)) => {
                // Peer disconnected between resolution and delivery.
                debug!("Connection {} already closed, skipping delivery", peer_id);
            }
        }
    }
    delivered
}
