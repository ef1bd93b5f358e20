use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Outbound queue sender for one connection. Frames are the serialized
/// text handed to the transport pump untouched.
pub type OutboundSender = mpsc::Sender<String>;

/// Capacity of each connection's outbound queue. The relay never blocks on
/// a slow consumer; deliveries that would overflow this are dropped.
pub const OUTBOUND_QUEUE: usize = 256;

struct Connection {
    sender: OutboundSender,
    /// Group bound at join time. At most one; a later join with a
    /// different user id replaces it.
    group: Option<String>,
}

#[derive(Default)]
struct RegistryInner {
    connections: HashMap<Uuid, Connection>,
    groups: HashMap<String, HashSet<Uuid>>,
    connected: usize,
}

/// Tracks every live client connection and its user-group membership.
///
/// Cheap to clone; all clones share the same state. The maps are only
/// touched under the single lock, so admit/join/remove stay atomic with
/// respect to each other and to group resolution.
#[derive(Clone)]
pub struct ConnectionRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner::default())),
        }
    }

    /// Register a new live connection and return its id.
    pub async fn admit(&self, sender: OutboundSender) -> Uuid {
        let id = Uuid::new_v4();
        let mut inner = self.inner.write().await;
        inner.connections.insert(id, Connection { sender, group: None });
        inner.connected += 1;
        info!("Client connected. Total: {}", inner.connected);
        id
    }

    /// Bind the connection to the group `user:<user_id>`.
    ///
    /// The caller is trusted to supply the authenticated user id. Joining
    /// the same group again is a no-op; joining a different group moves
    /// the connection out of its previous one.
    pub async fn join(&self, id: Uuid, user_id: &str) {
        let group = format!("user:{}", user_id);
        let mut inner = self.inner.write().await;

        let previous = match inner.connections.get_mut(&id) {
            Some(conn) => {
                if conn.group.as_deref() == Some(group.as_str()) {
                    return;
                }
                conn.group.replace(group.clone())
            }
            None => {
                warn!("Join for unknown connection {}", id);
                return;
            }
        };

        if let Some(prev) = previous {
            warn!("Connection {} rebinding from {} to {}", id, prev, group);
            Self::leave_group(&mut inner, id, &prev);
        }

        inner.groups.entry(group).or_default().insert(id);
        info!("User {} joined their room", user_id);
    }

    /// The group this connection is bound to, if it has joined.
    pub async fn group_of(&self, id: Uuid) -> Option<String> {
        let inner = self.inner.read().await;
        inner.connections.get(&id).and_then(|c| c.group.clone())
    }

    /// Every other member of the sender's group, with their outbound
    /// senders. Empty when the sender never joined or sits alone.
    pub async fn group_peers(&self, id: Uuid) -> Vec<(Uuid, OutboundSender)> {
        let inner = self.inner.read().await;
        let group = match inner.connections.get(&id).and_then(|c| c.group.as_ref()) {
            Some(group) => group,
            None => return Vec::new(),
        };
        let members = match inner.groups.get(group) {
            Some(members) => members,
            None => return Vec::new(),
        };
        members
            .iter()
            .filter(|member| **member != id)
            .filter_map(|member| {
                inner
                    .connections
                    .get(member)
                    .map(|c| (*member, c.sender.clone()))
            })
            .collect()
    }

    /// Unregister a connection. Idempotent: removing an unknown or
    /// already-removed id never decrements the counter.
    pub async fn remove(&self, id: Uuid) {
        let mut inner = self.inner.write().await;
        let conn = match inner.connections.remove(&id) {
            Some(conn) => conn,
            None => {
                debug!("Remove for unknown connection {}", id);
                return;
            }
        };
        inner.connected -= 1;
        if let Some(group) = conn.group {
            Self::leave_group(&mut inner, id, &group);
        }
        info!("Client disconnected. Total: {}", inner.connected);
    }

    /// Current number of live connections.
    pub async fn live_count(&self) -> usize {
        self.inner.read().await.connected
    }

    /// Current number of non-empty user groups.
    pub async fn group_count(&self) -> usize {
        self.inner.read().await.groups.len()
    }

    fn leave_group(inner: &mut RegistryInner, id: Uuid, group: &str) {
        if let Some(members) = inner.groups.get_mut(group) {
            members.remove(&id);
            if members.is_empty() {
                inner.groups.remove(group);
            }
        }
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outbound() -> (OutboundSender, mpsc::Receiver<String>) {
        mpsc::channel(OUTBOUND_QUEUE)
    }

    #[tokio::test]
    async fn counter_tracks_admits_and_removes() {
        let registry = ConnectionRegistry::new();
        let (tx_a, _rx_a) = outbound();
        let (tx_b, _rx_b) = outbound();

        let a = registry.admit(tx_a).await;
        let b = registry.admit(tx_b).await;
        assert_eq!(registry.live_count().await, 2);

        registry.remove(a).await;
        assert_eq!(registry.live_count().await, 1);
        registry.remove(b).await;
        assert_eq!(registry.live_count().await, 0);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = outbound();
        let id = registry.admit(tx).await;

        registry.remove(id).await;
        registry.remove(id).await;
        assert_eq!(registry.live_count().await, 0);
    }

    #[tokio::test]
    async fn join_binds_the_user_group() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = outbound();
        let id = registry.admit(tx).await;

        assert_eq!(registry.group_of(id).await, None);
        registry.join(id, "42").await;
        assert_eq!(registry.group_of(id).await.as_deref(), Some("user:42"));
        assert_eq!(registry.group_count().await, 1);
    }

    #[tokio::test]
    async fn second_join_replaces_the_binding() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = outbound();
        let id = registry.admit(tx).await;

        registry.join(id, "42").await;
        registry.join(id, "43").await;

        assert_eq!(registry.group_of(id).await.as_deref(), Some("user:43"));
        // The old group must be gone, not left as a stale membership.
        assert_eq!(registry.group_count().await, 1);
    }

    #[tokio::test]
    async fn remove_cleans_up_the_group() {
        let registry = ConnectionRegistry::new();
        let (tx_a, _rx_a) = outbound();
        let (tx_b, _rx_b) = outbound();
        let a = registry.admit(tx_a).await;
        let b = registry.admit(tx_b).await;
        registry.join(a, "42").await;
        registry.join(b, "42").await;

        registry.remove(a).await;
        assert_eq!(registry.group_count().await, 1);
        registry.remove(b).await;
        assert_eq!(registry.group_count().await, 0);
    }

    #[tokio::test]
    async fn group_peers_excludes_the_sender() {
        let registry = ConnectionRegistry::new();
        let (tx_a, _rx_a) = outbound();
        let (tx_b, _rx_b) = outbound();
        let a = registry.admit(tx_a).await;
        let b = registry.admit(tx_b).await;
        registry.join(a, "42").await;
        registry.join(b, "42").await;

        let peers = registry.group_peers(a).await;
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].0, b);
    }
}
