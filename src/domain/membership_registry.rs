//! Concurrent group ↔ connection membership relation.
//!
//! [`MembershipRegistry`] stores both directions of the relation (group →
//! members, connection → groups) behind one [`tokio::sync::RwLock`]. Every
//! operation takes the lock once, so each call is linearizable and the two
//! maps are never observed half-updated.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use super::{ConnectionId, GroupId};

/// Both directions of the membership relation.
///
/// Invariant: `c ∈ groups[g]` iff `g ∈ connections[c]`. Empty sets are
/// removed, so a key is present only while it has at least one entry.
#[derive(Debug, Default)]
struct Memberships {
    groups: HashMap<GroupId, HashSet<ConnectionId>>,
    connections: HashMap<ConnectionId, HashSet<GroupId>>,
}

/// Sole owner of group membership state.
///
/// Groups exist implicitly while they have at least one member; connections
/// are registered implicitly on their first join.
///
/// # Concurrency
///
/// - Snapshots ([`members_excluding`](Self::members_excluding),
///   [`groups_of`](Self::groups_of)) share the read lock.
/// - Mutations are serialized on the write lock.
/// - No lock is held after a method returns; callers work on owned copies.
#[derive(Debug, Default)]
pub struct MembershipRegistry {
    inner: RwLock<Memberships>,
}

impl MembershipRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `connection` to `group`. Joining twice is a no-op.
    ///
    /// Returns `true` if the membership was newly created.
    pub async fn join(&self, connection: ConnectionId, group: &GroupId) -> bool {
        let mut state = self.inner.write().await;
        let added = state
            .groups
            .entry(group.clone())
            .or_default()
            .insert(connection);
        state
            .connections
            .entry(connection)
            .or_default()
            .insert(group.clone());
        added
    }

    /// Removes `connection` from `group`. Leaving a group that was never
    /// joined is a no-op.
    ///
    /// Returns `true` if a membership was removed.
    pub async fn leave(&self, connection: ConnectionId, group: &GroupId) -> bool {
        let mut state = self.inner.write().await;
        let removed = remove_member(&mut state.groups, group, connection);
        if let Some(groups) = state.connections.get_mut(&connection) {
            groups.remove(group);
            if groups.is_empty() {
                state.connections.remove(&connection);
            }
        }
        removed
    }

    /// Removes `connection` from every group it belongs to.
    ///
    /// Safe to call for a connection with no memberships. Returns the groups
    /// the connection was removed from.
    pub async fn disconnect(&self, connection: ConnectionId) -> Vec<GroupId> {
        let mut state = self.inner.write().await;
        let Some(groups) = state.connections.remove(&connection) else {
            return Vec::new();
        };
        let mut left = Vec::with_capacity(groups.len());
        for group in groups {
            remove_member(&mut state.groups, &group, connection);
            left.push(group);
        }
        left
    }

    /// Returns a snapshot of `group`'s members other than `excluded`.
    ///
    /// An unknown or empty group yields an empty set.
    pub async fn members_excluding(
        &self,
        group: &GroupId,
        excluded: ConnectionId,
    ) -> HashSet<ConnectionId> {
        let state = self.inner.read().await;
        state
            .groups
            .get(group)
            .map(|members| {
                members
                    .iter()
                    .copied()
                    .filter(|member| *member != excluded)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns a snapshot of the groups `connection` belongs to.
    pub async fn groups_of(&self, connection: ConnectionId) -> HashSet<GroupId> {
        let state = self.inner.read().await;
        state
            .connections
            .get(&connection)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the number of groups with at least one member.
    pub async fn group_count(&self) -> usize {
        self.inner.read().await.groups.len()
    }

    /// Returns the number of connections with at least one membership.
    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.connections.len()
    }
}

/// Removes `connection` from `group`'s member set, dropping the set once empty.
fn remove_member(
    groups: &mut HashMap<GroupId, HashSet<ConnectionId>>,
    group: &GroupId,
    connection: ConnectionId,
) -> bool {
    let Some(members) = groups.get_mut(group) else {
        return false;
    };
    let removed = members.remove(&connection);
    if members.is_empty() {
        groups.remove(group);
    }
    removed
}
