//! Participant registry
//!
//! The single source of truth for who is connected. Membership is the only
//! liveness signal: a participant receives broadcasts exactly while it is
//! present here.
//!
//! Reads (`for_each`) share the lock; `add`/`remove` take it exclusively.
//! Broadcast is the hot path, connect/disconnect are rare.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::participant::Participant;
use crate::types::ParticipantId;

/// Concurrent ParticipantId → Participant map
#[derive(Debug, Default)]
pub struct Registry {
    participants: RwLock<HashMap<ParticipantId, Participant>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant
    ///
    /// Returns the entry previously stored under the same id, if any.
    pub async fn add(&self, participant: Participant) -> Option<Participant> {
        let mut participants = self.participants.write().await;
        let id = participant.id;
        let name = participant.display_name.clone();
        let previous = participants.insert(id, participant);

        debug!(participant = %id, name = %name, "Participant registered");
        debug!(total = participants.len(), "Registry size");
        previous
    }

    /// Unregister a participant
    ///
    /// Returns None if it was not (or is no longer) registered, so concurrent
    /// callers for the same id see exactly one successful removal.
    pub async fn remove(&self, id: &ParticipantId) -> Option<Participant> {
        let mut participants = self.participants.write().await;
        let removed = participants.remove(id)?;

        debug!(participant = %id, name = %removed.display_name, "Participant unregistered");
        debug!(total = participants.len(), "Registry size");
        Some(removed)
    }

    /// Visit every registered participant except `exclude`
    ///
    /// Runs under the shared lock, so `f` sees a consistent snapshot and must
    /// not block.
    pub async fn for_each<F>(&self, mut f: F, exclude: Option<&ParticipantId>)
    where
        F: FnMut(&Participant),
    {
        let participants = self.participants.read().await;
        for participant in participants.values() {
            if Some(&participant.id) != exclude {
                f(participant);
            }
        }
    }

    /// Number of registered participants
    pub async fn len(&self) -> usize {
        self.participants.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.participants.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn participant(port: u16, name: &str) -> Participant {
        let (tx, _rx) = mpsc::channel(1);
        let id = ParticipantId::new(format!("127.0.0.1:{}", port).parse().unwrap());
        Participant::new(id, name.to_string(), tx)
    }

    async fn names(registry: &Registry, exclude: Option<&ParticipantId>) -> Vec<String> {
        let mut names = Vec::new();
        registry
            .for_each(|p| names.push(p.display_name.clone()), exclude)
            .await;
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_add_and_remove() {
        let registry = Registry::new();
        let alice = participant(6000, "alice");
        let id = alice.id;

        assert!(registry.add(alice).await.is_none());
        assert_eq!(registry.len().await, 1);

        let removed = registry.remove(&id).await.unwrap();
        assert_eq!(removed.display_name, "alice");
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_only_once() {
        let registry = Registry::new();
        let alice = participant(6001, "alice");
        let id = alice.id;
        registry.add(alice).await;

        assert!(registry.remove(&id).await.is_some());
        assert!(registry.remove(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_for_each_excludes() {
        let registry = Registry::new();
        let alice = participant(6002, "alice");
        let alice_id = alice.id;
        registry.add(alice).await;
        registry.add(participant(6003, "bob")).await;
        registry.add(participant(6004, "carol")).await;

        assert_eq!(names(&registry, None).await, vec!["alice", "bob", "carol"]);
        assert_eq!(names(&registry, Some(&alice_id)).await, vec!["bob", "carol"]);
    }

    #[tokio::test]
    async fn test_duplicate_names_allowed() {
        let registry = Registry::new();
        registry.add(participant(6005, "sam")).await;
        registry.add(participant(6006, "sam")).await;

        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_removal_single_winner() {
        let registry = Arc::new(Registry::new());
        let alice = participant(6007, "alice");
        let id = alice.id;
        registry.add(alice).await;

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.remove(&id).await.is_some() })
            })
            .collect();

        let mut winners = 0;
        for task in tasks {
            if task.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds() {
        let registry = Arc::new(Registry::new());

        let tasks: Vec<_> = (0..50u16)
            .map(|i| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    registry.add(participant(7000 + i, &format!("user{}", i))).await;
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(registry.len().await, 50);
        let seen = names(&registry, None).await;
        for i in 0..50 {
            assert!(seen.contains(&format!("user{}", i)));
        }
    }
}
