//! Process-wide observable status, shared by explicit injection.
//!
//! A [`StatusBroadcaster`] keeps the latest [`StatusSnapshot`] and a list of
//! observers per channel. Only the coordinator writes; any number of readers
//! may call [`StatusBroadcaster::snapshot`] or subscribe to a channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use url::Url;

use crate::view_model::StatusSnapshot;

/// Handle returned by the `subscribe_*` methods; pass it to [`StatusBroadcaster::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer<T> = Box<dyn Fn(&T) + Send + Sync>;

struct ObserverList<T> {
    entries: Vec<(SubscriptionId, Observer<T>)>,
}

impl<T> Default for ObserverList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> ObserverList<T> {
    fn notify(&self, value: &T) {
        for (_, observer) in &self.entries {
            observer(value);
        }
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }
}

/// Observers run on the writer's thread while their channel's list is locked,
/// so they must be quick and must not subscribe or unsubscribe themselves.
#[derive(Default)]
pub struct StatusBroadcaster {
    snapshot: RwLock<StatusSnapshot>,
    network_activity: Mutex<ObserverList<bool>>,
    valid: Mutex<ObserverList<bool>>,
    reachable: Mutex<ObserverList<bool>>,
    validated_url: Mutex<ObserverList<Option<Url>>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for StatusBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusBroadcaster")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl StatusBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consistent copy of all channels.
    pub fn snapshot(&self) -> StatusSnapshot {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn network_activity(&self) -> bool {
        self.snapshot().network_activity
    }

    pub fn is_valid_url(&self) -> bool {
        self.snapshot().is_valid_url
    }

    pub fn is_reachable_url(&self) -> bool {
        self.snapshot().is_reachable_url
    }

    pub fn validated_url(&self) -> Option<Url> {
        self.snapshot().validated_url
    }

    pub fn subscribe_network_activity(
        &self,
        observer: impl Fn(&bool) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let observer: Observer<bool> = Box::new(observer);
        self.register(&self.network_activity, observer)
    }

    pub fn subscribe_valid(&self, observer: impl Fn(&bool) + Send + Sync + 'static) -> SubscriptionId {
        let observer: Observer<bool> = Box::new(observer);
        self.register(&self.valid, observer)
    }

    pub fn subscribe_reachable(
        &self,
        observer: impl Fn(&bool) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let observer: Observer<bool> = Box::new(observer);
        self.register(&self.reachable, observer)
    }

    pub fn subscribe_validated_url(
        &self,
        observer: impl Fn(&Option<Url>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let observer: Observer<Option<Url>> = Box::new(observer);
        self.register(&self.validated_url, observer)
    }

    /// Removes an observer from whichever channel holds it. Returns `false` if it was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        lock(&self.network_activity).remove(id)
            || lock(&self.valid).remove(id)
            || lock(&self.reachable).remove(id)
            || lock(&self.validated_url).remove(id)
    }

    /// Stores `next` and notifies observers of every channel whose value changed.
    pub fn publish(&self, next: StatusSnapshot) {
        let previous = {
            let mut guard = self
                .snapshot
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *guard, next.clone())
        };

        if previous.network_activity != next.network_activity {
            lock(&self.network_activity).notify(&next.network_activity);
        }
        if previous.is_valid_url != next.is_valid_url {
            lock(&self.valid).notify(&next.is_valid_url);
        }
        if previous.is_reachable_url != next.is_reachable_url {
            lock(&self.reachable).notify(&next.is_reachable_url);
        }
        if previous.validated_url != next.validated_url {
            lock(&self.validated_url).notify(&next.validated_url);
        }
    }

    /// Back to start-up defaults; observers of changed channels are told.
    pub fn reset(&self) {
        self.publish(StatusSnapshot::default());
    }

    fn register<T>(&self, list: &Mutex<ObserverList<T>>, observer: Observer<T>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(list).entries.push((id, observer));
        id
    }
}

fn lock<T>(list: &Mutex<ObserverList<T>>) -> std::sync::MutexGuard<'_, ObserverList<T>> {
    list.lock().unwrap_or_else(PoisonError::into_inner)
}
