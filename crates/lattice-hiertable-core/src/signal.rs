//! Signal/slot notifications for hierarchical tables.
//!
//! A [`Signal<Args>`] lets observers (selection sync, drag targets, the host
//! frame manager) watch the table hierarchy without the hierarchy knowing
//! about them. All invocation is direct: the hierarchy runs on a single
//! logical thread and every slot completes before `emit` returns.
//!
//! # Re-entrancy
//!
//! Slots are snapshotted before they are invoked, so a slot may connect or
//! disconnect on the same signal (or emit it again) without deadlocking.
//! Connections made during an emission are first invoked by the next one.
//!
//! # Example
//!
//! ```
//! use lattice_hiertable_core::Signal;
//!
//! let rebuilt = Signal::<usize>::new();
//! let id = rebuilt.connect(|count| println!("{count} tables"));
//! rebuilt.emit(3);
//! rebuilt.disconnect(id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Handle to one observer of a [`Signal`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A notification with any number of observers.
///
/// `Args` is handed to each observer by reference; `()` works for
/// notifications that carry nothing.
pub struct Signal<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// A signal nobody observes yet.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Add an observer. Keep the returned id to remove it again.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.slots.lock().insert(Arc::new(slot))
    }

    /// Add an observer that stays connected for as long as the guard lives.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<'_, Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        ConnectionGuard {
            id: self.connect(slot),
            signal: self,
        }
    }

    /// Remove one observer. Returns `false` if it was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    /// Remove every observer.
    pub fn disconnect_all(&self) {
        self.slots.lock().clear();
    }

    /// Number of observers.
    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Suppress (or resume) delivery. A blocked signal drops what it emits.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::Relaxed);
    }

    /// Whether delivery is suppressed.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::Relaxed)
    }

    /// Deliver `args` to every observer in the order they connected.
    ///
    /// Returns how many observers ran.
    pub fn emit(&self, args: Args) -> usize {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "blocked, dropping emission");
            return 0;
        }

        let snapshot: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, observers = snapshot.len(), "emit");

        for slot in &snapshot {
            slot(&args);
        }
        snapshot.len()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("observers", &self.slots.lock().len())
            .field("blocked", &self.blocked.load(Ordering::Relaxed))
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<usize>: Send, Sync);

/// Disconnects its observer when dropped. See [`Signal::connect_scoped`].
///
/// ```
/// use lattice_hiertable_core::Signal;
/// use std::sync::Arc;
/// use parking_lot::Mutex;
///
/// let resize_requested = Signal::<f64>::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// {
///     let seen = seen.clone();
///     let _guard = resize_requested.connect_scoped(move |&w| seen.lock().push(w));
///     resize_requested.emit(480.0);
/// }
/// resize_requested.emit(520.0);
/// assert_eq!(*seen.lock(), vec![480.0]);
/// ```
pub struct ConnectionGuard<'a, Args: 'static> {
    signal: &'a Signal<Args>,
    id: ConnectionId,
}

impl<Args: 'static> ConnectionGuard<'_, Args> {
    /// The guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args: 'static> Drop for ConnectionGuard<'_, Args> {
    fn drop(&mut self) {
        self.signal.disconnect(self.id);
    }
}

impl<Args: 'static> std::fmt::Debug for ConnectionGuard<'_, Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGuard").field("id", &self.id).finish()
    }
}
