//! Change-detecting value cells.
//!
//! Table nodes keep layout values (desired size, reported maximum width,
//! readiness) in a [`Property<T>`] so a write tells the caller whether the
//! value actually changed. That answer is what makes repeated width reports
//! idempotent.
//!
//! # Example
//!
//! ```
//! use lattice_hiertable_core::Property;
//!
//! let width = Property::new(None::<f64>);
//! assert!(width.set(Some(120.0)));
//! assert!(!width.set(Some(120.0)));
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A value cell that reports whether writes change it.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// A cell holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// A copy of the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Borrow the value for the duration of `f`.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Overwrite the value unconditionally.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Store `value`. Returns `false` when it equals what is already stored.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Store `value`, handing back the previous value when they differ.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}
