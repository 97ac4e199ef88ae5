//! Lazily initialized singleton cell.
//!
//! [`LazySingleton`] holds at most one value of `T`, constructed on first
//! access. Reads after the first construction are lock-free: a populated
//! flag is checked before the lock is ever touched, the mutex serializes
//! only the first construction, and the flag's Release store publishes the
//! finished value to all threads.

use std::cell::UnsafeCell;
use std::convert::Infallible;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::RegistryError;

/// A thread-safe cell holding a lazily constructed singleton value.
///
/// The cell starts empty and is populated at most once. It never resets:
/// once a value is stored it lives as long as the cell does, and every
/// reader observes the same instance.
///
/// `new` is `const`, so the cell can back a `static`:
///
/// ```rust
/// use lazy_singleton_registry::LazySingleton;
///
/// static CONFIG: LazySingleton<String> = LazySingleton::new();
///
/// let value = CONFIG.get_or_init(|| "max_connections=100".to_string());
/// assert_eq!(value, "max_connections=100");
/// assert!(CONFIG.is_initialized());
/// ```
pub struct LazySingleton<T> {
    /// Set with Release ordering after the slot is written; checked with
    /// Acquire ordering before the slot is read.
    populated: AtomicBool,
    /// Serializes first construction. Never taken again once `populated`
    /// is observed true.
    init_lock: Mutex<()>,
    slot: UnsafeCell<Option<T>>,
}

// SAFETY: the slot is written exactly once, under `init_lock`, strictly
// before the Release store to `populated`; every shared read is gated on an
// Acquire load of the same flag. A thread can therefore never observe a
// half-written value, and after population the slot is read-only.
unsafe impl<T: Send + Sync> Sync for LazySingleton<T> {}

// SAFETY: moving the cell moves the owned `T` (if any) with it.
unsafe impl<T: Send> Send for LazySingleton<T> {}

impl<T> LazySingleton<T> {
    /// Creates an empty cell.
    pub const fn new() -> Self {
        Self {
            populated: AtomicBool::new(false),
            init_lock: Mutex::new(()),
            slot: UnsafeCell::new(None),
        }
    }

    /// Returns the value if the cell is populated. Never blocks; returns
    /// `None` while an initializer is still running.
    pub fn get(&self) -> Option<&T> {
        if self.populated.load(Ordering::Acquire) {
            // SAFETY: `populated` is set only after the slot is written, and
            // the slot is never written again, so this shared read cannot
            // alias a mutation.
            unsafe { (*self.slot.get()).as_ref() }
        } else {
            None
        }
    }

    /// Whether the cell has been populated. Never blocks.
    pub fn is_initialized(&self) -> bool {
        self.populated.load(Ordering::Acquire)
    }

    /// Returns the value, constructing it on first call.
    ///
    /// Concurrent first callers race to the lock; exactly one runs `init`,
    /// the rest block until the value is published and then share it. Once
    /// the cell is warm this is a single atomic load.
    ///
    /// # Deadlocks
    ///
    /// `init` must not access the same cell; the initializing thread holds
    /// the construction lock while it runs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_singleton_registry::LazySingleton;
    ///
    /// let cell = LazySingleton::new();
    /// let first = cell.get_or_init(|| "expensive".to_string());
    /// let second = cell.get_or_init(|| unreachable!());
    /// assert!(std::ptr::eq(first, second));
    /// ```
    pub fn get_or_init<F>(&self, init: F) -> &T
    where
        F: FnOnce() -> T,
    {
        match self.get_or_try_init(|| Ok::<T, Infallible>(init())) {
            Ok(value) => value,
            Err(infallible) => match infallible {},
        }
    }

    /// Returns the value, attempting construction on first call.
    ///
    /// An `Err` from `init` is returned to the triggering caller and leaves
    /// the cell empty; a later call may retry. Same for a panicking `init`:
    /// nothing is stored and the cell stays usable.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_singleton_registry::LazySingleton;
    ///
    /// let cell: LazySingleton<u32> = LazySingleton::new();
    ///
    /// let failed = cell.get_or_try_init(|| Err::<u32, _>("backend offline"));
    /// assert_eq!(failed, Err("backend offline"));
    /// assert!(!cell.is_initialized());
    ///
    /// // The failure left the cell empty, so construction can be retried.
    /// let value = cell.get_or_try_init(|| Ok::<_, &str>(7)).unwrap();
    /// assert_eq!(*value, 7);
    /// ```
    pub fn get_or_try_init<F, E>(&self, init: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.get() {
            return Ok(value);
        }
        self.try_populate(init)
    }

    #[cold]
    fn try_populate<F, E>(&self, init: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        // A panicked initializer poisons the lock but writes nothing, so
        // recovering the lock keeps the cell usable for the next attempt.
        let _guard = self.init_lock.lock().unwrap_or_else(|p| p.into_inner());

        // Re-check under the lock: another thread may have populated the
        // cell between our fast-path check and the lock acquisition.
        if !self.populated.load(Ordering::Acquire) {
            let value = init()?;
            // SAFETY: `init_lock` is held and `populated` is still false, so
            // no reference into the slot exists and no other writer can race.
            unsafe { *self.slot.get() = Some(value) };
            self.populated.store(true, Ordering::Release);
        }

        // SAFETY: `populated` is true here and the slot is never emptied for
        // the cell's lifetime.
        Ok(unsafe { (*self.slot.get()).as_ref().unwrap_unchecked() })
    }

    /// Populates the cell with an already-built value.
    ///
    /// Returns the value back in `Err` if the cell is already populated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_singleton_registry::LazySingleton;
    ///
    /// let cell = LazySingleton::new();
    /// assert_eq!(cell.set(1u8), Ok(()));
    /// assert_eq!(cell.set(2u8), Err(2));
    /// assert_eq!(cell.get(), Some(&1));
    /// ```
    pub fn set(&self, value: T) -> Result<(), T> {
        if self.populated.load(Ordering::Acquire) {
            return Err(value);
        }

        let _guard = self.init_lock.lock().unwrap_or_else(|p| p.into_inner());
        if self.populated.load(Ordering::Acquire) {
            return Err(value);
        }

        // SAFETY: lock held, cell still empty; same reasoning as in
        // `try_populate`.
        unsafe { *self.slot.get() = Some(value) };
        self.populated.store(true, Ordering::Release);
        Ok(())
    }

    /// Rejects construction once the cell is populated.
    ///
    /// Call this at the top of a guarded type's constructor so that direct
    /// instantiation fails after the singleton exists:
    ///
    /// ```rust
    /// use lazy_singleton_registry::{LazySingleton, RegistryError};
    ///
    /// static HOLDER: LazySingleton<Service> = LazySingleton::new();
    ///
    /// struct Service;
    ///
    /// impl Service {
    ///     fn new() -> Result<Self, RegistryError> {
    ///         HOLDER.guard_construction()?;
    ///         Ok(Service)
    ///     }
    /// }
    ///
    /// let _singleton = HOLDER.get_or_try_init(Service::new).unwrap();
    /// assert!(Service::new().is_err());
    /// ```
    ///
    /// # Known limitation
    ///
    /// A constructor racing the very first `get_or_init` can pass this check
    /// before the cell is populated and yield a second instance. The guard
    /// closes that door from the first population onward only. Where the
    /// inaugural window is unacceptable, use a pre-allocated singleton
    /// (`define_eager_singleton!`), which has no construction window at all.
    pub fn guard_construction(&self) -> Result<(), RegistryError> {
        if self.is_initialized() {
            Err(RegistryError::already_initialized::<T>())
        } else {
            Ok(())
        }
    }

    /// Consumes the cell and returns the value, if any.
    pub fn into_inner(self) -> Option<T> {
        self.slot.into_inner()
    }
}

impl<T> Default for LazySingleton<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for LazySingleton<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => f.debug_tuple("LazySingleton").field(value).finish(),
            None => f.write_str("LazySingleton(<empty>)"),
        }
    }
}
