//! Instance-based, type-keyed singleton registry.
//!
//! A [`SingletonRegistry`] stores at most one value per type, keyed by
//! `TypeId` and type-erased as `Arc<dyn Any + Send + Sync>`. Population is
//! write-once: values are either registered eagerly or constructed lazily by
//! the first `get_or_init` caller, and are never replaced or reset.
//!
//! Registries are plain values with an explicit lifecycle. Applications
//! usually hold one in a `static` (see `define_registry!`); tests construct
//! a fresh registry per test instead of sharing hidden global state.
//!
//! # Examples
//!
//! ```
//! use lazy_singleton_registry::SingletonRegistry;
//! use std::sync::Arc;
//!
//! let registry = SingletonRegistry::new();
//!
//! // Register a value
//! registry.register("Hello, World!".to_string()).unwrap();
//!
//! // Retrieve the value
//! let message: Arc<String> = registry.get().unwrap();
//! assert_eq!(&*message, "Hello, World!");
//! ```

use std::{
    any::{Any, TypeId},
    collections::hash_map::Entry,
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, RwLock},
};

use tracing::{debug, warn};

use crate::{RegistryError, RegistryEvent};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `RegistryEvent` every time the
/// registry is interacted with. It must be thread-safe because the registry
/// itself is shared across threads.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

/// Thread-safe registry of per-type singletons.
///
/// Reads take the storage's read lock; only the first population of a type
/// takes the write lock. All concurrent first callers of `get_or_init`
/// receive clones of the same `Arc<T>`.
pub struct SingletonRegistry {
    storage: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    trace: Mutex<Option<Arc<TraceCallback>>>,
}

impl SingletonRegistry {
    /// Creates an empty registry.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_singleton_registry::SingletonRegistry;
    ///
    /// let registry = SingletonRegistry::new();
    /// assert!(!registry.contains::<i32>());
    /// ```
    pub fn new() -> Self {
        Self {
            storage: RwLock::new(HashMap::new()),
            trace: Mutex::new(None),
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Tracing
    // ---------------------------------------------------------------------------------------------

    /// Sets a tracing callback that will be invoked on every registry
    /// interaction.
    ///
    /// The callback must NOT call methods on the same registry; it runs
    /// while the trace lock is held and re-entry deadlocks. Using a
    /// different registry from the callback is fine.
    ///
    /// # Example
    /// ```rust
    /// use lazy_singleton_registry::SingletonRegistry;
    ///
    /// let registry = SingletonRegistry::new();
    /// registry.set_trace_callback(|event| println!("[registry-trace] {}", event));
    /// ```
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clears the tracing callback (disables registry tracing).
    pub fn clear_trace_callback(&self) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    /// Convenience wrapper to emit a registry event using the current callback.
    fn emit_event(&self, event: &RegistryEvent) {
        // lock poisoning unlikely; if poisoned, keep emitting with recovered lock
        let guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(callback) = guard.as_ref() {
            callback(event);
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Registry
    // ---------------------------------------------------------------------------------------------

    /// Registers an `Arc<T>` in the registry.
    ///
    /// More efficient than [`register`](Self::register) when you already
    /// have an `Arc`, as it avoids creating an additional reference count.
    ///
    /// Registration is write-once: the first value stored for `T` is the
    /// singleton for the registry's whole lifetime.
    ///
    /// # Errors
    ///
    /// - `AlreadyInitialized` if a value of type `T` is already populated
    pub fn register_arc<T: Send + Sync + 'static>(&self, value: Arc<T>) -> Result<(), RegistryError> {
        let type_name = std::any::type_name::<T>();

        let rejected = {
            let mut map = self.storage.write().unwrap_or_else(|p| p.into_inner());
            match map.entry(TypeId::of::<T>()) {
                Entry::Occupied(_) => true,
                Entry::Vacant(slot) => {
                    slot.insert(value);
                    false
                }
            }
        };

        if rejected {
            warn!(type_name, "duplicate registration rejected");
            self.emit_event(&RegistryEvent::BypassRejected { type_name });
            return Err(RegistryError::AlreadyInitialized { type_name });
        }

        debug!(type_name, "value registered");
        self.emit_event(&RegistryEvent::Register { type_name });
        Ok(())
    }

    /// Registers a value of type `T` in the registry.
    ///
    /// This is a convenience wrapper around [`register_arc`](Self::register_arc)
    /// that takes ownership of the value and wraps it in an `Arc` automatically.
    ///
    /// # Errors
    ///
    /// - `AlreadyInitialized` if a value of type `T` is already populated
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_singleton_registry::{RegistryError, SingletonRegistry};
    ///
    /// let registry = SingletonRegistry::new();
    ///
    /// registry.register(42i32).unwrap();
    ///
    /// // A singleton is never replaced; the second registration is rejected.
    /// let second = registry.register(7i32);
    /// assert!(matches!(second, Err(RegistryError::AlreadyInitialized { .. })));
    ///
    /// let num: std::sync::Arc<i32> = registry.get().unwrap();
    /// assert_eq!(*num, 42);
    /// ```
    pub fn register<T: Send + Sync + 'static>(&self, value: T) -> Result<(), RegistryError> {
        self.register_arc::<T>(Arc::new(value))
    }

    /// Retrieves a value of type `T` from the registry.
    ///
    /// # Errors
    ///
    /// - `TypeNotFound` if type `T` was never populated
    /// - `TypeMismatch` if the stored value does not downcast to `T`
    ///   (extremely rare)
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_singleton_registry::SingletonRegistry;
    /// use std::sync::Arc;
    ///
    /// let registry = SingletonRegistry::new();
    /// registry.register(42i32).unwrap();
    ///
    /// let num: Arc<i32> = registry.get().expect("Failed to get i32");
    /// assert_eq!(*num, 42);
    ///
    /// // Handle missing value
    /// let result: Result<Arc<String>, _> = registry.get();
    /// assert!(result.is_err());
    /// ```
    pub fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, RegistryError> {
        let type_name = std::any::type_name::<T>();

        let map = self.storage.read().unwrap_or_else(|p| p.into_inner());
        let any_arc_opt = map.get(&TypeId::of::<T>()).cloned();
        drop(map);

        let result: Result<Arc<T>, RegistryError> = match any_arc_opt {
            Some(any_arc) => any_arc
                .downcast::<T>()
                .map_err(|_| RegistryError::TypeMismatch { type_name }),
            None => Err(RegistryError::TypeNotFound { type_name }),
        };

        self.emit_event(&RegistryEvent::Get {
            type_name,
            found: result.is_ok(),
        });

        result
    }

    /// Retrieves a clone of the value stored in the registry for the given type.
    ///
    /// This returns an owned value by cloning the value stored in the
    /// registry. The type `T` must implement `Clone`. Useful if you need to
    /// own the value rather than share it via `Arc<T>`.
    ///
    /// # Errors
    ///
    /// - `TypeNotFound` if type `T` was never populated
    /// - `TypeMismatch` if the stored value does not downcast to `T`
    ///
    /// # Examples
    /// ```
    /// use lazy_singleton_registry::SingletonRegistry;
    ///
    /// let registry = SingletonRegistry::new();
    /// registry.register("hello".to_string()).unwrap();
    ///
    /// let value: String = registry.get_cloned::<String>().expect("Value should be present");
    /// assert_eq!(value, "hello");
    /// ```
    pub fn get_cloned<T: Send + Sync + Clone + 'static>(&self) -> Result<T, RegistryError> {
        let arc = self.get::<T>()?;
        Ok((*arc).clone())
    }

    /// Checks whether a value of type `T` is populated in the registry.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_singleton_registry::SingletonRegistry;
    ///
    /// let registry = SingletonRegistry::new();
    /// assert!(!registry.contains::<i32>());
    ///
    /// registry.register(42i32).unwrap();
    /// assert!(registry.contains::<i32>());
    /// ```
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        let type_name = std::any::type_name::<T>();

        let found = self
            .storage
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .contains_key(&TypeId::of::<T>());

        self.emit_event(&RegistryEvent::Contains { type_name, found });

        found
    }

    /// Retrieves the singleton for `T`, constructing it on first access.
    ///
    /// The population is double-checked: the type is probed under the read
    /// lock first, so warm calls never contend with writers; on a miss the
    /// write lock is taken, the probe repeated, and `init` runs exactly once
    /// across any number of concurrent callers. Every caller receives a
    /// clone of the same `Arc<T>`.
    ///
    /// `init` runs while the registry's write lock is held, so first
    /// populations of distinct types serialize behind it and `init` must
    /// not touch the same registry. Put genuinely slow constructions in a
    /// dedicated [`LazySingleton`](crate::LazySingleton) cell instead.
    ///
    /// # Errors
    ///
    /// - `TypeMismatch` if an existing value does not downcast to `T`
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_singleton_registry::SingletonRegistry;
    /// use std::sync::Arc;
    ///
    /// let registry = SingletonRegistry::new();
    ///
    /// let first: Arc<String> = registry
    ///     .get_or_init(|| "expensive resource".to_string())
    ///     .unwrap();
    ///
    /// // Already populated: the initializer does not run again.
    /// let second: Arc<String> = registry.get_or_init(|| unreachable!()).unwrap();
    /// assert!(Arc::ptr_eq(&first, &second));
    /// ```
    pub fn get_or_init<T, F>(&self, init: F) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        self.get_or_try_init(|| Ok::<T, std::convert::Infallible>(init()))
    }

    /// Retrieves the singleton for `T`, attempting construction on first
    /// access.
    ///
    /// Same double-checked algorithm as [`get_or_init`](Self::get_or_init).
    /// An `Err` from `init` is returned to the triggering caller wrapped in
    /// `ConstructionFailed`; the registry keeps no entry for `T`, so a later
    /// call may retry.
    ///
    /// # Errors
    ///
    /// - `ConstructionFailed` if `init` returned an error
    /// - `TypeMismatch` if an existing value does not downcast to `T`
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_singleton_registry::SingletonRegistry;
    ///
    /// let registry = SingletonRegistry::new();
    ///
    /// let failed = registry.get_or_try_init(|| Err::<u32, _>("backend offline"));
    /// assert!(failed.is_err());
    /// assert!(!registry.contains::<u32>());
    ///
    /// // The failure left no entry behind, so construction can be retried.
    /// let value = registry.get_or_try_init(|| Ok::<_, String>(7u32)).unwrap();
    /// assert_eq!(*value, 7);
    /// ```
    pub fn get_or_try_init<T, E, F>(&self, init: F) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
        E: fmt::Display,
        F: FnOnce() -> Result<T, E>,
    {
        let type_name = std::any::type_name::<T>();

        // Warm path: probe under the read lock only.
        {
            let map = self.storage.read().unwrap_or_else(|p| p.into_inner());
            let hit = map.get(&TypeId::of::<T>()).cloned();
            drop(map);

            if let Some(any_arc) = hit {
                let result = any_arc
                    .downcast::<T>()
                    .map_err(|_| RegistryError::TypeMismatch { type_name });
                self.emit_event(&RegistryEvent::Get {
                    type_name,
                    found: result.is_ok(),
                });
                return result;
            }
        }

        let mut map = self.storage.write().unwrap_or_else(|p| p.into_inner());

        // Re-check under the write lock: another thread may have populated
        // the type between our probe and the lock acquisition.
        if let Some(any_arc) = map.get(&TypeId::of::<T>()).cloned() {
            drop(map);
            let result = any_arc
                .downcast::<T>()
                .map_err(|_| RegistryError::TypeMismatch { type_name });
            self.emit_event(&RegistryEvent::Get {
                type_name,
                found: result.is_ok(),
            });
            return result;
        }

        match init() {
            Ok(value) => {
                let arc = Arc::new(value);
                map.insert(TypeId::of::<T>(), arc.clone());
                drop(map);

                debug!(type_name, "singleton initialized");
                self.emit_event(&RegistryEvent::Initialized { type_name });
                Ok(arc)
            }
            Err(source) => {
                drop(map);

                let reason = source.to_string();
                warn!(type_name, %reason, "singleton construction failed");
                self.emit_event(&RegistryEvent::ConstructionFailed { type_name });
                Err(RegistryError::ConstructionFailed { type_name, reason })
            }
        }
    }

    /// Rejects construction of `T` once its singleton is populated.
    ///
    /// Call this at the top of a guarded type's constructor so that direct
    /// instantiation fails after the singleton exists. See
    /// [`LazySingleton::guard_construction`](crate::LazySingleton::guard_construction)
    /// for the cell-level form.
    ///
    /// # Known limitation
    ///
    /// A constructor racing the very first `get_or_init` can pass this check
    /// before the singleton is populated and yield a second instance. The
    /// guard closes that door from the first population onward only; where
    /// the inaugural window is unacceptable, use a pre-allocated singleton
    /// (`define_eager_singleton!`).
    ///
    /// # Errors
    ///
    /// - `AlreadyInitialized` if a value of type `T` is already populated
    pub fn guard_construction<T: Send + Sync + 'static>(&self) -> Result<(), RegistryError> {
        let type_name = std::any::type_name::<T>();

        let populated = self
            .storage
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .contains_key(&TypeId::of::<T>());

        if populated {
            warn!(type_name, "bypass construction rejected");
            self.emit_event(&RegistryEvent::BypassRejected { type_name });
            Err(RegistryError::AlreadyInitialized { type_name })
        } else {
            Ok(())
        }
    }
}

impl Default for SingletonRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SingletonRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let populated_types = self
            .storage
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .len();
        f.debug_struct("SingletonRegistry")
            .field("populated_types", &populated_types)
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
