//! Macros for declaring singleton registries and named singletons.
//!
//! `define_registry!` declares a named, isolated [`SingletonRegistry`]
//! wrapped in ergonomic free functions. The three singleton macros declare a
//! single named instance each: lazily constructed (`define_singleton!`),
//! lazily constructed with a fallible initializer (`define_try_singleton!`),
//! or pre-allocated at process start (`define_eager_singleton!`).
//!
//! [`SingletonRegistry`]: crate::SingletonRegistry

/// Creates a complete singleton registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - A registry instance behind a `LazyLock` (hidden)
/// - Free functions delegating to it
/// - A `registry()` accessor exposing the instance itself
///
/// # Examples
///
/// ```rust
/// use lazy_singleton_registry::define_registry;
/// use std::sync::Arc;
///
/// // Create a global registry
/// define_registry!(global);
///
/// // Register values (ergonomic free functions)
/// global::register(42i32).unwrap();
/// global::register("Hello".to_string()).unwrap();
///
/// // Retrieve values
/// let num: Arc<i32> = global::get().unwrap();
/// let msg: Arc<String> = global::get().unwrap();
///
/// assert_eq!(*num, 42);
/// assert_eq!(&**msg, "Hello");
/// ```
///
/// # Lazy Construction
///
/// The first `get_or_init` caller constructs the singleton; everyone else
/// shares it:
///
/// ```rust
/// use lazy_singleton_registry::define_registry;
/// use std::sync::Arc;
///
/// define_registry!(services);
///
/// let pool: Arc<String> = services::get_or_init(|| "pool-of-10".to_string()).unwrap();
/// let again: Arc<String> = services::get_or_init(|| unreachable!()).unwrap();
/// assert!(Arc::ptr_eq(&pool, &again));
/// ```
///
/// # Write-Once Semantics
///
/// A populated type is never replaced:
///
/// ```rust
/// use lazy_singleton_registry::define_registry;
///
/// define_registry!(config);
///
/// config::register(1u8).unwrap();
/// assert!(config::register(2u8).is_err());
/// ```
///
/// # Multiple Registries
///
/// You can create multiple isolated registries:
///
/// ```rust
/// use lazy_singleton_registry::define_registry;
///
/// define_registry!(database);
/// define_registry!(cache);
///
/// // Each registry is completely isolated
/// database::register("db_connection".to_string()).unwrap();
/// cache::register("redis_connection".to_string()).unwrap();
///
/// assert!(database::get::<String>().is_ok());
/// assert!(cache::get::<String>().is_ok());
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        pub mod $name {
            use std::sync::{Arc, LazyLock};

            // Registry instance (module-private)
            static REGISTRY: LazyLock<$crate::SingletonRegistry> =
                LazyLock::new($crate::SingletonRegistry::new);

            /// Access the underlying registry instance.
            pub fn registry() -> &'static $crate::SingletonRegistry {
                &REGISTRY
            }

            /// Register a value in the registry. Rejected once the type is populated.
            pub fn register<T: Send + Sync + 'static>(
                value: T,
            ) -> Result<(), $crate::RegistryError> {
                REGISTRY.register(value)
            }

            /// Register an Arc-wrapped value in the registry.
            pub fn register_arc<T: Send + Sync + 'static>(
                value: Arc<T>,
            ) -> Result<(), $crate::RegistryError> {
                REGISTRY.register_arc(value)
            }

            /// Retrieve a value from the registry.
            pub fn get<T: Send + Sync + 'static>() -> Result<Arc<T>, $crate::RegistryError> {
                REGISTRY.get()
            }

            /// Retrieve a cloned value from the registry.
            pub fn get_cloned<T: Send + Sync + Clone + 'static>() -> Result<T, $crate::RegistryError>
            {
                REGISTRY.get_cloned()
            }

            /// Retrieve the singleton for `T`, constructing it on first access.
            pub fn get_or_init<T, F>(init: F) -> Result<Arc<T>, $crate::RegistryError>
            where
                T: Send + Sync + 'static,
                F: FnOnce() -> T,
            {
                REGISTRY.get_or_init(init)
            }

            /// Retrieve the singleton for `T`, attempting construction on first access.
            pub fn get_or_try_init<T, E, F>(init: F) -> Result<Arc<T>, $crate::RegistryError>
            where
                T: Send + Sync + 'static,
                E: std::fmt::Display,
                F: FnOnce() -> Result<T, E>,
            {
                REGISTRY.get_or_try_init(init)
            }

            /// Check if a type is populated in the registry.
            pub fn contains<T: Send + Sync + 'static>() -> bool {
                REGISTRY.contains::<T>()
            }

            /// Reject construction of `T` once its singleton is populated.
            pub fn guard_construction<T: Send + Sync + 'static>(
            ) -> Result<(), $crate::RegistryError> {
                REGISTRY.guard_construction::<T>()
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                REGISTRY.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                REGISTRY.clear_trace_callback()
            }
        }
    };
}

/// Creates a named lazily-constructed singleton of a single type.
///
/// The macro generates a module holding a hidden [`LazySingleton`] cell with
/// the initializer baked in. `instance()` constructs on first call; every
/// later call returns the same `&'static` reference.
///
/// Invoke at module scope when the type or initializer references items of
/// the surrounding module.
///
/// # Examples
///
/// ```rust
/// use lazy_singleton_registry::define_singleton;
///
/// define_singleton!(app_name, String, String::from("orders-service"));
///
/// assert!(!app_name::is_initialized());
/// assert_eq!(app_name::instance(), "orders-service");
/// assert!(app_name::is_initialized());
///
/// // Construction is guarded from now on.
/// assert!(app_name::guard_construction().is_err());
/// ```
///
/// [`LazySingleton`]: crate::LazySingleton
#[macro_export]
macro_rules! define_singleton {
    ($name:ident, $ty:ty, $init:expr) => {
        pub mod $name {
            #[allow(unused_imports)]
            use super::*;

            static CELL: $crate::LazySingleton<$ty> = $crate::LazySingleton::new();

            /// Returns the singleton, constructing it on first call.
            pub fn instance() -> &'static $ty {
                CELL.get_or_init(|| $init)
            }

            /// Returns the singleton only if it has been constructed.
            pub fn get() -> Option<&'static $ty> {
                CELL.get()
            }

            /// Whether the singleton has been constructed yet.
            pub fn is_initialized() -> bool {
                CELL.is_initialized()
            }

            /// Rejects construction once the singleton exists.
            pub fn guard_construction() -> Result<(), $crate::RegistryError> {
                CELL.guard_construction()
            }
        }
    };
}

/// Creates a named singleton with a fallible initializer.
///
/// Like [`define_singleton!`], but the initializer returns a `Result`; any
/// error type implementing `Display` works and is wrapped into
/// `RegistryError::ConstructionFailed`. A failed construction leaves the
/// singleton empty, and a later `instance()` call retries.
///
/// # Examples
///
/// ```rust
/// use lazy_singleton_registry::define_try_singleton;
///
/// define_try_singleton!(limit, u32, "not-a-number".parse::<u32>());
///
/// // The parse fails; nothing is stored and a later call may retry.
/// assert!(limit::instance().is_err());
/// assert!(!limit::is_initialized());
///
/// define_try_singleton!(threads, usize, "8".parse::<usize>());
///
/// assert_eq!(threads::instance().unwrap(), &8);
/// ```
#[macro_export]
macro_rules! define_try_singleton {
    ($name:ident, $ty:ty, $init:expr) => {
        pub mod $name {
            #[allow(unused_imports)]
            use super::*;

            static CELL: $crate::LazySingleton<$ty> = $crate::LazySingleton::new();

            /// Returns the singleton, attempting construction on first call.
            /// A failure leaves the singleton empty so the call can be retried.
            pub fn instance() -> Result<&'static $ty, $crate::RegistryError> {
                CELL.get_or_try_init(|| {
                    ($init).map_err(|e| $crate::RegistryError::construction_failed::<$ty, _>(e))
                })
            }

            /// Returns the singleton only if it has been constructed.
            pub fn get() -> Option<&'static $ty> {
                CELL.get()
            }

            /// Whether the singleton has been constructed yet.
            pub fn is_initialized() -> bool {
                CELL.is_initialized()
            }

            /// Rejects construction once the singleton exists.
            pub fn guard_construction() -> Result<(), $crate::RegistryError> {
                CELL.guard_construction()
            }
        }
    };
}

/// Creates a named pre-allocated singleton.
///
/// The strictly-safe alternative to lazy construction: the instance is a
/// `static` built from a const expression, so it exists from process start
/// and there is no runtime construction window at all. Nothing can race the
/// first access, and `guard_construction()` rejects unconditionally. The
/// trade-off is eager allocation and a const-constructible type.
///
/// # Examples
///
/// ```rust
/// use lazy_singleton_registry::define_eager_singleton;
///
/// define_eager_singleton!(retry_limit, u32, 3);
///
/// assert_eq!(retry_limit::instance(), &3);
/// assert!(retry_limit::is_initialized());
/// assert!(retry_limit::guard_construction().is_err());
/// ```
#[macro_export]
macro_rules! define_eager_singleton {
    ($name:ident, $ty:ty, $init:expr) => {
        pub mod $name {
            #[allow(unused_imports)]
            use super::*;

            static INSTANCE: $ty = $init;

            /// Returns the pre-allocated singleton.
            pub fn instance() -> &'static $ty {
                &INSTANCE
            }

            /// Always true: the instance exists from process start.
            pub fn is_initialized() -> bool {
                true
            }

            /// Always rejects: there is no pre-population window to race.
            pub fn guard_construction() -> Result<(), $crate::RegistryError> {
                Err($crate::RegistryError::AlreadyInitialized {
                    type_name: std::any::type_name::<$ty>(),
                })
            }
        }
    };
}
