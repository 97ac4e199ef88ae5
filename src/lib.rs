//! # Lazy Singleton Registry
//!
//! Thread-safe lazy singletons for Rust: a double-checked [`LazySingleton`]
//! cell and a write-once per-type [`SingletonRegistry`], with macros for
//! declaring named registries and singletons.
//!
//! Holders start empty and are populated at most once. The populated flag is
//! checked before any lock is touched, so reads after the first construction
//! are lock-free. Concurrent first callers race to a lock; exactly one runs
//! the initializer and everyone shares the finished instance.
//!
//! ## Quick Start
//!
//! ```rust
//! use lazy_singleton_registry::SingletonRegistry;
//! use std::sync::Arc;
//!
//! let registry = SingletonRegistry::new();
//!
//! // Constructed on first access only
//! let config: Arc<String> = registry
//!     .get_or_init(|| "max_connections=100".to_string())
//!     .unwrap();
//!
//! // Every later caller shares the same instance
//! let again: Arc<String> = registry.get_or_init(|| unreachable!()).unwrap();
//! assert!(Arc::ptr_eq(&config, &again));
//! ```
//!
//! ## Features
//!
//! - **Lazy**: nothing is constructed until the first access
//! - **Thread-safe**: any number of concurrent first callers produce exactly
//!   one construction
//! - **Write-once**: populated holders are never replaced or reset
//! - **Guarded**: constructors can reject bypass instantiation once the
//!   singleton exists, and a pre-allocated variant removes the construction
//!   window entirely
//! - **Recoverable**: a failed initializer leaves the holder empty so a
//!   later call can retry
//! - **Observable**: per-registry event callbacks plus `tracing` diagnostics
//!
//! ## Main Items
//!
//! - [`LazySingleton`] - lazily initialized cell for a single value
//! - [`SingletonRegistry`] - per-type singleton storage with an explicit
//!   lifecycle; construct fresh instances in tests instead of sharing
//!   hidden global state
//! - [`define_registry!`] - declare a named registry with free functions
//! - [`define_singleton!`] - declare a named lazy singleton
//! - [`define_try_singleton!`] - declare a lazy singleton with a fallible
//!   initializer
//! - [`define_eager_singleton!`] - declare a pre-allocated singleton
//! - [`RegistryError`] - the error taxonomy
//! - [`RegistryEvent`] - events passed to [`set_trace_callback`](SingletonRegistry::set_trace_callback)

mod lazy_singleton;
mod macros;
mod registry;
mod registry_error;
mod registry_event;

// Re-export the main public API
pub use lazy_singleton::LazySingleton;
pub use registry::{SingletonRegistry, TraceCallback};
pub use registry_error::RegistryError;
pub use registry_event::RegistryEvent;
