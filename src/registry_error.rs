use thiserror::Error;

/// Errors produced by singleton cells and registries.
///
/// The taxonomy is closed: lookups can miss (`TypeNotFound`, `TypeMismatch`),
/// first construction can fail (`ConstructionFailed`), and any attempt to
/// build or install a second instance is rejected (`AlreadyInitialized`).
/// Lock poisoning is recovered internally and never surfaces here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegistryError {
    /// A second construction or registration was attempted for a singleton
    /// that is already populated.
    #[error("Singleton already initialized: {type_name}")]
    AlreadyInitialized {
        /// The type whose singleton already exists.
        type_name: &'static str,
    },

    /// The initializer failed; the holder was left empty and a later call
    /// may retry.
    #[error("Singleton construction failed for {type_name}: {reason}")]
    ConstructionFailed {
        /// The type that failed to construct.
        type_name: &'static str,
        /// Display form of the underlying failure.
        reason: String,
    },

    /// The requested type was never populated in the registry.
    #[error("Type not found in registry: {type_name}")]
    TypeNotFound {
        /// The type that was requested.
        type_name: &'static str,
    },

    /// A stored value did not downcast to the requested type.
    #[error("Type mismatch in registry for type: {type_name}")]
    TypeMismatch {
        /// The type that was requested.
        type_name: &'static str,
    },
}

impl RegistryError {
    /// Builds an `AlreadyInitialized` error for type `T`.
    pub fn already_initialized<T>() -> Self {
        RegistryError::AlreadyInitialized {
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Builds a `ConstructionFailed` error for type `T`, capturing the
    /// display form of the underlying failure.
    pub fn construction_failed<T, D: std::fmt::Display>(reason: D) -> Self {
        RegistryError::ConstructionFailed {
            type_name: std::any::type_name::<T>(),
            reason: reason.to_string(),
        }
    }
}
