/// Events emitted by a registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use lazy_singleton_registry::RegistryEvent;
///
/// let event = RegistryEvent::Initialized { type_name: "i32" };
/// println!("{:?}", event);
/// ```
#[derive(Debug, Clone)]
pub enum RegistryEvent {
    /// A pre-built value was registered in the registry.
    Register {
        /// The type name of the registered value (e.g., "i32", "alloc::string::String")
        type_name: &'static str,
    },

    /// A singleton was constructed by its initializer. Emitted exactly once
    /// per successful lazy population.
    Initialized {
        /// The type name of the constructed singleton
        type_name: &'static str,
    },

    /// An initializer ran and failed. The holder stays empty and a later
    /// call may retry.
    ConstructionFailed {
        /// The type name whose construction failed
        type_name: &'static str,
    },

    /// An attempt to build or install a second instance was rejected.
    BypassRejected {
        /// The type name whose singleton already exists
        type_name: &'static str,
    },

    /// A value was requested from the registry.
    Get {
        /// The type name that was requested
        type_name: &'static str,
        /// Whether the value was found in the registry
        found: bool,
    },

    /// A type existence check was performed.
    Contains {
        /// The type name that was checked
        type_name: &'static str,
        /// Whether the type exists in the registry
        found: bool,
    },
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Register { type_name } => {
                write!(f, "register {{ type_name: {} }}", type_name)
            }
            RegistryEvent::Initialized { type_name } => {
                write!(f, "initialized {{ type_name: {} }}", type_name)
            }
            RegistryEvent::ConstructionFailed { type_name } => {
                write!(f, "construction_failed {{ type_name: {} }}", type_name)
            }
            RegistryEvent::BypassRejected { type_name } => {
                write!(f, "bypass_rejected {{ type_name: {} }}", type_name)
            }
            RegistryEvent::Get { type_name, found } => {
                write!(f, "get {{ type_name: {}, found: {} }}", type_name, found)
            }
            RegistryEvent::Contains { type_name, found } => {
                write!(
                    f,
                    "contains {{ type_name: {}, found: {} }}",
                    type_name, found
                )
            }
        }
    }
}
