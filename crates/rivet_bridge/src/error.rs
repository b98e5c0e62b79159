use thiserror::Error;

/// Errors surfaced during discovery and registration.
///
/// All of these are fatal authoring or load-time defects: they abort the
/// registration sequence before any trampoline becomes reachable by the
/// host, and there is no retry path.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("update system '{system}' has no query declaration")]
    MissingQueryDeclaration { system: &'static str },

    #[error(
        "system '{system}' signature disagrees with its query: declared [{declared}], found [{actual}]"
    )]
    SignatureMismatch {
        system: &'static str,
        declared: String,
        actual: String,
    },

    #[error("startup system '{system}' must take no parameters and declare no query")]
    InvalidStartupSignature { system: &'static str },

    #[error("system '{system}' declares {arity} query components; supported range is 1..={max}")]
    UnsupportedQueryArity {
        system: &'static str,
        arity: usize,
        max: usize,
    },

    #[error("query of system '{system}' names unknown component '{component}'")]
    UnknownComponent {
        system: &'static str,
        component: &'static str,
    },

    #[error("host symbol '{name}' could not be resolved")]
    UnresolvedHostSymbol { name: String },

    #[error("component '{name}' is registered twice with conflicting layouts")]
    ComponentLayoutConflict { name: &'static str },

    #[error("embedded nul byte in a host-bound string")]
    InvalidHostString(#[from] std::ffi::NulError),

    #[error("the bridge is already initialized")]
    AlreadyInitialized,
}
