//! Rivet Bridge
//!
//! Managed-side bridge between game code and the native simulation host.
//! Game code declares systems (plain functions over component records)
//! through lightweight markers; at plugin load the bridge discovers them,
//! validates each against its declared component query, synthesizes a
//! native-callable entry point per system, and registers everything with
//! the host through a late-bound symbol table.
//!
//! The host side is opaque: it owns entities and components, drives the
//! simulation loop, and calls the registered entry points at its own
//! cadence with real component addresses.

mod bridge;
mod component;
mod descriptor;
mod discovery;
mod error;
mod host;
mod macros;
mod trampoline;

pub use bridge::{bridge, host, register_all, Bridge, BridgePhase};
pub use component::{ComponentMeta, ComponentRegistry, FieldMeta, HostComponent};
pub use descriptor::{SystemDecl, SystemDescriptor, SystemEntry, SystemKind};
pub use discovery::{discover, DiscoveryConfig};
pub use error::BridgeError;
pub use host::HostApi;
pub use trampoline::{
    startup_entry, update_entry, Query, StartupSystem, Trampoline, UpdateSystem,
    MAX_QUERY_ARITY,
};

// Re-exported so plugin crates only need one dependency line for the
// declarative surface.
pub use rivet_abi;

/// Bridge version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
