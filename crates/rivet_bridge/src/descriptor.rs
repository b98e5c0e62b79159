use crate::component::ComponentMeta;
use rivet_abi::{StartupEntryFn, UpdateEntryFn};

/// When the host is expected to invoke a system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemKind {
    /// Runs once, before the first update tick.
    Startup,
    /// Runs once per matching entity per tick.
    Update,
}

/// Native entry point synthesized for a system.
///
/// Both variants are `extern "C"` functions monomorphized at build time,
/// so the slot-to-type mapping inside an update entry is fixed when the
/// declaration is written and never re-derived per call.
#[derive(Clone, Copy, Debug)]
pub enum SystemEntry {
    Startup(StartupEntryFn),
    Update(UpdateEntryFn),
}

/// Raw, data-only declaration of one system, before validation.
///
/// The [`startup_system!`](crate::startup_system) and
/// [`update_system!`](crate::update_system) macros always emit consistent
/// declarations; hand-written ones may not, which is exactly what discovery
/// exists to catch.
#[derive(Clone, Copy, Debug)]
pub struct SystemDecl {
    /// Function name, used in diagnostics.
    pub name: &'static str,
    pub kind: SystemKind,
    /// Ordered component names from the query declaration, if one exists.
    pub query: Option<&'static [&'static str]>,
    /// Component names matching the callable's actual reference parameters,
    /// in parameter order.
    pub params: &'static [&'static str],
    pub entry: SystemEntry,
}

/// Validated metadata for one discovered system.
///
/// Produced by discovery, consumed exactly once by trampoline generation.
#[derive(Clone, Debug)]
pub struct SystemDescriptor {
    name: &'static str,
    kind: SystemKind,
    components: Vec<ComponentMeta>,
    entry: SystemEntry,
}

impl SystemDescriptor {
    pub(crate) fn new(
        name: &'static str,
        kind: SystemKind,
        components: Vec<ComponentMeta>,
        entry: SystemEntry,
    ) -> Self {
        debug_assert!(components.is_empty() == (kind == SystemKind::Startup));
        Self {
            name,
            kind,
            components,
            entry,
        }
    }

    /// System function name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> SystemKind {
        self.kind
    }

    /// Ordered component descriptors; empty iff this is a startup system.
    pub fn components(&self) -> &[ComponentMeta] {
        &self.components
    }

    /// Ordered component names, as registered with the host.
    pub fn component_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.components.iter().map(|meta| meta.name)
    }

    pub fn entry(&self) -> SystemEntry {
        self.entry
    }
}
