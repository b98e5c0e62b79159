// bridge.rs - Registration driver
//
// Runs the whole load sequence exactly once: resolve host symbols, discover
// systems, generate trampolines, register them with the host. The sequence
// is single-threaded and synchronous; nothing here suspends, and no
// trampoline is reachable by the host until the sequence completes.

use crate::component::{ComponentMeta, ComponentRegistry};
use crate::descriptor::{SystemDecl, SystemKind};
use crate::discovery::{discover, DiscoveryConfig};
use crate::error::BridgeError;
use crate::host::HostApi;
use crate::trampoline::Trampoline;
use once_cell::sync::OnceCell;
use rivet_abi::HostResolverFn;

/// Progress of the registration sequence.
///
/// `TrampolinesRegistered` is terminal: after it, the bridge only receives
/// inbound calls through the registered entry points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BridgePhase {
    Uninitialized,
    SymbolsResolved,
    SystemsDiscovered,
    TrampolinesRegistered,
}

/// The completed bridge: the resolved host table and every registered
/// trampoline, owned for the remaining process lifetime.
pub struct Bridge {
    host: HostApi,
    trampolines: Vec<Trampoline>,
    phase: BridgePhase,
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("phase", &self.phase)
            .field("trampolines", &self.trampolines.len())
            .finish_non_exhaustive()
    }
}

impl Bridge {
    /// Run the registration sequence against the given resolver.
    ///
    /// This is the pure driver: it touches no global state, so a failing
    /// host can be retried in tests with a fresh set of inputs. Production
    /// code goes through [`register_all`], which also publishes the result
    /// and enforces the once-only policy.
    pub fn initialize(
        resolver: HostResolverFn,
        components: Vec<ComponentMeta>,
        systems: &[SystemDecl],
    ) -> Result<Self, BridgeError> {
        let mut phase = BridgePhase::Uninitialized;
        tracing::debug!(phase = ?phase, "beginning registration sequence");
        let registry = ComponentRegistry::from_metas(components)?;

        let host = HostApi::bind(resolver, &registry)?;
        phase = BridgePhase::SymbolsResolved;
        tracing::info!(components = registry.len(), phase = ?phase, "host symbols resolved");

        let descriptors = discover(systems, &registry, &DiscoveryConfig::default())?;
        phase = BridgePhase::SystemsDiscovered;
        tracing::info!(systems = descriptors.len(), phase = ?phase, "systems discovered");

        // Startup trampolines are handed over before update trampolines,
        // matching the order the host will invoke them in.
        let mut trampolines = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors
            .iter()
            .filter(|d| d.kind() == SystemKind::Startup)
            .chain(descriptors.iter().filter(|d| d.kind() == SystemKind::Update))
        {
            let trampoline = Trampoline::generate(descriptor.clone());
            host.register_trampoline(&trampoline)?;
            trampolines.push(trampoline);
        }
        phase = BridgePhase::TrampolinesRegistered;
        tracing::info!(trampolines = trampolines.len(), phase = ?phase, "registration complete");

        Ok(Self {
            host,
            trampolines,
            phase,
        })
    }

    pub fn phase(&self) -> BridgePhase {
        self.phase
    }

    pub fn host(&self) -> &HostApi {
        &self.host
    }

    /// Every trampoline registered with the host, in registration order.
    pub fn trampolines(&self) -> &[Trampoline] {
        &self.trampolines
    }
}

static BRIDGE: OnceCell<Bridge> = OnceCell::new();

/// Run the registration sequence once and publish the bridge for the
/// remaining process lifetime.
///
/// A second call in the same process fails with
/// [`BridgeError::AlreadyInitialized`]; the first registration stays in
/// effect. Any error from the sequence itself leaves nothing published;
/// partial registration is never retried or rolled back, and the host is
/// expected to treat plugin load as failed.
pub fn register_all(
    resolver: HostResolverFn,
    components: Vec<ComponentMeta>,
    systems: &[SystemDecl],
) -> Result<(), BridgeError> {
    if BRIDGE.get().is_some() {
        return Err(BridgeError::AlreadyInitialized);
    }
    let bridge = Bridge::initialize(resolver, components, systems)?;
    BRIDGE
        .set(bridge)
        .map_err(|_| BridgeError::AlreadyInitialized)
}

/// The published bridge, if registration has completed.
pub fn bridge() -> Option<&'static Bridge> {
    BRIDGE.get()
}

/// Bound host operations for use from inside systems.
///
/// Panics when called before [`register_all`] has succeeded; systems are
/// only ever invoked by the host after registration, so hitting the panic
/// means an authoring defect (calling host operations at load time).
pub fn host() -> &'static HostApi {
    bridge()
        .expect("rivet bridge is not initialized; host() is only valid inside systems")
        .host()
}
