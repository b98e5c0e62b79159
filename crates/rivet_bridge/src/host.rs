// host.rs - Late-bound table of native host operations
//
// The host hands the plugin exactly one capability at load time: resolve a
// symbol name to a function address. Everything the plugin can ask the
// engine to do is bound through that resolver, once, into an immutable
// table. There is no teardown path; the table lives until process exit.

use crate::component::{ComponentRegistry, HostComponent};
use crate::descriptor::{SystemEntry, SystemKind};
use crate::error::BridgeError;
use crate::trampoline::Trampoline;
use rivet_abi::{
    CreateEntityFn, DestroyEntityFn, EntityId, HostResolverFn, KeyQueryFn, MouseQueryFn,
    RawSymbol, RegisterMeshFn, RegisterStartupFn, RegisterUpdateFn, RemoveComponentFn,
};
use std::collections::HashMap;
use std::ffi::{c_char, c_int, CString};

/// Per-component host operations, with the add function type-erased.
///
/// `Add{Name}` takes the component record by value, so its concrete type
/// differs per component; it is stored raw and cast back in
/// [`HostApi::add_component`], where the component type is known again.
struct ComponentOps {
    add: RawSymbol,
    remove: RemoveComponentFn,
}

/// The resolved host symbol table plus safe wrappers over every bound
/// operation.
///
/// Built exactly once during the registration sequence and immutable
/// afterwards. A resolution failure for any required symbol is fatal for
/// the whole sequence; the plugin cannot run without its host calls.
pub struct HostApi {
    create_entity: CreateEntityFn,
    destroy_entity: DestroyEntityFn,
    is_key_pressed: KeyQueryFn,
    is_key_just_pressed: KeyQueryFn,
    is_key_just_released: KeyQueryFn,
    mouse_position: MouseQueryFn,
    mouse_delta: MouseQueryFn,
    register_mesh: RegisterMeshFn,
    register_startup: RegisterStartupFn,
    register_update: RegisterUpdateFn,
    component_ops: HashMap<&'static str, ComponentOps>,
}

// The bound addresses are plain cdecl functions on the host side; calling
// them from any thread is the host's documented contract.
unsafe impl Send for HostApi {}
unsafe impl Sync for HostApi {}

// The bound fn pointers have no printable form; summarize the table.
impl std::fmt::Debug for HostApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostApi")
            .field("components", &self.component_ops.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn resolve(resolver: HostResolverFn, name: &str) -> Result<RawSymbol, BridgeError> {
    let c_name = CString::new(name)?;
    let address = unsafe { resolver(c_name.as_ptr()) };
    if address.is_null() {
        return Err(BridgeError::UnresolvedHostSymbol {
            name: name.to_string(),
        });
    }
    tracing::debug!(symbol = name, "resolved host symbol");
    Ok(address)
}

macro_rules! bind {
    ($resolver:expr, $name:literal as $ty:ty) => {
        // Resolved addresses are cdecl functions exported by the host under
        // exactly these names; the cast is the ABI contract.
        unsafe { std::mem::transmute::<RawSymbol, $ty>(resolve($resolver, $name)?) }
    };
}

impl HostApi {
    /// Resolve the fixed catalogue of required host symbols.
    ///
    /// Each symbol is resolved exactly once. The per-component add/remove
    /// entries are derived from the component names in the plugin manifest
    /// (`Add{Name}` / `HostRemoveComponent{Name}`).
    pub(crate) fn bind(
        resolver: HostResolverFn,
        components: &ComponentRegistry,
    ) -> Result<Self, BridgeError> {
        let mut component_ops = HashMap::with_capacity(components.len());
        for meta in components.iter() {
            let add = resolve(resolver, &format!("Add{}", meta.name))?;
            let remove_raw = resolve(resolver, &format!("HostRemoveComponent{}", meta.name))?;
            let remove =
                unsafe { std::mem::transmute::<RawSymbol, RemoveComponentFn>(remove_raw) };
            component_ops.insert(meta.name, ComponentOps { add, remove });
        }

        Ok(Self {
            create_entity: bind!(resolver, "CreateEntity" as CreateEntityFn),
            destroy_entity: bind!(resolver, "HostDestroyEntity" as DestroyEntityFn),
            is_key_pressed: bind!(resolver, "IsKeyPressed" as KeyQueryFn),
            is_key_just_pressed: bind!(resolver, "IsKeyJustPressed" as KeyQueryFn),
            is_key_just_released: bind!(resolver, "IsKeyJustReleased" as KeyQueryFn),
            mouse_position: bind!(resolver, "GetMousePosition" as MouseQueryFn),
            mouse_delta: bind!(resolver, "GetMouseDelta" as MouseQueryFn),
            register_mesh: bind!(resolver, "RegisterMesh" as RegisterMeshFn),
            register_startup: bind!(resolver, "HostRegisterStartup" as RegisterStartupFn),
            register_update: bind!(resolver, "HostRegisterPerEntityUpdate" as RegisterUpdateFn),
            component_ops,
        })
    }

    /// Create a new empty entity.
    pub fn create_entity(&self) -> EntityId {
        EntityId(unsafe { (self.create_entity)() })
    }

    /// Destroy an entity and all of its components.
    pub fn destroy_entity(&self, entity: EntityId) {
        unsafe { (self.destroy_entity)(entity.0) }
    }

    /// Add (or replace) a component on an entity.
    ///
    /// Fails only when `T` was not part of the component manifest the
    /// bridge was initialized with, an authoring defect, since its add
    /// symbol was then never bound.
    pub fn add_component<T: HostComponent>(
        &self,
        entity: EntityId,
        value: T,
    ) -> Result<(), BridgeError> {
        let ops = self.ops_for::<T>()?;
        // Cast back to the typed add function this slot was resolved for;
        // the slot is keyed by T::NAME, which derived the symbol name.
        let add = unsafe {
            std::mem::transmute::<RawSymbol, unsafe extern "C" fn(u32, T)>(ops.add)
        };
        unsafe { add(entity.0, value) };
        Ok(())
    }

    /// Remove a component from an entity.
    pub fn remove_component<T: HostComponent>(&self, entity: EntityId) -> Result<(), BridgeError> {
        let ops = self.ops_for::<T>()?;
        unsafe { (ops.remove)(entity.0) };
        Ok(())
    }

    pub fn is_key_pressed(&self, key: i32) -> bool {
        unsafe { (self.is_key_pressed)(key as c_int) }
    }

    pub fn is_key_just_pressed(&self, key: i32) -> bool {
        unsafe { (self.is_key_just_pressed)(key as c_int) }
    }

    pub fn is_key_just_released(&self, key: i32) -> bool {
        unsafe { (self.is_key_just_released)(key as c_int) }
    }

    /// Current cursor position in window coordinates.
    pub fn mouse_position(&self) -> (f32, f32) {
        let (mut x, mut y) = (0.0_f32, 0.0_f32);
        unsafe { (self.mouse_position)(&mut x, &mut y) };
        (x, y)
    }

    /// Cursor movement since the previous tick.
    pub fn mouse_delta(&self) -> (f32, f32) {
        let (mut dx, mut dy) = (0.0_f32, 0.0_f32);
        unsafe { (self.mouse_delta)(&mut dx, &mut dy) };
        (dx, dy)
    }

    /// Associate a mesh id with an asset path on the host.
    pub fn register_mesh(&self, mesh_id: i32, path: &str) -> Result<(), BridgeError> {
        let c_path = CString::new(path)?;
        unsafe { (self.register_mesh)(mesh_id as c_int, c_path.as_ptr()) };
        Ok(())
    }

    /// Hand one trampoline's entry point to the host.
    ///
    /// For update systems the ordered component names go along so the host
    /// can decide which entities satisfy the query and in what order to
    /// hand back addresses. The name array is leaked on purpose: the host
    /// may call the entry point at any future time, so everything it was
    /// registered with stays reachable until process exit.
    pub(crate) fn register_trampoline(&self, trampoline: &Trampoline) -> Result<(), BridgeError> {
        let descriptor = trampoline.descriptor();
        match (descriptor.kind(), descriptor.entry()) {
            (SystemKind::Startup, SystemEntry::Startup(entry)) => {
                unsafe { (self.register_startup)(entry) };
            }
            (SystemKind::Update, SystemEntry::Update(entry)) => {
                let names: Vec<CString> = descriptor
                    .component_names()
                    .map(CString::new)
                    .collect::<Result<_, _>>()?;
                let names: &'static [CString] = Box::leak(names.into_boxed_slice());
                let pointers: Vec<*const c_char> =
                    names.iter().map(|name| name.as_ptr()).collect();
                let pointers: &'static [*const c_char] =
                    Box::leak(pointers.into_boxed_slice());
                unsafe {
                    (self.register_update)(entry, pointers.len() as c_int, pointers.as_ptr())
                };
            }
            // Discovery guarantees kind and entry agree.
            _ => unreachable!("descriptor kind disagrees with its entry"),
        }
        tracing::info!(
            system = descriptor.name(),
            kind = ?descriptor.kind(),
            "registered system with host"
        );
        Ok(())
    }

    fn ops_for<T: HostComponent>(&self) -> Result<&ComponentOps, BridgeError> {
        self.component_ops
            .get(T::NAME)
            .ok_or_else(|| BridgeError::UnresolvedHostSymbol {
                name: format!("Add{}", T::NAME),
            })
    }
}
