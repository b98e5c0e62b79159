//! Raw C ABI shared between the native host and the managed-side bridge.
//!
//! Everything in this crate mirrors the host's calling convention exactly:
//! cdecl function pointers, 32-bit entity ids, C strings for symbol and
//! component names. Nothing here is safe to call on its own; the safe
//! wrappers live in `rivet_bridge`.

use std::ffi::{c_char, c_int, c_void};

pub mod keys;

/// Handle to an entity owned by the native host.
///
/// The host hands these out from `CreateEntity` and accepts them back in
/// every per-entity operation. The bridge never interprets the value.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// Untyped host function address, as returned by the resolver.
pub type RawSymbol = *const c_void;

/// The one capability the host supplies at plugin load: resolve a symbol
/// name to a function address. Returns null for unknown names.
pub type HostResolverFn = unsafe extern "C" fn(name: *const c_char) -> RawSymbol;

/// Entry point the host calls once, before the first update tick.
pub type StartupEntryFn = unsafe extern "C" fn();

/// Entry point the host calls once per matching entity per tick.
///
/// `components` points at a contiguous array of component addresses whose
/// length and order were fixed when the entry point was registered. The
/// host does not transmit the length at call time.
pub type UpdateEntryFn = unsafe extern "C" fn(dt: f32, components: *const *mut c_void);

/// Host callback registering a startup entry point.
pub type RegisterStartupFn = unsafe extern "C" fn(entry: StartupEntryFn);

/// Host callback registering a per-entity update entry point together with
/// the ordered component names its query requires.
pub type RegisterUpdateFn =
    unsafe extern "C" fn(entry: UpdateEntryFn, count: c_int, names: *const *const c_char);

/// `CreateEntity`
pub type CreateEntityFn = unsafe extern "C" fn() -> u32;

/// `HostDestroyEntity`
pub type DestroyEntityFn = unsafe extern "C" fn(entity: u32);

/// `HostRemoveComponent{Name}` family.
pub type RemoveComponentFn = unsafe extern "C" fn(entity: u32);

/// `IsKeyPressed` / `IsKeyJustPressed` / `IsKeyJustReleased`
pub type KeyQueryFn = unsafe extern "C" fn(key: c_int) -> bool;

/// `GetMousePosition` / `GetMouseDelta`, out-parameter style.
pub type MouseQueryFn = unsafe extern "C" fn(x: *mut f32, y: *mut f32);

/// `RegisterMesh` associates a mesh id with an asset path.
pub type RegisterMeshFn = unsafe extern "C" fn(mesh_id: c_int, path: *const c_char);
