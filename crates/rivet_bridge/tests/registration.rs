//! End-to-end registration sequence against a fake host.
//!
//! The fake host implements the full symbol catalogue with local
//! `extern "C"` functions and captures everything the bridge registers, so
//! the tests can then play the host's role: invoke startup entries, then
//! drive per-entity update calls with real component addresses.

use bytemuck::{Pod, Zeroable};
use once_cell::sync::Lazy;
use rivet_abi::{RawSymbol, StartupEntryFn, UpdateEntryFn};
use rivet_bridge::{
    components, define_component, register_all, startup_system, update_system, Bridge,
    BridgeError, BridgePhase, SystemDecl, SystemEntry, SystemKind,
};
use std::ffi::{c_char, c_int, c_void, CStr};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
struct Position {
    x: f32,
    y: f32,
}
define_component!(Position, "Position", x, y);

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
struct Motion {
    dx: f32,
    dy: f32,
}
define_component!(Motion, "Motion", dx, dy);

// ---- fake host state ----------------------------------------------------

static NEXT_ENTITY: AtomicU32 = AtomicU32::new(1);
static ADDED_POSITIONS: Lazy<Mutex<Vec<(u32, Position)>>> = Lazy::new(Default::default);
static REGISTERED_MESHES: Lazy<Mutex<Vec<(i32, String)>>> = Lazy::new(Default::default);
static STARTUP_ENTRIES: Lazy<Mutex<Vec<StartupEntryFn>>> = Lazy::new(Default::default);
static UPDATE_ENTRIES: Lazy<Mutex<Vec<(UpdateEntryFn, Vec<String>)>>> =
    Lazy::new(Default::default);

unsafe extern "C" fn host_create_entity() -> u32 {
    NEXT_ENTITY.fetch_add(1, Ordering::SeqCst)
}
unsafe extern "C" fn host_destroy_entity(_entity: u32) {}
unsafe extern "C" fn host_add_position(entity: u32, value: Position) {
    ADDED_POSITIONS.lock().unwrap().push((entity, value));
}
unsafe extern "C" fn host_add_motion(_entity: u32, _value: Motion) {}
unsafe extern "C" fn host_remove_component(_entity: u32) {}
unsafe extern "C" fn host_key_query(_key: c_int) -> bool {
    false
}
unsafe extern "C" fn host_mouse_query(x: *mut f32, y: *mut f32) {
    *x = 0.0;
    *y = 0.0;
}
unsafe extern "C" fn host_register_mesh(mesh_id: c_int, path: *const c_char) {
    let path = CStr::from_ptr(path).to_string_lossy().into_owned();
    REGISTERED_MESHES.lock().unwrap().push((mesh_id, path));
}
unsafe extern "C" fn host_register_startup(entry: StartupEntryFn) {
    STARTUP_ENTRIES.lock().unwrap().push(entry);
}
unsafe extern "C" fn host_register_update(
    entry: UpdateEntryFn,
    count: c_int,
    names: *const *const c_char,
) {
    // Copy the names during the call, as the real host does.
    let mut copied = Vec::with_capacity(count as usize);
    for i in 0..count as usize {
        copied.push(CStr::from_ptr(*names.add(i)).to_string_lossy().into_owned());
    }
    UPDATE_ENTRIES.lock().unwrap().push((entry, copied));
}

unsafe extern "C" fn resolver(name: *const c_char) -> RawSymbol {
    match CStr::from_ptr(name).to_str().unwrap_or("") {
        "CreateEntity" => host_create_entity as RawSymbol,
        "HostDestroyEntity" => host_destroy_entity as RawSymbol,
        "AddPosition" => host_add_position as RawSymbol,
        "AddMotion" => host_add_motion as RawSymbol,
        "HostRemoveComponentPosition" | "HostRemoveComponentMotion" => {
            host_remove_component as RawSymbol
        }
        "IsKeyPressed" | "IsKeyJustPressed" | "IsKeyJustReleased" => {
            host_key_query as RawSymbol
        }
        "GetMousePosition" | "GetMouseDelta" => host_mouse_query as RawSymbol,
        "RegisterMesh" => host_register_mesh as RawSymbol,
        "HostRegisterStartup" => host_register_startup as RawSymbol,
        "HostRegisterPerEntityUpdate" => host_register_update as RawSymbol,
        _ => std::ptr::null(),
    }
}

// ---- plugin under test --------------------------------------------------

static STARTUP_TICKS: AtomicU32 = AtomicU32::new(0);
// STARTUP_TICKS as seen by the first update invocation.
static SEEN_AT_FIRST_UPDATE: AtomicU32 = AtomicU32::new(u32::MAX);

fn spawn_scene() {
    let host = rivet_bridge::host();
    let entity = host.create_entity();
    host.add_component(entity, Position { x: 1.0, y: 2.0 })
        .unwrap();
    host.register_mesh(7, "assets/monkey.obj").unwrap();
    STARTUP_TICKS.fetch_add(1, Ordering::SeqCst);
}
startup_system!(SpawnScene = spawn_scene);

fn integrate(dt: f32, position: &mut Position, motion: &mut Motion) {
    SEEN_AT_FIRST_UPDATE
        .compare_exchange(
            u32::MAX,
            STARTUP_TICKS.load(Ordering::SeqCst),
            Ordering::SeqCst,
            Ordering::SeqCst,
        )
        .ok();
    position.x += motion.dx * dt;
    position.y += motion.dy * dt;
}
update_system!(Integrate = integrate(position: Position, motion: Motion));

// ---- tests --------------------------------------------------------------

/// One test owns the global bridge: runs the whole sequence, plays host for
/// a tick, and then checks the double-initialization policy.
#[test]
fn full_registration_sequence() {
    // Update listed first on purpose: registration must still hand the
    // startup trampoline over before any update trampoline.
    let decls = [Integrate::decl(), SpawnScene::decl()];
    register_all(resolver, components![Position, Motion], &decls).unwrap();
    let bridge = rivet_bridge::bridge().unwrap();
    assert_eq!(bridge.phase(), BridgePhase::TrampolinesRegistered);

    let order: Vec<_> = bridge
        .trampolines()
        .iter()
        .map(|t| (t.descriptor().kind(), t.descriptor().name()))
        .collect();
    assert_eq!(
        order,
        [
            (SystemKind::Startup, "spawn_scene"),
            (SystemKind::Update, "integrate"),
        ]
    );
    assert!(format!("{bridge:?}").contains("TrampolinesRegistered"));

    // Both trampolines ended up with the host, update with its query names
    // in declared order.
    let startups: Vec<_> = STARTUP_ENTRIES.lock().unwrap().clone();
    assert_eq!(startups.len(), 1);
    {
        let updates = UPDATE_ENTRIES.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].1, ["Position", "Motion"]);
    }

    // Host behavior: startup runs to completion before the first update.
    for &entry in &startups {
        unsafe { entry() };
    }
    assert_eq!(STARTUP_TICKS.load(Ordering::SeqCst), 1);
    assert_eq!(
        ADDED_POSITIONS.lock().unwrap().as_slice(),
        [(1, Position { x: 1.0, y: 2.0 })]
    );
    assert_eq!(
        REGISTERED_MESHES.lock().unwrap().as_slice(),
        [(7, "assets/monkey.obj".to_string())]
    );

    // Per-entity update with real component addresses, in query order.
    let mut position = Position { x: 10.0, y: 20.0 };
    let mut motion = Motion { dx: 1.0, dy: -2.0 };
    let slots = [
        &mut position as *mut Position as *mut c_void,
        &mut motion as *mut Motion as *mut c_void,
    ];
    let update = UPDATE_ENTRIES.lock().unwrap()[0].0;
    unsafe { update(0.5, slots.as_ptr()) };

    assert_eq!(position, Position { x: 10.5, y: 19.0 });
    assert_eq!(SEEN_AT_FIRST_UPDATE.load(Ordering::SeqCst), 1);

    // Second load attempt in the same process: explicit policy is a hard
    // error; the first registration stays in effect.
    let err = register_all(resolver, components![Position, Motion], &decls).unwrap_err();
    assert!(matches!(err, BridgeError::AlreadyInitialized));
    assert_eq!(STARTUP_ENTRIES.lock().unwrap().len(), 1);
    assert_eq!(UPDATE_ENTRIES.lock().unwrap().len(), 1);
}

#[test]
fn unresolved_symbol_aborts_before_any_registration() {
    static CAPTURED: AtomicU32 = AtomicU32::new(0);

    unsafe extern "C" fn capturing_register_startup(_entry: StartupEntryFn) {
        CAPTURED.fetch_add(1, Ordering::SeqCst);
    }
    unsafe extern "C" fn capturing_register_update(
        _entry: UpdateEntryFn,
        _count: c_int,
        _names: *const *const c_char,
    ) {
        CAPTURED.fetch_add(1, Ordering::SeqCst);
    }
    // Knows the registration callbacks but nothing else: symbol binding
    // fails long before any trampoline could be handed over.
    unsafe extern "C" fn broken_resolver(name: *const c_char) -> RawSymbol {
        match CStr::from_ptr(name).to_str().unwrap_or("") {
            "HostRegisterStartup" => capturing_register_startup as RawSymbol,
            "HostRegisterPerEntityUpdate" => capturing_register_update as RawSymbol,
            _ => std::ptr::null(),
        }
    }

    let decls = [SpawnScene::decl(), Integrate::decl()];
    let err = Bridge::initialize(broken_resolver, components![Position, Motion], &decls)
        .unwrap_err();
    match err {
        BridgeError::UnresolvedHostSymbol { name } => assert_eq!(name, "AddPosition"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(CAPTURED.load(Ordering::SeqCst), 0, "partial registration observed");
}

#[test]
fn discovery_failure_aborts_without_registering() {
    static CAPTURED: AtomicU32 = AtomicU32::new(0);

    unsafe extern "C" fn counting_register_startup(_entry: StartupEntryFn) {
        CAPTURED.fetch_add(1, Ordering::SeqCst);
    }
    unsafe extern "C" fn counting_register_update(
        _entry: UpdateEntryFn,
        _count: c_int,
        _names: *const *const c_char,
    ) {
        CAPTURED.fetch_add(1, Ordering::SeqCst);
    }
    unsafe extern "C" fn counting_resolver(name: *const c_char) -> RawSymbol {
        match CStr::from_ptr(name).to_str().unwrap_or("") {
            "HostRegisterStartup" => counting_register_startup as RawSymbol,
            "HostRegisterPerEntityUpdate" => counting_register_update as RawSymbol,
            _ => resolver(name),
        }
    }

    // Hand-built declaration with an update marker but no query, the way a
    // manual call-list can go wrong.
    let orphan = SystemDecl {
        name: "orphan",
        kind: SystemKind::Update,
        query: None,
        params: &["Position"],
        entry: match Integrate::decl().entry {
            SystemEntry::Update(entry) => SystemEntry::Update(entry),
            SystemEntry::Startup(_) => unreachable!(),
        },
    };
    let decls = [SpawnScene::decl(), orphan];

    let err = Bridge::initialize(counting_resolver, components![Position, Motion], &decls)
        .unwrap_err();
    assert!(matches!(
        err,
        BridgeError::MissingQueryDeclaration { system: "orphan" }
    ));
    assert_eq!(CAPTURED.load(Ordering::SeqCst), 0, "partial registration observed");
}
