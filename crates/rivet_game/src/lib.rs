//! Rivet sample game plugin.
//!
//! Built as a `cdylib` the host loads at startup. The host calls
//! [`RegisterAll`] exactly once with its symbol resolver; everything else
//! (startup, per-entity updates) flows back in through the entry points the
//! bridge registers during that call.

pub mod components;
pub mod systems;

use crate::components::{Camera, GameStats, Material, Mesh, Player, Transform, Velocity};
use crate::systems::{ApplyVelocity, DrivePlayer, SpawnScene, TrackStats};
use rivet_abi::HostResolverFn;
use rivet_bridge::{components, SystemDecl};

/// Every system this plugin exposes, in registration order.
pub fn system_manifest() -> Vec<SystemDecl> {
    vec![
        SpawnScene::decl(),
        ApplyVelocity::decl(),
        DrivePlayer::decl(),
        TrackStats::decl(),
    ]
}

/// Plugin entry point, called by the host at load time.
///
/// A failed registration leaves the plugin unusable; the error is logged
/// and the host is expected to treat the load as failed. There is nothing
/// to roll back, since no trampoline became reachable.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn RegisterAll(resolver: Option<HostResolverFn>) {
    let Some(resolver) = resolver else {
        tracing::error!("host passed a null symbol resolver");
        return;
    };

    let manifest = components![
        Transform, Camera, Velocity, Player, Mesh, Material, GameStats
    ];
    if let Err(error) = rivet_bridge::register_all(resolver, manifest, &system_manifest()) {
        tracing::error!(%error, "plugin registration failed");
    }
}
