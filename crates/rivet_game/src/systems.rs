//! Game systems, declared through the bridge's markers.
//!
//! Each function is ordinary Rust; the `startup_system!` / `update_system!`
//! declarations next to it are what make it discoverable.

use crate::components::{GameStats, Material, Mesh, Player, Transform, Velocity};
use glam::Vec3;
use rivet_abi::keys;
use rivet_bridge::{startup_system, update_system};

pub const MONKEY_MODEL_ID: i32 = 0;

const PLAYER_SPEED: f32 = 4.0;
const GRAVITY: f32 = -9.81;

/// Populate the scene: one controllable monkey and the stats singleton.
pub fn spawn_scene() {
    let host = rivet_bridge::host();

    host.register_mesh(MONKEY_MODEL_ID, "assets/models/monkey.obj")
        .expect("mesh path contains a nul byte");

    let monkey = host.create_entity();
    host.add_component(
        monkey,
        Transform {
            position: Vec3::new(0.0, 1.0, 0.0),
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        },
    )
    .expect("Transform is in the component manifest");
    host.add_component(monkey, Velocity { velocity: Vec3::ZERO })
        .expect("Velocity is in the component manifest");
    host.add_component(
        monkey,
        Player {
            is_jumping: 0,
            jump_force: 5.0,
        },
    )
    .expect("Player is in the component manifest");
    host.add_component(monkey, Mesh { model_id: MONKEY_MODEL_ID })
        .expect("Mesh is in the component manifest");
    host.add_component(
        monkey,
        Material {
            color: Vec3::new(0.8, 0.6, 0.4),
            metallic: 0.0,
            roughness: 0.8,
            occlusion: 1.0,
            emissive: Vec3::ZERO,
        },
    )
    .expect("Material is in the component manifest");

    let stats = host.create_entity();
    host.add_component(
        stats,
        GameStats {
            kill_count: 0,
            game_time: 0.0,
        },
    )
    .expect("GameStats is in the component manifest");

    tracing::info!(entity = monkey.0, "scene spawned");
}
startup_system!(pub SpawnScene = spawn_scene);

/// Integrate velocity into position.
pub fn apply_velocity(dt: f32, transform: &mut Transform, velocity: &mut Velocity) {
    transform.position += velocity.velocity * dt;
}
update_system!(pub ApplyVelocity = apply_velocity(transform: Transform, velocity: Velocity));

/// WASD movement, space to jump, gravity while airborne.
pub fn drive_player(dt: f32, transform: &mut Transform, velocity: &mut Velocity, player: &mut Player) {
    let host = rivet_bridge::host();

    let mut direction = Vec3::ZERO;
    if host.is_key_pressed(keys::KEY_W) {
        direction.z -= 1.0;
    }
    if host.is_key_pressed(keys::KEY_S) {
        direction.z += 1.0;
    }
    if host.is_key_pressed(keys::KEY_A) {
        direction.x -= 1.0;
    }
    if host.is_key_pressed(keys::KEY_D) {
        direction.x += 1.0;
    }
    let direction = direction.normalize_or_zero();
    velocity.velocity.x = direction.x * PLAYER_SPEED;
    velocity.velocity.z = direction.z * PLAYER_SPEED;

    if player.is_jumping == 0 && host.is_key_just_pressed(keys::KEY_SPACE) {
        velocity.velocity.y = player.jump_force;
        player.is_jumping = 1;
    }

    if player.is_jumping != 0 {
        velocity.velocity.y += GRAVITY * dt;
        // Landed: clamp back onto the ground plane.
        if transform.position.y <= 1.0 && velocity.velocity.y < 0.0 {
            transform.position.y = 1.0;
            velocity.velocity.y = 0.0;
            player.is_jumping = 0;
        }
    }
}
update_system!(pub DrivePlayer = drive_player(transform: Transform, velocity: Velocity, player: Player));

/// Accumulate wall-clock play time on the stats singleton.
pub fn track_stats(dt: f32, stats: &mut GameStats) {
    stats.game_time += dt;
}
update_system!(pub TrackStats = track_stats(stats: GameStats));
