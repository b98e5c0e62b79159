//! Component records shared with the native host.
//!
//! Every struct here is `#[repr(C)]` POD and must match the host's record
//! layout byte for byte; that agreement is a build-time contract between
//! the two codebases, not something either side re-validates at runtime.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rivet_bridge::define_component;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles, degrees.
    pub rotation: Vec3,
    pub scale: Vec3,
}
define_component!(Transform, "Transform", position, rotation, scale);

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Camera {
    pub fov: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}
define_component!(Camera, "Camera", fov, near_plane, far_plane);

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Velocity {
    pub velocity: Vec3,
}
define_component!(Velocity, "Velocity", velocity);

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Player {
    /// Nonzero while airborne. 32-bit for a stable C layout.
    pub is_jumping: u32,
    pub jump_force: f32,
}
define_component!(Player, "Player", is_jumping, jump_force);

/// Mesh reference by id; the path behind the id is announced separately
/// through `RegisterMesh`, which keeps strings out of per-entity records.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Mesh {
    pub model_id: i32,
}
define_component!(Mesh, "Mesh", model_id);

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Material {
    pub color: Vec3,
    pub metallic: f32,
    pub roughness: f32,
    pub occlusion: f32,
    pub emissive: Vec3,
}
define_component!(
    Material, "Material", color, metallic, roughness, occlusion, emissive
);

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GameStats {
    pub kill_count: i32,
    pub game_time: f32,
}
define_component!(GameStats, "GameStats", kill_count, game_time);
