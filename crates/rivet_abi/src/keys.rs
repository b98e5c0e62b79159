//! Key codes understood by the host's input queries.
//!
//! The host forwards GLFW key codes unchanged, so these constants use the
//! GLFW numbering.

pub const KEY_SPACE: i32 = 32;
pub const KEY_A: i32 = 65;
pub const KEY_D: i32 = 68;
pub const KEY_S: i32 = 83;
pub const KEY_W: i32 = 87;
pub const KEY_ESCAPE: i32 = 256;
