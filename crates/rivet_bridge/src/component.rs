// component.rs - Component type descriptors
//
// Components are identified by their symbolic name, not by Rust TypeIds.
// The host matches query component names against its own storage, so the
// name is the contract that must agree on both sides of the boundary.

use crate::error::BridgeError;
use bytemuck::Pod;
use std::mem::{align_of, size_of};

/// One fixed-width field inside a component record, by offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldMeta {
    pub name: &'static str,
    pub offset: usize,
}

/// Metadata describing a component's memory layout.
///
/// Identical descriptors on both sides of the native boundary must describe
/// identical layouts. The bridge trusts this without re-validating bytes at
/// runtime; layout correctness is a build-time contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentMeta {
    pub name: &'static str,
    pub size: usize,
    pub align: usize,
    pub fields: &'static [FieldMeta],
}

/// Trait for component records the host may hand back by address.
///
/// The `Pod` bound is what makes the reinterpret in the update trampolines
/// sound on the Rust side: no drop glue, no padding-sensitive invariants,
/// any bit pattern valid.
pub trait HostComponent: Pod {
    /// Symbolic name used for host-side query matching.
    const NAME: &'static str;

    /// Ordered field layout, for diagnostics.
    const FIELDS: &'static [FieldMeta];

    /// Build the runtime descriptor for this component.
    fn meta() -> ComponentMeta {
        ComponentMeta {
            name: Self::NAME,
            size: size_of::<Self>(),
            align: align_of::<Self>(),
            fields: Self::FIELDS,
        }
    }
}

/// Name-indexed set of component descriptors for one plugin.
///
/// Built once at the start of the registration sequence and read-only
/// afterwards. Discovery uses it to resolve query names; the symbol table
/// uses it to know which per-component host symbols to bind.
#[derive(Debug)]
pub struct ComponentRegistry {
    metas: Vec<ComponentMeta>,
}

impl ComponentRegistry {
    /// Build a registry from the plugin's component manifest.
    ///
    /// Exact duplicates collapse to one entry; a name registered twice with
    /// a different layout is an authoring defect and fails the sequence.
    pub fn from_metas(metas: Vec<ComponentMeta>) -> Result<Self, BridgeError> {
        let mut unique: Vec<ComponentMeta> = Vec::with_capacity(metas.len());
        for meta in metas {
            match unique.iter().position(|m| m.name == meta.name) {
                Some(i) if unique[i] == meta => {}
                Some(_) => {
                    return Err(BridgeError::ComponentLayoutConflict { name: meta.name });
                }
                None => unique.push(meta),
            }
        }
        Ok(Self { metas: unique })
    }

    /// Look up a component descriptor by its symbolic name.
    pub fn lookup(&self, name: &str) -> Option<&ComponentMeta> {
        self.metas.iter().find(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentMeta> {
        self.metas.iter()
    }

    pub fn len(&self) -> usize {
        self.metas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metas.is_empty()
    }
}

/// Implement [`HostComponent`] for a `#[repr(C)]` POD struct.
///
/// # Example
/// ```ignore
/// #[repr(C)]
/// #[derive(Clone, Copy, Pod, Zeroable)]
/// struct Velocity { velocity: Vec3 }
///
/// define_component!(Velocity, "Velocity", velocity);
/// ```
#[macro_export]
macro_rules! define_component {
    ($ty:ty, $name:literal) => {
        impl $crate::HostComponent for $ty {
            const NAME: &'static str = $name;
            const FIELDS: &'static [$crate::FieldMeta] = &[];
        }
    };
    ($ty:ty, $name:literal, $($field:ident),+ $(,)?) => {
        impl $crate::HostComponent for $ty {
            const NAME: &'static str = $name;
            const FIELDS: &'static [$crate::FieldMeta] = &[
                $(
                    $crate::FieldMeta {
                        name: stringify!($field),
                        offset: ::core::mem::offset_of!($ty, $field),
                    },
                )+
            ];
        }
    };
}
