// trampoline.rs - Native-callable entry points for discovered systems
//
// The host calls every update system through the fixed signature
// `(dt, pointer_array)`. Each system needs its own entry point that
// reinterprets `pointer_array[i]` as the i-th declared component type and
// calls the typed function. Those adapters are generated here by
// monomorphization: one `extern "C"` instantiation per system marker type,
// so the slot-to-type mapping is fixed at build time and never re-derived
// per call.

use crate::component::HostComponent;
use crate::descriptor::{SystemDescriptor, SystemEntry, SystemKind};
use std::ffi::c_void;

/// Largest query the tuple unpack implementations cover.
pub const MAX_QUERY_ARITY: usize = 8;

/// An ordered tuple of component types an update system requires.
///
/// Implemented for `(A,)` through 8-tuples of [`HostComponent`] types.
pub trait Query {
    /// Slot count, equal to the tuple arity.
    const ARITY: usize;

    /// Ordered component names, matching the tuple order.
    const NAMES: &'static [&'static str];

    /// The typed argument pack handed to the system function.
    type Refs<'a>;

    /// Reinterpret the host-supplied slot array as typed references.
    ///
    /// # Safety
    /// `slots` must point at at least `ARITY` addresses, each a valid,
    /// exclusive pointer to a live value of the corresponding tuple type.
    /// The host guarantees this by construction: it hands back addresses in
    /// the exact component order this query was registered with.
    unsafe fn unpack<'a>(slots: *const *mut c_void) -> Self::Refs<'a>;
}

macro_rules! impl_query_tuple {
    ($($ty:ident => $idx:tt),+) => {
        impl<$($ty: HostComponent),+> Query for ($($ty,)+) {
            const ARITY: usize = Self::NAMES.len();
            const NAMES: &'static [&'static str] = &[$($ty::NAME),+];
            type Refs<'a> = ($(&'a mut $ty,)+);

            #[inline(always)]
            unsafe fn unpack<'a>(slots: *const *mut c_void) -> Self::Refs<'a> {
                ($(&mut *(*slots.add($idx) as *mut $ty),)+)
            }
        }
    };
}

impl_query_tuple!(A => 0);
impl_query_tuple!(A => 0, B => 1);
impl_query_tuple!(A => 0, B => 1, C => 2);
impl_query_tuple!(A => 0, B => 1, C => 2, D => 3);
impl_query_tuple!(A => 0, B => 1, C => 2, D => 3, E => 4);
impl_query_tuple!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5);
impl_query_tuple!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6);
impl_query_tuple!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6, H => 7);

/// A function that runs once at startup, taking nothing and returning
/// nothing.
pub trait StartupSystem {
    const NAME: &'static str;
    fn run();
}

/// A function invoked per entity with `(delta_time, ref T1 .. ref Tn)`.
pub trait UpdateSystem {
    const NAME: &'static str;
    type Query: Query;
    fn run(dt: f32, refs: <Self::Query as Query>::Refs<'_>);
}

/// Native entry point for a startup system. Takes no arguments and simply
/// invokes the zero-parameter callable.
pub unsafe extern "C" fn startup_entry<S: StartupSystem>() {
    S::run();
}

/// Native entry point for an update system.
///
/// `dt` is passed through unmodified; time-step handling belongs to the
/// individual system. In the default build nothing about `slots` is
/// validated: the host supplying exactly `ARITY` valid, correctly-typed
/// addresses in registered order is a documented trust boundary. The
/// `checked-dispatch` feature adds a null-prefix check (the ABI does not
/// transmit the array length, so null slots are the observable proxy for
/// an arity violation) and aborts with a `TrampolineArityViolation`
/// diagnostic instead of dereferencing garbage.
pub unsafe extern "C" fn update_entry<S: UpdateSystem>(dt: f32, slots: *const *mut c_void) {
    #[cfg(feature = "checked-dispatch")]
    {
        for i in 0..<S::Query as Query>::ARITY {
            if slots.is_null() || (*slots.add(i)).is_null() {
                tracing::error!(
                    system = S::NAME,
                    slot = i,
                    expected = <S::Query as Query>::ARITY,
                    "TrampolineArityViolation: host supplied a short or null pointer array"
                );
                // Unwinding across the C boundary is not an option.
                std::process::abort();
            }
        }
    }
    let refs = <S::Query as Query>::unpack(slots);
    S::run(dt, refs);
}

/// A registered-or-registrable native entry point paired with its
/// descriptor.
///
/// Once handed to the host, the entry point and the descriptor backing it
/// must stay reachable for the remaining process lifetime; the host may
/// call at any future time without re-announcing.
pub struct Trampoline {
    descriptor: SystemDescriptor,
}

impl Trampoline {
    /// Package a validated descriptor for registration.
    ///
    /// Descriptors arrive here only through discovery, which already
    /// rejected empty update queries and malformed startups; the asserts
    /// restate those invariants for hand-built descriptors in tests.
    pub(crate) fn generate(descriptor: SystemDescriptor) -> Self {
        match descriptor.kind() {
            SystemKind::Startup => {
                debug_assert!(descriptor.components().is_empty());
                debug_assert!(matches!(descriptor.entry(), SystemEntry::Startup(_)));
            }
            SystemKind::Update => {
                debug_assert!(!descriptor.components().is_empty());
                debug_assert!(matches!(descriptor.entry(), SystemEntry::Update(_)));
            }
        }
        Self { descriptor }
    }

    pub fn descriptor(&self) -> &SystemDescriptor {
        &self.descriptor
    }
}
