// macros.rs - Declarative surface for marking systems
//
// These are the only authoring contract game code must satisfy: mark a
// function as startup or update, and for update restate its query. The
// macros emit a zero-sized marker type whose trait impl calls the real
// function, so a declaration that disagrees with the function's actual
// signature fails to compile; the raw `SystemDecl` path stays available
// for hosts that build their call-list by hand.

/// Declare a startup system.
///
/// The function must take no arguments and return nothing. The marker type
/// takes the visibility written before its name, so it can match the
/// visibility of the component types its module exposes.
///
/// # Example
/// ```ignore
/// fn spawn_scene() { /* ... */ }
/// startup_system!(pub SpawnScene = spawn_scene);
///
/// let decls = [SpawnScene::decl()];
/// ```
#[macro_export]
macro_rules! startup_system {
    ($vis:vis $marker:ident = $func:ident) => {
        $vis struct $marker;

        impl $crate::StartupSystem for $marker {
            const NAME: &'static str = stringify!($func);
            fn run() {
                $func()
            }
        }

        impl $marker {
            pub const fn decl() -> $crate::SystemDecl {
                $crate::SystemDecl {
                    name: stringify!($func),
                    kind: $crate::SystemKind::Startup,
                    query: None,
                    params: &[],
                    entry: $crate::SystemEntry::Startup($crate::startup_entry::<$marker>),
                }
            }
        }
    };
}

/// Declare a per-entity update system together with its query.
///
/// The restated signature is the query declaration: component order here is
/// the order the host will hand back addresses in. The function itself must
/// be `fn(f32, &mut T1, .., &mut Tn)` with the same types in the same
/// order; anything else is a compile error.
///
/// # Example
/// ```ignore
/// fn apply_velocity(dt: f32, transform: &mut Transform, velocity: &mut Velocity) { /* ... */ }
/// update_system!(pub ApplyVelocity = apply_velocity(transform: Transform, velocity: Velocity));
/// ```
#[macro_export]
macro_rules! update_system {
    ($vis:vis $marker:ident = $func:ident ( $($param:ident : $comp:ty),+ $(,)? )) => {
        $vis struct $marker;

        impl $crate::UpdateSystem for $marker {
            const NAME: &'static str = stringify!($func);
            type Query = ($($comp,)+);
            fn run(dt: f32, refs: <Self::Query as $crate::Query>::Refs<'_>) {
                let ($($param,)+) = refs;
                $func(dt, $($param),+)
            }
        }

        impl $marker {
            pub const fn decl() -> $crate::SystemDecl {
                $crate::SystemDecl {
                    name: stringify!($func),
                    kind: $crate::SystemKind::Update,
                    query: Some(<($($comp,)+) as $crate::Query>::NAMES),
                    params: <($($comp,)+) as $crate::Query>::NAMES,
                    entry: $crate::SystemEntry::Update($crate::update_entry::<$marker>),
                }
            }
        }
    };
}

/// Collect the metadata of every component type the plugin exposes.
///
/// # Example
/// ```ignore
/// let manifest = components![Transform, Velocity, Player];
/// ```
#[macro_export]
macro_rules! components {
    ($($ty:ty),+ $(,)?) => {
        vec![$(<$ty as $crate::HostComponent>::meta()),+]
    };
}

#[cfg(test)]
mod tests {
    use crate::define_component;
    use crate::{SystemEntry, SystemKind};
    use bytemuck::{Pod, Zeroable};
    use std::sync::atomic::{AtomicU32, Ordering};

    #[repr(C)]
    #[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
    struct Counter {
        ticks: u32,
    }
    define_component!(Counter, "Counter", ticks);

    static BOOTED: AtomicU32 = AtomicU32::new(0);

    fn boot() {
        BOOTED.fetch_add(1, Ordering::SeqCst);
    }
    startup_system!(Boot = boot);

    fn advance(dt: f32, counter: &mut Counter) {
        counter.ticks += dt as u32;
    }
    update_system!(Advance = advance(counter: Counter));

    #[test]
    fn startup_decl_has_no_query() {
        let decl = Boot::decl();
        assert_eq!(decl.name, "boot");
        assert_eq!(decl.kind, SystemKind::Startup);
        assert!(decl.query.is_none());
        assert!(decl.params.is_empty());
        assert!(matches!(decl.entry, SystemEntry::Startup(_)));
    }

    #[test]
    fn update_decl_carries_query_and_matching_params() {
        let decl = Advance::decl();
        assert_eq!(decl.name, "advance");
        assert_eq!(decl.kind, SystemKind::Update);
        assert_eq!(decl.query, Some(&["Counter"][..]));
        assert_eq!(decl.params, ["Counter"]);
        assert!(matches!(decl.entry, SystemEntry::Update(_)));
    }

    #[test]
    fn generated_entry_dispatches_to_the_function() {
        let mut counter = Counter { ticks: 5 };
        let slots = [&mut counter as *mut Counter as *mut std::ffi::c_void];
        match Advance::decl().entry {
            SystemEntry::Update(entry) => unsafe { entry(3.0, slots.as_ptr()) },
            SystemEntry::Startup(_) => unreachable!(),
        }
        assert_eq!(counter.ticks, 8);
    }

    #[test]
    fn component_manifest_collects_metas() {
        let manifest = components![Counter];
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest[0].name, "Counter");
    }
}
