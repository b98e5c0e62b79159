// discovery.rs - Scan-and-validate pass over declared systems
//
// Turns raw SystemDecls into validated SystemDescriptors. Purely a
// validation pass: no side effects beyond the produced descriptors, and
// the first malformed declaration aborts the whole sequence.

use crate::component::ComponentRegistry;
use crate::descriptor::{SystemDecl, SystemDescriptor, SystemEntry, SystemKind};
use crate::error::BridgeError;
use crate::trampoline::MAX_QUERY_ARITY;

/// Capabilities of the discovery pass.
#[derive(Clone, Copy, Debug)]
pub struct DiscoveryConfig {
    /// Largest query the trampoline generator can service. Earlier hosts
    /// limited this to one component; the current unpack helpers go up to
    /// [`MAX_QUERY_ARITY`].
    pub max_query_arity: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_query_arity: MAX_QUERY_ARITY,
        }
    }
}

/// Validate every declared system and produce its descriptor.
///
/// Declaration order is preserved. Any malformed declaration fails the
/// whole pass; partial results are never returned.
pub fn discover(
    decls: &[SystemDecl],
    components: &ComponentRegistry,
    config: &DiscoveryConfig,
) -> Result<Vec<SystemDescriptor>, BridgeError> {
    let mut descriptors = Vec::with_capacity(decls.len());
    for decl in decls {
        let descriptor = match decl.kind {
            SystemKind::Startup => validate_startup(decl)?,
            SystemKind::Update => validate_update(decl, components, config)?,
        };
        tracing::debug!(
            system = descriptor.name(),
            kind = ?descriptor.kind(),
            arity = descriptor.components().len(),
            "discovered system"
        );
        descriptors.push(descriptor);
    }
    Ok(descriptors)
}

fn validate_startup(decl: &SystemDecl) -> Result<SystemDescriptor, BridgeError> {
    let well_formed = decl.query.is_none()
        && decl.params.is_empty()
        && matches!(decl.entry, SystemEntry::Startup(_));
    if !well_formed {
        return Err(BridgeError::InvalidStartupSignature { system: decl.name });
    }
    Ok(SystemDescriptor::new(
        decl.name,
        SystemKind::Startup,
        Vec::new(),
        decl.entry,
    ))
}

fn validate_update(
    decl: &SystemDecl,
    components: &ComponentRegistry,
    config: &DiscoveryConfig,
) -> Result<SystemDescriptor, BridgeError> {
    let query = decl
        .query
        .ok_or(BridgeError::MissingQueryDeclaration { system: decl.name })?;

    // An empty per-entity query has no defined semantics; anything above
    // the generator's tuple limit cannot be unpacked.
    if query.is_empty() || query.len() > config.max_query_arity {
        return Err(BridgeError::UnsupportedQueryArity {
            system: decl.name,
            arity: query.len(),
            max: config.max_query_arity,
        });
    }

    // Parameter list must be (delta_time, ref T1 .. ref Tn) matching the
    // query in count and order. The decl records only the component names;
    // dt is implicit in the callable shape.
    if query != decl.params || !matches!(decl.entry, SystemEntry::Update(_)) {
        return Err(BridgeError::SignatureMismatch {
            system: decl.name,
            declared: query.join(", "),
            actual: decl.params.join(", "),
        });
    }

    let mut metas = Vec::with_capacity(query.len());
    for &name in query {
        let meta = components
            .lookup(name)
            .ok_or(BridgeError::UnknownComponent {
                system: decl.name,
                component: name,
            })?;
        metas.push(*meta);
    }

    Ok(SystemDescriptor::new(
        decl.name,
        SystemKind::Update,
        metas,
        decl.entry,
    ))
}
