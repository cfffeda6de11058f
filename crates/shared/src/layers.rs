//! Boundary layer bookkeeping and the reconciliation diff.
//!
//! The navigator never touches the map directly. It computes which boundary
//! layers *should* be on the map ([`DesiredLayers`]), diffs that against what
//! is attached ([`ActiveLayers`]), and emits [`LayerOp`]s. Within one diff
//! every detach precedes every attach, so a slot never holds two layers.

use std::fmt;

/// Identifier of one attached layer, allocated by the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerHandle(pub u64);

impl fmt::Display for LayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct HandleAllocator {
    next: u64,
}

impl HandleAllocator {
    pub fn allocate(&mut self) -> LayerHandle {
        self.next += 1;
        LayerHandle(self.next)
    }
}

/// Which slot a layer occupies. Declaration order is stacking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    States,
    Districts,
    Search,
}

/// What a boundary layer shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerSpec {
    /// Every state of the country, clickable.
    States,
    /// Districts of one state, clickable.
    Districts { state: String },
    /// A single district matched by search.
    Search { state: String, district: String },
}

impl LayerSpec {
    pub fn kind(&self) -> LayerKind {
        match self {
            LayerSpec::States => LayerKind::States,
            LayerSpec::Districts { .. } => LayerKind::Districts,
            LayerSpec::Search { .. } => LayerKind::Search,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedLayer {
    pub handle: LayerHandle,
    pub spec: LayerSpec,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerOp {
    Attach { handle: LayerHandle, spec: LayerSpec },
    Detach { handle: LayerHandle, spec: LayerSpec },
}

/// Layers currently attached to the map, one optional slot per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveLayers {
    pub states: Option<AttachedLayer>,
    pub districts: Option<AttachedLayer>,
    pub search: Option<AttachedLayer>,
}

impl ActiveLayers {
    pub fn slot(&self, kind: LayerKind) -> Option<&AttachedLayer> {
        match kind {
            LayerKind::States => self.states.as_ref(),
            LayerKind::Districts => self.districts.as_ref(),
            LayerKind::Search => self.search.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: LayerKind) -> &mut Option<AttachedLayer> {
        match kind {
            LayerKind::States => &mut self.states,
            LayerKind::Districts => &mut self.districts,
            LayerKind::Search => &mut self.search,
        }
    }

    /// Record the effect of `ops`.
    pub fn apply(&mut self, ops: &[LayerOp]) {
        for op in ops {
            match op {
                LayerOp::Detach { handle, spec } => {
                    let slot = self.slot_mut(spec.kind());
                    if slot.as_ref().is_some_and(|l| l.handle == *handle) {
                        *slot = None;
                    }
                }
                LayerOp::Attach { handle, spec } => {
                    *self.slot_mut(spec.kind()) = Some(AttachedLayer {
                        handle: *handle,
                        spec: spec.clone(),
                    });
                }
            }
        }
    }

    pub fn handles(&self) -> Vec<LayerHandle> {
        [&self.states, &self.districts, &self.search]
            .into_iter()
            .flatten()
            .map(|l| l.handle)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_none() && self.districts.is_none() && self.search.is_none()
    }
}

/// Target layer set derived from the navigator state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredLayers {
    pub states: Option<LayerSpec>,
    pub districts: Option<LayerSpec>,
    pub search: Option<LayerSpec>,
}

impl DesiredLayers {
    fn slot(&self, kind: LayerKind) -> Option<&LayerSpec> {
        match kind {
            LayerKind::States => self.states.as_ref(),
            LayerKind::Districts => self.districts.as_ref(),
            LayerKind::Search => self.search.as_ref(),
        }
    }
}

const SLOTS: [LayerKind; 3] = [LayerKind::States, LayerKind::Districts, LayerKind::Search];

/// Diff attached layers against desired ones. A slot whose spec is unchanged
/// is left alone; otherwise the old layer is detached and the new one
/// attached under a fresh handle.
pub fn reconcile(
    current: &ActiveLayers,
    desired: &DesiredLayers,
    handles: &mut HandleAllocator,
) -> Vec<LayerOp> {
    let changed: Vec<LayerKind> = SLOTS
        .into_iter()
        .filter(|kind| current.slot(*kind).map(|l| &l.spec) != desired.slot(*kind))
        .collect();

    let detaches = changed.iter().filter_map(|kind| {
        current.slot(*kind).map(|l| LayerOp::Detach {
            handle: l.handle,
            spec: l.spec.clone(),
        })
    });
    let attaches: Vec<LayerOp> = changed
        .iter()
        .filter_map(|kind| desired.slot(*kind).cloned())
        .map(|spec| LayerOp::Attach {
            handle: handles.allocate(),
            spec,
        })
        .collect();

    detaches.chain(attaches).collect()
}
