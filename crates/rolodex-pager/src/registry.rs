use crate::descriptor::WindowDescriptor;
use rolodex_core::IndexKey;
use std::collections::HashMap;

/// Opaque identifier of one window. Ids are allocated from a monotonic
/// counter and never reused, so a completion for a discarded window can be
/// recognized and dropped.
pub type WindowId = u64;

/// Latest fetch outcome for a window.
#[derive(Debug, Clone)]
pub enum FetchState<R> {
    Pending,
    Loaded {
        rows: Vec<R>,
        index_keys: Vec<IndexKey>,
    },
    Failed(String),
}

impl<R> FetchState<R> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone)]
pub struct Window<R> {
    pub descriptor: WindowDescriptor,
    pub state: FetchState<R>,
    /// Bumped whenever the window's fetch is superseded (boundary pinning);
    /// completions carrying an older generation are stale.
    pub generation: u64,
}

impl<R> Window<R> {
    fn new(descriptor: WindowDescriptor) -> Self {
        Self {
            descriptor,
            state: FetchState::Pending,
            generation: 0,
        }
    }
}

/// Append-ordered collection of windows forming the current view.
///
/// The id sequence defines presentation order (ascending overall); the map
/// holds each window's descriptor and latest fetch state.
pub struct Registry<R> {
    order: Vec<WindowId>,
    windows: HashMap<WindowId, Window<R>>,
    next_id: WindowId,
}

impl<R> Registry<R> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            windows: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn ids(&self) -> &[WindowId] {
        &self.order
    }

    pub fn get(&self, id: WindowId) -> Option<&Window<R>> {
        self.windows.get(&id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window<R>> {
        self.windows.get_mut(&id)
    }

    pub fn first(&self) -> Option<(WindowId, &Window<R>)> {
        let id = *self.order.first()?;
        Some((id, &self.windows[&id]))
    }

    pub fn last(&self) -> Option<(WindowId, &Window<R>)> {
        let id = *self.order.last()?;
        Some((id, &self.windows[&id]))
    }

    /// Add a window at the bottom of the presentation order.
    pub fn append(&mut self, descriptor: WindowDescriptor) -> WindowId {
        let id = self.allocate(descriptor);
        self.order.push(id);
        id
    }

    /// Add a window at the top of the presentation order.
    pub fn prepend(&mut self, descriptor: WindowDescriptor) -> WindowId {
        let id = self.allocate(descriptor);
        self.order.insert(0, id);
        id
    }

    /// Discard every window. Ids stay retired, so late completions for the
    /// discarded windows no longer resolve.
    pub fn clear(&mut self) {
        self.order.clear();
        self.windows.clear();
    }

    /// Windows in presentation order.
    pub fn iter(&self) -> impl Iterator<Item = (WindowId, &Window<R>)> {
        self.order.iter().map(move |id| (*id, &self.windows[id]))
    }

    fn allocate(&mut self, descriptor: WindowDescriptor) -> WindowId {
        let id = self.next_id;
        self.next_id += 1;
        self.windows.insert(id, Window::new(descriptor));
        id
    }
}

impl<R> Default for Registry<R> {
    fn default() -> Self {
        Self::new()
    }
}
