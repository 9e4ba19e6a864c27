use crate::registry::{FetchState, Registry};
use rolodex_core::{RolodexError, RolodexResult};

/// One slot in the flattened list: either a loaded row or a placeholder
/// standing in for a window whose fetch is still out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry<R> {
    Placeholder,
    Row(R),
}

/// The registry flattened into one linear, presentation-ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView<R> {
    pub entries: Vec<ListEntry<R>>,
    /// Index of the last loaded row — the point whose visibility should
    /// request a forward extension. `None` while nothing is loaded.
    pub trigger: Option<usize>,
}

impl<R> ListView<R> {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            trigger: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any window is still loading.
    pub fn has_placeholders(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, ListEntry::Placeholder))
    }

    /// The loaded rows in presentation order, skipping placeholders.
    pub fn rows(&self) -> Vec<&R> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                ListEntry::Placeholder => None,
                ListEntry::Row(row) => Some(row),
            })
            .collect()
    }
}

/// A published copy of the projection, as observed by the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewSnapshot<R> {
    Ready(ListView<R>),
    Failed(String),
}

impl<R> ViewSnapshot<R> {
    pub fn ready(&self) -> Option<&ListView<R>> {
        match self {
            Self::Ready(view) => Some(view),
            Self::Failed(_) => None,
        }
    }
}

impl<R> From<RolodexResult<ListView<R>>> for ViewSnapshot<R> {
    fn from(result: RolodexResult<ListView<R>>) -> Self {
        match result {
            Ok(view) => Self::Ready(view),
            Err(error) => Self::Failed(error.to_string()),
        }
    }
}

/// Flatten the windows in presentation order.
///
/// Each pending window contributes a single placeholder. A descending
/// window's rows were fetched highest-first and are reversed here so the
/// whole sequence reads in ascending table order. Any failed window makes
/// the entire view unavailable — a gap in the middle of an ordered list is
/// worse than no list.
pub fn project<R: Clone>(registry: &Registry<R>) -> RolodexResult<ListView<R>> {
    let mut entries = Vec::new();
    for (_, window) in registry.iter() {
        match &window.state {
            FetchState::Pending => entries.push(ListEntry::Placeholder),
            FetchState::Failed(message) => {
                return Err(RolodexError::ListUnavailable(message.clone()));
            }
            FetchState::Loaded { rows, .. } => {
                if window.descriptor.direction.is_descending() {
                    entries.extend(rows.iter().rev().cloned().map(ListEntry::Row));
                } else {
                    entries.extend(rows.iter().cloned().map(ListEntry::Row));
                }
            }
        }
    }

    let trigger = entries
        .iter()
        .rposition(|entry| matches!(entry, ListEntry::Row(_)));
    Ok(ListView { entries, trigger })
}
