use crate::descriptor::WindowDescriptor;
use crate::projection::{self, ListView};
use crate::registry::{FetchState, Registry, WindowId};
use rolodex_core::{IndexKey, PageRequest, PageResponse, RolodexResult};

/// An effect produced by a traversal operation: fetch this request on behalf
/// of this window. The generation ties the eventual completion back to the
/// descriptor revision that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCommand {
    pub window: WindowId,
    pub generation: u64,
    pub request: PageRequest,
}

/// The windowed-pagination state machine.
///
/// Holds the window registry and applies traversal operations and fetch
/// completions to it. Every mutating call returns the fetch commands it
/// produced; the caller (normally [`crate::PagerService`]) is responsible
/// for executing them and feeding the outcomes back through
/// [`Paginator::complete_fetch`]. The machine itself never blocks and never
/// performs IO.
pub struct Paginator<R> {
    registry: Registry<R>,
    target_page_len: usize,
    /// Key of the jump currently defining the registry, used to swallow
    /// repeated jump signals for the same target.
    active_jump: Option<IndexKey>,
}

impl<R> Paginator<R> {
    /// Create the controller with its initial whole-table window and return
    /// the bootstrap fetch command alongside it.
    pub fn new(target_page_len: usize) -> (Self, Vec<FetchCommand>) {
        let mut paginator = Self {
            registry: Registry::new(),
            target_page_len,
            active_jump: None,
        };
        let id = paginator.registry.append(WindowDescriptor::whole_table());
        let commands = vec![paginator.command_for(id)];
        (paginator, commands)
    }

    pub fn registry(&self) -> &Registry<R> {
        &self.registry
    }

    /// Grow the list downward: append an open-ended window resuming where
    /// the last window stops.
    ///
    /// A no-op while the last window's lower edge is still being pinned, and
    /// once the table is exhausted in that direction.
    pub fn extend_forward(&mut self) -> Vec<FetchCommand> {
        let Some((_, last)) = self.registry.last() else {
            return Vec::new();
        };
        let (key, inclusive) = last.descriptor.table_high_bound();
        let Some(key) = key else {
            tracing::debug!("extend forward skipped: last window still pinning");
            return Vec::new();
        };
        if key.is_empty() {
            tracing::debug!("extend forward skipped: at end of table");
            return Vec::new();
        }

        let descriptor = WindowDescriptor::ascending_from(key.clone(), !inclusive);
        tracing::debug!("extending forward from {}", key);
        self.active_jump = None;
        let id = self.registry.append(descriptor);
        vec![self.command_for(id)]
    }

    /// Grow the list upward: prepend a descending window reading downward
    /// from the first window's lower table bound.
    ///
    /// A no-op when the view already reaches the table start, and while the
    /// first window is unresolved — in particular, at most one backward
    /// extension may be outstanding at a time.
    pub fn extend_backward(&mut self) -> Vec<FetchCommand> {
        let Some((_, first)) = self.registry.first() else {
            return Vec::new();
        };
        if !first.descriptor.is_pinned() {
            tracing::debug!("extend backward skipped: first window unresolved");
            return Vec::new();
        }
        let (key, inclusive) = first.descriptor.table_low_bound();
        let Some(key) = key else {
            tracing::debug!("extend backward skipped: view covers table start");
            return Vec::new();
        };
        if key.is_empty() {
            tracing::debug!("extend backward skipped: at start of table");
            return Vec::new();
        }

        let descriptor = WindowDescriptor::descending_from(key.clone(), !inclusive);
        tracing::debug!("extending backward from {}", key);
        self.active_jump = None;
        let id = self.registry.prepend(descriptor);
        vec![self.command_for(id)]
    }

    /// Drop every window and restart the list at `key`.
    ///
    /// In-flight fetches for the discarded windows are implicitly abandoned;
    /// their completions arrive for retired ids and are ignored. A repeated
    /// jump to the currently active target is swallowed.
    pub fn jump_to_key(&mut self, key: IndexKey) -> Vec<FetchCommand> {
        if self.active_jump.as_ref() == Some(&key) {
            tracing::debug!("jump to {} skipped: already the active target", key);
            return Vec::new();
        }
        tracing::info!("jumping to {}", key);
        self.registry.clear();
        let descriptor = WindowDescriptor::ascending_from(key.clone(), true);
        self.active_jump = Some(key);
        let id = self.registry.append(descriptor);
        vec![self.command_for(id)]
    }

    /// Apply a fetch completion.
    ///
    /// Completions for retired windows or superseded generations are
    /// dropped. A page arriving for a window whose boundary is still open
    /// pins the boundary to the last observed key (or the end-of-table key
    /// when the page was empty) and re-issues the fetch for the now-fixed
    /// range; a pinned window simply records its rows. Failures park the
    /// window in a failed state surfaced by the projection.
    pub fn complete_fetch(
        &mut self,
        window: WindowId,
        generation: u64,
        outcome: RolodexResult<PageResponse<R>>,
    ) -> Vec<FetchCommand> {
        let target_page_len = self.target_page_len;
        let Some(entry) = self.registry.get_mut(window) else {
            tracing::debug!("dropping completion for retired window {}", window);
            return Vec::new();
        };
        if entry.generation != generation {
            tracing::debug!(
                "dropping superseded completion for window {} (generation {} < {})",
                window,
                generation,
                entry.generation
            );
            return Vec::new();
        }

        match outcome {
            Err(error) => {
                tracing::warn!("fetch for window {} failed: {}", window, error);
                entry.state = FetchState::Failed(error.to_string());
                // The jump that created this window did not complete; allow
                // the same target to be requested again.
                self.active_jump = None;
                Vec::new()
            }
            Ok(page) => {
                if entry.descriptor.is_pinned() {
                    entry.state = FetchState::Loaded {
                        rows: page.rows,
                        index_keys: page.index_keys,
                    };
                    return Vec::new();
                }

                // Pin the open boundary to the true extent of the page and
                // refetch the now-fixed range. The refetch supersedes this
                // result; the registry reads as loading until it lands.
                let pinned = page.last_key().cloned().unwrap_or_else(IndexKey::empty);
                tracing::debug!("pinning window {} at {}", window, pinned);
                entry.descriptor.pin_end(pinned);
                entry.generation += 1;
                entry.state = FetchState::Pending;
                let command = FetchCommand {
                    window,
                    generation: entry.generation,
                    request: entry.descriptor.to_request(target_page_len),
                };
                vec![command]
            }
        }
    }

    fn command_for(&self, window: WindowId) -> FetchCommand {
        let entry = self
            .registry
            .get(window)
            .expect("command requested for a window just inserted");
        FetchCommand {
            window,
            generation: entry.generation,
            request: entry.descriptor.to_request(self.target_page_len),
        }
    }
}

impl<R: Clone> Paginator<R> {
    /// Flatten the registry into the current linear view.
    pub fn project(&self) -> RolodexResult<ListView<R>> {
        projection::project(&self.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ListEntry;
    use rolodex_core::{Direction, RolodexError};

    fn key(s: &str) -> IndexKey {
        IndexKey::text(s)
    }

    fn page(rows: &[&str], keys: &[&str]) -> RolodexResult<PageResponse<String>> {
        Ok(PageResponse {
            rows: rows.iter().map(|r| r.to_string()).collect(),
            index_keys: keys.iter().map(|k| key(k)).collect(),
        })
    }

    /// Drive a window through pin-and-refetch with a fixed page, returning
    /// the refetch command it produced.
    fn load(paginator: &mut Paginator<String>, command: &FetchCommand, rows: &[&str], keys: &[&str]) {
        let refetch = paginator.complete_fetch(command.window, command.generation, page(rows, keys));
        assert_eq!(refetch.len(), 1, "unpinned window should refetch once");
        let refetch = &refetch[0];
        let done = paginator.complete_fetch(refetch.window, refetch.generation, page(rows, keys));
        assert!(done.is_empty(), "pinned refetch should settle");
    }

    fn rows_of(view: &ListView<String>) -> Vec<Option<String>> {
        view.entries
            .iter()
            .map(|e| match e {
                ListEntry::Placeholder => None,
                ListEntry::Row(r) => Some(r.clone()),
            })
            .collect()
    }

    #[test]
    fn test_bootstrap_issues_whole_table_fetch() {
        let (paginator, commands) = Paginator::<String>::new(2);
        assert_eq!(commands.len(), 1);
        let request = &commands[0].request;
        assert_eq!(request.start, None);
        assert_eq!(request.end, None);
        assert_eq!(request.order, Direction::Ascending);
        assert_eq!(request.target_len, 2);
        assert_eq!(paginator.registry().len(), 1);
    }

    #[test]
    fn test_refinement_pins_end_and_refetches() {
        let (mut paginator, commands) = Paginator::<String>::new(2);
        let boot = &commands[0];

        let refetch = paginator.complete_fetch(boot.window, boot.generation, page(&["a", "b"], &["A", "B"]));
        assert_eq!(refetch.len(), 1);
        assert_eq!(refetch[0].window, boot.window);
        assert_eq!(refetch[0].generation, 1);
        assert_eq!(refetch[0].request.end, Some(key("B")));
        assert!(refetch[0].request.end_inclusive);

        // While the refetch is out, the window reads as loading.
        let view = paginator.project().unwrap();
        assert_eq!(rows_of(&view), vec![None]);

        let done = paginator.complete_fetch(boot.window, 1, page(&["a", "b"], &["A", "B"]));
        assert!(done.is_empty());
        let view = paginator.project().unwrap();
        assert_eq!(rows_of(&view), vec![Some("a".into()), Some("b".into())]);
    }

    #[test]
    fn test_pinning_fires_once_and_preserves_the_start() {
        let (mut paginator, commands) = Paginator::<String>::new(2);
        let boot = &commands[0];
        load(&mut paginator, boot, &["a", "b"], &["A", "B"]);

        let (_, window) = paginator.registry().first().unwrap();
        let before = window.descriptor.clone();
        assert_eq!(before.start, None);
        assert_eq!(before.end, Some(key("B")));

        // A further completion for the pinned window must not move either
        // boundary or trigger another refetch.
        let commands = paginator.complete_fetch(boot.window, 1, page(&["a", "b"], &["A", "B"]));
        assert!(commands.is_empty());
        let (_, window) = paginator.registry().first().unwrap();
        assert_eq!(window.descriptor, before);
    }

    #[test]
    fn test_extend_forward_walks_to_the_end_of_table() {
        // Table [A], [B], [C] with a target page length of 2.
        let (mut paginator, commands) = Paginator::<String>::new(2);
        load(&mut paginator, &commands[0], &["a", "b"], &["A", "B"]);

        let commands = paginator.extend_forward();
        assert_eq!(commands.len(), 1);
        let second = &commands[0];
        assert_eq!(second.request.start, Some(key("B")));
        assert!(!second.request.start_inclusive);
        assert_eq!(second.request.end, None);

        load(&mut paginator, second, &["c"], &["C"]);
        let (_, window) = paginator.registry().last().unwrap();
        assert_eq!(window.descriptor.end, Some(key("C")));

        // The third window finds nothing and pins at the end of the table.
        let commands = paginator.extend_forward();
        assert_eq!(commands.len(), 1);
        let third = &commands[0];
        assert_eq!(third.request.start, Some(key("C")));
        load(&mut paginator, third, &[], &[]);
        let (_, window) = paginator.registry().last().unwrap();
        assert_eq!(window.descriptor.end, Some(IndexKey::empty()));

        // Exhausted: further extension leaves the registry unchanged.
        let ids = paginator.registry().ids().to_vec();
        for _ in 0..3 {
            assert!(paginator.extend_forward().is_empty());
        }
        assert_eq!(paginator.registry().ids(), ids);

        let view = paginator.project().unwrap();
        assert_eq!(
            rows_of(&view),
            vec![Some("a".into()), Some("b".into()), Some("c".into())]
        );
    }

    #[test]
    fn test_extend_forward_waits_for_pinning() {
        let (mut paginator, _) = Paginator::<String>::new(2);
        // Bootstrap fetch is still out: the last window has no usable edge.
        assert!(paginator.extend_forward().is_empty());
        assert_eq!(paginator.registry().len(), 1);
    }

    #[test]
    fn test_empty_table_pins_to_end_and_stays_put() {
        let (mut paginator, commands) = Paginator::<String>::new(2);
        load(&mut paginator, &commands[0], &[], &[]);

        let (_, window) = paginator.registry().first().unwrap();
        assert_eq!(window.descriptor.end, Some(IndexKey::empty()));

        assert!(paginator.extend_forward().is_empty());
        assert_eq!(paginator.registry().len(), 1);
        let view = paginator.project().unwrap();
        assert!(view.entries.is_empty());
        assert_eq!(view.trigger, None);
    }

    #[test]
    fn test_jump_replaces_the_whole_registry() {
        let (mut paginator, commands) = Paginator::<String>::new(2);
        load(&mut paginator, &commands[0], &["a", "b"], &["A", "B"]);
        paginator.extend_forward();
        assert_eq!(paginator.registry().len(), 2);

        let commands = paginator.jump_to_key(key("M"));
        assert_eq!(commands.len(), 1);
        assert_eq!(paginator.registry().len(), 1);
        let (_, window) = paginator.registry().first().unwrap();
        assert_eq!(window.descriptor.start, Some(key("M")));
        assert!(window.descriptor.start_inclusive);
        assert_eq!(window.descriptor.end, None);
        assert_eq!(window.descriptor.direction, Direction::Ascending);
    }

    #[test]
    fn test_repeated_jump_to_same_key_is_swallowed() {
        let (mut paginator, _) = Paginator::<String>::new(2);
        let first = paginator.jump_to_key(key("M"));
        assert_eq!(first.len(), 1);
        let ids = paginator.registry().ids().to_vec();

        let second = paginator.jump_to_key(key("M"));
        assert!(second.is_empty());
        assert_eq!(paginator.registry().ids(), ids);

        // A different target always goes through.
        let third = paginator.jump_to_key(key("S"));
        assert_eq!(third.len(), 1);
    }

    #[test]
    fn test_extending_reactivates_the_jump_target() {
        let (mut paginator, _) = Paginator::<String>::new(2);
        let commands = paginator.jump_to_key(key("M"));
        load(&mut paginator, &commands[0], &["m"], &["M1"]);

        // Scrolling away from the jump makes the same letter meaningful
        // again.
        assert_eq!(paginator.extend_forward().len(), 1);
        assert_eq!(paginator.jump_to_key(key("M")).len(), 1);
    }

    #[test]
    fn test_late_completion_for_discarded_window_is_ignored() {
        let (mut paginator, commands) = Paginator::<String>::new(2);
        let boot = commands[0].clone();
        paginator.jump_to_key(key("M"));

        // The bootstrap fetch resolves after the jump discarded its window.
        let commands = paginator.complete_fetch(boot.window, boot.generation, page(&["a"], &["A"]));
        assert!(commands.is_empty());
        assert_eq!(paginator.registry().len(), 1);
        let (_, window) = paginator.registry().first().unwrap();
        assert_eq!(window.descriptor.start, Some(key("M")));
        assert!(window.state.is_pending());
    }

    #[test]
    fn test_superseded_generation_is_ignored() {
        let (mut paginator, commands) = Paginator::<String>::new(2);
        let boot = &commands[0];
        // Pinning bumps the window to generation 1.
        paginator.complete_fetch(boot.window, boot.generation, page(&["a", "b"], &["A", "B"]));

        // A duplicate of the generation-0 result must not disturb the
        // outstanding refetch.
        let commands = paginator.complete_fetch(boot.window, 0, page(&["a", "b"], &["A", "B"]));
        assert!(commands.is_empty());
        let (_, window) = paginator.registry().first().unwrap();
        assert!(window.state.is_pending());
        assert_eq!(window.generation, 1);
    }

    #[test]
    fn test_extend_backward_needs_a_resolved_first_window() {
        let (mut paginator, _) = Paginator::<String>::new(2);
        // Whole-table window covers the table start: nothing above it.
        assert!(paginator.extend_backward().is_empty());

        let commands = paginator.jump_to_key(key("M"));
        // Unpinned first window: still resolving.
        assert!(paginator.extend_backward().is_empty());

        load(&mut paginator, &commands[0], &["m"], &["M1"]);
        let commands = paginator.extend_backward();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].request.order, Direction::Descending);
        assert_eq!(commands[0].request.start, Some(key("M")));
        assert!(!commands[0].request.start_inclusive);

        // Only one unresolved backward extension at a time.
        assert!(paginator.extend_backward().is_empty());
    }

    #[test]
    fn test_descending_window_projects_in_ascending_position() {
        let (mut paginator, _) = Paginator::<String>::new(2);
        let jump = paginator.jump_to_key(key("M"));
        assert_eq!(paginator.registry().len(), 1);
        load(&mut paginator, &jump[0], &["m1", "n1"], &["M1", "N1"]);

        let back = paginator.extend_backward();
        assert_eq!(back.len(), 1);
        // The page below "M" arrives highest-first, as traversed.
        let refetch =
            paginator.complete_fetch(back[0].window, back[0].generation, page(&["l2", "l1"], &["L2", "L1"]));
        assert_eq!(refetch.len(), 1);
        let request = &refetch[0].request;
        // Pinned at the lowest observed key; the refetch re-reads the same
        // fixed slice, still downward.
        assert_eq!(request.start, Some(key("M")));
        assert!(!request.start_inclusive);
        assert_eq!(request.end, Some(key("L1")));
        assert!(request.end_inclusive);
        assert_eq!(request.order, Direction::Descending);

        let done = paginator.complete_fetch(refetch[0].window, refetch[0].generation, page(&["l2", "l1"], &["L2", "L1"]));
        assert!(done.is_empty());

        // Presentation order is globally ascending: the descending window's
        // rows come out reversed, above the jump window's rows.
        let view = paginator.project().unwrap();
        assert_eq!(
            rows_of(&view),
            vec![
                Some("l1".into()),
                Some("l2".into()),
                Some("m1".into()),
                Some("n1".into())
            ]
        );
    }

    #[test]
    fn test_extend_backward_stops_at_table_start() {
        let (mut paginator, _) = Paginator::<String>::new(2);
        let jump = paginator.jump_to_key(key("B"));
        load(&mut paginator, &jump[0], &["b"], &["B1"]);

        let back = paginator.extend_backward();
        // Nothing exists below "B": the window pins at the table start.
        let refetch = paginator.complete_fetch(back[0].window, back[0].generation, page(&[], &[]));
        assert_eq!(refetch.len(), 1);
        let done = paginator.complete_fetch(refetch[0].window, refetch[0].generation, page(&[], &[]));
        assert!(done.is_empty());

        let (_, first) = paginator.registry().first().unwrap();
        assert_eq!(first.descriptor.end, Some(IndexKey::empty()));
        assert!(paginator.extend_backward().is_empty());
    }

    #[test]
    fn test_failed_fetch_poisons_the_projection() {
        let (mut paginator, commands) = Paginator::<String>::new(2);
        let boot = &commands[0];
        let followups = paginator.complete_fetch(
            boot.window,
            boot.generation,
            Err(RolodexError::PageFetch("connection reset".into())),
        );
        assert!(followups.is_empty());

        let error = paginator.project().unwrap_err();
        assert!(matches!(error, RolodexError::ListUnavailable(_)));
    }

    #[test]
    fn test_failure_leaves_the_registry_shape_unchanged() {
        let (mut paginator, commands) = Paginator::<String>::new(2);
        let boot = &commands[0];
        let ids = paginator.registry().ids().to_vec();
        paginator.complete_fetch(
            boot.window,
            boot.generation,
            Err(RolodexError::PageFetch("connection reset".into())),
        );
        assert_eq!(paginator.registry().ids(), ids);
        let (_, window) = paginator.registry().first().unwrap();
        assert_eq!(window.descriptor, WindowDescriptor::whole_table());
    }
}
