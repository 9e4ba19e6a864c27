use crate::paginator::{FetchCommand, Paginator};
use crate::projection::{ListView, ViewSnapshot};
use crate::registry::WindowId;
use rolodex_core::{IndexKey, PageResponse, PageSource, RolodexError, RolodexResult};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// Discrete inputs to the pager loop. Traversal signals come from the
/// caller; fetch completions are routed back in by the spawned fetch tasks,
/// so every registry mutation happens on the one loop task.
enum Signal<R> {
    ExtendForward,
    ExtendBackward,
    JumpTo(IndexKey),
    FetchDone {
        window: WindowId,
        generation: u64,
        outcome: RolodexResult<PageResponse<R>>,
    },
    /// Acknowledged once every signal sent before it has been applied.
    Sync(oneshot::Sender<()>),
    Shutdown,
}

/// Spawns the pager loop for a page source.
pub struct PagerService;

impl PagerService {
    /// Start a pager over `source` and return the handle the caller drives
    /// it through. The initial whole-table fetch is issued immediately.
    pub fn spawn<S>(source: Arc<S>, target_page_len: usize) -> PagerHandle<S::Row>
    where
        S: PageSource + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let (paginator, commands) = Paginator::new(target_page_len);
        let (view_tx, view_rx) = watch::channel(snapshot_of(&paginator));

        for command in commands {
            spawn_fetch(Arc::clone(&source), tx.clone(), command);
        }
        tokio::spawn(run(paginator, source, rx, tx.clone(), view_tx));

        PagerHandle { tx, view_rx }
    }
}

async fn run<S>(
    mut paginator: Paginator<S::Row>,
    source: Arc<S>,
    mut rx: mpsc::UnboundedReceiver<Signal<S::Row>>,
    tx: mpsc::UnboundedSender<Signal<S::Row>>,
    view_tx: watch::Sender<ViewSnapshot<S::Row>>,
) where
    S: PageSource + 'static,
{
    while let Some(signal) = rx.recv().await {
        let commands = match signal {
            Signal::ExtendForward => paginator.extend_forward(),
            Signal::ExtendBackward => paginator.extend_backward(),
            Signal::JumpTo(key) => paginator.jump_to_key(key),
            Signal::FetchDone {
                window,
                generation,
                outcome,
            } => paginator.complete_fetch(window, generation, outcome),
            Signal::Sync(ack) => {
                let _ = ack.send(());
                continue;
            }
            Signal::Shutdown => break,
        };
        for command in commands {
            spawn_fetch(Arc::clone(&source), tx.clone(), command);
        }
        view_tx.send_replace(snapshot_of(&paginator));
    }
    tracing::debug!("pager loop stopped");
}

/// Execute one fetch off the loop task and route its outcome back in. The
/// loop decides what the completion means; a completion for a window that
/// has since been discarded or superseded is dropped there.
fn spawn_fetch<S>(source: Arc<S>, tx: mpsc::UnboundedSender<Signal<S::Row>>, command: FetchCommand)
where
    S: PageSource + 'static,
{
    tokio::spawn(async move {
        let outcome = source.fetch_page(command.request).await;
        let _ = tx.send(Signal::FetchDone {
            window: command.window,
            generation: command.generation,
            outcome,
        });
    });
}

fn snapshot_of<R: Clone>(paginator: &Paginator<R>) -> ViewSnapshot<R> {
    paginator.project().into()
}

/// Caller-facing handle to a running pager.
///
/// Traversal operations are fire-and-forget: they enqueue a signal and
/// return. The resulting view arrives asynchronously on the watch channel.
#[derive(Clone)]
pub struct PagerHandle<R> {
    tx: mpsc::UnboundedSender<Signal<R>>,
    view_rx: watch::Receiver<ViewSnapshot<R>>,
}

impl<R: Clone> PagerHandle<R> {
    /// Request a forward extension (the scroll-down signal).
    pub fn extend_forward(&self) -> RolodexResult<()> {
        self.send(Signal::ExtendForward)
    }

    /// Request a backward extension (the scroll-up signal).
    pub fn extend_backward(&self) -> RolodexResult<()> {
        self.send(Signal::ExtendBackward)
    }

    /// Reposition the list at `key`, discarding everything loaded so far.
    pub fn jump_to(&self, key: IndexKey) -> RolodexResult<()> {
        self.send(Signal::JumpTo(key))
    }

    /// Stop the pager loop. Outstanding fetches resolve into a closed
    /// channel and are dropped.
    pub fn shutdown(&self) {
        let _ = self.tx.send(Signal::Shutdown);
    }

    /// The most recently published view.
    pub fn view(&self) -> ViewSnapshot<R> {
        self.view_rx.borrow().clone()
    }

    /// Wait until every signal sent before this call has been applied.
    pub async fn synced(&self) -> RolodexResult<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(Signal::Sync(ack_tx))?;
        ack_rx
            .await
            .map_err(|_| RolodexError::ChannelClosed("pager loop stopped".into()))
    }

    /// Wait for a published view satisfying `predicate`. Fails fast if the
    /// list becomes unavailable.
    pub async fn wait_for<F>(&mut self, mut predicate: F) -> RolodexResult<ListView<R>>
    where
        F: FnMut(&ListView<R>) -> bool,
    {
        loop {
            match self.view() {
                ViewSnapshot::Failed(message) => {
                    return Err(RolodexError::ListUnavailable(message));
                }
                ViewSnapshot::Ready(view) if predicate(&view) => return Ok(view),
                ViewSnapshot::Ready(_) => {}
            }
            self.view_rx
                .changed()
                .await
                .map_err(|_| RolodexError::ChannelClosed("pager loop stopped".into()))?;
        }
    }

    /// Wait until no window is still loading and return the settled view.
    pub async fn wait_until_loaded(&mut self) -> RolodexResult<ListView<R>> {
        self.wait_for(|view| !view.has_placeholders()).await
    }

    fn send(&self, signal: Signal<R>) -> RolodexResult<()> {
        self.tx
            .send(signal)
            .map_err(|_| RolodexError::ChannelClosed("pager loop stopped".into()))
    }
}
