//! The shape every collection stage follows.
//!
//! A root stage is a single task draining one listing. A pool stage turns a
//! parent stream into a child stream:
//!
//! 1. A coordinator reads parents, derives an id from each one and pushes it
//!    onto the identifier channel. A parent of the wrong kind stops it.
//! 2. The identifier stream is split between `ctx.workers` workers with
//!    [`demux`].
//! 3. Each worker runs the stage's work for every id it receives, pushing
//!    envelopes into the shared output through an [`Output`].
//! 4. A closer waits for every worker, then drops the last output sender.
//!
//! Every task runs under [`spawn_guarded`]; all channels hold a single
//! element, so a slow consumer slows the API calls feeding it.

use crate::context::Context;
use crate::error::{ErrorKind, Result};
use crate::fault::{OnFault, spawn_guarded};
use crate::ledger::Ledger;
use cirrus_asyncutils::{demux, or_done, send};
use cirrus_client::ResultStream;
use cirrus_models::{Envelope, Kind};
use futures::future::join_all;
use futures::{Stream, StreamExt};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::{self, Sender};
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

/// Output of every stage, and input of every stage depending on it.
pub type EnvelopeStream = Pin<Box<dyn Stream<Item = Envelope> + Send>>;

const CHANNEL_CAPACITY: usize = 1;

#[derive(Debug, Default)]
struct Tally {
    parents: AtomicU64,
    emitted: AtomicU64,
    errors: AtomicU64,
    duplicates: AtomicU64,
}
impl Tally {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn get(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }
}

/// Sending half of a stage's output, shared by all of its workers.
#[derive(Clone)]
pub(crate) struct Output {
    stage: &'static str,
    token: CancellationToken,
    tx: Sender<Envelope>,
    tally: Arc<Tally>,
}

impl Output {
    fn new(stage: &'static str, token: &CancellationToken, tx: Sender<Envelope>) -> Self {
        Self {
            stage,
            token: token.clone(),
            tx,
            tally: Arc::new(Tally::default()),
        }
    }

    /// Push one envelope. `false` means the run was cancelled (or nobody is
    /// reading any more) and the caller must stop.
    async fn emit(&self, envelope: Envelope) -> bool {
        tracing::trace!(stage = self.stage, kind = %envelope.kind(), id = envelope.id(), "Emitting");
        let sent = send(&self.token, &self.tx, envelope).await;
        if sent {
            Tally::bump(&self.tally.emitted);
        }
        sent
    }

    fn error(&self, parent: Option<&str>, error: &cirrus_client::error::Error) {
        Tally::bump(&self.tally.errors);
        tracing::error!(stage = self.stage, parent, error = ?error, "Listing error, skipped");
    }

    /// Drain one listing, emitting every item as its own envelope.
    ///
    /// Errors are logged and skipped. With a `ledger`, items whose id this
    /// stage already emitted are dropped silently.
    pub(crate) async fn each<T, F>(
        &self,
        parent: Option<&str>,
        mut listing: ResultStream<T>,
        ledger: Option<&Ledger>,
        wrap: F,
    ) -> bool
    where
        F: Fn(T) -> Envelope,
    {
        let (mut count, mut errors) = (0u64, 0u64);
        while let Some(item) = listing.next().await {
            let envelope = match item {
                Ok(item) => wrap(item),
                Err(e) => {
                    errors += 1;
                    self.error(parent, &e);
                    continue;
                },
            };
            if ledger.is_some_and(|ledger| !ledger.check_and_insert(envelope.id())) {
                Tally::bump(&self.tally.duplicates);
                tracing::trace!(stage = self.stage, id = envelope.id(), "Already emitted");
                continue;
            }
            if !self.emit(envelope).await {
                return false;
            }
            count += 1;
        }
        tracing::debug!(stage = self.stage, parent, count, errors, "Listing finished");
        true
    }

    /// Drain one listing into a single aggregate for `parent`, then emit it.
    ///
    /// Errors are logged and left out of the aggregate. A parent with no
    /// children still gets an (empty) aggregate.
    pub(crate) async fn aggregate<T, A, P>(&self, parent: &str, mut listing: ResultStream<T>, mut aggregate: A, push: P) -> bool
    where
        A: Into<Envelope>,
        P: Fn(&mut A, T),
    {
        let (mut count, mut errors) = (0u64, 0u64);
        while let Some(item) = listing.next().await {
            match item {
                Ok(item) => {
                    push(&mut aggregate, item);
                    count += 1;
                },
                Err(e) => {
                    errors += 1;
                    self.error(Some(parent), &e);
                },
            }
        }
        tracing::debug!(stage = self.stage, parent, count, errors, "Listing finished");
        self.emit(aggregate.into()).await
    }

    fn finished(&self, faulted: usize) {
        tracing::info!(
            stage = self.stage,
            parents = Tally::get(&self.tally.parents),
            emitted = Tally::get(&self.tally.emitted),
            errors = Tally::get(&self.tally.errors),
            duplicates = Tally::get(&self.tally.duplicates),
            faulted,
            cancelled = self.token.is_cancelled(),
            "Stage finished"
        );
    }
}

/// Identifier of a parent envelope, provided it's of the `expected` kind.
pub(crate) fn extract(expected: Kind, parent: &Envelope) -> Result<String> {
    let found = parent.kind();
    if found != expected {
        exn::bail!(ErrorKind::Contract { expected, found });
    }
    Ok(parent.id().to_string())
}

/// A stage fed by a single listing, run by one task that escalates faults.
pub(crate) fn root<T, F>(ctx: &Context, stage: &'static str, listing: ResultStream<T>, wrap: F) -> EnvelopeStream
where
    T: Send + 'static,
    F: Fn(T) -> Envelope + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let output = Output::new(stage, &ctx.token, tx);
    spawn_guarded(ctx, stage, OnFault::Escalate, async move {
        output.each(None, listing, None, wrap).await;
        output.finished(0);
    });
    Box::pin(ReceiverStream::new(rx))
}

/// A stage expanding every parent of kind `expected` with `work`.
///
/// `work` is called once per parent id, on whichever worker picked it up; it
/// returns `false` to stop that worker (only ever because the run was
/// cancelled). The returned stream ends once every worker has stopped.
pub(crate) fn pool<W, Fut>(
    ctx: &Context,
    stage: &'static str,
    expected: Kind,
    parents: EnvelopeStream,
    work: W,
) -> EnvelopeStream
where
    W: Fn(&Context, String, Output) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    let (ids_tx, ids_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let output = Output::new(stage, &ctx.token, tx);

    let token = ctx.token.clone();
    let tally = output.tally.clone();
    spawn_guarded(ctx, stage, OnFault::Isolate, async move {
        let parents = or_done(&token, parents);
        futures::pin_mut!(parents);
        while let Some(parent) = parents.next().await {
            let id = match extract(expected, &parent) {
                Ok(id) => id,
                Err(e) => {
                    tracing::error!(stage, error = ?e, "Parent stream broke its contract, reading no further parents");
                    return;
                },
            };
            Tally::bump(&tally.parents);
            if !send(&token, &ids_tx, id).await {
                return;
            }
        }
    });

    let work = Arc::new(work);
    let workers: Vec<_> = demux(&ctx.token, ReceiverStream::new(ids_rx), ctx.workers)
        .into_iter()
        .map(|mut ids| {
            let (worker_ctx, work, output) = (ctx.clone(), work.clone(), output.clone());
            spawn_guarded(ctx, stage, OnFault::Isolate, async move {
                while let Some(id) = ids.recv().await {
                    if !work(&worker_ctx, id, output.clone()).await {
                        break;
                    }
                }
            })
        })
        .collect();

    // Holds the last sender: the output closes when this task is done.
    spawn_guarded(ctx, stage, OnFault::Isolate, async move {
        let faulted = join_all(workers).await.into_iter().filter(|joined| !matches!(joined, Ok(Ok(())))).count();
        output.finished(faulted);
        drop(output);
    });

    Box::pin(ReceiverStream::new(rx))
}
