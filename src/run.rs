use crate::collection::Collection;
use crate::error::Result;
use crate::output::Sink;
use cirrus_collect::{Context, EnvelopeStream};
use cirrus_models::Kind;
use futures::StreamExt;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// What a finished run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Envelopes written to the sink, per kind.
    pub counts: BTreeMap<Kind, u64>,
    pub elapsed: Duration,
    /// The run was stopped early (interrupted, or by an escalated fault).
    pub cancelled: bool,
    /// A root enumeration faulted and brought the run down.
    pub escalated: bool,
}
impl Summary {
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Cancel `token` on Ctrl-C. The returned task ends once either happens.
pub fn cancel_on_interrupt(token: &CancellationToken) -> JoinHandle<()> {
    let token = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            () = token.cancelled() => {},
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    tracing::warn!("Interrupted, stopping the run");
                    token.cancel();
                },
                Err(e) => tracing::warn!(error = %e, "Could not listen for interrupts"),
            },
        }
    })
}

async fn drain<S>(output: &mut EnvelopeStream, sink: &mut S, counts: &mut BTreeMap<Kind, u64>) -> Result<()>
where
    S: Sink + ?Sized,
{
    while let Some(envelope) = output.next().await {
        sink.write(&envelope).await?;
        *counts.entry(envelope.kind()).or_default() += 1;
    }
    sink.finish().await
}

/// Run `collection` to completion, pushing every envelope into `sink`.
///
/// Partial results are kept: whatever was collected before a cancellation
/// is written and counted. A sink failure cancels the run and is returned.
#[tracing::instrument(level = "info", skip_all, fields(collection = %collection))]
pub async fn run<S>(ctx: &Context, collection: &Collection, sink: &mut S) -> Result<Summary>
where
    S: Sink + ?Sized,
{
    let started = Instant::now();
    let interrupt = cancel_on_interrupt(&ctx.token);
    let mut output = collection.start(ctx);
    let mut summary = Summary::default();

    let written = drain(&mut output, sink, &mut summary.counts).await;
    interrupt.abort();
    if let Err(e) = written {
        tracing::error!(error = ?e, "Output failed, cancelling the run");
        ctx.token.cancel();
        return Err(e);
    }

    summary.elapsed = started.elapsed();
    summary.cancelled = ctx.token.is_cancelled();
    summary.escalated = ctx.escalated();
    tracing::info!(
        total = summary.total(),
        elapsed_ms = summary.elapsed.as_millis(),
        cancelled = summary.cancelled,
        escalated = summary.escalated,
        "Run finished"
    );
    Ok(summary)
}
