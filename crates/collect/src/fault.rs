//! Recovery boundary around every task a stage spawns.
//!
//! A panic inside a coordinator or worker is caught, logged, and turned into
//! an [`ErrorKind::Fault`]. What happens next depends on [`OnFault`]: pool
//! workers and coordinators are isolated (the task ends, siblings carry on),
//! root enumerations escalate (the whole run is cancelled, so a crashed root
//! can't leave a collection silently half-done).

use crate::context::Context;
use crate::error::{ErrorKind, Result};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFault {
    /// Log the fault and let the task end.
    Isolate,
    /// Log the fault and cancel the run.
    Escalate,
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else {
        "unknown panic"
    }
}

/// Spawn `work` onto the runtime behind a recovery boundary.
///
/// The handle resolves to `Err(Fault)` if `work` panicked, `Ok(())`
/// otherwise. Dropping the handle does not stop the task.
pub fn spawn_guarded<F>(ctx: &Context, stage: &'static str, on_fault: OnFault, work: F) -> JoinHandle<Result<()>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let ctx = ctx.clone();
    tokio::spawn(async move {
        let Err(payload) = AssertUnwindSafe(work).catch_unwind().await else {
            return Ok(());
        };
        let fault = exn::Exn::from(ErrorKind::Fault(stage));
        tracing::error!(stage, panic = panic_message(&*payload), error = ?fault, "Task faulted");
        if on_fault == OnFault::Escalate {
            tracing::error!(stage, "Escalating fault, cancelling the run");
            ctx.escalate();
        }
        Err(fault)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_client::mock::MockTransport;
    use rstest::rstest;

    fn ctx() -> Context {
        Context::mock(MockTransport::default(), MockTransport::default(), 1)
    }

    async fn explode(message: &'static str) {
        panic!("{message}")
    }

    #[rstest]
    #[case(OnFault::Isolate)]
    #[case(OnFault::Escalate)]
    #[tokio::test]
    async fn test_clean_exit_is_ok(#[case] on_fault: OnFault) {
        let ctx = ctx();
        assert!(spawn_guarded(&ctx, "test", on_fault, async {}).await.unwrap().is_ok());
        assert!(!ctx.token.is_cancelled());
    }

    #[tokio::test]
    async fn test_isolated_fault_leaves_run_alone() {
        let ctx = ctx();
        let result = spawn_guarded(&ctx, "members", OnFault::Isolate, explode("boom")).await.unwrap();
        assert_eq!(*result.unwrap_err(), ErrorKind::Fault("members"));
        assert!(!ctx.token.is_cancelled());
        assert!(!ctx.escalated());
    }

    #[tokio::test]
    async fn test_escalated_fault_cancels_run() {
        let ctx = ctx();
        let bystander = ctx.token.clone();
        let result = spawn_guarded(&ctx, "users", OnFault::Escalate, explode("formatted boom"))
            .await
            .unwrap();
        assert!(result.is_err());
        assert!(bystander.is_cancelled());
        assert!(ctx.escalated());
    }

    #[test]
    fn test_panic_message() {
        let owned: Box<dyn Any + Send> = Box::new("owned".to_string());
        let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
        let other: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(&*owned), "owned");
        assert_eq!(panic_message(&*borrowed), "borrowed");
        assert_eq!(panic_message(&*other), "unknown panic");
    }
}
