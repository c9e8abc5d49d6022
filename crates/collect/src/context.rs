use cirrus_client::Client;
use cirrus_config::{Config, Select};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

/// Everything a stage needs, fixed for the duration of a run.
///
/// Built once from the loaded [`Config`] and handed to every stage when it
/// starts; workers never look anything up globally. Clones share the same
/// client, cancellation token and escalation flag.
#[derive(Clone)]
pub struct Context {
    pub client: Client,
    /// Cancelling this stops every stage of the run.
    pub token: CancellationToken,
    /// Workers per pool stage. Always at least one.
    pub workers: usize,
    pub select: Select,
    escalated: Arc<AtomicBool>,
}

impl Context {
    pub fn new(client: Client, token: CancellationToken, config: &Config) -> Self {
        Self {
            client: client.with_page_size(config.page_size),
            token,
            workers: config.workers.max(1),
            select: config.select.clone(),
            escalated: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a fault anywhere in the run was escalated (and the run
    /// therefore cancelled).
    pub fn escalated(&self) -> bool {
        self.escalated.load(Ordering::Acquire)
    }

    pub(crate) fn escalate(&self) {
        self.escalated.store(true, Ordering::Release);
        self.token.cancel();
    }
}

#[cfg(test)]
impl Context {
    pub(crate) fn mock(
        graph: cirrus_client::mock::MockTransport,
        resource_manager: cirrus_client::mock::MockTransport,
        workers: usize,
    ) -> Self {
        let tenant = cirrus_models::azure::Tenant::new("t-1", "Contoso");
        let client = Client::new(Arc::new(graph), Arc::new(resource_manager), tenant);
        Self::new(client, CancellationToken::new(), &Config { workers, ..Config::default() })
    }
}
