use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::sync::Semaphore;

use super::context::{execute, TaskContext};
use super::Task;
use crate::error::ResultError;
use crate::inventory::Inventory;
use crate::processor::Processor;
use crate::result::{AggregatedResult, TaskRun};

/// Runs tasks across an inventory with at most `num_workers` hosts in flight.
///
/// Hosts that fail are remembered; later runs skip them (they show up as
/// skipped in the aggregate) unless the run is started with `on_failed`.
pub struct Runner {
    num_workers: usize,
    processor: Arc<dyn Processor>,
    failed_hosts: Mutex<BTreeSet<String>>,
}

impl Runner {
    pub fn new(num_workers: usize, processor: Arc<dyn Processor>) -> Self {
        Self {
            num_workers: num_workers.max(1),
            processor,
            failed_hosts: Mutex::new(BTreeSet::new()),
        }
    }

    /// Hosts that failed in any run so far, sorted.
    pub fn failed_hosts(&self) -> Vec<String> {
        self.lock_failed().iter().cloned().collect()
    }

    pub fn reset_failed_hosts(&self) {
        self.lock_failed().clear();
    }

    fn lock_failed(&self) -> std::sync::MutexGuard<'_, BTreeSet<String>> {
        self.failed_hosts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub async fn run(
        &self,
        inventory: &Inventory,
        task: Arc<dyn Task>,
        run: TaskRun,
        on_failed: bool,
    ) -> Result<AggregatedResult, ResultError> {
        let run = Arc::new(run);
        let mut aggregate = AggregatedResult::new(Arc::clone(&run));

        tracing::debug!(
            task = run.name(),
            id = %run.id(),
            hosts = inventory.len(),
            workers = self.num_workers,
            "task started"
        );
        self.processor.task_started(&run);

        let skip = if on_failed {
            BTreeSet::new()
        } else {
            self.lock_failed().clone()
        };

        let sem = Semaphore::new(self.num_workers);
        let mut futs = FuturesUnordered::new();

        for host in inventory.hosts() {
            if skip.contains(&host.name) {
                aggregate.mark_skipped(host.name.clone());
                continue;
            }

            let host = Arc::clone(host);
            let instance = Arc::new(run.for_host());
            let processor = Arc::clone(&self.processor);
            let task = Arc::clone(&task);
            let sem = &sem;

            futs.push(async move {
                // The semaphore is owned by this call and never closed.
                let _permit = sem.acquire().await.ok();

                processor.task_instance_started(&instance, &host);
                let ctx = TaskContext::new(
                    Arc::clone(&host),
                    Arc::clone(&instance),
                    Arc::clone(&processor),
                );
                let result = execute(task.as_ref(), ctx).await;
                processor.task_instance_completed(&instance, &host, &result);
                result
            });
        }

        while let Some(result) = futs.next().await {
            if result.failed() {
                self.lock_failed().insert(result.host().to_string());
            }
            aggregate.insert(result)?;
        }

        tracing::debug!(
            task = run.name(),
            failed = aggregate.failed(),
            "task completed"
        );
        self.processor.task_completed(&run, &aggregate);
        Ok(aggregate)
    }
}
