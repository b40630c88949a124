use std::{sync::Arc, time::Duration};

use tokio::sync::Notify;

use crate::{ProbeResult, ProbeSettings, Prober, RecordId, Store};

/// Driver-level settings that sit outside a single cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub interval: Duration,
    /// Store a `gateway_check = false` record when a cycle fails.
    pub record_failures: bool,
}

impl From<&ProbeSettings> for RunOptions {
    fn from(s: &ProbeSettings) -> Self {
        Self {
            interval: s.normalize_interval(Duration::ZERO),
            record_failures: s.record_failures,
        }
    }
}

/// Runs one cycle and hands its record to the store.
///
/// Never fails: cycle and store errors are logged and reported as `None`.
pub async fn run_once(
    prober: &dyn Prober,
    store: &dyn Store,
    record_failures: bool,
) -> Option<RecordId> {
    let result = match prober.probe().await {
        Ok(result) => {
            if !result.has_data() {
                log::warn!(
                    "[{} / {}] - gateway answered but no status page could be read",
                    prober.kind(),
                    prober.name(),
                );
            }
            log::debug!(
                "[{} / {}] - {}: {:?}",
                prober.kind(),
                prober.name(),
                result.title(),
                result
            );
            result
        }
        Err(err) => {
            if err.is_unreachable() {
                log::error!(
                    "[{} / {}] - gateway is down, skipping this cycle: {}",
                    prober.kind(),
                    prober.name(),
                    err
                );
            } else {
                log::error!(
                    "[{} / {}] - cycle failed: {}",
                    prober.kind(),
                    prober.name(),
                    err
                );
            }
            if !record_failures {
                return None;
            }
            ProbeResult::new(prober.container_id())
        }
    };

    match store.insert(&result).await {
        Ok(id) => {
            log::info!(
                "[{} / {}] - testing complete, document id: {} added to {} store",
                prober.kind(),
                prober.name(),
                id,
                store.kind(),
            );
            Some(id)
        }
        Err(err) => {
            log::error!(
                "[{} / {}] - failed to store result in {} store {}: {}",
                prober.kind(),
                prober.name(),
                store.kind(),
                store.name(),
                err
            );
            None
        }
    }
}

/// Repeats [`run_once`] every `interval` until `shutdown` is notified.
///
/// A running cycle is never interrupted; shutdown takes effect at the next
/// pause.
pub async fn run_forever(
    prober: Arc<dyn Prober>,
    store: Arc<dyn Store>,
    opts: RunOptions,
    shutdown: Arc<Notify>,
) {
    loop {
        run_once(prober.as_ref(), store.as_ref(), opts.record_failures).await;

        log::debug!(
            "[{} / {}] - pausing testing for {:?}",
            prober.kind(),
            prober.name(),
            opts.interval
        );
        tokio::select! {
            _ = shutdown.notified() => {
                log::info!(
                    "[{} / {}] - received the done signal, exiting...",
                    prober.kind(),
                    prober.name()
                );
                break;
            }
            _ = tokio::time::sleep(opts.interval) => {}
        }
    }
}
