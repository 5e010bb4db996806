//! The outer scheduling loop.

use crate::reconcile::Reconciler;
use std::future::Future;
use std::time::Duration;

/// Run reconciliation cycles until `shutdown` resolves.
///
/// The first cycle starts immediately. With `single_run` the loop stops
/// after it. A failed cycle is logged and the loop carries on. Returns the
/// number of cycles that ran to completion.
pub async fn run<F>(
    reconciler: &Reconciler,
    interval: Duration,
    single_run: bool,
    shutdown: F,
) -> usize
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut cycles = 0;

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested, exiting");
                return cycles;
            }
            result = reconciler.run_cycle() => {
                cycles += 1;
                match result {
                    Ok(report) => match serde_json::to_string(&report) {
                        Ok(json) => tracing::debug!(report = %json, "Cycle complete"),
                        Err(e) => tracing::debug!(
                            domains = report.domains.len(),
                            failed = report.failed(),
                            "Cycle complete (report not serializable: {})",
                            e
                        ),
                    },
                    Err(e) => tracing::error!("Error during scheduled update: {}", e),
                }
            }
        }

        if single_run {
            return cycles;
        }

        tracing::info!(
            "Sleeping for {} minutes until next update",
            interval.as_secs() / 60
        );
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested, exiting");
                return cycles;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::MockIpSource;
    use crate::error::DdnsError;
    use crate::events::RecordingSink;
    use crate::providers::{IpFamily, MockZoneApi};
    use std::sync::Arc;

    fn reconciler(ip_source: MockIpSource, api: MockZoneApi) -> Reconciler {
        Reconciler::new(
            Box::new(api),
            Box::new(ip_source),
            Arc::new(RecordingSink::default()),
            vec!["example.unregistered".to_string()],
        )
    }

    #[tokio::test]
    async fn test_single_run_performs_one_cycle() {
        let mut ip_source = MockIpSource::new();
        ip_source
            .expect_current_ip()
            .times(2)
            .returning(|family| match family {
                IpFamily::V4 => Ok("192.0.2.1".to_string()),
                IpFamily::V6 => Ok("2001:db8::1".to_string()),
            });
        let mut api = MockZoneApi::new();
        api.expect_find_zone()
            .times(1)
            .returning(|q| Err(DdnsError::ZoneNotFound(q.to_string())));

        let reconciler = reconciler(ip_source, api);
        let cycles = run(
            &reconciler,
            Duration::from_secs(3600),
            true,
            std::future::pending(),
        )
        .await;

        assert_eq!(cycles, 1);
    }

    #[tokio::test]
    async fn test_failed_cycle_does_not_end_single_run_with_error() {
        let mut ip_source = MockIpSource::new();
        ip_source
            .expect_current_ip()
            .times(1)
            .returning(|_| Err(DdnsError::IpDetection("offline".to_string())));

        let reconciler = reconciler(ip_source, MockZoneApi::new());
        let cycles = run(
            &reconciler,
            Duration::from_secs(3600),
            true,
            std::future::pending(),
        )
        .await;

        assert_eq!(cycles, 1);
    }

    #[tokio::test]
    async fn test_shutdown_before_first_cycle() {
        // no expectations: a started cycle would panic
        let reconciler = reconciler(MockIpSource::new(), MockZoneApi::new());
        let cycles = run(
            &reconciler,
            Duration::from_secs(3600),
            false,
            std::future::ready(()),
        )
        .await;

        assert_eq!(cycles, 0);
    }
}
