mod common;

use common::{init_tracing, StaticSource, raw};
use news_aggregator::{LocalityConfig, NewsAggregator, Scheduler, SchedulerStats};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

/// Shutdown future that resolves once the sender fires.
fn shutdown_pair() -> (Arc<Mutex<Option<oneshot::Sender<()>>>>, impl std::future::Future<Output = ()>) {
    let (tx, rx) = oneshot::channel::<()>();
    let tx = Arc::new(Mutex::new(Some(tx)));
    let shutdown = async move {
        let _ = rx.await;
    };
    (tx, shutdown)
}

fn fire(tx: &Arc<Mutex<Option<oneshot::Sender<()>>>>) {
    if let Some(tx) = tx.lock().unwrap().take() {
        let _ = tx.send(());
    }
}

#[tokio::test]
async fn test_run_once_returns_job_result() {
    init_tracing();
    let scheduler = Scheduler::hourly();
    assert_eq!(scheduler.interval(), Duration::from_secs(3600));

    assert!(scheduler.run_once(|| async { Ok(()) }).await.is_ok());
    assert!(scheduler
        .run_once(|| async { Err(anyhow::anyhow!("writer failed")) })
        .await
        .is_err());
}

#[tokio::test]
async fn test_zero_interval_is_clamped_and_still_runs() {
    init_tracing();
    let scheduler = Scheduler::new(Duration::ZERO);
    assert_eq!(scheduler.interval(), Duration::from_millis(1));

    let calls = Arc::new(AtomicU64::new(0));
    let (tx, shutdown) = shutdown_pair();

    let job = {
        let calls = calls.clone();
        let tx = tx.clone();
        move || {
            let calls = calls.clone();
            let tx = tx.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) + 1 == 2 {
                    fire(&tx);
                }
                Ok(())
            }
        }
    };

    let stats = tokio::time::timeout(Duration::from_secs(5), scheduler.run_forever(job, shutdown))
        .await
        .expect("scheduler should stop after shutdown");

    assert_eq!(stats, SchedulerStats { runs: 2, failures: 0 });
}

#[tokio::test]
async fn test_failed_and_panicking_runs_do_not_stop_schedule() {
    init_tracing();

    let calls = Arc::new(AtomicU64::new(0));
    let (tx, shutdown) = shutdown_pair();

    let job = {
        let calls = calls.clone();
        let tx = tx.clone();
        move || {
            let calls = calls.clone();
            let tx = tx.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                match n {
                    1 => Err(anyhow::anyhow!("all sources unreachable")),
                    2 => panic!("unexpected state in run"),
                    _ => {
                        fire(&tx);
                        Ok(())
                    }
                }
            }
        }
    };

    let scheduler = Scheduler::new(Duration::from_millis(20));
    let stats = tokio::time::timeout(Duration::from_secs(5), scheduler.run_forever(job, shutdown))
        .await
        .expect("scheduler should stop after shutdown");

    assert_eq!(stats, SchedulerStats { runs: 3, failures: 2 });
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_shutdown_before_first_tick_runs_nothing() {
    init_tracing();

    let calls = Arc::new(AtomicU64::new(0));
    let job = {
        let calls = calls.clone();
        move || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }
    };

    let stats = Scheduler::new(Duration::from_millis(20))
        .run_forever(job, async {})
        .await;

    assert_eq!(stats.runs, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_scheduled_pipeline_runs_repeatedly() {
    init_tracing();

    let mut aggregator = NewsAggregator::new(LocalityConfig::butuan());
    aggregator.add_source(Box::new(StaticSource::new(
        "MindaNews Butuan",
        vec![raw("Butuan flood drill", "MindaNews Butuan", "", "2024-01-03")],
    )));
    let aggregator = Arc::new(aggregator);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let (tx, shutdown) = shutdown_pair();

    let job = {
        let aggregator = aggregator.clone();
        let seen = seen.clone();
        let tx = tx.clone();
        move || {
            let aggregator = aggregator.clone();
            let seen = seen.clone();
            let tx = tx.clone();
            async move {
                let report = aggregator.run().await;
                let mut seen = seen.lock().unwrap();
                seen.push(report.articles[0].id.clone());
                if seen.len() == 2 {
                    fire(&tx);
                }
                Ok(())
            }
        }
    };

    let stats = tokio::time::timeout(
        Duration::from_secs(5),
        Scheduler::new(Duration::from_millis(10)).run_forever(job, shutdown),
    )
    .await
    .unwrap();

    assert_eq!(stats.runs, 2);
    assert_eq!(stats.failures, 0);
    let seen = seen.lock().unwrap();
    assert_eq!(seen[0], seen[1]);
}
