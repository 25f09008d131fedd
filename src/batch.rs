//! Concurrent evaluation of many snapshots
//!
//! Scoring is CPU-only and shares no state, so each snapshot runs on the
//! tokio blocking pool against a shared engine.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::HealthScoreEngine;
use crate::error::{HealthError, Result};
use crate::types::{HealthScoreInputs, HealthScoreResult};

type Task = (String, JoinHandle<Result<HealthScoreResult>>);

/// Result of evaluating one labelled snapshot
#[derive(Debug)]
pub struct BatchOutcome {
    pub label: String,
    pub result: Result<HealthScoreResult>,
}

/// Evaluate labelled snapshots concurrently; outcomes keep input order
pub async fn evaluate_batch(
    engine: Arc<HealthScoreEngine>,
    snapshots: Vec<(String, HealthScoreInputs)>,
) -> Vec<BatchOutcome> {
    info!("Evaluating {} snapshots", snapshots.len());

    let tasks: Vec<Task> = snapshots
        .into_iter()
        .map(|(label, inputs)| {
            let engine = Arc::clone(&engine);
            let handle = tokio::task::spawn_blocking(move || Ok(engine.evaluate(&inputs)));
            (label, handle)
        })
        .collect();

    collect(tasks).await
}

/// Load and evaluate snapshot files concurrently; a file that fails to load
/// only fails its own outcome
pub async fn evaluate_files(
    engine: Arc<HealthScoreEngine>,
    paths: Vec<PathBuf>,
) -> Vec<BatchOutcome> {
    info!("Evaluating {} snapshot files", paths.len());

    let tasks: Vec<Task> = paths
        .into_iter()
        .map(|path| {
            let engine = Arc::clone(&engine);
            let label = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let handle = tokio::task::spawn_blocking(move || {
                let inputs = HealthScoreInputs::from_path(&path)?;
                Ok(engine.evaluate(&inputs))
            });
            (label, handle)
        })
        .collect();

    collect(tasks).await
}

async fn collect(tasks: Vec<Task>) -> Vec<BatchOutcome> {
    let mut outcomes = Vec::with_capacity(tasks.len());
    for (label, task) in tasks {
        let result = match task.await {
            Ok(Ok(result)) => {
                debug!("{}: {:.1}/100", label, result.scores.total);
                Ok(result)
            }
            Ok(Err(e)) => {
                warn!("Failed to evaluate {}: {}", label, e);
                Err(e)
            }
            Err(e) => {
                warn!("Task for {} failed: {}", label, e);
                Err(HealthError::task_failed(&label, e.to_string()))
            }
        };
        outcomes.push(BatchOutcome { label, result });
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_batch_preserves_order_and_matches_sequential() {
        let engine = Arc::new(HealthScoreEngine::default());
        let mut snapshots = Vec::new();
        for i in 0..8 {
            let mut inputs = HealthScoreInputs::default();
            inputs.dashboard_metrics.ready_to_bill = 1500.0 * i as f64;
            snapshots.push((format!("snapshot-{}", i), inputs));
        }

        let outcomes = evaluate_batch(Arc::clone(&engine), snapshots.clone()).await;
        assert_eq!(outcomes.len(), 8);
        for (outcome, (label, inputs)) in outcomes.iter().zip(&snapshots) {
            assert_eq!(&outcome.label, label);
            let batched = outcome.result.as_ref().unwrap();
            assert_eq!(batched, &engine.evaluate(inputs));
        }
    }

    #[tokio::test]
    async fn test_bad_file_fails_only_its_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        std::fs::File::create(&good)
            .unwrap()
            .write_all(b"{}")
            .unwrap();
        std::fs::File::create(&bad)
            .unwrap()
            .write_all(b"{ not json")
            .unwrap();

        let outcomes = evaluate_files(
            Arc::new(HealthScoreEngine::default()),
            vec![good, bad],
        )
        .await;
        assert_eq!(outcomes[0].label, "good");
        assert!(outcomes[0].result.is_ok());
        assert_eq!(outcomes[1].label, "bad");
        assert!(matches!(outcomes[1].result, Err(HealthError::JsonError(_))));
    }
}
