use crate::utils::error::{BioxError, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Available CPUs minus one, never less than one worker.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_sub(1)
        .max(1)
}

/// Apply a blocking `func` to every input on tokio's blocking pool.
///
/// At most `num_workers` calls run at once (`None` or `Some(0)` picks
/// [`default_workers`]). Results are returned in input order.
pub async fn run_parallel<T, R, F>(
    func: F,
    inputs: Vec<T>,
    num_workers: Option<usize>,
) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> R + Send + Sync + 'static,
{
    run_parallel_with_progress("Processing", func, inputs, num_workers).await
}

pub async fn run_parallel_with_progress<T, R, F>(
    label: &str,
    func: F,
    inputs: Vec<T>,
    num_workers: Option<usize>,
) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> R + Send + Sync + 'static,
{
    let workers = num_workers.filter(|&n| n > 0).unwrap_or_else(default_workers);
    let total = inputs.len();
    let semaphore = Arc::new(Semaphore::new(workers));
    let func = Arc::new(func);
    let mut tasks = JoinSet::new();

    tracing::debug!("{}: {} inputs on {} workers", label, total, workers);

    for (index, input) in inputs.into_iter().enumerate() {
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .map_err(|e| BioxError::TaskFailed {
                message: e.to_string(),
            })?;
        let func = Arc::clone(&func);
        tasks.spawn_blocking(move || {
            let _permit = permit;
            (index, func(input))
        });
    }

    let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(total).collect();
    let mut done = 0;
    while let Some(joined) = tasks.join_next().await {
        let (index, value) = joined.map_err(|e| BioxError::TaskFailed {
            message: e.to_string(),
        })?;
        slots[index] = Some(value);
        done += 1;
        tracing::debug!("{}: {}/{}", label, done, total);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| BioxError::TaskFailed {
                message: format!("no result for input #{}", index),
            })
        })
        .collect()
}
