//! Parallel solving of independent pass sequences.
//!
//! [`solve_batch`] fans sequences out to a scoped worker pool over a
//! bounded job queue and gathers the results back into input order.
//! Sequences share nothing mutable, so the result of each is identical to
//! solving it alone.

use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::config::{BatchConfig, SequenceError};
use crate::sequence::{PassSequence, SolvedSequence};

// ── Error type ──────────────────────────────────────────────────

/// Error from a batched solve, annotated with the failing sequence index.
#[derive(Debug, PartialEq)]
pub enum BatchError {
    /// A sequence failed to solve.
    Sequence {
        /// Index of the sequence that failed (0-based).
        sequence_index: usize,
        /// The underlying error.
        error: SequenceError,
    },
    /// The batch configuration is invalid.
    InvalidConfig {
        /// Human-readable description of what's wrong.
        reason: String,
    },
    /// A worker thread panicked.
    WorkerPanicked,
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::Sequence {
                sequence_index,
                error,
            } => write!(f, "sequence {sequence_index}: {error}"),
            BatchError::InvalidConfig { reason } => {
                write!(f, "invalid batch config: {reason}")
            }
            BatchError::WorkerPanicked => write!(f, "batch worker panicked"),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::Sequence { error, .. } => Some(error),
            _ => None,
        }
    }
}

// ── Worker pool ─────────────────────────────────────────────────

type Outcome = (usize, Result<SolvedSequence, SequenceError>);

fn worker(sequences: &[PassSequence], jobs: Receiver<usize>, results: Sender<Outcome>) {
    for index in jobs {
        let outcome = sequences[index].solve();
        if results.send((index, outcome)).is_err() {
            break;
        }
    }
}

/// Solve every sequence in `sequences`, in parallel.
///
/// Results are returned in input order. If several sequences fail, the
/// error of the lowest index is reported.
///
/// # Errors
///
/// [`BatchError::InvalidConfig`] for an invalid `config`,
/// [`BatchError::Sequence`] if any sequence fails, and
/// [`BatchError::WorkerPanicked`] if a worker thread dies.
pub fn solve_batch(
    sequences: &[PassSequence],
    config: &BatchConfig,
) -> Result<Vec<SolvedSequence>, BatchError> {
    config
        .validate()
        .map_err(|reason| BatchError::InvalidConfig { reason })?;
    if sequences.is_empty() {
        return Ok(Vec::new());
    }

    let workers = config.resolved_worker_count().min(sequences.len());
    let _span = tracing::info_span!("solve_batch", sequences = sequences.len(), workers).entered();

    let (job_tx, job_rx) = bounded::<usize>(config.queue_capacity);
    // Every result fits, so workers never block on send.
    let (result_tx, result_rx) = bounded::<Outcome>(sequences.len());

    let panicked = thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let jobs = job_rx.clone();
                let results = result_tx.clone();
                s.spawn(move || worker(sequences, jobs, results))
            })
            .collect();
        drop(job_rx);
        drop(result_tx);

        for index in 0..sequences.len() {
            // Fails only once every worker is gone.
            if job_tx.send(index).is_err() {
                break;
            }
        }
        drop(job_tx);

        handles
            .into_iter()
            .map(|h| h.join())
            .filter(Result::is_err)
            .count()
    });
    if panicked > 0 {
        tracing::error!(panicked, "batch workers panicked");
        return Err(BatchError::WorkerPanicked);
    }

    let mut slots: Vec<Option<Result<SolvedSequence, SequenceError>>> =
        (0..sequences.len()).map(|_| None).collect();
    for (index, outcome) in result_rx.try_iter() {
        slots[index] = Some(outcome);
    }

    let mut solved = Vec::with_capacity(sequences.len());
    for (sequence_index, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(Ok(s)) => solved.push(s),
            Some(Err(error)) => {
                return Err(BatchError::Sequence {
                    sequence_index,
                    error,
                })
            }
            None => return Err(BatchError::WorkerPanicked),
        }
    }
    tracing::info!(sequences = solved.len(), "solved batch");
    Ok(solved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SequenceConfig;
    use jmak_test_utils::{fixtures, initial_profile, SequenceBuilder};
    use std::sync::Arc;

    fn sequence(passes: usize, strain: f64) -> PassSequence {
        let steps = SequenceBuilder::new()
            .cooling_per_step(10.0)
            .alternating(passes, strain, 2.0, 1.0)
            .build();
        PassSequence::new(
            SequenceConfig::new(Arc::new(fixtures::synthetic_material()), initial_profile())
                .steps(steps),
        )
        .unwrap()
    }

    #[test]
    fn empty_batch_is_empty() {
        assert!(solve_batch(&[], &BatchConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn invalid_config_rejected() {
        let config = BatchConfig {
            queue_capacity: 0,
            ..BatchConfig::default()
        };
        assert!(matches!(
            solve_batch(&[sequence(1, 0.3)], &config),
            Err(BatchError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn results_keep_input_order() {
        let sequences: Vec<_> = (1..=6).map(|p| sequence(p, 0.1 * p as f64)).collect();
        let config = BatchConfig {
            workers: 3,
            queue_capacity: 1,
        };
        let solved = solve_batch(&sequences, &config).unwrap();
        assert_eq!(solved.len(), 6);
        for (i, (seq, result)) in sequences.iter().zip(&solved).enumerate() {
            assert_eq!(result.records().len(), 2 * (i + 1));
            assert!(result.same_results(&seq.solve().unwrap()));
        }
    }

    #[test]
    fn more_workers_than_sequences() {
        let sequences = vec![sequence(2, 0.4)];
        let config = BatchConfig {
            workers: 8,
            ..BatchConfig::default()
        };
        assert_eq!(solve_batch(&sequences, &config).unwrap().len(), 1);
    }

    #[test]
    fn error_display_names_index() {
        let e = BatchError::Sequence {
            sequence_index: 4,
            error: SequenceError::EmptySequence,
        };
        assert_eq!(e.to_string(), "sequence 4: pass sequence has no steps");
        assert!(std::error::Error::source(&e).is_some());
    }
}
