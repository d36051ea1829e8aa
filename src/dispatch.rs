//! Aggregate several experiments at the same time.
//!
//! Every experiment is aggregated by its own task with its own statistics; the tasks only share
//! the read only `Aggregator` inputs. Results come back in experiment order once every task is
//! done.

use crate::{
    aggregate::{Aggregator, ExperimentProfile},
    error::{ProfileError, Result},
    experiment::Experiment,
};
use log::error;
use rayon::prelude::*;

/// Aggregate each experiment on a pool of `workers` threads.
///
/// If any experiment fails the whole batch fails. Every experiment runs to the end, and the
/// failure reported is the one of the first failed experiment in `experiments` order.
pub fn aggregate_experiments(
    agg: &Aggregator<'_>,
    experiments: &[Experiment],
    workers: usize,
) -> Result<Vec<ExperimentProfile>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()?;

    let results: Vec<Result<ExperimentProfile>> =
        pool.install(|| experiments.par_iter().map(|exp| agg.run(exp)).collect());

    experiments
        .iter()
        .zip(results)
        .map(|(exp, res)| {
            res.map_err(|err| {
                error!("aggregation of {} failed: {}", exp.label(), err);
                ProfileError::WorkerFailure {
                    experiment: exp.label().to_owned(),
                    source: Box::new(err),
                }
            })
        })
        .collect()
}
