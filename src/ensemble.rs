use log::debug;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Deterministic seeded ensemble execution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnsembleError {
    #[error("ensemble requires at least one sample")]
    NoSamples,
}

/// One completed ensemble member.
#[derive(Debug, Clone)]
pub struct EnsembleRun<S, R> {
    pub index: usize,
    pub seed: u64,
    pub sample: S,
    pub result: R,
}

/// Landing-point statistics over an ensemble. Statistics are `None` when
/// no run produced a landing point.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleSummary {
    pub count: usize,
    pub mean_east_m: Option<f64>,
    pub mean_north_m: Option<f64>,
    pub std_east_m: Option<f64>,
    pub std_north_m: Option<f64>,
}

#[derive(Debug)]
pub struct EnsembleOutput<S, R> {
    /// Master seed the run streams were derived from.
    pub seed: u64,
    pub runs: Vec<EnsembleRun<S, R>>,
    pub summary: EnsembleSummary,
}

/// Execute `samples` runs with per-run RNG streams derived from a master
/// seed, so any member can be replayed in isolation from its recorded seed.
///
/// `sample_fn` draws a perturbed input, `run_fn` produces the run result,
/// and `landing_fn` extracts an (east, north) landing point from it, or
/// `None` for runs that did not land.
pub fn run_ensemble<S, R>(
    samples: usize,
    seed: u64,
    mut sample_fn: impl FnMut(&mut Xoshiro256PlusPlus, usize) -> S,
    mut run_fn: impl FnMut(&S) -> R,
    landing_fn: impl Fn(&R) -> Option<(f64, f64)>,
) -> Result<EnsembleOutput<S, R>, EnsembleError> {
    if samples == 0 {
        return Err(EnsembleError::NoSamples);
    }

    let mut master = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut runs = Vec::with_capacity(samples);

    for index in 0..samples {
        let run_seed = master.next_u64();
        let mut run_rng = Xoshiro256PlusPlus::seed_from_u64(run_seed);
        let sample = sample_fn(&mut run_rng, index);
        let result = run_fn(&sample);
        debug!("ensemble: run {index} complete (seed {run_seed:#x})");
        runs.push(EnsembleRun { index, seed: run_seed, sample, result });
    }

    let points: Vec<(f64, f64)> =
        runs.iter().filter_map(|run| landing_fn(&run.result)).collect();
    let summary = summarize(runs.len(), &points);

    Ok(EnsembleOutput { seed, runs, summary })
}

/// Population mean and standard deviation of the landing points.
fn summarize(total: usize, points: &[(f64, f64)]) -> EnsembleSummary {
    if points.is_empty() {
        return EnsembleSummary {
            count: total,
            mean_east_m: None,
            mean_north_m: None,
            std_east_m: None,
            std_north_m: None,
        };
    }

    let n = points.len() as f64;
    let mean_east = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_north = points.iter().map(|p| p.1).sum::<f64>() / n;
    let var_east = points.iter().map(|p| (p.0 - mean_east).powi(2)).sum::<f64>() / n;
    let var_north = points.iter().map(|p| (p.1 - mean_north).powi(2)).sum::<f64>() / n;

    EnsembleSummary {
        count: total,
        mean_east_m: Some(mean_east),
        mean_north_m: Some(mean_north),
        std_east_m: Some(var_east.sqrt()),
        std_north_m: Some(var_north.sqrt()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
