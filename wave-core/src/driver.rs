use crate::error::RunError;
use crate::params::{DerivedParams, WaveParams};
use crate::{Snapshot, WaveSolver};

/// Receives snapshots in increasing time order. Formatting and persistence
/// are up to the implementor.
pub trait SnapshotSink {
    type Error: std::error::Error + 'static;

    /// Called once, after derivation and before the first snapshot.
    fn begin(&mut self, _params: &DerivedParams) -> Result<(), Self::Error> {
        Ok(())
    }

    fn snapshot(&mut self, snap: &Snapshot<'_>) -> Result<(), Self::Error>;

    /// Called once after the last step.
    fn finish(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub params: DerivedParams,
    pub steps: usize,
    pub snapshots: usize,
    pub final_time: f64,
    pub final_max_abs: f64,
}

/// Derive, initialise, step `nsteps` times and hand every `nper`-th field
/// (plus the initial one) to `sink`.
pub fn run<S: SnapshotSink>(
    params: &WaveParams,
    sink: &mut S,
) -> Result<RunSummary, RunError<S::Error>> {
    let derived = params.derive()?;
    let nsteps = derived.nsteps();
    let nper = derived.nper();

    log::info!(
        "running {nsteps} step(s) on {} points, snapshot every {nper} step(s)",
        derived.ngrid()
    );

    sink.begin(&derived).map_err(RunError::Sink)?;

    let mut solver = WaveSolver::new(derived);
    sink.snapshot(&solver.snapshot()).map_err(RunError::Sink)?;
    let mut snapshots = 1;

    for s in 0..nsteps {
        solver.step();

        if (s + 1) % nper == 0 {
            let snap = solver.snapshot();
            log::debug!("snapshot t={} max|rho|={}", snap.time, snap.max_abs());
            sink.snapshot(&snap).map_err(RunError::Sink)?;
            snapshots += 1;
        }
    }

    sink.finish().map_err(RunError::Sink)?;

    log::info!(
        "finished after {} step(s), {snapshots} snapshot(s)",
        solver.steps_taken()
    );

    Ok(RunSummary {
        steps: solver.steps_taken(),
        snapshots,
        final_time: solver.time(),
        final_max_abs: solver.max_abs(),
        params: solver.params().clone(),
    })
}
