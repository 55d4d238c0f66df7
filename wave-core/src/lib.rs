//! One-dimensional damped wave equation on a fixed-end string,
//! advanced with an explicit leap-frog scheme.

pub mod driver;
pub mod error;
pub mod ic;
pub mod params;

pub use driver::{RunSummary, SnapshotSink, run};
pub use error::{ConfigError, RunError};
pub use params::{DerivedParams, WaveParams};

/// One recorded instant of the field.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub step: usize,
    pub time: f64,
    pub x: &'a [f64],
    pub rho: &'a [f64],
}

impl Snapshot<'_> {
    /// `(x[i], rho[i])` in index order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.rho.iter().copied())
    }

    pub fn max_abs(&self) -> f64 {
        max_abs(self.rho)
    }
}

pub struct WaveSolver {
    params: DerivedParams,
    x: Vec<f64>,
    rho_prev: Vec<f64>,
    rho: Vec<f64>,
    rho_next: Vec<f64>,
    steps: usize,
}

impl WaveSolver {
    /// Grid plus triangular pulse at rest (`rho_prev == rho`).
    pub fn new(params: DerivedParams) -> WaveSolver {
        let x = ic::grid(&params);
        let rho = ic::triangle_pulse(&params, &x);
        WaveSolver::with_state(params, x, rho.clone(), rho)
    }

    /// Start from explicit previous and current fields. Panics if lengths
    /// differ from `ngrid`.
    pub fn with_state(
        params: DerivedParams,
        x: Vec<f64>,
        rho_prev: Vec<f64>,
        rho: Vec<f64>,
    ) -> WaveSolver {
        let n = params.ngrid();
        assert_eq!(x.len(), n, "x has wrong length");
        assert_eq!(rho_prev.len(), n, "rho_prev has wrong length");
        assert_eq!(rho.len(), n, "rho has wrong length");

        WaveSolver {
            params,
            x,
            rho_prev,
            rho,
            rho_next: vec![0.0; n],
            steps: 0,
        }
    }

    // ---- Accessors ----

    pub fn params(&self) -> &DerivedParams {
        &self.params
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn rho(&self) -> &[f64] {
        &self.rho
    }

    pub fn rho_prev(&self) -> &[f64] {
        &self.rho_prev
    }

    pub fn steps_taken(&self) -> usize {
        self.steps
    }

    /// Simulated time of the current field.
    pub fn time(&self) -> f64 {
        self.steps as f64 * self.params.dt()
    }

    pub fn max_abs(&self) -> f64 {
        max_abs(&self.rho)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            step: self.steps,
            time: self.time(),
            x: &self.x,
            rho: &self.rho,
        }
    }

    // ---- Core ----

    /// Advance by one `dt`.
    pub fn step(&mut self) {
        time_step(
            &self.params,
            &mut self.rho,
            &self.rho_prev,
            &mut self.rho_next,
        );
        self.rotate_buffers();
        self.steps += 1;
    }

    fn rotate_buffers(&mut self) {
        // prev <- rho, rho <- next; the stale prev becomes scratch
        std::mem::swap(&mut self.rho_prev, &mut self.rho);
        std::mem::swap(&mut self.rho, &mut self.rho_next);
    }
}

/// Compute `rho_next` from `rho` and `rho_prev`.
///
/// Pins `rho[0]` and `rho[n - 1]` to zero before reading it, so the caller's
/// current field is modified at its ends. Boundary entries of `rho_next` are
/// written as zero too.
pub fn time_step(p: &DerivedParams, rho: &mut [f64], rho_prev: &[f64], rho_next: &mut [f64]) {
    let n = rho.len();
    debug_assert!(n >= 2);
    debug_assert_eq!(rho_prev.len(), n);
    debug_assert_eq!(rho_next.len(), n);

    rho[0] = 0.0;
    rho[n - 1] = 0.0;

    let dt = p.dt();
    let courant2 = (p.c() / p.dx()).powi(2);
    let tau = p.tau();

    for i in 1..(n - 1) {
        let laplacian = courant2 * (rho[i + 1] + rho[i - 1] - 2.0 * rho[i]);
        let friction = (rho[i] - rho_prev[i]) / tau;
        rho_next[i] = 2.0 * rho[i] - rho_prev[i] + dt * (laplacian * dt - friction);
    }

    rho_next[0] = 0.0;
    rho_next[n - 1] = 0.0;
}

fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0f64, |m, r| m.max(r.abs()))
}
