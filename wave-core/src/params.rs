use crate::error::ConfigError;

/// Ratio `dt * c / dx`. Keeps the explicit scheme inside its stability margin.
pub const COURANT: f64 = 0.5;

/// User-supplied simulation constants.
///
/// Values are expected to be validated by whoever built the record
/// (`c > 0`, `tau > 0`, `x1 < x2`, `0 < dx <= x2 - x1`, `runtime >= 0`,
/// `outtime >= 0`, non-empty `outfilename`); they are not rechecked here.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveParams {
    /// Wave speed.
    pub c: f64,
    /// Damping time.
    pub tau: f64,
    /// Left end of the domain.
    pub x1: f64,
    /// Right end of the domain.
    pub x2: f64,
    /// Simulated time to cover.
    pub runtime: f64,
    /// Spatial grid spacing.
    pub dx: f64,
    /// Simulated time between snapshots.
    pub outtime: f64,
    /// Where the snapshots end up.
    pub outfilename: String,
}

impl WaveParams {
    pub fn length(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Compute grid size, time step, step count and snapshot interval.
    ///
    /// `ngrid` is truncated, not rounded, and does not add the closing grid
    /// point: output stays comparable with existing runs.
    pub fn derive(&self) -> Result<DerivedParams, ConfigError> {
        let length = self.length();

        let ngrid = floor_count("ngrid", length / self.dx)?;
        if ngrid < 2 {
            return Err(ConfigError::GridTooSmall {
                ngrid,
                dx: self.dx,
                length,
            });
        }

        let dt = COURANT * self.dx / self.c;
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::NonFinite { name: "dt", value: dt });
        }

        let nsteps = floor_count("nsteps", self.runtime / dt)?;
        // an interval longer than any run just means no snapshot after t = 0
        let nper = saturating_count("nper", self.outtime / dt)?;
        if nper == 0 {
            return Err(ConfigError::ZeroSnapshotInterval {
                outtime: self.outtime,
                dt,
            });
        }

        log::debug!("derived ngrid={ngrid} dt={dt} nsteps={nsteps} nper={nper}");

        Ok(DerivedParams {
            input: self.clone(),
            ngrid,
            dt,
            nsteps,
            nper,
        })
    }
}

fn floor_count(name: &'static str, value: f64) -> Result<usize, ConfigError> {
    // `as` saturates silently, so reject anything it would clamp.
    if !value.is_finite() || value < 0.0 || value >= usize::MAX as f64 {
        return Err(ConfigError::NonFinite { name, value });
    }
    Ok(value.floor() as usize)
}

fn saturating_count(name: &'static str, value: f64) -> Result<usize, ConfigError> {
    if value.is_nan() || value < 0.0 {
        return Err(ConfigError::NonFinite { name, value });
    }
    Ok(value.floor() as usize)
}

/// Parameters after derivation. Only [`WaveParams::derive`] builds these, so
/// holding one means the step constants exist and are usable.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedParams {
    input: WaveParams,
    ngrid: usize,
    dt: f64,
    nsteps: usize,
    nper: usize,
}

impl DerivedParams {
    pub fn input(&self) -> &WaveParams {
        &self.input
    }

    /// Number of grid points (>= 2).
    pub fn ngrid(&self) -> usize {
        self.ngrid
    }

    /// Time step size.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of steps needed to reach `runtime`.
    pub fn nsteps(&self) -> usize {
        self.nsteps
    }

    /// Steps between snapshots (>= 1).
    pub fn nper(&self) -> usize {
        self.nper
    }

    pub fn c(&self) -> f64 {
        self.input.c
    }

    pub fn tau(&self) -> f64 {
        self.input.tau
    }

    pub fn x1(&self) -> f64 {
        self.input.x1
    }

    pub fn x2(&self) -> f64 {
        self.input.x2
    }

    pub fn dx(&self) -> f64 {
        self.input.dx
    }
}
