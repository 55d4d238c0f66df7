use thiserror::Error;

/// Degenerate derived parameters. Always raised before the first step.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid has {ngrid} point(s) but at least 2 are needed; decrease dx (dx = {dx}, x2 - x1 = {length})")]
    GridTooSmall { ngrid: usize, dx: f64, length: f64 },

    #[error("outtime {outtime} is shorter than one time step (dt = {dt}), so no snapshot interval exists")]
    ZeroSnapshotInterval { outtime: f64, dt: f64 },

    #[error("derived quantity {name} is not finite or does not fit in a step count ({value})")]
    NonFinite { name: &'static str, value: f64 },
}

/// Failure of a whole run: either the parameters were degenerate or the
/// snapshot sink gave up.
#[derive(Debug, Error)]
pub enum RunError<E>
where
    E: std::error::Error + 'static,
{
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("snapshot sink failed: {0}")]
    Sink(#[source] E),
}
