use thiserror::Error;

/// Failures inside a dynamics engine step.
#[derive(Debug, Error)]
pub enum DynamicsError {
    /// The total exit rate was not finite and positive, so neither the
    /// categorical neighbor draw nor the waiting-time draw is defined.
    /// Only degenerate landscapes can produce this.
    #[error("degenerate exit rates: total rate R = {rate} is not finite and positive")]
    DegenerateRates { rate: f64 },
}

/// Top-level failures of a single tracer run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Dynamics(#[from] DynamicsError),

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("parameter serialization failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("grid `{0}` is empty; cannot bin observables against it")]
    EmptyGrid(&'static str),
}
