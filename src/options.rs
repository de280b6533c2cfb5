//! Solver configuration: step-size sequences and per-call options.

use std::fmt;
use std::sync::Arc;

/// Tolerance used when callers have no particular accuracy in mind.
pub const DEFAULT_TOLERANCE: f64 = 1e-7;

/// A lazily evaluated, possibly infinite sequence of coefficients `c_1, c_2, ...`.
///
/// The sequence itself holds no iteration state: [`StepSequence::iter`]
/// starts from `k = 1` every time it is called, so the same options can be
/// reused across solver calls.
#[derive(Clone)]
pub enum StepSequence {
    /// `c_k = value` for every `k`.
    Constant(f64),
    /// `c_k = k^-exponent`.
    Power { exponent: f64 },
    /// The listed values, after which the sequence ends.
    Finite(Vec<f64>),
    /// `c_k = f(k)`.
    Function(Arc<dyn Fn(usize) -> f64 + Send + Sync>),
}

impl StepSequence {
    /// `c_k = 1 / k`.
    pub fn harmonic() -> Self {
        StepSequence::Power { exponent: 1.0 }
    }

    /// Wraps a closure evaluated at `k = 1, 2, ...`.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(usize) -> f64 + Send + Sync + 'static,
    {
        StepSequence::Function(Arc::new(f))
    }

    /// Returns a fresh iterator over the sequence.
    pub fn iter(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match self {
            StepSequence::Constant(value) => Box::new(std::iter::repeat(*value)),
            StepSequence::Power { exponent } => {
                let exponent = *exponent;
                if exponent == 1.0 {
                    Box::new((1usize..).map(|k| 1.0 / k as f64))
                } else {
                    Box::new((1usize..).map(move |k| (k as f64).powf(-exponent)))
                }
            }
            StepSequence::Finite(values) => Box::new(values.iter().copied()),
            StepSequence::Function(f) => Box::new((1usize..).map(move |k| f(k))),
        }
    }
}

impl fmt::Debug for StepSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepSequence::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            StepSequence::Power { exponent } => f
                .debug_struct("Power")
                .field("exponent", exponent)
                .finish(),
            StepSequence::Finite(values) => f.debug_tuple("Finite").field(values).finish(),
            StepSequence::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<f64> for StepSequence {
    fn from(value: f64) -> Self {
        StepSequence::Constant(value)
    }
}

impl From<Vec<f64>> for StepSequence {
    fn from(values: Vec<f64>) -> Self {
        StepSequence::Finite(values)
    }
}

/// Options recognized by [`find`](crate::algorithms::find).
///
/// Leaving a field at `None` selects the per-method default. Supplying an
/// option the chosen method does not use is rejected rather than ignored.
#[derive(Clone, Debug, Default)]
pub struct FindOptions {
    /// Maximum number of iterations; unbounded when `None`.
    pub maxiter: Option<usize>,
    /// Step sizes: `α_k` for Krasnoselskii–Mann and Hishinuma2015, `λ_k` for Halpern.
    pub steps: Option<StepSequence>,
    /// Acceleration coefficients `β_k`, used by Hishinuma2015 only.
    pub beta: Option<StepSequence>,
}

impl FindOptions {
    /// Cap the number of iterations.
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = Some(maxiter);
        self
    }

    /// Override the step-size sequence.
    pub fn with_steps(mut self, steps: impl Into<StepSequence>) -> Self {
        self.steps = Some(steps.into());
        self
    }

    /// Override the acceleration coefficients.
    pub fn with_beta(mut self, beta: impl Into<StepSequence>) -> Self {
        self.beta = Some(beta.into());
        self
    }
}
