//! Fixed-point iterations for nonexpansive maps.
//!
//! Three schemes are available, selected through [`Method`]:
//!
//! - **Krasnoselskii–Mann** (Krasnosel'skii 1955, Mann 1953):
//!   `x_{k+1} = x_k + α_k (T(x_k) - x_k)`, default `α_k = 0.5`.
//! - **Halpern** (Halpern 1967): `x_{k+1} = λ_k x_0 + (1 - λ_k) T(x_k)`, default
//!   `λ_k = 1/(k+1)`. Converges to the fixed point nearest to `x_0`.
//! - **Hishinuma2015**: Krasnoselskii–Mann accelerated by a conjugate-gradient
//!   style direction `d_{k+1} = (T(x_k) - x_k) + β_k d_k`,
//!   `x_{k+1} = x_k + α_k d_{k+1}`, defaults `α_k = 0.5`, `β_k = k^-1.001`
//!   (Algorithm 3.1 in Hishinuma & Iiduka, 2015).
//!
//! All schemes stop as soon as `‖T(x) - x‖ < tol` and return the iterate `x`
//! that was just evaluated. When the step sequence (truncated by `maxiter`)
//! runs out first they return the last iterate without raising an error;
//! inspect [`FindSummary::converged`] to tell the two apart.

use std::fmt;
use std::str::FromStr;

use log::{debug, trace};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::contracts::check_nonexpansive_map;
use crate::error::{FixedPointError, Result};
use crate::operator::FixedPointMap;
use crate::options::{FindOptions, StepSequence};

/// Iteration scheme used by [`find`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    #[default]
    #[serde(rename = "Krasnoselskii-Mann")]
    KrasnoselskiiMann,
    #[serde(rename = "Halpern")]
    Halpern,
    #[serde(rename = "Hishinuma2015")]
    Hishinuma2015,
}

impl Method {
    /// Canonical name accepted by [`Method::from_str`].
    pub fn name(self) -> &'static str {
        match self {
            Method::KrasnoselskiiMann => "Krasnoselskii-Mann",
            Method::Halpern => "Halpern",
            Method::Hishinuma2015 => "Hishinuma2015",
        }
    }

    /// Step sizes used when the caller supplies none.
    pub fn default_steps(self) -> StepSequence {
        match self {
            Method::KrasnoselskiiMann | Method::Hishinuma2015 => StepSequence::Constant(0.5),
            Method::Halpern => StepSequence::from_fn(|k| 1.0 / (k + 1) as f64),
        }
    }

    fn accepts_beta(self) -> bool {
        matches!(self, Method::Hishinuma2015)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = FixedPointError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "Krasnoselskii-Mann" => Ok(Method::KrasnoselskiiMann),
            "Halpern" => Ok(Method::Halpern),
            "Hishinuma2015" => Ok(Method::Hishinuma2015),
            other => Err(FixedPointError::UnsupportedMethod {
                method: other.to_string(),
            }),
        }
    }
}

/// Default acceleration coefficients `β_k = k^-1.001` for Hishinuma2015.
pub fn default_beta() -> StepSequence {
    StepSequence::Power { exponent: 1.001 }
}

/// Diagnostics returned alongside the solution by [`find_with_summary`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FindSummary {
    /// Scheme that produced the solution.
    pub method: Method,
    /// Number of updates applied to the iterate.
    pub iterations: usize,
    /// Number of operator evaluations.
    pub evaluations: usize,
    /// Residual `‖T(x) - x‖` at the last check, `NaN` if none was made.
    pub residual: f64,
    /// Whether the residual fell below the tolerance.
    pub converged: bool,
}

impl FindSummary {
    fn new(method: Method) -> Self {
        Self {
            method,
            iterations: 0,
            evaluations: 0,
            residual: f64::NAN,
            converged: false,
        }
    }

    /// Records the residual of the latest evaluation and reports whether to stop.
    fn check(&mut self, residual: f64, tol: f64) -> bool {
        self.residual = residual;
        self.converged = residual < tol;
        trace!(
            "{} iteration {}: residual {:e}",
            self.method,
            self.iterations,
            residual
        );
        self.converged
    }
}

/// Finds a fixed point of `map` starting from `x0`.
///
/// `method` is one of `"Krasnoselskii-Mann"`, `"Halpern"` or
/// `"Hishinuma2015"`. The returned vector is always a new allocation and `x0`
/// is left untouched.
pub fn find<M: FixedPointMap + ?Sized>(
    map: &M,
    x0: &DVector<f64>,
    method: &str,
    tol: f64,
    options: &FindOptions,
) -> Result<DVector<f64>> {
    let method = method.parse()?;
    let (solution, _) = find_with_summary(map, x0, method, tol, options)?;
    Ok(solution)
}

/// Like [`find`], but takes a typed [`Method`] and also returns diagnostics.
pub fn find_with_summary<M: FixedPointMap + ?Sized>(
    map: &M,
    x0: &DVector<f64>,
    method: Method,
    tol: f64,
    options: &FindOptions,
) -> Result<(DVector<f64>, FindSummary)> {
    validate(map, x0, method, tol, options)?;
    debug!(
        "solving with {} in dimension {} (tol {:e}, maxiter {:?})",
        method,
        x0.len(),
        tol,
        options.maxiter
    );

    let default_steps = method.default_steps();
    let steps = options.steps.as_ref().unwrap_or(&default_steps).iter();
    let steps: Box<dyn Iterator<Item = f64> + '_> = match options.maxiter {
        Some(maxiter) => Box::new(steps.take(maxiter)),
        None => steps,
    };

    let mut summary = FindSummary::new(method);
    let solution = match method {
        Method::KrasnoselskiiMann => krasnoselskii_mann(map, x0, tol, steps, &mut summary),
        Method::Halpern => halpern(map, x0, tol, steps, &mut summary),
        Method::Hishinuma2015 => {
            let default_beta = default_beta();
            let beta = options.beta.as_ref().unwrap_or(&default_beta).iter();
            hishinuma2015(map, x0, tol, steps.zip(beta), &mut summary)
        }
    };

    debug!(
        "{} finished after {} iterations ({} evaluations), residual {:e}, converged {}",
        method, summary.iterations, summary.evaluations, summary.residual, summary.converged
    );
    Ok((solution, summary))
}

fn validate<M: FixedPointMap + ?Sized>(
    map: &M,
    x0: &DVector<f64>,
    method: Method,
    tol: f64,
    options: &FindOptions,
) -> Result<()> {
    if x0.is_empty() {
        return Err(FixedPointError::invalid_argument(
            "initial point",
            "x0 must be a nonempty vector",
        ));
    }
    if x0.iter().any(|value| !value.is_finite()) {
        return Err(FixedPointError::invalid_argument(
            "initial point",
            "x0 must have finite components",
        ));
    }
    if !(tol > 0.0 && tol.is_finite()) {
        return Err(FixedPointError::invalid_argument(
            "tolerance",
            format!("tol must be a positive real, found {tol}"),
        ));
    }
    if options.maxiter == Some(0) {
        return Err(FixedPointError::invalid_argument(
            "options",
            "maxiter must be a positive integer",
        ));
    }
    if options.beta.is_some() && !method.accepts_beta() {
        return Err(FixedPointError::invalid_argument(
            "options",
            format!("option `beta` is not recognized by {method}"),
        ));
    }
    check_nonexpansive_map(map, Some(x0.len()))
}

fn krasnoselskii_mann<M, I>(
    map: &M,
    x0: &DVector<f64>,
    tol: f64,
    steps: I,
    summary: &mut FindSummary,
) -> DVector<f64>
where
    M: FixedPointMap + ?Sized,
    I: Iterator<Item = f64>,
{
    let mut x = x0.clone();
    for step in steps {
        let tx = map.apply(&x);
        summary.evaluations += 1;
        if summary.check((&tx - &x).norm(), tol) {
            break;
        }
        // x = (1 - α) x + α T(x)
        x.axpy(step, &tx, 1.0 - step);
        summary.iterations += 1;
    }
    x
}

fn halpern<M, I>(
    map: &M,
    x0: &DVector<f64>,
    tol: f64,
    steps: I,
    summary: &mut FindSummary,
) -> DVector<f64>
where
    M: FixedPointMap + ?Sized,
    I: Iterator<Item = f64>,
{
    let mut x = x0.clone();
    for step in steps {
        let tx = map.apply(&x);
        summary.evaluations += 1;
        if summary.check((&tx - &x).norm(), tol) {
            break;
        }
        // x = λ x0 + (1 - λ) T(x)
        let mut next = tx * (1.0 - step);
        next.axpy(step, x0, 1.0);
        x = next;
        summary.iterations += 1;
    }
    x
}

fn hishinuma2015<M, I>(
    map: &M,
    x0: &DVector<f64>,
    tol: f64,
    coefficients: I,
    summary: &mut FindSummary,
) -> DVector<f64>
where
    M: FixedPointMap + ?Sized,
    I: Iterator<Item = (f64, f64)>,
{
    let mut x = x0.clone();
    let mut tx = map.apply(&x);
    summary.evaluations += 1;
    let mut direction = &tx - &x;

    for (step, beta) in coefficients {
        let residual = &tx - &x;
        if summary.check(residual.norm(), tol) {
            break;
        }
        // d = (T(x) - x) + β d
        direction *= beta;
        direction += residual;
        x.axpy(step, &direction, 1.0);

        tx = map.apply(&x);
        summary.evaluations += 1;
        summary.iterations += 1;
    }
    x
}
