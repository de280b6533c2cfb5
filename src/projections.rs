//! Closed-form metric projections onto simple convex sets.
//!
//! Each projection copies its parameters at construction and returns a fresh
//! vector from [`FixedPointMap::apply`], even when the input already lies in
//! the set.

use nalgebra::DVector;

use crate::error::{FixedPointError, Result};
use crate::operator::{Capability, FixedPointMap};

/// One side of a [`BoxProjection`].
#[derive(Clone, Debug, PartialEq)]
pub enum Bound {
    /// The same bound for every component.
    Scalar(f64),
    /// A bound per component.
    Vector(DVector<f64>),
}

impl Bound {
    fn at(&self, index: usize) -> f64 {
        match self {
            Bound::Scalar(value) => *value,
            Bound::Vector(values) => values[index],
        }
    }

    fn dimension(&self) -> Option<usize> {
        match self {
            Bound::Scalar(_) => None,
            Bound::Vector(values) => Some(values.len()),
        }
    }
}

impl From<f64> for Bound {
    fn from(value: f64) -> Self {
        Bound::Scalar(value)
    }
}

impl From<DVector<f64>> for Bound {
    fn from(values: DVector<f64>) -> Self {
        Bound::Vector(values)
    }
}

/// Projection onto the orthotope `{x : lb_i <= x_i <= ub_i}`.
///
/// A missing bound leaves that side unbounded. The projection is a
/// componentwise clamp.
#[derive(Clone, Debug)]
pub struct BoxProjection {
    lb: Option<Bound>,
    ub: Option<Bound>,
}

impl BoxProjection {
    /// Builds the projection from optional lower and upper bounds.
    pub fn new(lb: Option<Bound>, ub: Option<Bound>) -> Result<Self> {
        let lower = lb.as_ref().and_then(Bound::dimension);
        let upper = ub.as_ref().and_then(Bound::dimension);
        if let (Some(lower), Some(upper)) = (lower, upper) {
            if lower != upper {
                return Err(FixedPointError::dimension_mismatch(lower, upper));
            }
        }
        Ok(Self { lb, ub })
    }

    /// Projection onto `[lb, ub]`.
    pub fn bounded(lb: impl Into<Bound>, ub: impl Into<Bound>) -> Result<Self> {
        Self::new(Some(lb.into()), Some(ub.into()))
    }

    /// Projection onto `{x : x >= lb}`.
    pub fn lower(lb: impl Into<Bound>) -> Self {
        Self {
            lb: Some(lb.into()),
            ub: None,
        }
    }

    /// Projection onto `{x : x <= ub}`.
    pub fn upper(ub: impl Into<Bound>) -> Self {
        Self {
            lb: None,
            ub: Some(ub.into()),
        }
    }
}

impl FixedPointMap for BoxProjection {
    fn apply(&self, x: &DVector<f64>) -> DVector<f64> {
        DVector::from_fn(x.len(), |i, _| {
            let mut value = x[i];
            if let Some(lb) = &self.lb {
                value = value.max(lb.at(i));
            }
            if let Some(ub) = &self.ub {
                value = value.min(ub.at(i));
            }
            value
        })
    }

    fn contains(&self, x: &DVector<f64>) -> bool {
        x.iter().enumerate().all(|(i, value)| {
            let above = self.lb.as_ref().map_or(true, |lb| lb.at(i) <= *value);
            let below = self.ub.as_ref().map_or(true, |ub| *value <= ub.at(i));
            above && below
        })
    }

    fn dimension(&self) -> Option<usize> {
        self.lb
            .as_ref()
            .and_then(Bound::dimension)
            .or_else(|| self.ub.as_ref().and_then(Bound::dimension))
    }

    fn capability(&self) -> Capability {
        Capability::MetricProjection
    }
}

/// Projection onto the closed half-space `{x : ⟨w, x⟩ <= d}` with `w != 0`.
#[derive(Clone, Debug)]
pub struct HalfSpace {
    w: DVector<f64>,
    d: f64,
}

impl HalfSpace {
    /// Builds the projection; `w` is normalized internally.
    pub fn new(w: DVector<f64>, d: f64) -> Result<Self> {
        if w.is_empty() {
            return Err(FixedPointError::invalid_argument(
                "half-space",
                "parameter w must be a nonempty vector",
            ));
        }
        let length = w.norm();
        if length == 0.0 || !length.is_finite() {
            return Err(FixedPointError::invalid_argument(
                "half-space",
                "parameter w must be a finite nonzero vector",
            ));
        }
        Ok(Self {
            w: w / length,
            d: d / length,
        })
    }

    /// Signed slack `d - ⟨w, x⟩` under the normalized parameters.
    fn slack(&self, x: &DVector<f64>) -> f64 {
        self.d - self.w.dot(x)
    }
}

impl FixedPointMap for HalfSpace {
    fn apply(&self, x: &DVector<f64>) -> DVector<f64> {
        let slack = self.slack(x);
        if slack >= 0.0 {
            x.clone()
        } else {
            x + &self.w * slack
        }
    }

    fn contains(&self, x: &DVector<f64>) -> bool {
        self.slack(x) >= 0.0
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.w.len())
    }

    fn capability(&self) -> Capability {
        Capability::MetricProjection
    }
}

/// Projection onto the closed ball `{x : ‖x - c‖ <= r}`.
#[derive(Clone, Debug)]
pub struct Ball {
    center: DVector<f64>,
    radius: f64,
}

impl Ball {
    /// Builds the projection onto the ball with center `center` and radius `radius`.
    pub fn new(center: DVector<f64>, radius: f64) -> Result<Self> {
        if !(radius >= 0.0 && radius.is_finite()) {
            return Err(FixedPointError::invalid_argument(
                "ball",
                format!("radius must be a nonnegative real, found {radius}"),
            ));
        }
        if center.is_empty() {
            return Err(FixedPointError::invalid_argument(
                "ball",
                "center must be a nonempty vector",
            ));
        }
        Ok(Self { center, radius })
    }

    /// Center `c` of the ball.
    pub fn center(&self) -> &DVector<f64> {
        &self.center
    }

    /// Radius `r` of the ball.
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl FixedPointMap for Ball {
    fn apply(&self, x: &DVector<f64>) -> DVector<f64> {
        let offset = x - &self.center;
        let distance = offset.norm();
        if distance <= self.radius {
            x.clone()
        } else {
            offset * (self.radius / distance) + &self.center
        }
    }

    fn contains(&self, x: &DVector<f64>) -> bool {
        (x - &self.center).norm() <= self.radius
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.center.len())
    }

    fn capability(&self) -> Capability {
        Capability::MetricProjection
    }
}
