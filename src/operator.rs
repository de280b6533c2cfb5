//! The operator capability hierarchy.
//!
//! Every operator handled by this crate implements [`FixedPointMap`] and
//! declares one [`Capability`] level. The levels are nested: a metric
//! projection is firmly nonexpansive, a firmly nonexpansive map is
//! nonexpansive, and every nonexpansive map is a fixed-point map.
//!
//! The declared level is trusted. Nothing in this crate re-verifies the
//! underlying inequality numerically; an operator tagged with a level it does
//! not satisfy leads to undefined numeric behaviour in the combinators and
//! algorithms rather than to a reported error.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Capability levels an operator may claim, ordered from weakest to strongest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// A map `T: R^n -> R^n` with a membership test for its fixed points.
    FixedPointMap,
    /// `‖T(x) - T(y)‖ <= ‖x - y‖` for all `x`, `y`.
    NonexpansiveMap,
    /// `‖T(x) - T(y)‖² + ‖(I - T)(x) - (I - T)(y)‖² <= ‖x - y‖²` for all `x`, `y`.
    FirmlyNonexpansiveMap,
    /// `T(x)` is the point of `Fix(T)` closest to `x`.
    MetricProjection,
}

impl Capability {
    /// Returns `true` when this level refines (or equals) `required`.
    pub fn satisfies(self, required: Capability) -> bool {
        self >= required
    }

    /// Canonical name of the level.
    pub fn name(self) -> &'static str {
        match self {
            Capability::FixedPointMap => "FixedPointMap",
            Capability::NonexpansiveMap => "NonexpansiveMap",
            Capability::FirmlyNonexpansiveMap => "FirmlyNonexpansiveMap",
            Capability::MetricProjection => "MetricProjection",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A mapping from `R^n` onto itself whose fixed points are sought.
pub trait FixedPointMap {
    /// Maps `x` to `T(x)`. The result is always a freshly owned vector.
    fn apply(&self, x: &DVector<f64>) -> DVector<f64>;

    /// Returns `true` if `x` belongs to `Fix(T) = {u : T(u) = u}`.
    fn contains(&self, x: &DVector<f64>) -> bool;

    /// Number of components this map accepts, or `None` for any length.
    fn dimension(&self) -> Option<usize>;

    /// The capability level this map declares.
    fn capability(&self) -> Capability;

    /// Name of the concrete type, used in error messages.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Shared, read-only handle to an operator, as owned by the combinators.
///
/// Combinators built from these handles can be moved to or shared with other
/// threads, matching the bound on [`StepSequence::Function`].
///
/// [`StepSequence::Function`]: crate::options::StepSequence::Function
pub type SharedMap = Arc<dyn FixedPointMap + Send + Sync>;

macro_rules! forward_fixed_point_map {
    ($($wrapper:ty),*) => {
        $(
            impl<T: FixedPointMap + ?Sized> FixedPointMap for $wrapper {
                fn apply(&self, x: &DVector<f64>) -> DVector<f64> {
                    (**self).apply(x)
                }

                fn contains(&self, x: &DVector<f64>) -> bool {
                    (**self).contains(x)
                }

                fn dimension(&self) -> Option<usize> {
                    (**self).dimension()
                }

                fn capability(&self) -> Capability {
                    (**self).capability()
                }

                fn type_name(&self) -> &'static str {
                    (**self).type_name()
                }
            }
        )*
    };
}

forward_fixed_point_map!(&T, Box<T>, Rc<T>, Arc<T>);


#[cfg(test)]
mod tests {
    use super::testing::Identity;
    use super::*;

    #[test]
    fn capabilities_are_nested() {
        let projection = Capability::MetricProjection;
        assert!(projection.satisfies(Capability::FixedPointMap));
        assert!(projection.satisfies(Capability::NonexpansiveMap));
        assert!(projection.satisfies(Capability::FirmlyNonexpansiveMap));
        assert!(!Capability::NonexpansiveMap.satisfies(Capability::FirmlyNonexpansiveMap));
        assert!(!Capability::FixedPointMap.satisfies(Capability::NonexpansiveMap));
    }

    #[test]
    fn shared_handles_forward_to_inner_map() {
        let shared: SharedMap = Arc::new(Identity::new(Capability::NonexpansiveMap, Some(3)));
        assert_eq!(shared.dimension(), Some(3));
        assert_eq!(shared.capability(), Capability::NonexpansiveMap);
        assert!(shared.type_name().ends_with("Identity"));

        fn assert_thread_safe<T: Send + Sync>(_: &T) {}
        assert_thread_safe(&shared);

        let x = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(shared.apply(&x), x);
    }
}
