//! Construction-time validation of operator capabilities and dimensions.
//!
//! These checks look only at the declared [`Capability`] tag and dimension of
//! an operator. They run when combinators are built and when [`find`] is
//! entered, never inside an iteration loop.
//!
//! [`find`]: crate::algorithms::find

use crate::error::{FixedPointError, Result};
use crate::operator::{Capability, FixedPointMap};

/// Fails unless `map` declares at least `required` and, when
/// `expected_dimension` is given, accepts vectors of that length.
pub fn check_capability<M: FixedPointMap + ?Sized>(
    map: &M,
    required: Capability,
    expected_dimension: Option<usize>,
) -> Result<()> {
    let declared = map.capability();
    if !declared.satisfies(required) {
        return Err(FixedPointError::type_mismatch(
            required,
            format!("{} ({})", map.type_name(), declared),
        ));
    }

    if let (Some(expected), Some(declared)) = (expected_dimension, map.dimension()) {
        if expected != declared {
            return Err(FixedPointError::dimension_mismatch(declared, expected));
        }
    }

    Ok(())
}

/// Checks that `map` is at least a [`Capability::FixedPointMap`].
pub fn check_fixed_point_map<M: FixedPointMap + ?Sized>(
    map: &M,
    dimension: Option<usize>,
) -> Result<()> {
    check_capability(map, Capability::FixedPointMap, dimension)
}

/// Checks that `map` is at least a [`Capability::NonexpansiveMap`].
pub fn check_nonexpansive_map<M: FixedPointMap + ?Sized>(
    map: &M,
    dimension: Option<usize>,
) -> Result<()> {
    check_capability(map, Capability::NonexpansiveMap, dimension)
}

/// Checks that `map` is at least a [`Capability::FirmlyNonexpansiveMap`].
pub fn check_firmly_nonexpansive_map<M: FixedPointMap + ?Sized>(
    map: &M,
    dimension: Option<usize>,
) -> Result<()> {
    check_capability(map, Capability::FirmlyNonexpansiveMap, dimension)
}

/// Checks that `map` is a [`Capability::MetricProjection`].
pub fn check_metric_projection<M: FixedPointMap + ?Sized>(
    map: &M,
    dimension: Option<usize>,
) -> Result<()> {
    check_capability(map, Capability::MetricProjection, dimension)
}
