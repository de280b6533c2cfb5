//! Combinators that build new nonexpansive maps out of existing ones.
//!
//! [`Intersection`] and [`Composition`] both produce a map whose fixed-point
//! set coincides with the intersection of the constituents' fixed-point sets
//! (Propositions 4.9, 4.47 and 4.49 in Bauschke & Combettes, *Convex Analysis
//! and Monotone Operator Theory in Hilbert Spaces*, 2017), provided that
//! intersection is nonempty. Neither constructor checks that assumption: for
//! disjoint constraint sets the averaged or composed map still has fixed points
//! (or none), but they are not common fixed points of the constituents.

use log::debug;
use nalgebra::DVector;

use crate::contracts::{check_firmly_nonexpansive_map, check_nonexpansive_map};
use crate::error::{FixedPointError, Result};
use crate::operator::{Capability, FixedPointMap, SharedMap};

/// First concrete dimension declared by any of `maps`, if any.
fn derive_dimension(maps: &[SharedMap]) -> Option<usize> {
    maps.iter().find_map(|map| map.dimension())
}

fn collect_nonempty<I>(maps: I, context: &'static str) -> Result<Vec<SharedMap>>
where
    I: IntoIterator<Item = SharedMap>,
{
    let maps: Vec<SharedMap> = maps.into_iter().collect();
    if maps.is_empty() {
        return Err(FixedPointError::invalid_argument(
            context,
            "at least one mapping must be given",
        ));
    }
    Ok(maps)
}

/// Barycentric average of nonexpansive maps:
/// `T(x) = (T_1(x) + ... + T_K(x)) / K`.
#[derive(Clone)]
pub struct Intersection {
    maps: Vec<SharedMap>,
    dimension: Option<usize>,
}

impl Intersection {
    /// Builds the average of `maps`, each of which must be nonexpansive.
    pub fn new<I>(maps: I) -> Result<Self>
    where
        I: IntoIterator<Item = SharedMap>,
    {
        let maps = collect_nonempty(maps, "intersection")?;
        let dimension = derive_dimension(&maps);
        for map in &maps {
            check_nonexpansive_map(map.as_ref(), dimension)?;
        }

        debug!(
            "built intersection of {} maps (dimension {:?})",
            maps.len(),
            dimension
        );
        Ok(Self { maps, dimension })
    }

    /// Number of constituent maps.
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Always `false`; construction rejects empty lists.
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// The constituent maps in the order they were given.
    pub fn maps(&self) -> &[SharedMap] {
        &self.maps
    }
}

impl FixedPointMap for Intersection {
    fn apply(&self, x: &DVector<f64>) -> DVector<f64> {
        let mut sum = DVector::zeros(x.len());
        for map in &self.maps {
            sum += map.apply(x);
        }
        sum / self.maps.len() as f64
    }

    fn contains(&self, x: &DVector<f64>) -> bool {
        self.maps.iter().all(|map| map.contains(x))
    }

    fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    fn capability(&self) -> Capability {
        Capability::NonexpansiveMap
    }
}

/// Composition `T = T_1 ∘ T_2 ∘ ... ∘ T_K`; the last listed map is applied first.
///
/// Every map except the last must be firmly nonexpansive. Membership is
/// answered by asking every constituent, which is exact only when the
/// constituents share at least one fixed point.
#[derive(Clone)]
pub struct Composition {
    maps: Vec<SharedMap>,
    dimension: Option<usize>,
}

impl Composition {
    /// Builds the composition of `maps`.
    pub fn new<I>(maps: I) -> Result<Self>
    where
        I: IntoIterator<Item = SharedMap>,
    {
        let maps = collect_nonempty(maps, "composition")?;
        let dimension = derive_dimension(&maps);
        let (last, leading) = maps
            .split_last()
            .ok_or_else(|| FixedPointError::invalid_argument("composition", "no maps"))?;
        for map in leading {
            check_firmly_nonexpansive_map(map.as_ref(), dimension)?;
        }
        check_nonexpansive_map(last.as_ref(), dimension)?;

        debug!(
            "built composition of {} maps (dimension {:?})",
            maps.len(),
            dimension
        );
        Ok(Self { maps, dimension })
    }

    /// Number of constituent maps.
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Always `false`; construction rejects empty lists.
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// The constituent maps in the order they were given.
    pub fn maps(&self) -> &[SharedMap] {
        &self.maps
    }
}

impl FixedPointMap for Composition {
    fn apply(&self, x: &DVector<f64>) -> DVector<f64> {
        let mut maps = self.maps.iter().rev();
        let mut out = match maps.next() {
            Some(first) => first.apply(x),
            None => x.clone(),
        };
        for map in maps {
            out = map.apply(&out);
        }
        out
    }

    fn contains(&self, x: &DVector<f64>) -> bool {
        self.maps.iter().all(|map| map.contains(x))
    }

    fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    fn capability(&self) -> Capability {
        Capability::NonexpansiveMap
    }
}

/// Averaged relaxation `x ↦ αT(x) + (1 - α)x` of a nonexpansive map.
///
/// For `α ∈ (0, 1/2]` the result is firmly nonexpansive and has the same fixed
/// points as `T`, so it can appear in a non-terminal position of a
/// [`Composition`].
#[derive(Clone, Debug)]
pub struct Averaged<M> {
    map: M,
    alpha: f64,
}

impl<M: FixedPointMap> Averaged<M> {
    /// Relaxes `map` with weight `alpha`, which must lie in `(0, 0.5]`.
    pub fn new(map: M, alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha <= 0.5) {
            return Err(FixedPointError::invalid_argument(
                "averaged map",
                format!("alpha must be between 0 (exclusive) and 0.5, found {alpha}"),
            ));
        }
        check_nonexpansive_map(&map, None)?;
        Ok(Self { map, alpha })
    }

    /// Relaxes `map` with weight one half.
    pub fn half(map: M) -> Result<Self> {
        Self::new(map, 0.5)
    }

    /// The relaxation weight `α`.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The wrapped map.
    pub fn inner(&self) -> &M {
        &self.map
    }
}

impl<M: FixedPointMap> FixedPointMap for Averaged<M> {
    fn apply(&self, x: &DVector<f64>) -> DVector<f64> {
        let mut out = self.map.apply(x) * self.alpha;
        out.axpy(1.0 - self.alpha, x, 1.0);
        out
    }

    fn contains(&self, x: &DVector<f64>) -> bool {
        self.map.contains(x)
    }

    fn dimension(&self) -> Option<usize> {
        self.map.dimension()
    }

    fn capability(&self) -> Capability {
        Capability::FirmlyNonexpansiveMap
    }
}
