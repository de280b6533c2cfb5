use std::cell::Cell;
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use fpmrs::projections::{Ball, HalfSpace};
use fpmrs::{
    find, find_with_summary, Capability, FindOptions, FindSummary, FixedPointMap, Intersection,
    Method, SharedMap,
};
use nalgebra::{DMatrix, DVector};

/// Rotation by `angle` about `center`, scaled by `scale <= 1`.
struct Rotation {
    center: DVector<f64>,
    matrix: DMatrix<f64>,
}

impl Rotation {
    fn new(center: DVector<f64>, angle: f64, scale: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        let matrix = DMatrix::from_row_slice(2, 2, &[cos, -sin, sin, cos]) * scale;
        Self { center, matrix }
    }
}

impl FixedPointMap for Rotation {
    fn apply(&self, x: &DVector<f64>) -> DVector<f64> {
        &self.matrix * (x - &self.center) + &self.center
    }

    fn contains(&self, x: &DVector<f64>) -> bool {
        *x == self.center
    }

    fn dimension(&self) -> Option<usize> {
        Some(2)
    }

    fn capability(&self) -> Capability {
        Capability::NonexpansiveMap
    }
}

/// Counts how often the wrapped map is evaluated.
struct Counted<M> {
    inner: M,
    evaluations: Cell<usize>,
}

impl<M> Counted<M> {
    fn new(inner: M) -> Self {
        Self {
            inner,
            evaluations: Cell::new(0),
        }
    }
}

impl<M: FixedPointMap> FixedPointMap for Counted<M> {
    fn apply(&self, x: &DVector<f64>) -> DVector<f64> {
        self.evaluations.set(self.evaluations.get() + 1);
        self.inner.apply(x)
    }

    fn contains(&self, x: &DVector<f64>) -> bool {
        self.inner.contains(x)
    }

    fn dimension(&self) -> Option<usize> {
        self.inner.dimension()
    }

    fn capability(&self) -> Capability {
        self.inner.capability()
    }
}

fn solution() -> DVector<f64> {
    DVector::from_vec(vec![1.0, -2.0])
}

fn rotation() -> Rotation {
    Rotation::new(solution(), 0.1, 1.0)
}

/// Runs `method` on the rotation scenario and checks `x0` is left untouched.
fn solve_rotation(method: &str, options: &FindOptions) -> DVector<f64> {
    let x0 = DVector::from_element(2, 1.0);
    let x = find(&rotation(), &x0, method, 1e-8, options).unwrap();
    assert_eq!(x0, DVector::from_element(2, 1.0));
    assert_ne!(x.as_ptr(), x0.as_ptr());
    x
}

#[test]
fn krasnoselskii_mann_finds_rotation_center() {
    let x = solve_rotation("Krasnoselskii-Mann", &FindOptions::default());
    assert_abs_diff_eq!(x, solution(), epsilon = 1e-7);
}

#[test]
fn krasnoselskii_mann_with_custom_steps() {
    let x = solve_rotation("Krasnoselskii-Mann", &FindOptions::default().with_steps(0.1));
    assert_abs_diff_eq!(x, solution(), epsilon = 1e-7);
}

#[test]
fn zero_steps_leave_iterate_in_place() {
    let options = FindOptions::default().with_steps(0.0).with_maxiter(1000);
    let x0 = DVector::from_element(2, 1.0);
    let (x, summary) =
        find_with_summary(&rotation(), &x0, Method::KrasnoselskiiMann, 1e-7, &options).unwrap();
    assert_eq!(x, x0);
    assert_ne!(x.as_ptr(), x0.as_ptr());
    assert_eq!(summary.evaluations, 1000);
    assert!(!summary.converged);
}

#[test]
fn hishinuma_finds_rotation_center() {
    let x = solve_rotation("Hishinuma2015", &FindOptions::default());
    assert_abs_diff_eq!(x, solution(), epsilon = 1e-7);
}

#[test]
fn halpern_finds_rotation_center() {
    let x = solve_rotation("Halpern", &FindOptions::default());
    assert_abs_diff_eq!(x, solution(), epsilon = 1e-7);
}

#[test]
fn acceleration_needs_no_more_evaluations_on_contractive_rotation() {
    let x0 = DVector::from_element(2, 1.0);
    let options = FindOptions::default();

    let plain = Counted::new(Rotation::new(solution(), 0.1, 0.5));
    let (x_plain, plain_summary) =
        find_with_summary(&plain, &x0, Method::KrasnoselskiiMann, 1e-8, &options).unwrap();

    let accelerated = Counted::new(Rotation::new(solution(), 0.1, 0.5));
    let (x_fast, fast_summary) =
        find_with_summary(&accelerated, &x0, Method::Hishinuma2015, 1e-8, &options).unwrap();

    assert!(plain_summary.converged && fast_summary.converged);
    assert_abs_diff_eq!(x_plain, solution(), epsilon = 1e-7);
    assert_abs_diff_eq!(x_fast, solution(), epsilon = 1e-7);

    assert_eq!(plain.evaluations.get(), plain_summary.evaluations);
    assert_eq!(accelerated.evaluations.get(), fast_summary.evaluations);
    assert!(accelerated.evaluations.get() <= plain.evaluations.get());
}

#[test]
fn halpern_selects_nearest_feasible_point() {
    let feasible = Intersection::new(vec![
        Arc::new(HalfSpace::new(DVector::from_vec(vec![-1.0, 1.0]), 0.0).unwrap()) as SharedMap,
        Arc::new(Ball::new(DVector::zeros(2), 1.0).unwrap()) as SharedMap,
    ])
    .unwrap();
    let x0 = DVector::from_vec(vec![5.0, 10.0]);

    let x = find(&feasible, &x0, "Halpern", 1e-3, &FindOptions::default()).unwrap();

    assert_eq!(x0, DVector::from_vec(vec![5.0, 10.0]));
    let nearest = DVector::from_element(2, 0.5f64.sqrt());
    assert_abs_diff_eq!(x, nearest, epsilon = 1e-2);
}

#[test]
fn options_can_be_reused_across_calls() {
    let options = FindOptions::default().with_maxiter(50);
    let x0 = DVector::from_element(2, 1.0);
    let (first, a) =
        find_with_summary(&rotation(), &x0, Method::Halpern, 1e-8, &options).unwrap();
    let (second, b) =
        find_with_summary(&rotation(), &x0, Method::Halpern, 1e-8, &options).unwrap();
    assert_eq!(first, second);
    assert_eq!(a, b);
    assert_eq!(a.evaluations, 50);
}

#[test]
fn summary_serializes_with_method_name() {
    let summary = FindSummary {
        method: Method::Hishinuma2015,
        iterations: 3,
        evaluations: 4,
        residual: 0.25,
        converged: false,
    };
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["method"], "Hishinuma2015");
    assert_eq!(json["evaluations"], 4);

    let back: FindSummary = serde_json::from_value(json).unwrap();
    assert_eq!(back, summary);

    let method: Method = serde_json::from_str("\"Krasnoselskii-Mann\"").unwrap();
    assert_eq!(method, Method::KrasnoselskiiMann);
}
