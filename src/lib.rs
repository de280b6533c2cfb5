//! Fixed-point iterations for nonexpansive operators.
//!
//! Many convex-feasibility and constrained-optimization problems reduce to
//! finding a fixed point `x*` with `T(x*) = x*` of a nonexpansive operator `T`
//! on `R^n`. This crate offers tools to
//!
//! - describe operators and the guarantees they carry (`operator` module),
//! - validate those guarantees when operators are combined (`contracts` module),
//! - build new operators from existing ones (`nonexpansive` module),
//! - project onto boxes, half-spaces and balls (`projections` module), and
//! - run Krasnoselskii–Mann, Halpern or accelerated iterations (`algorithms` module).
//!
//! Operators declare a [`Capability`] level which is trusted, not verified:
//! the combinators and algorithms only check that the declared level is high
//! enough, once, at construction time.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fpmrs::projections::{Ball, HalfSpace};
//! use fpmrs::{find, FindOptions, Intersection, SharedMap, DEFAULT_TOLERANCE};
//! use nalgebra::DVector;
//!
//! // Points with x <= y inside the unit disc.
//! let half_space = HalfSpace::new(DVector::from_vec(vec![1.0, -1.0]), 0.0).expect("nonzero normal");
//! let ball = Ball::new(DVector::zeros(2), 1.0).expect("nonnegative radius");
//! let feasible = Intersection::new(vec![
//!     Arc::new(half_space) as SharedMap,
//!     Arc::new(ball) as SharedMap,
//! ])
//! .expect("compatible maps");
//!
//! let x0 = DVector::from_vec(vec![5.0, 10.0]);
//! let nearest = find(&feasible, &x0, "Halpern", DEFAULT_TOLERANCE, &FindOptions::default())
//!     .expect("valid call");
//! println!("nearest feasible point: {nearest}");
//! ```

pub mod algorithms;
pub mod contracts;
pub mod error;
pub mod nonexpansive;
pub mod operator;
pub mod options;
pub mod projections;

pub use algorithms::{find, find_with_summary, FindSummary, Method};
pub use error::{FixedPointError, Result};
pub use nonexpansive::{Averaged, Composition, Intersection};
pub use operator::{Capability, FixedPointMap, SharedMap};
pub use options::{FindOptions, StepSequence, DEFAULT_TOLERANCE};
