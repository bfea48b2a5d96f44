//! # Config Crate
//!
//! Centralized configuration constants for the shadow pipeline.
//! All magic numbers and tunable parameters are defined here so the
//! densifier, the shadow projector and the stereographic mapper agree on
//! tolerances, defaults and safety limits.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_DENSITY, EPSILON, MAX_DENSIFIED_POINTS};
//!
//! // Use EPSILON for floating-point comparisons
//! let value: f64 = 0.00000000001; // 1e-11, smaller than EPSILON (1e-10)
//! assert!(value.abs() < EPSILON);
//!
//! // Estimate the size of a densified unit square before meshing it
//! let area = 1.0;
//! let estimate = area * DEFAULT_DENSITY * DEFAULT_DENSITY;
//! assert!(estimate <= MAX_DENSIFIED_POINTS as f64);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **No Dependencies**: Plain `const` items and inline helpers only

pub mod constants;
