//! # Configuration Constants
//!
//! Centralized constants for the shadow pipeline. All geometry tolerances,
//! densification parameters and projection fallbacks are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Densification**: Default point density and the pre-flight size ceiling
//! - **Projection**: Far-field fallback extent and attenuation defaults
//! - **Stereographic**: Shell and foot defaults

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for determining if two floating-point values are "equal" within
/// numerical tolerance.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Slack subtracted from `density * edge_length` before rounding up to a
/// segment count, so an edge of exactly `k / density` yields `k` segments
/// instead of `k + 1` due to rounding noise.
///
/// # Example
///
/// ```rust
/// use config::constants::SEGMENT_ROUNDING_SLACK;
///
/// let raw: f64 = 10.000000000000002;
/// assert_eq!((raw - SEGMENT_ROUNDING_SLACK).ceil(), 10.0);
/// ```
pub const SEGMENT_ROUNDING_SLACK: f64 = 1e-9;

// =============================================================================
// DENSIFICATION CONSTANTS
// =============================================================================

/// Default boundary density in points per unit length.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_DENSITY;
///
/// // Segment length never exceeds 1 / density
/// assert!((1.0 / DEFAULT_DENSITY - 0.1).abs() < 1e-12);
/// ```
pub const DEFAULT_DENSITY: f64 = 10.0;

/// Safety ceiling on the estimated number of points produced by
/// densification (`area * density^2`).
///
/// Requests above this ceiling fail before any allocation. The conforming
/// mesher also uses it as the cap on refinement vertices.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_DENSIFIED_POINTS;
///
/// let area = 2000.0;
/// let density = 10.0;
/// assert!(area * density * density > MAX_DENSIFIED_POINTS as f64);
/// ```
pub const MAX_DENSIFIED_POINTS: usize = 100_000;

/// Minimum interior angle (degrees) requested from the conforming mesher's
/// Delaunay refinement.
pub const MIN_TRIANGLE_ANGLE_DEG: f64 = 25.0;

// =============================================================================
// PROJECTION CONSTANTS
// =============================================================================

/// In-plane distance from the light at which shadow points are placed when
/// the perspective divide is unusable and attenuation is off.
///
/// Vertices at or beyond the light along the projection axis are pushed out
/// to this extent along their in-plane direction from the light.
pub const FAR_SHADOW_EXTENT: f64 = 1.0e4;

/// Multiplier applied to the light's distance from the origin when the
/// attenuation radius is computed automatically.
///
/// # Example
///
/// ```rust
/// use config::constants::AUTO_ATTENUATION_FACTOR;
///
/// let light_distance = 4.0;
/// assert_eq!(light_distance * AUTO_ATTENUATION_FACTOR, 12.0);
/// ```
pub const AUTO_ATTENUATION_FACTOR: f64 = 3.0;

// =============================================================================
// STEREOGRAPHIC CONSTANTS
// =============================================================================

/// Default sphere radius for the stereographic mapper.
pub const DEFAULT_SPHERE_RADIUS: f64 = 1.0;

/// Default foot radius, as a fraction of the sphere radius.
///
/// Outer-shell points closer than `radius * DEFAULT_FOOT_RADIUS_RATIO` to
/// the vertical axis (and below the sphere centre) are flattened when feet
/// are requested.
pub const DEFAULT_FOOT_RADIUS_RATIO: f64 = 0.25;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// Number of equal segments an edge of `length` is split into at `density`
/// points per unit length.
///
/// Always at least one, and chosen so no segment is longer than
/// `1 / density`.
///
/// # Example
///
/// ```rust
/// use config::constants::segments_for_length;
///
/// assert_eq!(segments_for_length(1.0, 10.0), 10);
/// assert_eq!(segments_for_length(0.01, 10.0), 1);
/// assert_eq!(segments_for_length(0.25, 10.0), 3);
/// ```
#[inline]
pub fn segments_for_length(length: f64, density: f64) -> usize {
    let raw = (length * density - SEGMENT_ROUNDING_SLACK).ceil();
    if raw.is_finite() && raw > 1.0 {
        raw as usize
    } else {
        1
    }
}
