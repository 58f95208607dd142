// src/format/coords.rs
//! Coordinate encoding conversions

/// Split a signed decimal-degree value into `(magnitude, positive_hemisphere)`.
///
/// Zero (either sign) belongs to the north/east hemisphere.
pub fn to_hemisphere(signed_degrees: f64) -> (f64, bool) {
    (signed_degrees.abs(), signed_degrees >= 0.0)
}

/// Combine a degrees part and a minutes part into decimal degrees.
pub fn deg_min_to_decimal(degrees: f64, minutes: f64) -> f64 {
    degrees + minutes / 60.0
}
