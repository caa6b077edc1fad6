//! Conversion between user-facing decimal currency and the integral
//! minor-unit (cent) representation used for storage and arithmetic.
//!
//! Summing floats drifts, so every amount is stored as a signed cent count.
//! [to_minor_units] runs exactly once, at the boundary where user input is
//! first accepted; values read back from storage are already in minor units
//! and must never be re-scaled. [to_decimal] is for serialization only.

/// Convert a user-entered decimal amount, e.g. `12.50`, into minor units.
pub fn to_minor_units(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

/// Re-expand stored minor units into a decimal amount for presentation.
pub fn to_decimal(units: i64) -> f64 {
    units as f64 / 100.0
}
