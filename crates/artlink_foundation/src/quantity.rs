//! Bounded quantities: numbers clamped to a range and quantised to a step.
//!
//! Most tunable settings are bounded quantities. Because every value sits on
//! a fixed grid, it can travel as a small integer index instead of a float.

use std::fmt;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Most decimal places a quantised value is snapped to.
const MAX_PRECISION: i32 = 12;

/// Tolerance when deciding whether a float is integral after scaling.
const EPSILON: f64 = 1e-7;

/// The `(step, min, max)` triple that defines a family of bounded quantities.
///
/// Two quantities are schema-equivalent exactly when their constraints are
/// equal; equality compares bit patterns.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constraint {
    step: f64,
    min: f64,
    max: f64,
}

impl Constraint {
    /// Creates a constraint.
    ///
    /// `step` should be positive and `min <= max`. A degenerate constraint
    /// (non-positive or non-finite step, inverted range) pins every value to
    /// `min`.
    #[must_use]
    pub const fn new(step: f64, min: f64, max: f64) -> Self {
        Self { step, min, max }
    }

    /// Returns the step size.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// Returns the inclusive lower bound.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Returns the inclusive upper bound.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Returns the largest valid index, `floor((max - min) / step)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn max_index(&self) -> u64 {
        if !self.is_well_formed() {
            return 0;
        }
        let span = (self.max - self.min) / self.step;
        // (1.0 - 0.0) / 0.1 is 9.999999999999998, which still means ten steps
        let nearest = span.round();
        let steps = if (span - nearest).abs() <= EPSILON * nearest.max(1.0) {
            nearest
        } else {
            span.floor()
        };
        steps as u64
    }

    /// Clamps `raw` into `[min, max]` and rounds it to the nearest step.
    ///
    /// Never fails. Halves round away from zero.
    #[must_use]
    pub fn make(&self, raw: f64) -> BoundedQuantity {
        self.from_index(self.index_of(raw))
    }

    /// Rebuilds the quantity at grid position `index`.
    ///
    /// Indices past [`Constraint::max_index`] clamp to `max`.
    #[must_use]
    pub fn from_index(&self, index: u64) -> BoundedQuantity {
        let index = index.min(self.max_index());
        BoundedQuantity {
            value: self.value_at(index),
            constraint: *self,
        }
    }

    /// Returns true if `quantity` was made with this constraint.
    #[must_use]
    pub fn contains(&self, quantity: &BoundedQuantity) -> bool {
        quantity.constraint == *self
    }

    fn is_well_formed(&self) -> bool {
        self.step > 0.0
            && self.step.is_finite()
            && self.min.is_finite()
            && self.max.is_finite()
            && self.min <= self.max
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn index_of(&self, raw: f64) -> u64 {
        let max_index = self.max_index();
        if max_index == 0 || raw.is_nan() {
            return 0;
        }
        let bounded = raw.max(self.min).min(self.max);
        let steps = ((bounded - self.min) / self.step).round().max(0.0);
        (steps as u64).min(max_index)
    }

    #[allow(clippy::cast_precision_loss)]
    fn value_at(&self, index: u64) -> f64 {
        let raw = self.min + index as f64 * self.step;
        let scale = 10f64.powi(self.precision());
        let scaled = raw * scale;
        let snapped = if scaled.is_finite() {
            scaled.round() / scale
        } else {
            raw
        };
        snapped.min(self.max).max(self.min)
    }

    /// Decimal places needed to represent every grid point exactly.
    fn precision(&self) -> i32 {
        decimals(self.step).max(decimals(self.min))
    }
}

fn decimals(x: f64) -> i32 {
    (0..=MAX_PRECISION)
        .find(|&d| {
            let scaled = x * 10f64.powi(d);
            (scaled - scaled.round()).abs() <= EPSILON
        })
        .unwrap_or(MAX_PRECISION)
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.step.to_bits() == other.step.to_bits()
            && self.min.to_bits() == other.min.to_bits()
            && self.max.to_bits() == other.max.to_bits()
    }
}

impl Eq for Constraint {}

impl Hash for Constraint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.step.to_bits().hash(state);
        self.min.to_bits().hash(state);
        self.max.to_bits().hash(state);
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} in {}..={}", self.step, self.min, self.max)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A number clamped to `[min, max]` and quantised to `step`.
///
/// Only [`Constraint::make`] and [`Constraint::from_index`] create these, so
/// the value is always on the constraint's grid.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundedQuantity {
    value: f64,
    constraint: Constraint,
}

impl BoundedQuantity {
    /// Returns the quantised value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Returns the constraint this quantity was made with.
    #[must_use]
    pub const fn constraint(&self) -> Constraint {
        self.constraint
    }

    /// Returns the step size.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.constraint.step
    }

    /// Returns the lower bound.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.constraint.min
    }

    /// Returns the upper bound.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.constraint.max
    }

    /// Returns the grid position, `(value - min) / step`.
    #[must_use]
    pub fn to_index(&self) -> u64 {
        self.constraint.index_of(self.value)
    }

    /// Re-quantises `raw` under the same constraint.
    #[must_use]
    pub fn with_value(&self, raw: f64) -> Self {
        self.constraint.make(raw)
    }

    /// Adds `other`'s value, clamping and rounding the sum.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        self.with_value(self.value + other.value)
    }

    /// Subtracts `other`'s value, clamping and rounding the difference.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.with_value(self.value - other.value)
    }
}

impl PartialEq for BoundedQuantity {
    fn eq(&self, other: &Self) -> bool {
        self.value.to_bits() == other.value.to_bits() && self.constraint == other.constraint
    }
}

impl Eq for BoundedQuantity {}

impl Hash for BoundedQuantity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.to_bits().hash(state);
        self.constraint.hash(state);
    }
}

impl fmt::Debug for BoundedQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.value, self.constraint)
    }
}

impl fmt::Display for BoundedQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value, self.constraint)
    }
}
