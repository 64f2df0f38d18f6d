// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key classification: which of the seven links a point belongs under.

use core::fmt;

use crate::point::Point3;

/// Coordinate axis, ordered from most to least significant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    /// Compared first.
    X,
    /// Compared when x is equal.
    Y,
    /// Compared when x and y are equal.
    Z,
}

/// Relation of one point to another, and the link a node uses for it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Partition {
    /// All three coordinates compare equal.
    #[default]
    EqualTo = 0,
    /// x is smaller.
    LessThanX = 1,
    /// x is larger.
    GreaterThanX = 2,
    /// x is equal and y is smaller.
    LessThanY = 3,
    /// x is equal and y is larger.
    GreaterThanY = 4,
    /// x and y are equal and z is smaller.
    LessThanZ = 5,
    /// x and y are equal and z is larger.
    GreaterThanZ = 6,
}

impl Partition {
    /// Number of partitions, and of links per node.
    pub const COUNT: usize = 7;

    /// Every partition in link order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::EqualTo,
        Self::LessThanX,
        Self::GreaterThanX,
        Self::LessThanY,
        Self::GreaterThanY,
        Self::LessThanZ,
        Self::GreaterThanZ,
    ];

    /// Position of this partition's link in a node.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The partition on the same axis, facing the other way. `EqualTo` is its own complement.
    pub const fn complement(self) -> Self {
        match self {
            Self::EqualTo => Self::EqualTo,
            Self::LessThanX => Self::GreaterThanX,
            Self::GreaterThanX => Self::LessThanX,
            Self::LessThanY => Self::GreaterThanY,
            Self::GreaterThanY => Self::LessThanY,
            Self::LessThanZ => Self::GreaterThanZ,
            Self::GreaterThanZ => Self::LessThanZ,
        }
    }

    /// Axis this partition splits on, or `None` for `EqualTo`.
    pub const fn axis(self) -> Option<Axis> {
        match self {
            Self::EqualTo => None,
            Self::LessThanX | Self::GreaterThanX => Some(Axis::X),
            Self::LessThanY | Self::GreaterThanY => Some(Axis::Y),
            Self::LessThanZ | Self::GreaterThanZ => Some(Axis::Z),
        }
    }

    /// Whether this is one of the three "less than" partitions.
    pub const fn is_less(self) -> bool {
        matches!(self, Self::LessThanX | Self::LessThanY | Self::LessThanZ)
    }

    /// Whether this is one of the three "greater than" partitions.
    pub const fn is_greater(self) -> bool {
        matches!(
            self,
            Self::GreaterThanX | Self::GreaterThanY | Self::GreaterThanZ
        )
    }

    /// Name of the partition, as used in dumps.
    pub const fn name(self) -> &'static str {
        match self {
            Self::EqualTo => "EqualTo",
            Self::LessThanX => "LessThanX",
            Self::GreaterThanX => "GreaterThanX",
            Self::LessThanY => "LessThanY",
            Self::GreaterThanY => "GreaterThanY",
            Self::LessThanZ => "LessThanZ",
            Self::GreaterThanZ => "GreaterThanZ",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Relative-tolerance float equality.
///
/// `a` and `b` are equal when their difference, scaled by 100000, does not exceed the smaller
/// magnitude. Zero is therefore only equal to zero.
pub fn fuzzy_eq(a: f32, b: f32) -> bool {
    a == b || (a - b).abs() * 100_000.0 <= a.abs().min(b.abs())
}

/// Classify `v` relative to `w`: x first, then y, then z, each with [`fuzzy_eq`].
///
/// ```
/// use tessera_bsp::{classify, Partition};
///
/// assert_eq!(classify(&[0.0_f32, 0.0, 0.0], &[1.0_f32, 2.0, 3.0]), Partition::LessThanX);
/// assert_eq!(classify(&[1.0_f32, 2.0, 3.0], &[1.0_f32, -2.0, 3.0]), Partition::GreaterThanY);
/// assert_eq!(classify(&[1.0_f32, 2.0, 3.0], &[1.0_f32, 2.0, 3.000_001]), Partition::EqualTo);
/// ```
pub fn classify<V: Point3 + ?Sized, W: Point3 + ?Sized>(v: &V, w: &W) -> Partition {
    let (vx, wx) = (v.x(), w.x());
    if !fuzzy_eq(vx, wx) {
        return if vx < wx {
            Partition::LessThanX
        } else {
            Partition::GreaterThanX
        };
    }
    let (vy, wy) = (v.y(), w.y());
    if !fuzzy_eq(vy, wy) {
        return if vy < wy {
            Partition::LessThanY
        } else {
            Partition::GreaterThanY
        };
    }
    let (vz, wz) = (v.z(), w.z());
    if !fuzzy_eq(vz, wz) {
        return if vz < wz {
            Partition::LessThanZ
        } else {
            Partition::GreaterThanZ
        };
    }
    Partition::EqualTo
}
