// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read access to 3D point keys.

/// A point with three `f32` coordinates.
///
/// The tree never copies keys; it reads coordinates through this trait from the borrowed
/// key slice.
pub trait Point3 {
    /// The x coordinate.
    fn x(&self) -> f32;
    /// The y coordinate.
    fn y(&self) -> f32;
    /// The z coordinate.
    fn z(&self) -> f32;
}

impl Point3 for [f32; 3] {
    #[inline]
    fn x(&self) -> f32 {
        self[0]
    }
    #[inline]
    fn y(&self) -> f32 {
        self[1]
    }
    #[inline]
    fn z(&self) -> f32 {
        self[2]
    }
}

impl Point3 for (f32, f32, f32) {
    #[inline]
    fn x(&self) -> f32 {
        self.0
    }
    #[inline]
    fn y(&self) -> f32 {
        self.1
    }
    #[inline]
    fn z(&self) -> f32 {
        self.2
    }
}

impl<P: Point3 + ?Sized> Point3 for &P {
    #[inline]
    fn x(&self) -> f32 {
        (**self).x()
    }
    #[inline]
    fn y(&self) -> f32 {
        (**self).y()
    }
    #[inline]
    fn z(&self) -> f32 {
        (**self).z()
    }
}

#[cfg(feature = "glam")]
impl Point3 for glam::Vec3 {
    #[inline]
    fn x(&self) -> f32 {
        self.x
    }
    #[inline]
    fn y(&self) -> f32 {
        self.y
    }
    #[inline]
    fn z(&self) -> f32 {
        self.z
    }
}
