// SPDX-License-Identifier: AGPL-3.0-only

//! Gravitational potential of a homogeneous ellipsoid.
//!
//! Units: G·ρ = 1, positive-potential convention (Φ > 0, largest at the
//! centre). For semi-axes (a, b, c) and confocal parameter λ:
//!
//!   I(λ)      = 2abc · RF(a²+λ, b²+λ, c²+λ)
//!   `A_x`(λ)  = (2/3)abc · RD(b²+λ, c²+λ, a²+λ)       (cyclic for y, z)
//!
//! Interior (|x| ≤ a) along the x axis:  Φ = π (I(0) − `A_x`(0) x²).
//! Exterior (|x| > a) along the x axis:  λ = x² − a²,  Φ = π (I(λ) − `A_x`(λ) x²).
//!
//! On a principal axis the confocal ellipsoid through the point has a
//! closed-form λ, so no root finding is needed. At the surface λ = 0 and
//! both branches coincide.
//!
//! # References
//!
//! - S. Chandrasekhar, *Ellipsoidal Figures of Equilibrium* (1969), ch. 3
//! - DLMF §19.33 (potentials of ellipsoids in Carlson form)

use crate::precision::Real;
use crate::special::{carlson_rd, carlson_rf};
use serde::{Deserialize, Serialize};

/// Principal axis selector. The body rotates about [`Axis::Z`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Semi-axis `a`.
    X,
    /// Semi-axis `b`.
    Y,
    /// Semi-axis `c`, the rotation axis.
    Z,
}

impl Axis {
    /// All three axes in x, y, z order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// 0, 1, 2 for x, y, z.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Homogeneous ellipsoid with semi-axes `a`, `b`, `c` along x, y, z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid<T> {
    /// Semi-axis along x.
    pub a: T,
    /// Semi-axis along y.
    pub b: T,
    /// Semi-axis along z.
    pub c: T,
}

impl<T: Real> Ellipsoid<T> {
    /// Ellipsoid with the given semi-axes.
    #[must_use]
    pub const fn new(a: T, b: T, c: T) -> Self {
        Self { a, b, c }
    }

    /// Sphere of radius `r`.
    #[must_use]
    pub const fn sphere(r: T) -> Self {
        Self { a: r, b: r, c: r }
    }

    /// Semi-axis along `axis`.
    #[must_use]
    pub fn semi_axis(&self, axis: Axis) -> T {
        match axis {
            Axis::X => self.a,
            Axis::Y => self.b,
            Axis::Z => self.c,
        }
    }

    /// Volume (4/3)πabc.
    #[must_use]
    pub fn volume(&self) -> T {
        T::lit(4.0 / 3.0) * T::PI() * self.a * self.b * self.c
    }

    /// Radius of the sphere with equal volume, `cbrt(abc)`.
    #[must_use]
    pub fn volumetric_radius(&self) -> T {
        (self.a * self.b * self.c).cbrt()
    }

    /// Index-symbol integral I(λ) = 2abc·RF(a²+λ, b²+λ, c²+λ).
    #[must_use]
    pub fn index_integral(&self, lambda: T) -> T {
        let (a2, b2, c2) = self.shifted_squares(lambda);
        T::lit(2.0) * self.a * self.b * self.c * carlson_rf(a2, b2, c2)
    }

    /// Quadratic coefficient A_axis(λ) = (2/3)abc·RD(others, own), with the
    /// axis square as the distinguished RD argument.
    #[must_use]
    pub fn axis_coefficient(&self, axis: Axis, lambda: T) -> T {
        let (a2, b2, c2) = self.shifted_squares(lambda);
        let rd = match axis {
            Axis::X => carlson_rd(b2, c2, a2),
            Axis::Y => carlson_rd(a2, c2, b2),
            Axis::Z => carlson_rd(a2, b2, c2),
        };
        T::lit(2.0 / 3.0) * self.a * self.b * self.c * rd
    }

    /// Interior potential at distance `x` from the centre along `axis`.
    ///
    /// Valid for `|x|` up to the semi-axis; the caller chooses the branch.
    #[must_use]
    pub fn potential_interior(&self, axis: Axis, x: T) -> T {
        T::PI() * (self.index_integral(T::zero()) - self.axis_coefficient(axis, T::zero()) * x * x)
    }

    /// λ = 0 terms of the interior potential, for repeated interior samples
    /// of the same body.
    #[must_use]
    pub fn interior_field(&self) -> InteriorField<T> {
        let zero = T::zero();
        InteriorField {
            index: self.index_integral(zero),
            coefficients: Axis::ALL.map(|axis| self.axis_coefficient(axis, zero)),
        }
    }

    /// Exterior potential at distance `x` along `axis`.
    ///
    /// λ = x² − s² for semi-axis s, clamped at 0 so that a point fractionally
    /// inside from roundoff evaluates as the surface.
    #[must_use]
    pub fn potential_exterior(&self, axis: Axis, x: T) -> T {
        let s = self.semi_axis(axis);
        let lambda = (x * x - s * s).max(T::zero());
        T::PI() * (self.index_integral(lambda) - self.axis_coefficient(axis, lambda) * x * x)
    }

    /// Potential at the axis endpoint (the interior formula at `x = s`).
    #[must_use]
    pub fn potential_surface(&self, axis: Axis) -> T {
        self.potential_interior(axis, self.semi_axis(axis))
    }

    /// Potential anywhere on `axis`, dispatching on `|x|` vs the semi-axis.
    #[must_use]
    pub fn potential_on_axis(&self, axis: Axis, x: T) -> T {
        if x.abs() <= self.semi_axis(axis) {
            self.potential_interior(axis, x)
        } else {
            self.potential_exterior(axis, x)
        }
    }

    /// Interior potential at an arbitrary point inside the body,
    /// π(I(0) − `A_x` x² − `A_y` y² − `A_z` z²).
    #[must_use]
    pub fn potential_interior_point(&self, x: T, y: T, z: T) -> T {
        let zero = T::zero();
        T::PI()
            * (self.index_integral(zero)
                - self.axis_coefficient(Axis::X, zero) * x * x
                - self.axis_coefficient(Axis::Y, zero) * y * y
                - self.axis_coefficient(Axis::Z, zero) * z * z)
    }

    /// Gravitational self-energy of the body at uniform `density`.
    #[must_use]
    pub fn self_energy(&self, density: T) -> T {
        layer_potential_energy(self.a, self.b, self.c, density)
    }

    fn shifted_squares(&self, lambda: T) -> (T, T, T) {
        (
            self.a * self.a + lambda,
            self.b * self.b + lambda,
            self.c * self.c + lambda,
        )
    }
}

/// Potential energy of one homogeneous layer, −(2π²/5)·ρ²·abc·I(0).
#[must_use]
pub fn layer_potential_energy<T: Real>(a: T, b: T, c: T, density: T) -> T {
    let i0 = Ellipsoid::new(a, b, c).index_integral(T::zero());
    -(T::lit(2.0) * T::PI() * T::PI() / T::lit(5.0)) * density * density * a * b * c * i0
}

/// I(0) and `A_axis`(0) of one body. Interior samples reuse them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteriorField<T> {
    index: T,
    coefficients: [T; 3],
}

impl<T: Real> InteriorField<T> {
    /// π(I(0) − `A_axis`(0) x²), identical to
    /// [`Ellipsoid::potential_interior`].
    #[must_use]
    pub fn potential(&self, axis: Axis, x: T) -> T {
        T::PI() * (self.index - self.coefficients[axis.index()] * x * x)
    }
}

/// Interior potential along x.
#[must_use]
pub fn potential_interior_x<T: Real>(a: T, b: T, c: T, x: T) -> T {
    Ellipsoid::new(a, b, c).potential_interior(Axis::X, x)
}

/// Interior potential along y.
#[must_use]
pub fn potential_interior_y<T: Real>(a: T, b: T, c: T, y: T) -> T {
    Ellipsoid::new(a, b, c).potential_interior(Axis::Y, y)
}

/// Interior potential along z.
#[must_use]
pub fn potential_interior_z<T: Real>(a: T, b: T, c: T, z: T) -> T {
    Ellipsoid::new(a, b, c).potential_interior(Axis::Z, z)
}

/// Exterior potential along x.
#[must_use]
pub fn potential_exterior_x<T: Real>(a: T, b: T, c: T, x: T) -> T {
    Ellipsoid::new(a, b, c).potential_exterior(Axis::X, x)
}

/// Exterior potential along y.
#[must_use]
pub fn potential_exterior_y<T: Real>(a: T, b: T, c: T, y: T) -> T {
    Ellipsoid::new(a, b, c).potential_exterior(Axis::Y, y)
}

/// Exterior potential along z.
#[must_use]
pub fn potential_exterior_z<T: Real>(a: T, b: T, c: T, z: T) -> T {
    Ellipsoid::new(a, b, c).potential_exterior(Axis::Z, z)
}

/// Surface potential at (a, 0, 0).
#[must_use]
pub fn potential_surface_x<T: Real>(a: T, b: T, c: T) -> T {
    Ellipsoid::new(a, b, c).potential_surface(Axis::X)
}

/// Surface potential at (0, b, 0).
#[must_use]
pub fn potential_surface_y<T: Real>(a: T, b: T, c: T) -> T {
    Ellipsoid::new(a, b, c).potential_surface(Axis::Y)
}

/// Surface potential at (0, 0, c).
#[must_use]
pub fn potential_surface_z<T: Real>(a: T, b: T, c: T) -> T {
    Ellipsoid::new(a, b, c).potential_surface(Axis::Z)
}
