//! Vector field sources.
//!
//! A [`FieldSource`] answers one question: the velocity at a point. The
//! user-facing implementation is [`VectorField`], two expressions plus the
//! `a`/`b` parameters. Closures implement the trait too, which keeps engine
//! tests independent of the expression language.

use glam::DVec2;

use crate::error::{Component, FieldError};
use crate::expr::{Bindings, Expression};

/// Velocity returned by a field query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

impl Velocity {
    /// No motion.
    pub const ZERO: Velocity = Velocity { vx: 0.0, vy: 0.0 };

    /// Velocity with components `vx`, `vy` in field units per unit time.
    pub fn new(vx: f64, vy: f64) -> Self {
        Self { vx, vy }
    }

    /// `sqrt(vx² + vy²)`.
    pub fn magnitude(&self) -> f64 {
        self.vx.hypot(self.vy)
    }

    /// `atan2(vy, vx)` in radians, (-π, π].
    pub fn angle(&self) -> f64 {
        self.vy.atan2(self.vx)
    }

    /// True when both components are finite.
    pub fn is_finite(&self) -> bool {
        self.vx.is_finite() && self.vy.is_finite()
    }

    /// Components as a `DVec2`.
    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.vx, self.vy)
    }
}

/// Source of 2D velocities for particle advection.
///
/// Implementations must be pure: the same point gives the same answer.
pub trait FieldSource: Send + Sync {
    /// Velocity at (x, y) in field coordinates.
    fn velocity_at(&self, x: f64, y: f64) -> Result<Velocity, FieldError>;
}

impl<F> FieldSource for F
where
    F: Fn(f64, f64) -> Result<Velocity, FieldError> + Send + Sync,
{
    fn velocity_at(&self, x: f64, y: f64) -> Result<Velocity, FieldError> {
        self(x, y)
    }
}

/// The planar system `dx/dt = f(x, y, a, b)`, `dy/dt = g(x, y, a, b)`.
///
/// Rebuilding on any change of text or parameter is just constructing a new
/// value; nothing else is carried over.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField {
    dx: Expression,
    dy: Expression,
    params: Bindings,
}

impl VectorField {
    /// Builds a field from two expression texts and the `a`, `b` parameters.
    /// Syntax errors surface on the first query, not here.
    pub fn new(dx: &str, dy: &str, a: f64, b: f64) -> Self {
        Self {
            dx: Expression::new(dx),
            dy: Expression::new(dy),
            params: Bindings::new(0.0, 0.0, a, b),
        }
    }

    /// The `dx/dt` equation.
    pub fn dx(&self) -> &Expression {
        &self.dx
    }

    /// The `dy/dt` equation.
    pub fn dy(&self) -> &Expression {
        &self.dy
    }
}

impl FieldSource for VectorField {
    fn velocity_at(&self, x: f64, y: f64) -> Result<Velocity, FieldError> {
        let bindings = self.params.at(x, y);
        let vx = self
            .dx
            .eval(&bindings)
            .map_err(|source| FieldError::Expression {
                component: Component::Dx,
                expr: self.dx.source().to_string(),
                source,
            })?;
        let vy = self
            .dy
            .eval(&bindings)
            .map_err(|source| FieldError::Expression {
                component: Component::Dy,
                expr: self.dy.source().to_string(),
                source,
            })?;
        Ok(Velocity { vx, vy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ExprError;
    use std::f64::consts::PI;

    #[test]
    fn rotation_field_velocity() {
        let field = VectorField::new("-y", "x", 0.0, 0.0);
        let v = field.velocity_at(1.0, 0.0).unwrap();
        assert_eq!(v, Velocity::new(0.0, 1.0));
        assert!((v.angle() - PI / 2.0).abs() < 1e-12);
        assert!((v.magnitude() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn parameters_reach_both_equations() {
        let field = VectorField::new("a*x", "b*y", 2.0, -3.0);
        let v = field.velocity_at(1.5, 2.0).unwrap();
        assert_eq!(v, Velocity::new(3.0, -6.0));
    }

    #[test]
    fn magnitude_is_euclidean() {
        assert_eq!(Velocity::new(3.0, 4.0).magnitude(), 5.0);
        assert_eq!(Velocity::ZERO.magnitude(), 0.0);
        assert_eq!(Velocity::ZERO.angle(), 0.0);
    }

    #[test]
    fn dx_failure_is_tagged_dx() {
        let field = VectorField::new("x +", "y", 0.0, 0.0);
        match field.velocity_at(0.0, 0.0) {
            Err(FieldError::Expression {
                component, source, ..
            }) => {
                assert_eq!(component, Component::Dx);
                assert_eq!(source, ExprError::UnexpectedEnd);
            }
            other => panic!("expected dx expression error, got {other:?}"),
        }
    }

    #[test]
    fn dy_failure_is_point_dependent() {
        let field = VectorField::new("1", "1/x", 0.0, 0.0);
        assert!(field.velocity_at(2.0, 0.0).is_ok());
        match field.velocity_at(0.0, 0.0) {
            Err(FieldError::Expression {
                component, expr, ..
            }) => {
                assert_eq!(component, Component::Dy);
                assert_eq!(expr, "1/x");
            }
            other => panic!("expected dy expression error, got {other:?}"),
        }
    }

    #[test]
    fn closures_are_field_sources() {
        let uniform =
            |_x: f64, _y: f64| -> Result<Velocity, FieldError> { Ok(Velocity::new(1.0, 0.0)) };
        let source: &dyn FieldSource = &uniform;
        assert_eq!(source.velocity_at(9.0, 9.0).unwrap().vx, 1.0);
    }
}
