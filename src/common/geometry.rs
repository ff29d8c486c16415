use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position2D {
    pub x: f64,
    pub y: f64,
}

impl Position2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(&self, other: &Position2D) -> f64 {
        (*self - *other).norm()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Linear interpolation, `t = 0` yields `self` and `t = 1` yields `other`.
    pub fn lerp(&self, other: &Position2D, t: f64) -> Position2D {
        Position2D::new(
            (1.0 - t) * self.x + t * other.x,
            (1.0 - t) * self.y + t * other.y,
        )
    }
}

impl From<(f64, f64)> for Position2D {
    fn from((x, y): (f64, f64)) -> Self {
        Position2D::new(x, y)
    }
}

impl Add for Position2D {
    type Output = Position2D;
    fn add(self, rhs: Position2D) -> Position2D {
        Position2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position2D {
    type Output = Position2D;
    fn sub(self, rhs: Position2D) -> Position2D {
        Position2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Position2D {
    type Output = Position2D;
    fn mul(self, rhs: f64) -> Position2D {
        Position2D::new(self.x * rhs, self.y * rhs)
    }
}

impl AddAssign for Position2D {
    fn add_assign(&mut self, rhs: Position2D) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Position2D {
    fn sub_assign(&mut self, rhs: Position2D) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}
