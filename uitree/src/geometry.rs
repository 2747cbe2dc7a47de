//! Float geometry used by layout and render properties.

use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Tolerance for float comparisons between layout values.
pub const EPSILON: f32 = 0.001;

pub fn near_equal(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON
}

pub fn near_zero(value: f32) -> bool {
    value.abs() <= EPSILON
}

/// `a > b` outside the tolerance band.
pub fn great_not_equal(a: f32, b: f32) -> bool {
    a - b > EPSILON
}

/// `a < b` outside the tolerance band.
pub fn less_not_equal(a: f32, b: f32) -> bool {
    b - a > EPSILON
}

pub fn great_or_equal(a: f32, b: f32) -> bool {
    a > b || near_equal(a, b)
}

pub fn less_or_equal(a: f32, b: f32) -> bool {
    a < b || near_equal(a, b)
}

/// A 2D offset in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OffsetF {
    pub x: f32,
    pub y: f32,
}

impl OffsetF {
    pub const ZERO: OffsetF = OffsetF { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, to: OffsetF, t: f32) -> OffsetF {
        OffsetF::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }

    pub fn near(self, other: OffsetF) -> bool {
        near_equal(self.x, other.x) && near_equal(self.y, other.y)
    }
}

impl Add for OffsetF {
    type Output = OffsetF;

    fn add(self, rhs: OffsetF) -> OffsetF {
        OffsetF::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for OffsetF {
    fn add_assign(&mut self, rhs: OffsetF) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for OffsetF {
    type Output = OffsetF;

    fn sub(self, rhs: OffsetF) -> OffsetF {
        OffsetF::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for OffsetF {
    fn sub_assign(&mut self, rhs: OffsetF) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

/// A 2D size in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeF {
    pub width: f32,
    pub height: f32,
}

impl SizeF {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(offset: OffsetF, size: SizeF) -> Self {
        Self::new(offset.x, offset.y, size.width, size.height)
    }

    pub fn offset(&self) -> OffsetF {
        OffsetF::new(self.x, self.y)
    }

    pub fn size(&self) -> SizeF {
        SizeF::new(self.width, self.height)
    }

    pub fn set_offset(&mut self, offset: OffsetF) {
        self.x = offset.x;
        self.y = offset.y;
    }

    pub fn set_size(&mut self, size: SizeF) {
        self.width = size.width;
        self.height = size.height;
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, point: OffsetF) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}
