use std::ops::{Add, Sub};

use num_traits::{SaturatingAdd, SaturatingSub, Zero};

/// A 2d vector.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

/// A position or size on screen, in cells.
pub type OffsetU16 = Vec2<u16>;

/// A position or size in layout space, in cells.
pub type OffsetUsize = Vec2<usize>;

impl OffsetU16 {
    pub const ZERO: Self = Self::new(0, 0);
}

impl OffsetUsize {
    /// Narrow to screen units, saturating at `u16::MAX`.
    #[inline]
    pub fn saturating_to_u16(self) -> OffsetU16 {
        let narrow = |n: usize| u16::try_from(n).unwrap_or(u16::MAX);
        OffsetU16::new(narrow(self.x), narrow(self.y))
    }
}

impl From<OffsetU16> for OffsetUsize {
    #[inline]
    fn from(value: OffsetU16) -> Self {
        value.convert()
    }
}

impl<T: Copy> Vec2<T> {
    #[inline]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn splat(n: T) -> Self {
        Self::new(n, n)
    }

    #[inline]
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Self::splat(T::zero())
    }

    #[inline]
    pub fn convert<U>(self) -> Vec2<U>
    where
        U: From<T>,
    {
        Vec2 {
            x: self.x.into(),
            y: self.y.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn saturating_add(&self, rhs: Self) -> Self
    where
        T: SaturatingAdd,
    {
        self.join(rhs, copying(T::saturating_add))
    }

    #[inline]
    #[must_use]
    pub fn saturating_sub(&self, rhs: Self) -> Self
    where
        T: SaturatingSub,
    {
        self.join(rhs, copying(T::saturating_sub))
    }

    /// The number of cells covered, as a `usize`.
    #[inline]
    pub fn area(&self) -> usize
    where
        T: Into<usize>,
    {
        self.x.into() * self.y.into()
    }

    #[inline]
    pub fn cmp_lt(&self, rhs: Self) -> OffsetComparison
    where
        T: Ord,
    {
        self.cmp(rhs, T::lt)
    }

    #[inline]
    pub fn cmp_ge(&self, rhs: Self) -> OffsetComparison
    where
        T: Ord,
    {
        self.cmp(rhs, T::ge)
    }

    #[inline]
    fn join<U>(self, rhs: Self, f: impl Fn(T, T) -> U) -> Vec2<U> {
        Vec2 {
            x: f(self.x, rhs.x),
            y: f(self.y, rhs.y),
        }
    }

    #[inline]
    fn cmp(self, rhs: Self, f: impl Fn(&T, &T) -> bool) -> OffsetComparison {
        OffsetComparison {
            x: f(&self.x, &rhs.x),
            y: f(&self.y, &rhs.y),
        }
    }
}

macro_rules! impl_op_offset {
    ($trait:ident, $f:ident) => {
        impl<T: $trait<Output = T> + Copy> $trait<Vec2<T>> for Vec2<T> {
            type Output = Vec2<T>;

            #[inline]
            fn $f(self, rhs: Vec2<T>) -> Self::Output {
                self.join(rhs, T::$f)
            }
        }
    };
}

impl_op_offset! { Add, add }
impl_op_offset! { Sub, sub }

impl<T: Copy> From<[T; 2]> for Vec2<T> {
    #[inline]
    fn from(value: [T; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl<T: Copy> From<(T, T)> for Vec2<T> {
    #[inline]
    fn from((x, y): (T, T)) -> Self {
        Self::new(x, y)
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetComparison {
    pub x: bool,
    pub y: bool,
}

impl OffsetComparison {
    #[inline]
    pub fn both(&self) -> bool {
        self.x && self.y
    }

    #[inline]
    pub fn either(&self) -> bool {
        self.x || self.y
    }
}

#[inline]
fn copying<T: Copy, U>(f: impl Fn(&T, &T) -> U) -> impl Fn(T, T) -> U {
    move |lhs, rhs| f(&lhs, &rhs)
}
