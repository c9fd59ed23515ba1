//! Outline input model

use crate::{Error, Result};

/// A point in 26.6 fixed point
#[derive(Debug,Copy,Clone,PartialEq,Eq,Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
    /// Build a point from whole pixel coordinates
    pub fn pixels(x: i32, y: i32) -> Self {
        Point { x: x << 6, y: y << 6 }
    }
}

/// Classification of one outline point
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum PointTag {
    /// The point lies on the contour
    On,
    /// Off-curve control of a quadratic arc
    Conic,
    /// Off-curve control of a cubic arc
    Cubic,
}

/// A set of closed contours over borrowed point and tag arrays
///
/// Contours are contiguous index ranges into `points`; `contours` holds
/// the inclusive index of each contour's last point, ascending.
#[derive(Debug)]
pub struct Outline<'a> {
    pub points: &'a [Point],
    pub tags: &'a [PointTag],
    /// Inclusive index of each contour's last point
    pub contours: &'a [u16],
    /// Trace with 10 fractional bits instead of 6
    pub high_precision: bool,
    /// Skip the second, horizontal dropout pass
    pub single_pass: bool,
}

impl<'a> Outline<'a> {
    pub fn new(points: &'a [Point], tags: &'a [PointTag], contours: &'a [u16]) -> Self {
        Outline {
            points,
            tags,
            contours,
            high_precision: false,
            single_pass: false,
        }
    }

    /// An empty outline renders as a successful no-op
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() || self.contours.is_empty()
    }

    /// Structural screening, done once before any rendering work
    pub(crate) fn check(&self) -> Result {
        if self.tags.len() != self.points.len() {
            return Err(Error::InvalidOutline);
        }
        let last = self.contours[self.contours.len() - 1];
        if self.points.len() != last as usize + 1 {
            return Err(Error::InvalidOutline);
        }
        // contour ends must ascend or the ranges below go bad
        for w in self.contours.windows(2) {
            if w[0] >= w[1] {
                return Err(Error::InvalidOutline);
            }
        }
        Ok(())
    }

    /// First and last point index of contour `n`
    pub(crate) fn contour_range(&self, n: usize) -> (usize, usize) {
        let first = if n == 0 {
            0
        } else {
            self.contours[n - 1] as usize + 1
        };
        (first, self.contours[n] as usize)
    }
}
