//! Walking the point arrays of an outline contour by contour

use crate::math::Precision;
use crate::outline::{Outline, Point, PointTag};
use crate::{Error, Result};

/// Receiver for the segments and arcs of a contour.
pub trait OutlineSink {
    /// Open a contour at the given position.
    fn move_to(&mut self, x: i64, y: i64);
    fn line_to(&mut self, x: i64, y: i64) -> Result<()>;
    fn conic_to(&mut self, cx: i64, cy: i64, x: i64, y: i64) -> Result<()>;
    fn cubic_to(&mut self, cx1: i64, cy1: i64, cx2: i64, cy2: i64, x: i64, y: i64) -> Result<()>;
}

/// Maps input points onto the internal grid of the current pass,
/// swapping axes when the pass runs sideways.
#[derive(Debug,Copy,Clone)]
pub struct PointMap {
    shift: i32,
    half: i64,
    flipped: bool,
}

impl PointMap {
    /// `extra_shift` is nonzero when rendering at doubled resolution.
    pub fn new(prec: Precision, extra_shift: i32, flipped: bool) -> Self {
        PointMap {
            shift: prec.shift + extra_shift,
            half: prec.half,
            flipped,
        }
    }

    /// Scale one input point, centering it on the internal grid.
    pub fn scaled(&self, p: Point) -> (i64, i64) {
        let x = ((p.x as i64) << self.shift) - self.half;
        let y = ((p.y as i64) << self.shift) - self.half;
        if self.flipped {
            (y, x)
        } else {
            (x, y)
        }
    }
}

/// Feed one contour to the sink, sorting out the strange starts: a
/// contour may open on a conic control point, or hold no on-curve
/// point at all.
pub fn decompose_contour<S: OutlineSink>(
    outline: &Outline,
    first: usize,
    last: usize,
    map: PointMap,
    sink: &mut S,
) -> Result<()> {
    let points = outline.points;
    let tags = outline.tags;

    let mut limit = last as isize;

    let (mut v_start_x, mut v_start_y) = map.scaled(points[first]);
    let (v_last_x, v_last_y) = map.scaled(points[last]);

    let mut i = first as isize;
    let mut tag = tags[first];

    // a contour cannot start with a cubic control point
    if tag == PointTag::Cubic {
        return Err(Error::InvalidOutline);
    }

    if tag == PointTag::Conic {
        if tags[last] == PointTag::On {
            // start at the last point if it is on the curve
            v_start_x = v_last_x;
            v_start_y = v_last_y;
            limit -= 1;
        } else {
            // both ends are conic controls, open at their middle
            v_start_x = (v_start_x + v_last_x) / 2;
            v_start_y = (v_start_y + v_last_y) / 2;
        }
        i -= 1;
    }

    sink.move_to(v_start_x, v_start_y);

    while i < limit {
        i += 1;
        tag = tags[i as usize];

        match tag {
            PointTag::On => {
                let (x, y) = map.scaled(points[i as usize]);
                sink.line_to(x, y)?;
            }

            PointTag::Conic => {
                let (mut cx, mut cy) = map.scaled(points[i as usize]);

                loop {
                    if i >= limit {
                        // contour exhausted, close with the final arc
                        return sink.conic_to(cx, cy, v_start_x, v_start_y);
                    }

                    i += 1;
                    tag = tags[i as usize];
                    let (x, y) = map.scaled(points[i as usize]);

                    if tag == PointTag::On {
                        sink.conic_to(cx, cy, x, y)?;
                        break;
                    }
                    if tag != PointTag::Conic {
                        return Err(Error::InvalidOutline);
                    }

                    // two control points in a row imply an on point at
                    // their middle
                    let mx = (cx + x) / 2;
                    let my = (cy + y) / 2;
                    sink.conic_to(cx, cy, mx, my)?;
                    cx = x;
                    cy = y;
                }
            }

            PointTag::Cubic => {
                if i + 1 > limit || tags[(i + 1) as usize] != PointTag::Cubic {
                    return Err(Error::InvalidOutline);
                }
                i += 2;

                let (x1, y1) = map.scaled(points[(i - 2) as usize]);
                let (x2, y2) = map.scaled(points[(i - 1) as usize]);

                if i <= limit {
                    let (x3, y3) = map.scaled(points[i as usize]);
                    sink.cubic_to(x1, y1, x2, y2, x3, y3)?;
                } else {
                    // contour exhausted, close with the final arc
                    return sink.cubic_to(x1, y1, x2, y2, v_start_x, v_start_y);
                }
            }
        }
    }

    // close the contour with a line segment
    sink.line_to(v_start_x, v_start_y)
}
