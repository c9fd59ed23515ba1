//! Bezier arc splitting on the fixed point grid

/// Maximum number of stacked arcs while flattening a curve.
/// Going deeper than 32 levels buys nothing at 26.6 input precision.
pub const MAX_BEZIER: usize = 32;

/// Slots needed by the arc stack; each split pushes `degree` new points
/// and the deepest stack holds `MAX_BEZIER` arcs.
pub const ARC_SLOTS: usize = 3 * MAX_BEZIER + 1;

/// Control point of a curve held on the arc stack
#[derive(Debug,Copy,Clone,PartialEq,Eq,Default)]
pub struct CurvePoint {
    pub x: i64,
    pub y: i64,
}

impl CurvePoint {
    pub fn new(x: i64, y: i64) -> Self {
        CurvePoint { x, y }
    }
}

/// Subdivide a conic arc at its midpoint.
///
/// On entry `arc[0..=2]` holds the arc with `arc[2]` as its start point
/// and `arc[0]` as its end point. On exit `arc[2..=4]` holds the half
/// nearer the start and `arc[0..=2]` the other half.
pub fn split_conic(arc: &mut [CurvePoint]) {
    arc[4].x = arc[2].x;
    let b = arc[1].x;
    let a = (arc[2].x + b) / 2;
    let b = (arc[0].x + b) / 2;
    arc[3].x = a;
    arc[1].x = b;
    arc[2].x = (a + b) / 2;

    arc[4].y = arc[2].y;
    let b = arc[1].y;
    let a = (arc[2].y + b) / 2;
    let b = (arc[0].y + b) / 2;
    arc[3].y = a;
    arc[1].y = b;
    arc[2].y = (a + b) / 2;
}

/// Subdivide a cubic arc at its midpoint.
///
/// Same window convention as [`split_conic`], with the arc in
/// `arc[0..=3]` and the two halves in `arc[3..=6]` and `arc[0..=3]`.
/// Midpoints round half up rather than truncate.
pub fn split_cubic(arc: &mut [CurvePoint]) {
    arc[6].x = arc[3].x;
    let c = arc[1].x;
    let d = arc[2].x;
    let a = (arc[0].x + c + 1) >> 1;
    let b = (arc[3].x + d + 1) >> 1;
    let c = (c + d + 1) >> 1;
    arc[1].x = a;
    arc[5].x = b;
    let a = (a + c + 1) >> 1;
    let b = (b + c + 1) >> 1;
    arc[2].x = a;
    arc[4].x = b;
    arc[3].x = (a + b + 1) >> 1;

    arc[6].y = arc[3].y;
    let c = arc[1].y;
    let d = arc[2].y;
    let a = (arc[0].y + c + 1) >> 1;
    let b = (arc[3].y + d + 1) >> 1;
    let c = (c + d + 1) >> 1;
    arc[1].y = a;
    arc[5].y = b;
    let a = (a + c + 1) >> 1;
    let b = (b + c + 1) >> 1;
    arc[2].y = a;
    arc[4].y = b;
    arc[3].y = (a + b + 1) >> 1;
}
