//! Fixed point helpers shared by the tracing and sweep stages

/// Fractional bits of incoming outline coordinates (26.6)
pub const PIXEL_BITS: i32 = 6;

/// Working precision of one rasterization call
///
/// Coordinates are widened from the 26.6 input to either 6 or 10
/// fractional bits. High precision is meant for small glyph sizes where
/// the extra sub-pixel resolution is visible.
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct Precision {
    /// Fractional bits while tracing
    pub bits: i32,
    /// One pixel in trace units, `1 << bits`
    pub unit: i64,
    /// Half a pixel in trace units
    pub half: i64,
    /// `bits - PIXEL_BITS`, applied when scaling input points up
    pub shift: i32,
    /// `-unit`, the floor mask
    pub mask: i64,
    /// Largest y span a Bezier sub-arc may cover before it is split
    pub step: i64,
    /// Slack allowed when collapsing a span of just over one pixel
    pub jitter: i64,
}

impl Precision {
    pub fn new(high: bool) -> Self {
        let (bits, step, jitter) = if high { (10, 128, 24) } else { (6, 32, 2) };
        let unit = 1i64 << bits;
        Precision {
            bits,
            unit,
            half: unit >> 1,
            shift: bits - PIXEL_BITS,
            mask: -unit,
            step,
            jitter,
        }
    }
    /// Round down to a pixel boundary
    pub fn floor(self, x: i64) -> i64 {
        x & self.mask
    }
    /// Round up to a pixel boundary
    pub fn ceiling(self, x: i64) -> i64 {
        (x + self.unit - 1) & self.mask
    }
    /// Scanline index of a coordinate (arithmetic shift, exact on negatives)
    pub fn trunc(self, x: i64) -> i64 {
        x >> self.bits
    }
    /// Fractional part, always non negative
    pub fn frac(self, x: i64) -> i64 {
        x & (self.unit - 1)
    }
}

/// `a * b / c` truncated toward zero
///
/// Fine for the short deltas produced inside a band; intermediate
/// products stay well inside an i64.
pub fn fmul_div(a: i64, b: i64, c: i64) -> i64 {
    a * b / c
}

/// `a * b / c` rounded to nearest, sign extracted first
///
/// Used when clipping against band bounds, where the scaled delta can be
/// large relative to the divisor and the rounding direction matters.
pub fn smul_div(a: i64, b: i64, c: i64) -> i64 {
    let mut s = 1i64;
    let (mut a, mut b, mut c) = (a, b, c);
    if a < 0 { a = -a; s = -s; }
    if b < 0 { b = -b; s = -s; }
    if c < 0 { c = -c; s = -s; }
    let d = if c > 0 { (a * b + (c >> 1)) / c } else { 0x7FFF_FFFF };
    if s > 0 { d } else { -d }
}
