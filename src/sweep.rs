//! Scanline sweep over the sorted profile lists

use crate::math::Precision;
use crate::pool::RenderPool;
use crate::profile::{Flow, Profile};
use crate::{Error, Result};

/// Policy for spans too narrow to cross any pixel center on their own.
///
/// The numbering follows the TrueType scan conversion modes; 3 is
/// unassigned there and unsupported here.
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum DropoutMode {
    /// Narrow spans simply disappear.
    None = 0,
    /// Keep the pixel at the span's right edge.
    Simple = 1,
    /// Like `Simple`, but stubs are left unset.
    SimpleExcludeStubs = 2,
    /// Keep the pixel under the span's middle.
    Smart = 4,
    /// Like `Smart`, but stubs are left unset.
    SmartExcludeStubs = 5,
}

impl Default for DropoutMode {
    fn default() -> Self {
        DropoutMode::SimpleExcludeStubs
    }
}

/// Target of one sweep pass. The driver hands it spans and dropouts in
/// scanline order; how they land in memory is the writer's business.
pub trait SweepWriter {
    /// Called once before the sweep with the scanline range, which the
    /// writer may adjust.
    fn init(&mut self, min_y: &mut i64, max_y: &mut i64);

    /// Paint the span `[x1, x2]` of the current scanline.
    fn span(&mut self, y: i64, x1: i64, x2: i64);

    /// Revisit a span that was too narrow to paint. The stub flags tell
    /// the writer whether the span is the tip of a section ending at
    /// this scanline or starting on it.
    fn drop_out(&mut self, y: i64, x1: i64, x2: i64, stub_top: bool, stub_bottom: bool);

    /// Advance to the next scanline.
    fn step(&mut self);
}

/// Insert profile `i` keeping the list sorted by current x; ties land
/// after the entries already present.
fn ins_new(list: &mut Vec<usize>, profiles: &[Profile], i: usize) {
    let x = profiles[i].x;
    let mut pos = list.len();
    for (k, &j) in list.iter().enumerate() {
        if x < profiles[j].x {
            pos = k;
            break;
        }
    }
    list.insert(pos, i);
}

/// Fetch the next x of every listed profile, then restore x order.
/// The lists are short and nearly sorted, so a bubble pass restarting
/// from the head after each swap is enough.
fn sort_step(list: &mut Vec<usize>, profiles: &mut [Profile], buff: &[i64]) {
    for &i in list.iter() {
        let p = &mut profiles[i];
        p.x = buff[p.offset as usize];
        p.offset += p.flow.step();
        p.height -= 1;
    }

    let mut k = 0;
    while k + 1 < list.len() {
        if profiles[list[k]].x <= profiles[list[k + 1]].x {
            k += 1;
        } else {
            list.swap(k, k + 1);
            k = 0;
        }
    }
}

/// Sweep the profile list of the current band from bottom to top,
/// pairing left and right edges on each scanline.
///
/// Spans are painted right away. A span too narrow to own a pixel is
/// only marked at first; once the whole scanline is painted the marked
/// pairs get a second look, so the dropout rules can see which pixels
/// the ordinary spans have already set.
pub fn draw_sweep<W: SweepWriter>(
    pool: &mut RenderPool,
    profiles: &mut [Profile],
    prec: Precision,
    dropout: DropoutMode,
    writer: &mut W,
) -> Result<()> {
    let mut wait: Vec<usize> = Vec::with_capacity(profiles.len());
    let mut draw_left: Vec<usize> = Vec::new();
    let mut draw_right: Vec<usize> = Vec::new();

    // sweep bounds over all profiles
    let mut min_y = std::i64::MAX;
    let mut max_y = std::i64::MIN;

    for p in profiles.iter_mut() {
        let bottom = p.start;
        let top = p.top();

        if min_y > bottom {
            min_y = bottom;
        }
        if max_y < top {
            max_y = top;
        }

        p.x = 0;
    }
    for i in 0..profiles.len() {
        ins_new(&mut wait, profiles, i);
    }

    if pool.num_turns == 0 {
        return Err(Error::InvalidOutline);
    }

    writer.init(&mut min_y, &mut max_y);

    // distance of each profile from the sweep start
    for &i in wait.iter() {
        profiles[i].count_l = profiles[i].start - min_y;
    }

    let mut y = min_y;
    let mut y_height: i64 = 0;

    if pool.num_turns > 0 && pool.next_turn() == min_y {
        pool.num_turns -= 1;
    }

    while pool.num_turns > 0 {
        // move profiles that start here from the wait list to the
        // drawing lists
        let mut k = 0;
        while k < wait.len() {
            let i = wait[k];
            profiles[i].count_l -= y_height;
            if profiles[i].count_l == 0 {
                wait.remove(k);
                match profiles[i].flow {
                    Flow::Up => ins_new(&mut draw_left, profiles, i),
                    Flow::Down => ins_new(&mut draw_right, profiles, i),
                }
            } else {
                k += 1;
            }
        }

        sort_step(&mut draw_left, profiles, &pool.buff);
        sort_step(&mut draw_right, profiles, &pool.buff);

        let y_change = pool.pop_turn();
        y_height = y_change - y;

        while y < y_change {
            let mut dropouts = 0;
            let pairs = draw_left.len().min(draw_right.len());

            for k in 0..pairs {
                let li = draw_left[k];
                let ri = draw_right[k];

                let mut x1 = profiles[li].x;
                let mut x2 = profiles[ri].x;
                if x1 > x2 {
                    std::mem::swap(&mut x1, &mut x2);
                }

                if x2 - x1 <= prec.unit {
                    let e1 = prec.floor(x1);
                    let e2 = prec.ceiling(x2);

                    if dropout != DropoutMode::None && (e1 > e2 || e2 == e1 + prec.unit) {
                        // mark the pair for the second phase
                        profiles[li].x = x1;
                        profiles[ri].x = x2;
                        profiles[li].count_l = 1;
                        dropouts += 1;
                        continue;
                    }
                }

                writer.span(y, x1, x2);
            }

            if dropouts > 0 {
                for k in 0..pairs {
                    let li = draw_left[k];
                    let ri = draw_right[k];

                    if profiles[li].count_l != 0 {
                        profiles[li].count_l = 0;

                        let left = profiles[li];
                        let right = profiles[ri];
                        let stub_top = left.next == ri && left.height <= 0;
                        let stub_bottom = right.next == li && left.start == y;

                        writer.drop_out(y, left.x, right.x, stub_top, stub_bottom);
                    }
                }
            }

            writer.step();
            y += 1;

            if y < y_change {
                sort_step(&mut draw_left, profiles, &pool.buff);
                sort_step(&mut draw_right, profiles, &pool.buff);
            }
        }

        // retire the profiles this turn has spent
        draw_left.retain(|&i| profiles[i].height != 0);
        draw_right.retain(|&i| profiles[i].height != 0);
    }

    // let the writer flush whatever scanline cache it keeps
    while y <= max_y {
        writer.step();
        y += 1;
    }

    Ok(())
}

/// Paint one span into a row of 1-bit pixels starting at byte `ofs` of
/// `bits`. `used` collects the byte range touched so far on this row.
pub(crate) fn bit_set_span(
    bits: &mut [u8],
    ofs: i64,
    b_width: i64,
    prec: Precision,
    x1: i64,
    x2: i64,
    used: &mut (i64, i64),
) {
    let e1 = prec.trunc(prec.ceiling(x1));

    // a span a hair over one pixel wide still collapses to one pixel
    let e2 = if x2 - x1 - prec.unit <= prec.jitter {
        e1
    } else {
        prec.trunc(prec.floor(x2))
    };

    if e2 >= 0 && e1 < b_width {
        let e1 = if e1 < 0 { 0 } else { e1 };
        let e2 = if e2 >= b_width { b_width - 1 } else { e2 };

        let c1 = e1 >> 3;
        let c2 = e2 >> 3;
        let f1: u8 = 0xFF >> ((e1 & 7) as u32);
        let f2: u8 = !(0x7F >> ((e2 & 7) as u32));

        if used.0 > c1 {
            used.0 = c1;
        }
        if used.1 < c2 {
            used.1 = c2;
        }

        let mut t = (ofs + c1) as usize;
        let span = c2 - c1;

        if span > 0 {
            bits[t] |= f1;
            for _ in 1..span {
                t += 1;
                bits[t] = 0xFF;
            }
            bits[t + 1] |= f2;
        } else {
            bits[t] |= f1 & f2;
        }
    }
}

/// Resolve one dropout on a row of 1-bit pixels.
pub(crate) fn bit_set_drop(
    bits: &mut [u8],
    ofs: i64,
    b_width: i64,
    prec: Precision,
    mode: DropoutMode,
    x1: i64,
    x2: i64,
    stub_top: bool,
    stub_bottom: bool,
    used: &mut (i64, i64),
) {
    let mut e1 = prec.ceiling(x1);
    let e2 = prec.floor(x2);

    if e1 > e2 {
        if e1 == e2 + prec.unit {
            match mode {
                DropoutMode::Simple => e1 = e2,

                DropoutMode::Smart => e1 = prec.ceiling((x1 + x2 + 1) / 2),

                DropoutMode::SimpleExcludeStubs | DropoutMode::SmartExcludeStubs => {
                    if stub_top || stub_bottom {
                        return;
                    }

                    // leave the gap alone when its right pixel is
                    // already set
                    let t = prec.trunc(e1);
                    let c1 = t >> 3;
                    let f1 = t & 7;
                    if t >= 0
                        && t < b_width
                        && bits[(ofs + c1) as usize] & (0x80 >> f1 as u32) != 0
                    {
                        return;
                    }

                    if mode == DropoutMode::SimpleExcludeStubs {
                        e1 = e2;
                    } else {
                        e1 = prec.ceiling((x1 + x2 + 1) / 2);
                    }
                }

                DropoutMode::None => return,
            }
        } else {
            return;
        }
    }

    let e1 = prec.trunc(e1);

    if e1 >= 0 && e1 < b_width {
        let c1 = e1 >> 3;
        let f1 = e1 & 7;

        if used.0 > c1 {
            used.0 = c1;
        }
        if used.1 < c1 {
            used.1 = c1;
        }

        bits[(ofs + c1) as usize] |= 0x80 >> f1 as u32;
    }
}

/// Vertical sweep painting 1-bit scanlines into a bitmap, bottom row
/// first.
pub struct VerticalMono<'a> {
    bits: &'a mut [u8],
    b_width: i64,
    rows: i64,
    pitch: i64,
    prec: Precision,
    mode: DropoutMode,
    trace_ofs: i64,
    trace_incr: i64,
    used: (i64, i64),
}

impl<'a> VerticalMono<'a> {
    pub fn new(
        bits: &'a mut [u8],
        b_width: i64,
        rows: i64,
        pitch: i64,
        prec: Precision,
        mode: DropoutMode,
    ) -> Self {
        VerticalMono {
            bits,
            b_width,
            rows,
            pitch,
            prec,
            mode,
            trace_ofs: 0,
            trace_incr: 0,
            used: (0, 0),
        }
    }
}

impl<'a> SweepWriter for VerticalMono<'a> {
    fn init(&mut self, min_y: &mut i64, _max_y: &mut i64) {
        self.trace_incr = -self.pitch;
        self.trace_ofs = -*min_y * self.pitch;
        if self.pitch > 0 {
            self.trace_ofs += (self.rows - 1) * self.pitch;
        }
        self.used = (0, 0);
    }

    fn span(&mut self, _y: i64, x1: i64, x2: i64) {
        bit_set_span(
            self.bits,
            self.trace_ofs,
            self.b_width,
            self.prec,
            x1,
            x2,
            &mut self.used,
        );
    }

    fn drop_out(&mut self, _y: i64, x1: i64, x2: i64, stub_top: bool, stub_bottom: bool) {
        bit_set_drop(
            self.bits,
            self.trace_ofs,
            self.b_width,
            self.prec,
            self.mode,
            x1,
            x2,
            stub_top,
            stub_bottom,
            &mut self.used,
        );
    }

    fn step(&mut self) {
        self.trace_ofs += self.trace_incr;
    }
}

/// Horizontal sweep over the flipped outline. Each "scanline" here is a
/// pixel column of the target bitmap, so only exact crossings and
/// dropouts are painted; the vertical pass has filled everything else.
pub struct HorizontalMono<'a> {
    bits: &'a mut [u8],
    rows: i64,
    pitch: i64,
    prec: Precision,
    mode: DropoutMode,
}

impl<'a> HorizontalMono<'a> {
    pub fn new(bits: &'a mut [u8], rows: i64, pitch: i64, prec: Precision, mode: DropoutMode) -> Self {
        HorizontalMono {
            bits,
            rows,
            pitch,
            prec,
            mode,
        }
    }

    /// Byte offset of column bit `y` on target row `e`.
    fn byte_at(&self, y: i64, e: i64) -> usize {
        let mut ofs = (y >> 3) - e * self.pitch;
        if self.pitch > 0 {
            ofs += (self.rows - 1) * self.pitch;
        }
        ofs as usize
    }
}

impl<'a> SweepWriter for HorizontalMono<'a> {
    fn init(&mut self, _min_y: &mut i64, _max_y: &mut i64) {}

    fn span(&mut self, y: i64, x1: i64, x2: i64) {
        if x2 - x1 < self.prec.unit {
            let e1 = self.prec.ceiling(x1);
            let e2 = self.prec.floor(x2);

            if e1 == e2 {
                let e1 = self.prec.trunc(e1);

                if e1 >= 0 && e1 < self.rows {
                    let f1: u8 = 0x80 >> ((y & 7) as u32);
                    let ofs = self.byte_at(y, e1);
                    self.bits[ofs] |= f1;
                }
            }
        }
    }

    fn drop_out(&mut self, y: i64, x1: i64, x2: i64, stub_top: bool, stub_bottom: bool) {
        let prec = self.prec;
        let mut e1 = prec.ceiling(x1);
        let e2 = prec.floor(x2);

        if e1 > e2 {
            if e1 == e2 + prec.unit {
                match self.mode {
                    DropoutMode::Simple => e1 = e2,

                    DropoutMode::Smart => e1 = prec.ceiling((x1 + x2 + 1) / 2),

                    DropoutMode::SimpleExcludeStubs | DropoutMode::SmartExcludeStubs => {
                        if stub_top || stub_bottom {
                            return;
                        }

                        // leave the gap alone when the pixel above is
                        // already set
                        let t = prec.trunc(e1);
                        let f1: u8 = 0x80 >> ((y & 7) as u32);
                        if t >= 0 && t < self.rows && self.bits[self.byte_at(y, t)] & f1 != 0 {
                            return;
                        }

                        if self.mode == DropoutMode::SimpleExcludeStubs {
                            e1 = e2;
                        } else {
                            e1 = prec.ceiling((x1 + x2 + 1) / 2);
                        }
                    }

                    DropoutMode::None => return,
                }
            } else {
                return;
            }
        }

        let e1 = prec.trunc(e1);

        if e1 >= 0 && e1 < self.rows {
            let f1: u8 = 0x80 >> ((y & 7) as u32);
            let ofs = self.byte_at(y, e1);
            self.bits[ofs] |= f1;
        }
    }

    fn step(&mut self) {}
}
