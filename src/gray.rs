//! 5-level anti-aliased sweep
//!
//! Gray rendering runs the ordinary vertical sweep at doubled
//! resolution, painting 1-bit spans into a small two-line cache instead
//! of the target. Every second scanline step folds a pair of cache
//! lines into one target row: each group of two bits per line forms a
//! 2x2 cell whose set-bit count, 0 to 4, indexes the gray palette.

use crate::math::Precision;
use crate::sweep::{bit_set_drop, bit_set_span, DropoutMode, SweepWriter};

/// Size of the two-line bit cache in bytes.
pub(crate) const GRAY_LINES: usize = 2048;

/// Bytes per cache line.
pub(crate) const GRAY_WIDTH: i64 = (GRAY_LINES / 2) as i64;

/// Set-bit count of each of a byte's four bit pairs, packed one count
/// per nibble, highest pair first.
pub(crate) fn build_count_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    for n in 0..256 {
        let c = (n & 0x55) + ((n & 0xAA) >> 1);
        table[n] =
            (((c << 6) & 0x3000) | ((c << 4) & 0x0300) | ((c << 2) & 0x0030) | (c & 0x0003)) as u16;
    }
    table
}

/// Vertical sweep at doubled resolution feeding the bit cache, with a
/// flush into the gray target every two scanlines.
pub(crate) struct VerticalGray<'a> {
    pub(crate) cache: &'a mut [u8],
    pub(crate) target: &'a mut [u8],
    pub(crate) width: i64,
    pub(crate) rows: i64,
    pub(crate) pitch: i64,
    /// Paintable cache line width in bits, twice the target width.
    pub(crate) b_width: i64,
    pub(crate) count_table: &'a [u16; 256],
    pub(crate) grays: [u8; 5],
    pub(crate) prec: Precision,
    pub(crate) mode: DropoutMode,
    pub(crate) trace_ofs: i64,
    pub(crate) trace_incr: i64,
    pub(crate) trace_g: i64,
    pub(crate) used: (i64, i64),
}

impl<'a> SweepWriter for VerticalGray<'a> {
    fn init(&mut self, min_y: &mut i64, max_y: &mut i64) {
        // round the range out to whole line pairs; the extra lines past
        // the top guarantee the last pair gets flushed
        *min_y &= -2;
        *max_y = (*max_y + 3) & -2;

        self.trace_ofs = 0;
        let mut byte_len = -self.pitch;
        self.trace_incr = byte_len;
        self.trace_g = (*min_y / 2) * byte_len;

        if self.pitch > 0 {
            self.trace_g += (self.rows - 1) * self.pitch;
            byte_len = -byte_len;
        }

        self.used = (byte_len, -byte_len);
    }

    fn span(&mut self, _y: i64, x1: i64, x2: i64) {
        bit_set_span(
            self.cache,
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
            self.cache,
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
        self.trace_ofs += GRAY_WIDTH;
        if self.trace_ofs <= GRAY_WIDTH {
            return;
        }

        // a full line pair is in the cache; fold the touched cells into
        // the target row and scrub them clean again
        if self.used.1 >= 0 {
            let last_pixel = self.width - 1;
            let last_cell = last_pixel >> 2;
            let last_bit = last_pixel & 3;
            let mut over = false;

            if self.used.1 >= last_cell && last_bit != 3 {
                self.used.1 = last_cell - 1;
                over = true;
            }
            if self.used.0 < 0 {
                self.used.0 = 0;
            }

            let mut bit1 = self.used.0 as usize;
            let mut bit2 = bit1 + GRAY_WIDTH as usize;
            let mut pix = (self.trace_g + self.used.0 * 4) as usize;

            let mut c1 = self.used.1 - self.used.0;
            while c1 >= 0 {
                let c2 = self.count_table[self.cache[bit1] as usize]
                    + self.count_table[self.cache[bit2] as usize];

                if c2 != 0 {
                    self.target[pix] = self.grays[((c2 >> 12) & 0xF) as usize];
                    self.target[pix + 1] = self.grays[((c2 >> 8) & 0xF) as usize];
                    self.target[pix + 2] = self.grays[((c2 >> 4) & 0xF) as usize];
                    self.target[pix + 3] = self.grays[(c2 & 0xF) as usize];

                    self.cache[bit1] = 0;
                    self.cache[bit2] = 0;
                }

                bit1 += 1;
                bit2 += 1;
                pix += 4;
                c1 -= 1;
            }

            if over {
                let c2 = self.count_table[self.cache[bit1] as usize]
                    + self.count_table[self.cache[bit2] as usize];

                if c2 != 0 {
                    if last_bit >= 2 {
                        self.target[pix + 2] = self.grays[((c2 >> 4) & 0xF) as usize];
                    }
                    if last_bit >= 1 {
                        self.target[pix + 1] = self.grays[((c2 >> 8) & 0xF) as usize];
                    }
                    self.target[pix] = self.grays[((c2 >> 12) & 0xF) as usize];

                    self.cache[bit1] = 0;
                    self.cache[bit2] = 0;
                }
            }
        }

        self.trace_ofs = 0;
        self.trace_g += self.trace_incr;
        self.used = (32000, -32000);
    }
}
