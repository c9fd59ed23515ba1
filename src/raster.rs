//! Rasterizer instance and the banded render loop

use crate::bitmap::{Bitmap, Pixmap};
use crate::decompose::PointMap;
use crate::math::Precision;
use crate::outline::Outline;
use crate::pool::RenderPool;
use crate::profile::Profile;
use crate::sweep::{draw_sweep, DropoutMode, HorizontalMono, SweepWriter, VerticalMono};
use crate::trace::ProfileBuilder;
use crate::{Error, Result};

#[cfg(feature = "gray")]
use crate::gray;

/// Default working arena size in bytes.
pub const RENDER_POOL_SIZE: usize = 8192;

/// Smallest working arena `set_pool_size` accepts, in bytes.
pub const MIN_POOL_SIZE: usize = 4096;

/// Scanline renderer for filled outlines.
///
/// The rasterizer owns a fixed working arena sized up front. An outline
/// too complex for the arena is rendered in successively halved
/// horizontal bands rather than by growing the arena.
pub struct Rasterizer {
    pool: RenderPool,
    profiles: Vec<Profile>,
    dropout: DropoutMode,
    #[cfg(feature = "gray")]
    gray_lines: Vec<u8>,
    #[cfg(feature = "gray")]
    count_table: [u16; 256],
    #[cfg(feature = "gray")]
    grays: [u8; 5],
}

impl Rasterizer {
    /// A rasterizer with no working arena yet; rendering fails with
    /// `NotInitialized` until `set_pool_size` provides one.
    pub fn new() -> Self {
        Rasterizer {
            pool: RenderPool::new(0),
            profiles: Vec::new(),
            dropout: DropoutMode::default(),
            #[cfg(feature = "gray")]
            gray_lines: vec![0; gray::GRAY_LINES],
            #[cfg(feature = "gray")]
            count_table: gray::build_count_table(),
            #[cfg(feature = "gray")]
            grays: [0, 63, 127, 191, 255],
        }
    }

    /// A rasterizer with a working arena of `bytes` bytes.
    pub fn with_pool_size(bytes: usize) -> Self {
        let mut r = Rasterizer::new();
        r.set_pool_size(bytes);
        r
    }

    /// Resize the working arena. Sizes under [`MIN_POOL_SIZE`] are
    /// ignored and the previous arena, if any, stays in place.
    pub fn set_pool_size(&mut self, bytes: usize) {
        if bytes >= MIN_POOL_SIZE {
            self.pool.resize(bytes / 8);
        }
    }

    /// Select how spans too thin to cover any pixel center are handled.
    pub fn set_dropout_mode(&mut self, mode: DropoutMode) {
        self.dropout = mode;
    }

    /// Replace the gray ramp used by `render_gray`, ordered from no
    /// coverage to full coverage.
    #[cfg(feature = "gray")]
    pub fn set_gray_palette(&mut self, palette: [u8; 5]) {
        self.grays = palette;
    }

    /// Render the filled outline into a monochrome bitmap.
    ///
    /// Pixels outside the outline are left untouched, so the same
    /// bitmap can accumulate several outlines.
    pub fn render(&mut self, outline: &Outline, target: &mut Bitmap) -> Result {
        if self.pool.buff.is_empty() {
            return Err(Error::NotInitialized);
        }
        if outline.is_empty() {
            return Ok(());
        }
        outline.check()?;
        target.check()?;

        let prec = Precision::new(outline.high_precision);
        let width = target.width as i64;
        let rows = target.rows as i64;
        let pitch = target.pitch as i64;

        {
            let map = PointMap::new(prec, 0, false);
            let mut writer = VerticalMono::new(
                &mut target.buffer[..],
                width,
                rows,
                pitch,
                prec,
                self.dropout,
            );
            render_single_pass(
                &mut self.pool,
                &mut self.profiles,
                prec,
                map,
                self.dropout,
                outline,
                rows - 1,
                &mut writer,
            )?;
        }

        // second pass over the flipped outline to catch the dropouts
        // the vertical sweep cannot see
        if !outline.single_pass && self.dropout != DropoutMode::None {
            let map = PointMap::new(prec, 0, true);
            let mut writer =
                HorizontalMono::new(&mut target.buffer[..], rows, pitch, prec, self.dropout);
            render_single_pass(
                &mut self.pool,
                &mut self.profiles,
                prec,
                map,
                self.dropout,
                outline,
                width - 1,
                &mut writer,
            )?;
        }

        Ok(())
    }

    /// Render the outline anti-aliased into a gray pixmap through the
    /// 5-level palette.
    ///
    /// Only covered cells are written; clear the target to the
    /// palette's first entry beforehand.
    #[cfg(feature = "gray")]
    pub fn render_gray(&mut self, outline: &Outline, target: &mut Pixmap) -> Result {
        if self.pool.buff.is_empty() {
            return Err(Error::NotInitialized);
        }
        if outline.is_empty() {
            return Ok(());
        }
        outline.check()?;
        target.check()?;

        let prec = Precision::new(outline.high_precision);
        let width = target.width as i64;
        let rows = target.rows as i64;
        let pitch = target.pitch as i64;

        let map = PointMap::new(prec, 1, false);
        let mut writer = gray::VerticalGray {
            cache: &mut self.gray_lines[..],
            target: &mut target.buffer[..],
            width,
            rows,
            pitch,
            b_width: (2 * width).min(8 * gray::GRAY_WIDTH),
            count_table: &self.count_table,
            grays: self.grays,
            prec,
            mode: self.dropout,
            trace_ofs: 0,
            trace_incr: 0,
            trace_g: 0,
            used: (0, 0),
        };

        render_single_pass(
            &mut self.pool,
            &mut self.profiles,
            prec,
            map,
            self.dropout,
            outline,
            2 * rows - 1,
            &mut writer,
        )
    }

    /// Built without the `gray` feature, anti-aliased rendering is
    /// unavailable. The arena and argument checks still run in their
    /// usual order; only a request that would actually draw is refused.
    #[cfg(not(feature = "gray"))]
    pub fn render_gray(&mut self, outline: &Outline, target: &mut Pixmap) -> Result {
        if self.pool.buff.is_empty() {
            return Err(Error::NotInitialized);
        }
        if outline.is_empty() {
            return Ok(());
        }
        outline.check()?;
        target.check()?;
        Err(Error::Unsupported)
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Rasterizer::new()
    }
}

/// Convert the outline's profiles one band at a time, splitting any
/// band whose profiles overflow the arena, and sweep every band that
/// converts into the writer.
fn render_single_pass<W: SweepWriter>(
    pool: &mut RenderPool,
    profiles: &mut Vec<Profile>,
    prec: Precision,
    map: PointMap,
    dropout: DropoutMode,
    outline: &Outline,
    band_max: i64,
    writer: &mut W,
) -> Result {
    let mut bands: Vec<(i64, i64)> = Vec::with_capacity(16);
    bands.push((0, band_max));

    while let Some(&(y_min, y_max)) = bands.last() {
        let converted = ProfileBuilder::new(
            pool,
            profiles,
            prec,
            y_min * prec.unit,
            y_max * prec.unit,
        )
        .convert(outline, map);

        match converted {
            Ok(n) => {
                if n > 1 {
                    draw_sweep(pool, &mut profiles[..n], prec, dropout, writer)?;
                }
                bands.pop();
            }
            Err(Error::Overflow) => {
                // halve the band; the upper half goes on top of the
                // stack so it is converted next
                let k = (y_min + y_max) / 2;
                if bands.len() >= 8 || k < y_min {
                    return Err(Error::InvalidOutline);
                }
                let last = bands.len() - 1;
                bands[last] = (y_min, k - 1);
                bands.push((k, y_max));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
