//! Output target descriptors

use crate::{Error, Result};

/// Monochrome target, 1 bit per pixel, MSB first within a byte
///
/// `pitch` is the signed byte distance between consecutive rows. With a
/// positive pitch rows are stored top-down in memory, so the last memory
/// row is scanline 0; a negative pitch stores rows bottom-up. Scanline 0
/// is always the bottom of the image.
#[derive(Debug)]
pub struct Bitmap<'a> {
    pub buffer: &'a mut [u8],
    /// Width in pixels
    pub width: i32,
    /// Height in scanlines
    pub rows: i32,
    /// Signed bytes per row
    pub pitch: i32,
}

impl<'a> Bitmap<'a> {
    pub fn new(buffer: &'a mut [u8], width: i32, rows: i32, pitch: i32) -> Self {
        Bitmap { buffer, width, rows, pitch }
    }

    pub(crate) fn check(&self) -> Result {
        check_dims(self.buffer.len(), self.width, self.rows, self.pitch, 8)
    }

    /// Byte offset of scanline `y`
    pub(crate) fn row_offset(&self, y: i32) -> usize {
        row_offset(self.rows, self.pitch, y)
    }

    /// Read back one pixel; `y` counted from the bottom
    pub fn get(&self, x: i32, y: i32) -> bool {
        debug_assert!(x >= 0 && x < self.width, "x {} outside 0..{}", x, self.width);
        debug_assert!(y >= 0 && y < self.rows, "y {} outside 0..{}", y, self.rows);
        let ofs = self.row_offset(y) + (x >> 3) as usize;
        self.buffer[ofs] & (0x80 >> (x & 7)) != 0
    }
}

/// Gray target, one byte per pixel, same pitch rule as [`Bitmap`]
#[derive(Debug)]
pub struct Pixmap<'a> {
    pub buffer: &'a mut [u8],
    /// Width in pixels
    pub width: i32,
    /// Height in scanlines
    pub rows: i32,
    /// Signed bytes per row
    pub pitch: i32,
}

impl<'a> Pixmap<'a> {
    pub fn new(buffer: &'a mut [u8], width: i32, rows: i32, pitch: i32) -> Self {
        Pixmap { buffer, width, rows, pitch }
    }

    pub(crate) fn check(&self) -> Result {
        check_dims(self.buffer.len(), self.width, self.rows, self.pitch, 1)
    }

    pub(crate) fn row_offset(&self, y: i32) -> usize {
        row_offset(self.rows, self.pitch, y)
    }

    /// Read back one pixel; `y` counted from the bottom
    pub fn get(&self, x: i32, y: i32) -> u8 {
        debug_assert!(x >= 0 && x < self.width, "x {} outside 0..{}", x, self.width);
        debug_assert!(y >= 0 && y < self.rows, "y {} outside 0..{}", y, self.rows);
        self.buffer[self.row_offset(y) + x as usize]
    }
}

fn row_offset(rows: i32, pitch: i32, y: i32) -> usize {
    if pitch > 0 {
        ((rows - 1 - y) * pitch) as usize
    } else {
        (y * -pitch) as usize
    }
}

fn check_dims(len: usize, width: i32, rows: i32, pitch: i32, px_per_byte: i32) -> Result {
    if width < 0 || rows < 0 || pitch == 0 {
        return Err(Error::InvalidOutline);
    }
    let abs_pitch = pitch.abs() as i64;
    if i64::from(width) > abs_pitch * i64::from(px_per_byte) {
        return Err(Error::InvalidOutline);
    }
    if (len as i64) < i64::from(rows) * abs_pitch {
        return Err(Error::InvalidOutline);
    }
    Ok(())
}
