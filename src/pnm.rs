//! Reading and writing of PGM (Portable Graymap Format) files
//!
//! See <https://en.wikipedia.org/wiki/Netpbm_format#PGM_example>
//!
use std::path::Path;

use crate::bitmap::{Bitmap, Pixmap};

/// Save a monochrome bitmap as an 8-bit gray image, set pixels white.
pub fn write_bitmap<P: AsRef<Path>>(map: &Bitmap, filename: P) -> Result<(), std::io::Error> {
    let w = map.width as usize;
    let h = map.rows as usize;
    let mut buf = Vec::with_capacity(w * h);
    for y in (0..map.rows).rev() {
        for x in 0..map.width {
            buf.push(if map.get(x, y) { 255 } else { 0 });
        }
    }
    image::save_buffer(filename, &buf, w as u32, h as u32, image::Gray(8))
}

/// Save a gray pixmap as an 8-bit gray image.
pub fn write_pixmap<P: AsRef<Path>>(map: &Pixmap, filename: P) -> Result<(), std::io::Error> {
    let w = map.width as usize;
    let h = map.rows as usize;
    let mut buf = Vec::with_capacity(w * h);
    for y in (0..map.rows).rev() {
        for x in 0..map.width {
            buf.push(map.get(x, y));
        }
    }
    image::save_buffer(filename, &buf, w as u32, h as u32, image::Gray(8))
}

pub fn read_file<P: AsRef<Path>>(filename: P) -> Result<(Vec<u8>,usize,usize),image::ImageError> {
    let img = image::open(filename)?.to_luma();
    let (w, h) = img.dimensions();
    let buf = img.into_raw();
    Ok((buf, w as usize, h as usize))
}

pub fn img_diff<P: AsRef<Path>>(f1: P, f2: P) -> Result<bool,image::ImageError> {
    let (d1,w1,h1) = read_file(f1)?;
    let (d2,w2,h2) = read_file(f2)?;
    if w1 != w2 || h1 != h2 {
        return Ok(false);
    }
    if d1.len() != d2.len() {
        println!("files not equal length");
        return Ok(false);
    }
    let mut flag = true;
    for (i,(v1,v2)) in d1.iter().zip(d2.iter()).enumerate() {
        if v1 != v2 {
            println!("{} [{},{}]: {} {}", i, i%w1, i/w1, v1, v2);
            flag = false;
        }
    }
    Ok(flag)
}
