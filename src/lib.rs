//! Scan-line rasterizer turning fixed-point outlines into monochrome
//! or 5-level gray bitmaps
//!
//! How a render runs
//!   Rasterizer::render(outline, bitmap)
//!     for each band (whole bitmap at first, halved on arena overflow)
//!       decompose contours into monotonic edge traces ("profiles")
//!         line_up / line_down / bezier_up / bezier_down
//!       record the scanlines where profiles start or stop ("y turns")
//!       sweep scanlines bottom-up, pairing left and right profiles
//!         wide span   -> writer paints pixels
//!         narrow span -> drop-out rules pick a pixel, or none
//!     second pass over the flipped outline for horizontal drop-outs
//!
//! Gray rendering runs the vertical sweep at doubled resolution and
//! folds 2x2 supersample cells through a 5-entry palette.

use std::fmt;

pub mod bezier;
pub mod bitmap;
pub mod math;
pub mod outline;
pub mod pnm;
pub mod raster;

mod decompose;
#[cfg(feature = "gray")]
mod gray;
mod pool;
mod profile;
mod sweep;
mod trace;

pub use bezier::*;
pub use bitmap::*;
pub use math::*;
pub use outline::*;
pub use pnm::*;
pub use raster::*;
pub use sweep::DropoutMode;

/// Rendering failure
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum Error {
    /// The rasterizer has no working arena.
    NotInitialized,
    /// The working arena cannot hold the current band.
    Overflow,
    /// A profile came out with negative height; the outline is corrupt.
    NegativeHeight,
    /// Malformed outline or target description.
    InvalidOutline,
    /// The requested rendering is not compiled in.
    Unsupported,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            Error::NotInitialized => "working arena not configured",
            Error::Overflow => "band too complex for the working arena",
            Error::NegativeHeight => "profile with negative height",
            Error::InvalidOutline => "invalid outline",
            Error::Unsupported => "rendering mode not supported",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for Error {}

pub type Result<T = ()> = std::result::Result<T, Error>;
