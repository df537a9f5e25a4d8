//! Image decoding, rasterization and comparison
//!
//! Everything in here is synchronous and CPU-bound; callers on the async
//! runtime run it through `spawn_blocking`.

pub mod decode;
pub mod pixelmatch;
pub mod raster;

pub use decode::{decode_png_input, decode_svg_input};
pub use pixelmatch::{CompareOptions, compare};
pub use raster::{RasterBuffer, Rasterizer};
