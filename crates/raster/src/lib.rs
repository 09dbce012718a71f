#![deny(unsafe_code)]
//! CPU backend for wheels display lists.
//!
//! [`pixel`] turns a `DisplayList` into an RGBA8 buffer; [`snapshot`] writes
//! that buffer as PNG. The CLI uses both for headless renders.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::{draw, rasterize, Pixmap};
