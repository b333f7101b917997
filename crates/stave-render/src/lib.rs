//! Drawing primitives for the Stave canvas toolkit.
//!
//! This crate provides the small vocabulary the canvas speaks when it talks
//! to a rendering backend:
//!
//! - [`Point`], [`Size`], [`Rect`] — geometry value types
//! - [`Color`] — RGBA color with 8-bit and hex constructors
//! - [`Stroke`] — outline style (color + width)
//! - [`Painter`] — the backend abstraction the canvas draws through
//! - [`RecordingPainter`] — a capture backend for tests and headless use
//!
//! The canvas itself never touches a concrete graphics API; everything it
//! draws goes through [`Painter`], so a Cairo, GPU, or software backend can
//! be swapped in by implementing one trait.

mod color;
mod paint;
mod types;

pub use color::{Color, ColorParseError};
pub use paint::{DrawCommand, Painter, RecordingPainter, Stroke};
pub use types::{Point, Rect, Size, union_opt};
