//! Math types used across termglyph.
//!
//! Re-exports the SIMD-accelerated [`glam`] types. Screen space in termglyph is
//! pixel space with the origin at the bottom-left and Y increasing upward.
//!
//! ```
//! use termglyph_core::math::{Mat4, Vec4};
//!
//! let projection = Mat4::orthographic_rh(0.0, 640.0, 0.0, 480.0, -1.0, 1.0);
//! let clip = projection * Vec4::new(640.0, 480.0, 0.0, 1.0);
//! assert!((clip.x - 1.0).abs() < 1e-6);
//! assert!((clip.y - 1.0).abs() < 1e-6);
//! ```
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::{Mat4, UVec2, Vec2, Vec3, Vec4};
