//! Test utilities for termglyph.
//!
//! This crate provides the GPU abstraction the renderer is written against,
//! plus a mock GPU context for testing without a device.
//!
//! # Overview
//!
//! - [`RenderContext`] - Trait abstracting GPU operations
//! - `MockRenderContext` - Mock implementation recording every call (requires `mock` feature)
//! - GPU wrapper types (`GpuBuffer`, `GpuTexture`, etc.) - Can be real or mock
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use termglyph_test_utils::{MockRenderContext, RenderContext};
//! use wgpu::*;
//!
//! let mock = MockRenderContext::new();
//!
//! let buffer = mock.create_buffer(&BufferDescriptor {
//!     label: Some("test_buffer"),
//!     size: 1024,
//!     usage: BufferUsages::VERTEX,
//!     mapped_at_creation: false,
//! });
//!
//! assert_eq!(mock.count_buffer_creates(), 1);
//! assert!(buffer.is_mock());
//! # }
//! ```
//!
//! # Design
//!
//! All GPU wrapper types are owned and reference counted internally, so no
//! lifetimes propagate through renderer code. Mock implementations use
//! `Mutex` for interior mutability, and `RenderContext` stays object-safe.

pub mod gpu_types;
#[cfg(feature = "mock")]
pub mod mock_render;
pub mod render_context;

// Re-export main types at crate root
pub use gpu_types::*;
#[cfg(feature = "mock")]
pub use mock_render::*;
pub use render_context::*;
