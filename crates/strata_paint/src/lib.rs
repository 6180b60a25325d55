//! Strata Paint
//!
//! Save/restore transform and clip state for a cross-platform drawing layer,
//! replayed correctly onto whichever native 2D backend is active.
//!
//! # Features
//!
//! - Explicit save-frame stack with per-frame native pop counts
//! - Clip replacement and reset bounded by the enclosing frame's clip
//! - Backend adapters for balanced graphics-state stacks and nested display lists
//! - Full-state replay when the host invalidates the native surface
//! - Origin flipping, scale factor and half-pixel stroke alignment from config
//!
//! # Example
//!
//! ```rust
//! use strata_core::{Matrix, Rect};
//! use strata_paint::{
//!     BalancedStackAdapter, DrawingContext, SoftwareProvider, SurfaceConfig,
//! };
//!
//! let provider = SoftwareProvider::new(Rect::new(0.0, 0.0, 400.0, 300.0));
//! let mut ctx = DrawingContext::new(
//!     BalancedStackAdapter::new(),
//!     provider,
//!     SurfaceConfig::default(),
//! );
//!
//! ctx.translate_transform(10.0, 10.0);
//! ctx.save_transform();
//! ctx.scale_transform(2.0, 2.0);
//! ctx.set_clip(Rect::new(0.0, 0.0, 50.0, 50.0));
//! ctx.restore_transform().unwrap();
//!
//! assert_eq!(ctx.current_transform(), Matrix::translate(10.0, 10.0));
//! assert_eq!(ctx.clip_bounds().unwrap(), None);
//!
//! let session = ctx.finish();
//! assert_eq!(session.depth(), 0);
//! ```

pub mod backend;
pub mod balanced;
pub mod clip;
pub mod config;
pub mod context;
pub mod coords;
pub mod error;
pub mod frame;
pub mod pop_counted;
pub mod replay;
pub mod surface;
pub mod transform;

pub use backend::{Backend, BackendAdapter, DisplayListSurface, ImmediateSurface};
pub use balanced::BalancedStackAdapter;
pub use clip::ClipController;
pub use config::{ConfigError, Origin, PixelOffsetMode, SurfaceConfig};
pub use context::DrawingContext;
pub use coords::{CoordinateSystem, PaintMode};
pub use error::{PaintError, Result};
pub use frame::{StateFrame, StateOp};
pub use pop_counted::PopCountedAdapter;
pub use replay::{InvalidationFlag, Phase, ReplayCoordinator, SurfaceProvider};
pub use surface::{
    DisplayCommand, DisplayList, DisplayListProvider, SoftwareContext, SoftwareProvider,
};
pub use transform::TransformStack;
