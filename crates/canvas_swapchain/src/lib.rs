//! # Canvas Swap Chain
//!
//! Lifecycle management for presentable, multi-buffered rendering surfaces
//! and the drawing sessions that render into them.
//!
//! ## Features
//!
//! - **Validated creation**: invalid geometry is rejected before the device
//!   allocates anything
//! - **Closed-state contract**: a closed swap chain fails every call with
//!   [`CanvasError::Closed`]
//! - **Guaranteed pass finalization**: a drawing session always ends its
//!   render pass, including when the initial clear fails
//! - **Pluggable backends**: devices, native swap chains and device contexts
//!   are traits; a CPU implementation ships in [`backend::software`]
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use canvas_swapchain::prelude::*;
//! use canvas_swapchain::backend::software::SoftwareDevice;
//!
//! fn main() -> Result<(), CanvasError> {
//!     let device: Rc<dyn CanvasDevice> = Rc::new(SoftwareDevice::new());
//!     let config = SwapChainConfig::default();
//!     let mut swap_chain = SwapChainManager::new().create_default(&device, &config)?;
//!
//!     let mut session = swap_chain.create_drawing_session(Color::CORNFLOWER_BLUE)?;
//!     session.close()?;
//!     swap_chain.present()?;
//!
//!     swap_chain.close();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod adapter;
pub mod backend;
pub mod config;
pub mod error;
pub mod format;
pub mod foundation;
pub mod manager;
pub mod projection;
pub mod session;
pub mod swap_chain;

#[cfg(test)]
mod tests;

pub use error::{CanvasError, CanvasResult, ErrorCode};
pub use manager::SwapChainManager;
pub use session::{DrawingSession, DrawingSessionFactory};
pub use swap_chain::CanvasSwapChain;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        adapter::SwapChainDrawingSessionFactory,
        backend::{CanvasDevice, DeviceContext, NativeSwapChain},
        config::{Config, SwapChainConfig},
        error::{CanvasError, CanvasResult, ErrorCode},
        format::{AlphaMode, PixelFormat},
        foundation::Color,
        manager::SwapChainManager,
        session::{DrawingSession, DrawingSessionFactory},
        swap_chain::CanvasSwapChain,
    };
}
