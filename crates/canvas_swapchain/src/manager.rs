//! Swap chain creation
//!
//! The manager validates creation parameters, asks the device for a native
//! swap chain and wraps the result. Invalid geometry never reaches the device.

use std::rc::Rc;

use crate::adapter::SwapChainDrawingSessionFactory;
use crate::backend::CanvasDevice;
use crate::config::SwapChainConfig;
use crate::error::{CanvasError, CanvasResult};
use crate::format::{AlphaMode, PixelFormat};
use crate::session::DrawingSessionFactory;
use crate::swap_chain::CanvasSwapChain;

/// Creates [`CanvasSwapChain`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct SwapChainManager;

impl SwapChainManager {
    /// Create a new swap chain manager
    pub const fn new() -> Self {
        Self
    }

    /// Create a swap chain on `device`
    ///
    /// Fails with [`CanvasError::InvalidArgument`] when `width`, `height` or
    /// `buffer_count` is not positive. Device failures are returned as the
    /// device reported them.
    pub fn create(
        &self,
        device: &Rc<dyn CanvasDevice>,
        width: i32,
        height: i32,
        format: PixelFormat,
        buffer_count: i32,
        alpha_mode: AlphaMode,
        session_factory: Rc<dyn DrawingSessionFactory>,
    ) -> CanvasResult<CanvasSwapChain> {
        check_positive("width", width)?;
        check_positive("height", height)?;
        check_positive("buffer_count", buffer_count)?;

        let resource =
            device.create_swap_chain_resource(width, height, format, buffer_count, alpha_mode)?;

        log::debug!(
            "Created {width}x{height} swap chain with {buffer_count} buffers \
             ({format:?}, {alpha_mode:?})"
        );
        Ok(CanvasSwapChain::new(Rc::clone(device), resource, session_factory))
    }

    /// Create a swap chain from a [`SwapChainConfig`]
    pub fn create_from_config(
        &self,
        device: &Rc<dyn CanvasDevice>,
        config: &SwapChainConfig,
        session_factory: Rc<dyn DrawingSessionFactory>,
    ) -> CanvasResult<CanvasSwapChain> {
        config.validate()?;
        self.create(
            device,
            config.width,
            config.height,
            config.pixel_format,
            config.buffer_count,
            config.alpha_mode,
            session_factory,
        )
    }

    /// Create a swap chain whose drawing sessions bind its back buffer on
    /// `device`
    pub fn create_default(
        &self,
        device: &Rc<dyn CanvasDevice>,
        config: &SwapChainConfig,
    ) -> CanvasResult<CanvasSwapChain> {
        self.create_from_config(device, config, Rc::new(SwapChainDrawingSessionFactory))
    }
}

fn check_positive(name: &str, value: i32) -> CanvasResult<()> {
    if value <= 0 {
        return Err(CanvasError::InvalidArgument(format!("{name} must be positive, got {value}")));
    }
    Ok(())
}
