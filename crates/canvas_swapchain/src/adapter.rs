//! Back buffer binding and the drawing session protocol
//!
//! Opening a session on a swap chain runs these steps in order:
//!
//! 1. acquire a device context from the owning device
//! 2. describe the native swap chain (format and alpha mode only)
//! 3. fetch back buffer 0
//! 4. create a target bitmap over it at the device dpi
//! 5. bind the bitmap as the context's target
//! 6. begin the render pass
//! 7. clear to the requested color
//!
//! Failures in steps 1-5 propagate as they are, nothing has been begun yet.
//! From step 6 on the pass is held by a [`RenderPass`] guard, so a failing
//! clear still ends the pass before the error reaches the caller.

use std::rc::Rc;

use crate::backend::{
    BitmapProperties, CanvasDevice, DeviceContext, DeviceContextOptions, NativeSwapChain, Surface,
};
use crate::error::{CanvasError, CanvasResult};
use crate::format::{AlphaMode, PixelFormat};
use crate::foundation::Color;
use crate::session::{DrawingSession, DrawingSessionFactory, RenderPass};

/// Current back buffer of a swap chain with the properties needed to target it
pub struct BackBufferTarget {
    /// Surface of back buffer 0
    pub surface: Rc<dyn Surface>,
    /// Properties for a target bitmap over `surface`
    pub properties: BitmapProperties,
}

/// Fetch the current back buffer and translate the swap chain description
/// into target bitmap properties
pub fn bind_back_buffer(
    device: &dyn CanvasDevice,
    swap_chain: &dyn NativeSwapChain,
) -> CanvasResult<BackBufferTarget> {
    let description = swap_chain.description()?;
    let format = PixelFormat::from_native(description.format)?;
    let alpha_mode = AlphaMode::from_native(description.alpha_mode)?;

    let surface = swap_chain.back_buffer(0)?;

    Ok(BackBufferTarget {
        surface,
        properties: BitmapProperties::target(device.dpi(), format, alpha_mode),
    })
}

/// Open a drawing session on the current back buffer of `swap_chain`
pub fn open_drawing_session(
    owner: &dyn CanvasDevice,
    swap_chain: &dyn NativeSwapChain,
    clear_color: Color,
) -> CanvasResult<DrawingSession> {
    let mut context = owner.create_device_context(DeviceContextOptions::empty())?;

    let back_buffer = bind_back_buffer(owner, swap_chain)?;
    let target = context.create_bitmap_from_surface(back_buffer.surface, &back_buffer.properties)?;
    context.set_target(Rc::clone(&target))?;

    let mut pass = RenderPass::begin(context);
    clear_target(&mut pass, clear_color)?;

    log::debug!(
        "Drawing session opened on {:?} back buffer",
        back_buffer.properties.format
    );
    Ok(DrawingSession::new(pass, Some(target)))
}

fn clear_target(pass: &mut RenderPass, color: Color) -> CanvasResult<()> {
    let context: &mut dyn DeviceContext = pass.context_mut().ok_or(CanvasError::Closed)?;
    if let Err(e) = context.clear(color) {
        log::debug!("Clear failed, ending render pass: {e}");
        if let Err(end_error) = pass.end() {
            log::warn!("Failed to end render pass after clear failure: {end_error}");
        }
        return Err(e);
    }
    Ok(())
}

/// Production drawing session factory
#[derive(Debug, Default, Clone, Copy)]
pub struct SwapChainDrawingSessionFactory;

impl DrawingSessionFactory for SwapChainDrawingSessionFactory {
    fn create(
        &self,
        owner: &Rc<dyn CanvasDevice>,
        swap_chain: &dyn NativeSwapChain,
        clear_color: Color,
    ) -> CanvasResult<DrawingSession> {
        open_drawing_session(owner.as_ref(), swap_chain, clear_color)
    }
}
