//! Out-parameter projection of the swap chain API
//!
//! Hosts that call through an ABI pass output slots that may be missing.
//! Every function here checks its slot first and fails with
//! [`CanvasError::InvalidArgument`] when it is `None`, then runs the typed
//! operation, which applies the closed-state check. A missing slot on a
//! closed swap chain therefore reports the missing slot.

use std::rc::Rc;

use crate::backend::CanvasDevice;
use crate::error::{CanvasError, CanvasResult};
use crate::format::{AlphaMode, PixelFormat};
use crate::foundation::Color;
use crate::manager::SwapChainManager;
use crate::session::{DrawingSession, DrawingSessionFactory};
use crate::swap_chain::CanvasSwapChain;

fn require<'a, T>(slot: Option<&'a mut T>, name: &str) -> CanvasResult<&'a mut T> {
    slot.ok_or_else(|| CanvasError::InvalidArgument(format!("{name} output is null")))
}

/// Create a swap chain into `out`
pub fn create_swap_chain(
    manager: &SwapChainManager,
    device: Option<&Rc<dyn CanvasDevice>>,
    width: i32,
    height: i32,
    format: PixelFormat,
    buffer_count: i32,
    alpha_mode: AlphaMode,
    session_factory: Rc<dyn DrawingSessionFactory>,
    out: Option<&mut Option<CanvasSwapChain>>,
) -> CanvasResult<()> {
    let out = require(out, "swap chain")?;
    let device = device.ok_or_else(|| CanvasError::InvalidArgument("device is null".into()))?;
    let swap_chain =
        manager.create(device, width, height, format, buffer_count, alpha_mode, session_factory)?;
    *out = Some(swap_chain);
    Ok(())
}

/// Write the buffer width into `out`
pub fn get_width(swap_chain: &CanvasSwapChain, out: Option<&mut i32>) -> CanvasResult<()> {
    let out = require(out, "width")?;
    *out = swap_chain.width()?;
    Ok(())
}

/// Write the buffer height into `out`
pub fn get_height(swap_chain: &CanvasSwapChain, out: Option<&mut i32>) -> CanvasResult<()> {
    let out = require(out, "height")?;
    *out = swap_chain.height()?;
    Ok(())
}

/// Write the pixel format into `out`
pub fn get_format(swap_chain: &CanvasSwapChain, out: Option<&mut PixelFormat>) -> CanvasResult<()> {
    let out = require(out, "format")?;
    *out = swap_chain.format()?;
    Ok(())
}

/// Write the buffer count into `out`
pub fn get_buffer_count(swap_chain: &CanvasSwapChain, out: Option<&mut i32>) -> CanvasResult<()> {
    let out = require(out, "buffer count")?;
    *out = swap_chain.buffer_count()?;
    Ok(())
}

/// Write the alpha mode into `out`
pub fn get_alpha_mode(
    swap_chain: &CanvasSwapChain,
    out: Option<&mut AlphaMode>,
) -> CanvasResult<()> {
    let out = require(out, "alpha mode")?;
    *out = swap_chain.alpha_mode()?;
    Ok(())
}

/// Write the owning device into `out`
pub fn get_device(
    swap_chain: &CanvasSwapChain,
    out: Option<&mut Option<Rc<dyn CanvasDevice>>>,
) -> CanvasResult<()> {
    let out = require(out, "device")?;
    *out = Some(swap_chain.device()?);
    Ok(())
}

/// Open a drawing session into `out`
pub fn create_drawing_session(
    swap_chain: &CanvasSwapChain,
    clear_color: Color,
    out: Option<&mut Option<DrawingSession>>,
) -> CanvasResult<()> {
    let out = require(out, "drawing session")?;
    *out = Some(swap_chain.create_drawing_session(clear_color)?);
    Ok(())
}
