//! Drawing sessions and the render pass guard behind them
//!
//! A [`RenderPass`] owns the device context for the duration of one pass.
//! `begin_draw` is issued when the guard is created and `end_draw` exactly
//! once when it is ended explicitly or dropped, whichever comes first. The
//! context is released together with the end of the pass.

use std::fmt;
use std::rc::Rc;

use crate::backend::{CanvasDevice, DeviceContext, NativeSwapChain, TargetBitmap};
use crate::error::{CanvasError, CanvasResult};
use crate::foundation::Color;

/// Scoped render pass over an exclusively owned device context
pub struct RenderPass {
    context: Option<Box<dyn DeviceContext>>,
}

impl RenderPass {
    /// Begin a pass on `context`
    pub fn begin(mut context: Box<dyn DeviceContext>) -> Self {
        context.begin_draw();
        log::trace!("Render pass begun");
        Self { context: Some(context) }
    }

    /// Context of the open pass, `None` once ended
    pub fn context_mut(&mut self) -> Option<&mut (dyn DeviceContext + 'static)> {
        self.context.as_deref_mut()
    }

    /// Whether the pass is still open
    pub const fn is_active(&self) -> bool {
        self.context.is_some()
    }

    /// End the pass and release the context
    ///
    /// Only the first call reaches the context; later calls return `Ok(())`.
    pub fn end(&mut self) -> CanvasResult<()> {
        let Some(mut context) = self.context.take() else {
            return Ok(());
        };
        log::trace!("Render pass ended");
        context.end_draw()
    }
}

impl Drop for RenderPass {
    fn drop(&mut self) {
        if let Err(e) = self.end() {
            log::warn!("Failed to end render pass on drop: {e}");
        }
    }
}

impl fmt::Debug for RenderPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderPass").field("active", &self.is_active()).finish()
    }
}

/// One open render pass into a swap chain back buffer
///
/// Closing the session, explicitly or by dropping it, ends the pass.
pub struct DrawingSession {
    pass: RenderPass,
    target: Option<Rc<dyn TargetBitmap>>,
}

impl DrawingSession {
    /// Wrap an open pass and the target it renders into
    pub fn new(pass: RenderPass, target: Option<Rc<dyn TargetBitmap>>) -> Self {
        Self { pass, target }
    }

    /// Fill the whole target with `color`
    pub fn clear(&mut self, color: Color) -> CanvasResult<()> {
        self.pass.context_mut().ok_or(CanvasError::Closed)?.clear(color)
    }

    /// Bound target, if the session was created with one
    pub fn target(&self) -> Option<&Rc<dyn TargetBitmap>> {
        self.target.as_ref()
    }

    /// Whether the session has been closed
    pub const fn is_closed(&self) -> bool {
        !self.pass.is_active()
    }

    /// End the render pass
    ///
    /// Idempotent; only the first call can report a failure from the context.
    pub fn close(&mut self) -> CanvasResult<()> {
        let result = self.pass.end();
        self.target = None;
        result
    }
}

impl fmt::Debug for DrawingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawingSession")
            .field("closed", &self.is_closed())
            .field("has_target", &self.target.is_some())
            .finish()
    }
}

/// Produces drawing sessions for a swap chain
///
/// The production implementation is
/// [`SwapChainDrawingSessionFactory`](crate::adapter::SwapChainDrawingSessionFactory);
/// tests substitute their own to exercise the swap chain in isolation.
pub trait DrawingSessionFactory {
    /// Open a session on the current back buffer of `swap_chain`
    fn create(
        &self,
        owner: &Rc<dyn CanvasDevice>,
        swap_chain: &dyn NativeSwapChain,
        clear_color: Color,
    ) -> CanvasResult<DrawingSession>;
}
