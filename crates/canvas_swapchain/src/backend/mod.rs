//! # Backend Module
//!
//! Narrow interfaces to the native graphics layer. The swap chain and its
//! drawing sessions only ever talk to a device, a native swap chain and a
//! device context through the traits defined here.
//!
//! ## Organization
//!
//! - **Device**: allocates native swap chains and device contexts
//! - **Native swap chain**: describe, resize, present, fetch back buffers
//! - **Device context**: bind a target bitmap, begin/end a pass, clear
//! - **Software**: CPU implementation of all three
//!
//! ## Design Principles
//!
//! - **Single source of truth**: native objects own their state; callers
//!   re-query [`NativeSwapChain::description`] instead of caching it
//! - **Verbatim failures**: backends report [`CanvasError::Native`] with the
//!   code the driver produced
//!
//! [`CanvasError::Native`]: crate::CanvasError::Native

pub mod software;

use std::any::Any;
use std::rc::Rc;

use bitflags::bitflags;

use crate::error::CanvasResult;
use crate::format::{AlphaMode, PixelFormat};
use crate::foundation::Color;

/// Dots per inch assumed when a device does not report its own
pub const DEFAULT_DPI: f32 = 96.0;

/// Snapshot of a native swap chain's configuration
///
/// `format` and `alpha_mode` carry native codes; see
/// [`PixelFormat::from_native`] and [`AlphaMode::from_native`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapChainDescription {
    /// Buffer width in pixels
    pub width: i32,
    /// Buffer height in pixels
    pub height: i32,
    /// Native pixel format code
    pub format: u32,
    /// Number of buffers in rotation
    pub buffer_count: i32,
    /// Native alpha mode code
    pub alpha_mode: u32,
}

bitflags! {
    /// Flags passed to a native buffer resize
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SwapChainFlags: u32 {
        /// Buffers can be used with GDI
        const GDI_COMPATIBLE = 0x4;
    }
}

bitflags! {
    /// Flags passed to a native present
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PresentFlags: u32 {
        /// Check presentation status without presenting
        const TEST = 0x1;
    }
}

bitflags! {
    /// Options for creating a device context
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DeviceContextOptions: u32 {
        /// Spread rendering work over multiple threads
        const ENABLE_MULTITHREADED_OPTIMIZATIONS = 0x1;
    }
}

bitflags! {
    /// How a bitmap created over a surface may be used
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BitmapOptions: u32 {
        /// The bitmap can be a render target
        const TARGET = 0x1;
        /// The bitmap cannot be used as a drawing source
        const CANNOT_DRAW = 0x2;
    }
}

/// Integer rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge
    pub left: i32,
    /// Top edge
    pub top: i32,
    /// Right edge (exclusive)
    pub right: i32,
    /// Bottom edge (exclusive)
    pub bottom: i32,
}

/// Integer offset in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    /// Horizontal offset
    pub x: i32,
    /// Vertical offset
    pub y: i32,
}

/// Extra information for a native present
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresentParameters {
    /// Regions that changed since the last present; empty means the whole frame
    pub dirty_rects: Vec<Rect>,
    /// Region scrolled since the last present
    pub scroll_rect: Option<Rect>,
    /// Amount `scroll_rect` moved
    pub scroll_offset: Option<Point>,
}

impl PresentParameters {
    /// Parameters for presenting the whole frame
    pub const fn full_frame() -> Self {
        Self { dirty_rects: Vec::new(), scroll_rect: None, scroll_offset: None }
    }
}

/// Parameters for creating a bitmap over a native surface
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapProperties {
    /// Horizontal dots per inch
    pub dpi_x: f32,
    /// Vertical dots per inch
    pub dpi_y: f32,
    /// Allowed uses
    pub options: BitmapOptions,
    /// Pixel format of the surface
    pub format: PixelFormat,
    /// Alpha treatment of the surface
    pub alpha_mode: AlphaMode,
    /// ICC color profile, `None` for the device default
    pub color_profile: Option<Vec<u8>>,
}

impl BitmapProperties {
    /// Properties for a write-only render target
    pub const fn target(dpi: f32, format: PixelFormat, alpha_mode: AlphaMode) -> Self {
        Self {
            dpi_x: dpi,
            dpi_y: dpi,
            options: BitmapOptions::TARGET.union(BitmapOptions::CANNOT_DRAW),
            format,
            alpha_mode,
            color_profile: None,
        }
    }
}

/// Native surface backing one swap chain buffer
pub trait Surface {
    /// Upcast for backends that need their concrete surface type back
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

/// Bitmap created over a surface that a device context can render into
pub trait TargetBitmap {
    /// Properties the bitmap was created with
    fn properties(&self) -> &BitmapProperties;

    /// Upcast for backends that need their concrete bitmap type back
    fn as_any(&self) -> &dyn Any;
}

/// Graphics device owning native resource creation
pub trait CanvasDevice {
    /// Allocate a native swap chain
    fn create_swap_chain_resource(
        &self,
        width: i32,
        height: i32,
        format: PixelFormat,
        buffer_count: i32,
        alpha_mode: AlphaMode,
    ) -> CanvasResult<Box<dyn NativeSwapChain>>;

    /// Acquire a device context for one render pass
    fn create_device_context(
        &self,
        options: DeviceContextOptions,
    ) -> CanvasResult<Box<dyn DeviceContext>>;

    /// Dots per inch for targets created on this device
    fn dpi(&self) -> f32 {
        DEFAULT_DPI
    }
}

/// Native swap chain resource
pub trait NativeSwapChain {
    /// Read the current configuration
    fn description(&self) -> CanvasResult<SwapChainDescription>;

    /// Reallocate the buffers
    fn resize_buffers(
        &mut self,
        buffer_count: i32,
        width: i32,
        height: i32,
        format: u32,
        flags: SwapChainFlags,
    ) -> CanvasResult<()>;

    /// Present the current back buffer
    fn present(
        &mut self,
        sync_interval: u32,
        flags: PresentFlags,
        parameters: &PresentParameters,
    ) -> CanvasResult<()>;

    /// Fetch the buffer at `index`; index 0 is the current back buffer
    fn back_buffer(&self, index: u32) -> CanvasResult<Rc<dyn Surface>>;
}

/// Interface through which rendering commands are issued
pub trait DeviceContext {
    /// Create a bitmap over `surface`
    fn create_bitmap_from_surface(
        &mut self,
        surface: Rc<dyn Surface>,
        properties: &BitmapProperties,
    ) -> CanvasResult<Rc<dyn TargetBitmap>>;

    /// Bind the bitmap subsequent commands render into
    fn set_target(&mut self, target: Rc<dyn TargetBitmap>) -> CanvasResult<()>;

    /// Open a render pass
    fn begin_draw(&mut self);

    /// Fill the whole target with `color`
    fn clear(&mut self, color: Color) -> CanvasResult<()>;

    /// Close the render pass opened by [`begin_draw`](Self::begin_draw)
    fn end_draw(&mut self) -> CanvasResult<()>;
}
