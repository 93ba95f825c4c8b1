//! CPU implementation of the native interfaces
//!
//! Buffers are plain 8-bit four channel pixel arrays, so only
//! [`PixelFormat::is_8bit_four_channel`] formats are supported. The software
//! swap chain follows the same rules as a hardware one where they matter to
//! callers:
//!
//! - resizing fails while a back buffer is still referenced (an open drawing
//!   session holds one)
//! - a zero buffer count or [`PixelFormat::Unknown`] on resize keeps the
//!   current value
//! - presenting rotates the buffers; back buffer 0 is always the next one to
//!   render into
//! - buffers larger than [`MAX_DIMENSION`] on either side fail with
//!   [`ErrorCode::OutOfMemory`]

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use image::{Rgba, RgbaImage};

use crate::backend::{
    BitmapOptions, BitmapProperties, CanvasDevice, DeviceContext, DeviceContextOptions,
    NativeSwapChain, PresentFlags, PresentParameters, Surface, SwapChainDescription,
    SwapChainFlags, TargetBitmap, DEFAULT_DPI,
};
use crate::error::{CanvasError, CanvasResult, ErrorCode};
use crate::format::{AlphaMode, PixelFormat};
use crate::foundation::Color;

/// Largest sync interval a present accepts
const MAX_SYNC_INTERVAL: u32 = 4;

/// Largest width or height of a software buffer
pub const MAX_DIMENSION: u32 = 16_384;

/// Device rendering into CPU memory
#[derive(Debug)]
pub struct SoftwareDevice {
    dpi: f32,
    contexts_created: Cell<usize>,
}

impl SoftwareDevice {
    /// Create a device at the default dpi
    pub const fn new() -> Self {
        Self::with_dpi(DEFAULT_DPI)
    }

    /// Create a device at `dpi`
    pub const fn with_dpi(dpi: f32) -> Self {
        Self { dpi, contexts_created: Cell::new(0) }
    }

    /// Number of device contexts handed out so far
    pub fn contexts_created(&self) -> usize {
        self.contexts_created.get()
    }
}

impl Default for SoftwareDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasDevice for SoftwareDevice {
    fn create_swap_chain_resource(
        &self,
        width: i32,
        height: i32,
        format: PixelFormat,
        buffer_count: i32,
        alpha_mode: AlphaMode,
    ) -> CanvasResult<Box<dyn NativeSwapChain>> {
        let swap_chain = SoftwareSwapChain::new(width, height, format, buffer_count, alpha_mode)?;
        Ok(Box::new(swap_chain))
    }

    fn create_device_context(
        &self,
        options: DeviceContextOptions,
    ) -> CanvasResult<Box<dyn DeviceContext>> {
        // Software contexts rasterize on the calling thread only
        if options.contains(DeviceContextOptions::ENABLE_MULTITHREADED_OPTIMIZATIONS) {
            return Err(CanvasError::native("CreateDeviceContext", ErrorCode::NotImplemented));
        }
        self.contexts_created.set(self.contexts_created.get() + 1);
        Ok(Box::new(SoftwareContext::default()))
    }

    fn dpi(&self) -> f32 {
        self.dpi
    }
}

/// One swap chain buffer
#[derive(Debug)]
pub struct SoftwareSurface {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: RefCell<Vec<[u8; 4]>>,
}

impl SoftwareSurface {
    fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        operation: &'static str,
    ) -> CanvasResult<Self> {
        let out_of_memory = || CanvasError::native(operation, ErrorCode::OutOfMemory);
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(out_of_memory());
        }

        let len = (width as usize).checked_mul(height as usize).ok_or_else(out_of_memory)?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| out_of_memory())?;
        pixels.resize(len, [0; 4]);
        Ok(Self { width, height, format, pixels: RefCell::new(pixels) })
    }

    /// Raw pixel at (`x`, `y`) in the surface's channel order
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.borrow().get((y * self.width + x) as usize).copied()
    }

    fn fill(&self, pixel: [u8; 4]) {
        self.pixels.borrow_mut().fill(pixel);
    }

    /// Copy the surface into an RGBA image
    pub fn to_rgba_image(&self) -> RgbaImage {
        let pixels = self.pixels.borrow();
        let bgra = self.format.is_bgra();
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let [c0, c1, c2, a] = pixels[(y * self.width + x) as usize];
            if bgra {
                Rgba([c2, c1, c0, a])
            } else {
                Rgba([c0, c1, c2, a])
            }
        })
    }
}

impl Surface for SoftwareSurface {
    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// Swap chain whose buffers live in CPU memory
#[derive(Debug)]
pub struct SoftwareSwapChain {
    width: i32,
    height: i32,
    format: PixelFormat,
    alpha_mode: AlphaMode,
    buffers: Vec<Rc<SoftwareSurface>>,
    present_count: usize,
}

impl SoftwareSwapChain {
    /// Allocate `buffer_count` buffers of `width` x `height`
    pub fn new(
        width: i32,
        height: i32,
        format: PixelFormat,
        buffer_count: i32,
        alpha_mode: AlphaMode,
    ) -> CanvasResult<Self> {
        check_format(format, "CreateSwapChain")?;
        let buffers = allocate_buffers(buffer_count, width, height, format, "CreateSwapChain")?;
        log::debug!("Allocated {buffer_count} software buffers of {width}x{height}");
        Ok(Self { width, height, format, alpha_mode, buffers, present_count: 0 })
    }

    /// Number of frames presented
    pub const fn present_count(&self) -> usize {
        self.present_count
    }

    /// Last presented buffer as an RGBA image, `None` before the first present
    pub fn front_buffer_image(&self) -> Option<RgbaImage> {
        if self.present_count == 0 {
            return None;
        }
        self.buffers.last().map(|buffer| buffer.to_rgba_image())
    }
}

impl NativeSwapChain for SoftwareSwapChain {
    fn description(&self) -> CanvasResult<SwapChainDescription> {
        Ok(SwapChainDescription {
            width: self.width,
            height: self.height,
            format: self.format.to_native(),
            buffer_count: self.buffers.len() as i32,
            alpha_mode: self.alpha_mode.to_native(),
        })
    }

    fn resize_buffers(
        &mut self,
        buffer_count: i32,
        width: i32,
        height: i32,
        format: u32,
        flags: SwapChainFlags,
    ) -> CanvasResult<()> {
        if flags.contains(SwapChainFlags::GDI_COMPATIBLE) {
            return Err(CanvasError::native("ResizeBuffers", ErrorCode::NotImplemented));
        }
        if self.buffers.iter().any(|buffer| Rc::strong_count(buffer) > 1) {
            log::warn!("Resize refused while a back buffer is referenced");
            return Err(CanvasError::native("ResizeBuffers", ErrorCode::InvalidCall));
        }

        let format = match PixelFormat::from_native(format) {
            Ok(PixelFormat::Unknown) => self.format,
            Ok(format) => format,
            Err(_) => {
                return Err(CanvasError::native("ResizeBuffers", ErrorCode::InvalidArgument))
            }
        };
        check_format(format, "ResizeBuffers")?;
        let buffer_count =
            if buffer_count == 0 { self.buffers.len() as i32 } else { buffer_count };

        self.buffers = allocate_buffers(buffer_count, width, height, format, "ResizeBuffers")?;
        self.width = width;
        self.height = height;
        self.format = format;
        Ok(())
    }

    fn present(
        &mut self,
        sync_interval: u32,
        flags: PresentFlags,
        _parameters: &PresentParameters,
    ) -> CanvasResult<()> {
        if sync_interval > MAX_SYNC_INTERVAL {
            return Err(CanvasError::native("Present", ErrorCode::InvalidCall));
        }
        if flags.contains(PresentFlags::TEST) {
            return Ok(());
        }

        self.buffers.rotate_left(1);
        self.present_count += 1;
        log::trace!("Presented software frame {}", self.present_count);
        Ok(())
    }

    fn back_buffer(&self, index: u32) -> CanvasResult<Rc<dyn Surface>> {
        let buffer = self
            .buffers
            .get(index as usize)
            .ok_or(CanvasError::native("GetBuffer", ErrorCode::InvalidCall))?;
        Ok(Rc::clone(buffer) as Rc<dyn Surface>)
    }
}

fn check_format(format: PixelFormat, operation: &'static str) -> CanvasResult<()> {
    if format.is_8bit_four_channel() {
        Ok(())
    } else {
        Err(CanvasError::native(operation, ErrorCode::NotImplemented))
    }
}

fn allocate_buffers(
    buffer_count: i32,
    width: i32,
    height: i32,
    format: PixelFormat,
    operation: &'static str,
) -> CanvasResult<Vec<Rc<SoftwareSurface>>> {
    let (Ok(count), Ok(width), Ok(height)) =
        (u32::try_from(buffer_count), u32::try_from(width), u32::try_from(height))
    else {
        return Err(CanvasError::native(operation, ErrorCode::InvalidCall));
    };
    if count == 0 || width == 0 || height == 0 {
        return Err(CanvasError::native(operation, ErrorCode::InvalidCall));
    }
    (0..count)
        .map(|_| SoftwareSurface::new(width, height, format, operation).map(Rc::new))
        .collect()
}

/// Target bitmap over a [`SoftwareSurface`]
#[derive(Debug)]
pub struct SoftwareTarget {
    surface: Rc<SoftwareSurface>,
    properties: BitmapProperties,
}

impl SoftwareTarget {
    /// Surface the target renders into
    pub const fn surface(&self) -> &Rc<SoftwareSurface> {
        &self.surface
    }

    fn encode(&self, color: Color) -> [u8; 4] {
        let color = match self.properties.alpha_mode {
            AlphaMode::Premultiplied => color.premultiplied(),
            AlphaMode::Ignore => Color { a: u8::MAX, ..color },
            AlphaMode::Straight | AlphaMode::Unspecified => color,
        };
        if self.properties.format.is_bgra() {
            [color.b, color.g, color.r, color.a]
        } else {
            [color.r, color.g, color.b, color.a]
        }
    }
}

impl TargetBitmap for SoftwareTarget {
    fn properties(&self) -> &BitmapProperties {
        &self.properties
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Device context rasterizing on the CPU
#[derive(Default)]
pub struct SoftwareContext {
    target: Option<Rc<dyn TargetBitmap>>,
    drawing: bool,
}

impl SoftwareContext {
    fn software_target(&self) -> CanvasResult<&SoftwareTarget> {
        self.target
            .as_ref()
            .and_then(|target| target.as_any().downcast_ref::<SoftwareTarget>())
            .ok_or(CanvasError::native("Clear", ErrorCode::InvalidCall))
    }
}

impl DeviceContext for SoftwareContext {
    fn create_bitmap_from_surface(
        &mut self,
        surface: Rc<dyn Surface>,
        properties: &BitmapProperties,
    ) -> CanvasResult<Rc<dyn TargetBitmap>> {
        let invalid = || CanvasError::native("CreateBitmapFromSurface", ErrorCode::InvalidArgument);
        let surface = surface.into_any().downcast::<SoftwareSurface>().map_err(|_| invalid())?;
        if properties.format != surface.format
            || !properties.options.contains(BitmapOptions::TARGET)
        {
            return Err(invalid());
        }
        Ok(Rc::new(SoftwareTarget { surface, properties: properties.clone() }))
    }

    fn set_target(&mut self, target: Rc<dyn TargetBitmap>) -> CanvasResult<()> {
        if !target.as_any().is::<SoftwareTarget>() {
            return Err(CanvasError::native("SetTarget", ErrorCode::InvalidArgument));
        }
        self.target = Some(target);
        Ok(())
    }

    fn begin_draw(&mut self) {
        self.drawing = true;
    }

    fn clear(&mut self, color: Color) -> CanvasResult<()> {
        if !self.drawing {
            return Err(CanvasError::native("Clear", ErrorCode::InvalidCall));
        }
        let target = self.software_target()?;
        target.surface.fill(target.encode(color));
        Ok(())
    }

    fn end_draw(&mut self) -> CanvasResult<()> {
        if !std::mem::take(&mut self.drawing) {
            return Err(CanvasError::native("EndDraw", ErrorCode::InvalidCall));
        }
        Ok(())
    }
}
