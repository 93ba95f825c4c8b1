//! Swap chain entity
//!
//! [`CanvasSwapChain`] owns a native swap chain exclusively and keeps its
//! device alive. It moves one way from open to closed; once closed, every
//! operation except [`close`](CanvasSwapChain::close) fails with
//! [`CanvasError::Closed`] without touching native state.
//!
//! Properties are not cached. Each getter reads a fresh
//! [`SwapChainDescription`] from the native resource, which stays the single
//! source of truth across resizes.

use std::fmt;
use std::rc::Rc;

use crate::backend::{
    CanvasDevice, NativeSwapChain, PresentFlags, PresentParameters, SwapChainDescription,
    SwapChainFlags,
};
use crate::error::{CanvasError, CanvasResult};
use crate::format::{AlphaMode, PixelFormat};
use crate::foundation::Color;
use crate::session::{DrawingSession, DrawingSessionFactory};

/// Vertical blanks to wait for on present
const PRESENT_SYNC_INTERVAL: u32 = 1;

enum SwapChainState {
    Open {
        device: Rc<dyn CanvasDevice>,
        resource: Box<dyn NativeSwapChain>,
    },
    Closed,
}

/// Presentable multi-buffered rendering surface bound to a device
///
/// Created by [`SwapChainManager`](crate::SwapChainManager). Dropping an
/// open swap chain closes it.
pub struct CanvasSwapChain {
    state: SwapChainState,
    session_factory: Rc<dyn DrawingSessionFactory>,
}

impl CanvasSwapChain {
    pub(crate) fn new(
        device: Rc<dyn CanvasDevice>,
        resource: Box<dyn NativeSwapChain>,
        session_factory: Rc<dyn DrawingSessionFactory>,
    ) -> Self {
        Self {
            state: SwapChainState::Open { device, resource },
            session_factory,
        }
    }

    fn open_resource(&self) -> CanvasResult<(&Rc<dyn CanvasDevice>, &dyn NativeSwapChain)> {
        match &self.state {
            SwapChainState::Open { device, resource } => Ok((device, resource.as_ref())),
            SwapChainState::Closed => Err(CanvasError::Closed),
        }
    }

    fn open_resource_mut(&mut self) -> CanvasResult<&mut (dyn NativeSwapChain + 'static)> {
        match &mut self.state {
            SwapChainState::Open { resource, .. } => Ok(resource.as_mut()),
            SwapChainState::Closed => Err(CanvasError::Closed),
        }
    }

    fn description(&self) -> CanvasResult<SwapChainDescription> {
        let (_, resource) = self.open_resource()?;
        resource.description()
    }

    /// Buffer width in pixels
    pub fn width(&self) -> CanvasResult<i32> {
        Ok(self.description()?.width)
    }

    /// Buffer height in pixels
    pub fn height(&self) -> CanvasResult<i32> {
        Ok(self.description()?.height)
    }

    /// Pixel format of the buffers
    pub fn format(&self) -> CanvasResult<PixelFormat> {
        PixelFormat::from_native(self.description()?.format)
    }

    /// Number of buffers in rotation
    pub fn buffer_count(&self) -> CanvasResult<i32> {
        Ok(self.description()?.buffer_count)
    }

    /// Alpha treatment of the buffers
    pub fn alpha_mode(&self) -> CanvasResult<AlphaMode> {
        AlphaMode::from_native(self.description()?.alpha_mode)
    }

    /// Device the swap chain was created on
    pub fn device(&self) -> CanvasResult<Rc<dyn CanvasDevice>> {
        let (device, _) = self.open_resource()?;
        Ok(Rc::clone(device))
    }

    /// Reallocate the buffers
    ///
    /// Arguments go to the native resource as they are; range checks are the
    /// backend's concern.
    pub fn resize_buffers(
        &mut self,
        buffer_count: i32,
        width: i32,
        height: i32,
        format: PixelFormat,
    ) -> CanvasResult<()> {
        let resource = self.open_resource_mut()?;
        log::debug!("Resizing swap chain buffers to {width}x{height} x{buffer_count} ({format:?})");
        let native_format = format.to_native();
        resource.resize_buffers(buffer_count, width, height, native_format, SwapChainFlags::empty())
    }

    /// Present the current back buffer, whole frame, synchronized to the
    /// next vertical blank
    pub fn present(&mut self) -> CanvasResult<()> {
        let resource = self.open_resource_mut()?;
        log::trace!("Presenting swap chain");
        let parameters = PresentParameters::full_frame();
        resource.present(PRESENT_SYNC_INTERVAL, PresentFlags::empty(), &parameters)
    }

    /// Open a drawing session on the current back buffer, cleared to
    /// `clear_color`
    pub fn create_drawing_session(&self, clear_color: Color) -> CanvasResult<DrawingSession> {
        let (device, resource) = self.open_resource()?;
        self.session_factory.create(device, resource, clear_color)
    }

    /// Release the native resource and the device
    ///
    /// Idempotent.
    pub fn close(&mut self) {
        let previous = std::mem::replace(&mut self.state, SwapChainState::Closed);
        if let SwapChainState::Open { .. } = previous {
            log::debug!("Swap chain closed");
        }
    }

    /// Whether [`close`](Self::close) has run
    pub const fn is_closed(&self) -> bool {
        matches!(self.state, SwapChainState::Closed)
    }
}

impl Drop for CanvasSwapChain {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for CanvasSwapChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasSwapChain").field("closed", &self.is_closed()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::tests::mocks::{Call, MockDevice, MockSessionFactory, MockState};

    type OpenChain = (CanvasSwapChain, Rc<dyn CanvasDevice>, Rc<MockSessionFactory>);

    fn open_chain(state: &Rc<MockState>) -> OpenChain {
        let device: Rc<dyn CanvasDevice> = Rc::new(MockDevice::new(state));
        let factory = Rc::new(MockSessionFactory::new(state));
        let format = PixelFormat::B8G8R8A8UIntNormalized;
        let resource = device
            .create_swap_chain_resource(1, 1, format, 2, AlphaMode::Premultiplied)
            .unwrap();
        let chain = CanvasSwapChain::new(Rc::clone(&device), resource, factory.clone());
        (chain, device, factory)
    }

    #[test]
    fn test_getters_translate_description() {
        let state = MockState::new();
        let (chain, _, _) = open_chain(&state);
        state.set_description(SwapChainDescription {
            width: 123,
            height: 456,
            format: PixelFormat::R16G16B16A16UIntNormalized.to_native(),
            buffer_count: 5,
            alpha_mode: AlphaMode::Ignore.to_native(),
        });

        assert_eq!(chain.width().unwrap(), 123);
        assert_eq!(chain.height().unwrap(), 456);
        assert_eq!(chain.format().unwrap(), PixelFormat::R16G16B16A16UIntNormalized);
        assert_eq!(chain.buffer_count().unwrap(), 5);
        assert_eq!(chain.alpha_mode().unwrap(), AlphaMode::Ignore);
    }

    #[test]
    fn test_getters_requery_native_resource() {
        let state = MockState::new();
        let (chain, _, _) = open_chain(&state);

        state.set_description(SwapChainDescription { width: 10, ..Default::default() });
        assert_eq!(chain.width().unwrap(), 10);
        state.set_description(SwapChainDescription { width: 20, ..Default::default() });
        assert_eq!(chain.width().unwrap(), 20);

        let describes = state.calls().iter().filter(|c| **c == Call::Describe).count();
        assert_eq!(describes, 2);
    }

    #[test]
    fn test_getter_describe_failure_propagates_verbatim() {
        let state = MockState::new();
        let (chain, _, _) = open_chain(&state);
        state.fail("Describe", ErrorCode::DeviceRemoved);

        assert_eq!(chain.width().unwrap_err().code(), ErrorCode::DeviceRemoved);
        assert_eq!(chain.format().unwrap_err().code(), ErrorCode::DeviceRemoved);
        assert_eq!(chain.alpha_mode().unwrap_err().code(), ErrorCode::DeviceRemoved);
        assert!(!chain.is_closed());
    }

    #[test]
    fn test_device_is_owning_device() {
        let state = MockState::new();
        let (chain, device, _) = open_chain(&state);

        assert!(Rc::ptr_eq(&chain.device().unwrap(), &device));
    }

    #[test]
    fn test_resize_buffers_forwards_once() {
        let state = MockState::new();
        let (mut chain, _, _) = open_chain(&state);
        state.clear_calls();

        chain.resize_buffers(3, 555, 666, PixelFormat::R8G8B8A8UIntNormalized).unwrap();

        assert_eq!(
            state.calls(),
            vec![Call::ResizeBuffers {
                buffer_count: 3,
                width: 555,
                height: 666,
                format: PixelFormat::R8G8B8A8UIntNormalized.to_native(),
                flags: SwapChainFlags::empty(),
            }]
        );
    }

    #[test]
    fn test_resize_buffers_does_not_validate() {
        let state = MockState::new();
        let (mut chain, _, _) = open_chain(&state);
        state.clear_calls();

        chain.resize_buffers(0, -1, 0, PixelFormat::Unknown).unwrap();

        assert_eq!(state.calls().len(), 1);
    }

    #[test]
    fn test_resize_failure_propagates_verbatim() {
        let state = MockState::new();
        let (mut chain, _, _) = open_chain(&state);
        state.fail("ResizeBuffers", ErrorCode::Failed(-42));

        let err = chain.resize_buffers(2, 1, 1, PixelFormat::B8G8R8A8UIntNormalized).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Failed(-42));
        assert!(!chain.is_closed());
    }

    #[test]
    fn test_present_forwards_full_frame() {
        let state = MockState::new();
        let (mut chain, _, _) = open_chain(&state);
        state.clear_calls();

        chain.present().unwrap();

        assert_eq!(
            state.calls(),
            vec![Call::Present {
                sync_interval: 1,
                flags: PresentFlags::empty(),
                parameters: PresentParameters {
                    dirty_rects: vec![],
                    scroll_rect: None,
                    scroll_offset: None,
                },
            }]
        );
    }

    #[test]
    fn test_present_failure_propagates_verbatim() {
        let state = MockState::new();
        let (mut chain, _, _) = open_chain(&state);
        state.fail("Present", ErrorCode::DeviceRemoved);

        let err = chain.present().unwrap_err();
        assert_eq!(err.code(), ErrorCode::DeviceRemoved);
        assert!(!chain.is_closed());
    }

    #[test]
    fn test_create_drawing_session_uses_own_device_and_resource() {
        let state = MockState::new();
        let (chain, device, factory) = open_chain(&state);
        let color = Color::from_argb(255, 10, 20, 30);

        let session = chain.create_drawing_session(color).unwrap();
        assert!(!session.is_closed());

        let requests = factory.requests();
        assert_eq!(requests.len(), 1);
        assert!(std::ptr::addr_eq(requests[0].device, Rc::as_ptr(&device)));
        assert!(std::ptr::addr_eq(requests[0].swap_chain, state.created_swap_chains()[0]));
        assert_eq!(requests[0].clear_color, color);
    }

    #[test]
    fn test_create_drawing_session_propagates_factory_failure() {
        let state = MockState::new();
        let (chain, _, _) = open_chain(&state);
        state.fail("CreateDrawingSession", ErrorCode::NotImplemented);

        let err = chain.create_drawing_session(Color::BLACK).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotImplemented);
    }

    #[test]
    fn test_closed_chain_rejects_every_operation() {
        let state = MockState::new();
        let (mut chain, _, factory) = open_chain(&state);
        chain.close();
        state.clear_calls();

        assert!(matches!(chain.width(), Err(CanvasError::Closed)));
        assert!(matches!(chain.height(), Err(CanvasError::Closed)));
        assert!(matches!(chain.format(), Err(CanvasError::Closed)));
        assert!(matches!(chain.buffer_count(), Err(CanvasError::Closed)));
        assert!(matches!(chain.alpha_mode(), Err(CanvasError::Closed)));
        assert!(matches!(chain.device(), Err(CanvasError::Closed)));
        assert!(matches!(
            chain.resize_buffers(2, 2, 2, PixelFormat::B8G8R8A8UIntNormalized),
            Err(CanvasError::Closed)
        ));
        assert!(matches!(chain.present(), Err(CanvasError::Closed)));
        assert!(matches!(chain.create_drawing_session(Color::BLACK), Err(CanvasError::Closed)));

        assert!(state.calls().is_empty());
        assert!(factory.requests().is_empty());
    }

    #[test]
    fn test_close_is_idempotent() {
        let state = MockState::new();
        let (mut chain, _, _) = open_chain(&state);

        chain.close();
        chain.close();
        chain.close();

        assert!(chain.is_closed());
    }

    #[test]
    fn test_close_releases_resource_and_device() {
        let state = MockState::new();
        let (mut chain, device, _) = open_chain(&state);
        assert_eq!(Rc::strong_count(&device), 2);
        assert_eq!(state.live_swap_chains(), 1);

        chain.close();

        assert_eq!(Rc::strong_count(&device), 1);
        assert_eq!(state.live_swap_chains(), 0);
    }

    #[test]
    fn test_drop_closes() {
        let state = MockState::new();
        let (chain, device, _) = open_chain(&state);

        drop(chain);

        assert_eq!(Rc::strong_count(&device), 1);
        assert_eq!(state.live_swap_chains(), 0);
    }
}
