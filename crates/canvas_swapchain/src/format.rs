//! Typed pixel formats and alpha modes with their native encodings
//!
//! Native swap chains describe themselves with compact numeric codes: the
//! DXGI format number and the swap chain alpha mode number. The typed enums
//! here are what callers see; translation in both directions is one-to-one
//! and any native code without a typed counterpart is an error rather than a
//! silent fallback.

use crate::error::{CanvasError, CanvasResult};
use serde::{Deserialize, Serialize};

/// Pixel format of swap chain buffers
///
/// Discriminants are the native format codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum PixelFormat {
    /// Format not known
    Unknown = 0,
    /// 128-bit float RGBA
    R32G32B32A32Float = 2,
    /// 128-bit unsigned integer RGBA
    R32G32B32A32UInt = 3,
    /// 64-bit float RGBA
    R16G16B16A16Float = 10,
    /// 64-bit unsigned normalized RGBA
    R16G16B16A16UIntNormalized = 11,
    /// 64-bit unsigned integer RGBA
    R16G16B16A16UInt = 12,
    /// 10 bits per color channel, 2 bits alpha
    R10G10B10A2UIntNormalized = 24,
    /// 32-bit unsigned normalized RGBA
    R8G8B8A8UIntNormalized = 28,
    /// 32-bit unsigned normalized RGBA, sRGB encoded
    R8G8B8A8UIntNormalizedSrgb = 29,
    /// 32-bit unsigned integer RGBA
    R8G8B8A8UInt = 30,
    /// 16-bit float single channel
    R16Float = 54,
    /// 8-bit unsigned normalized single channel
    R8UIntNormalized = 61,
    /// 8-bit alpha only
    A8UIntNormalized = 65,
    /// Block compressed BC1
    BC1UIntNormalized = 71,
    /// Block compressed BC2
    BC2UIntNormalized = 74,
    /// Block compressed BC3
    BC3UIntNormalized = 77,
    /// 32-bit unsigned normalized BGRA
    B8G8R8A8UIntNormalized = 87,
    /// 32-bit unsigned normalized BGR with unused padding byte
    B8G8R8X8UIntNormalized = 88,
    /// 32-bit unsigned normalized BGRA, sRGB encoded
    B8G8R8A8UIntNormalizedSrgb = 91,
    /// 32-bit unsigned normalized BGR with padding, sRGB encoded
    B8G8R8X8UIntNormalizedSrgb = 93,
}

impl PixelFormat {
    /// Native format code
    pub const fn to_native(self) -> u32 {
        self as u32
    }

    /// Translate a native format code
    pub fn from_native(code: u32) -> CanvasResult<Self> {
        let format = match code {
            0 => Self::Unknown,
            2 => Self::R32G32B32A32Float,
            3 => Self::R32G32B32A32UInt,
            10 => Self::R16G16B16A16Float,
            11 => Self::R16G16B16A16UIntNormalized,
            12 => Self::R16G16B16A16UInt,
            24 => Self::R10G10B10A2UIntNormalized,
            28 => Self::R8G8B8A8UIntNormalized,
            29 => Self::R8G8B8A8UIntNormalizedSrgb,
            30 => Self::R8G8B8A8UInt,
            54 => Self::R16Float,
            61 => Self::R8UIntNormalized,
            65 => Self::A8UIntNormalized,
            71 => Self::BC1UIntNormalized,
            74 => Self::BC2UIntNormalized,
            77 => Self::BC3UIntNormalized,
            87 => Self::B8G8R8A8UIntNormalized,
            88 => Self::B8G8R8X8UIntNormalized,
            91 => Self::B8G8R8A8UIntNormalizedSrgb,
            93 => Self::B8G8R8X8UIntNormalizedSrgb,
            other => return Err(CanvasError::UnsupportedFormat(other)),
        };
        Ok(format)
    }

    /// Whether pixels are stored blue-first
    pub const fn is_bgra(self) -> bool {
        matches!(
            self,
            Self::B8G8R8A8UIntNormalized
                | Self::B8G8R8X8UIntNormalized
                | Self::B8G8R8A8UIntNormalizedSrgb
                | Self::B8G8R8X8UIntNormalizedSrgb
        )
    }

    /// Whether each pixel is four 8-bit channels
    pub const fn is_8bit_four_channel(self) -> bool {
        self.is_bgra()
            || matches!(
                self,
                Self::R8G8B8A8UIntNormalized | Self::R8G8B8A8UIntNormalizedSrgb | Self::R8G8B8A8UInt
            )
    }
}

impl TryFrom<u32> for PixelFormat {
    type Error = CanvasError;

    fn try_from(code: u32) -> CanvasResult<Self> {
        Self::from_native(code)
    }
}

/// How a surface's alpha channel is interpreted
///
/// Discriminants are the native swap chain alpha mode codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum AlphaMode {
    /// Left to the backend
    Unspecified = 0,
    /// Color channels are premultiplied by alpha
    Premultiplied = 1,
    /// Color channels are independent of alpha
    Straight = 2,
    /// Alpha is ignored and treated as opaque
    Ignore = 3,
}

impl AlphaMode {
    /// Native alpha mode code
    pub const fn to_native(self) -> u32 {
        self as u32
    }

    /// Translate a native alpha mode code
    pub fn from_native(code: u32) -> CanvasResult<Self> {
        match code {
            0 => Ok(Self::Unspecified),
            1 => Ok(Self::Premultiplied),
            2 => Ok(Self::Straight),
            3 => Ok(Self::Ignore),
            other => Err(CanvasError::UnsupportedAlphaMode(other)),
        }
    }
}

impl TryFrom<u32> for AlphaMode {
    type Error = CanvasError;

    fn try_from(code: u32) -> CanvasResult<Self> {
        Self::from_native(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_FORMATS: [PixelFormat; 20] = [
        PixelFormat::Unknown,
        PixelFormat::R32G32B32A32Float,
        PixelFormat::R32G32B32A32UInt,
        PixelFormat::R16G16B16A16Float,
        PixelFormat::R16G16B16A16UIntNormalized,
        PixelFormat::R16G16B16A16UInt,
        PixelFormat::R10G10B10A2UIntNormalized,
        PixelFormat::R8G8B8A8UIntNormalized,
        PixelFormat::R8G8B8A8UIntNormalizedSrgb,
        PixelFormat::R8G8B8A8UInt,
        PixelFormat::R16Float,
        PixelFormat::R8UIntNormalized,
        PixelFormat::A8UIntNormalized,
        PixelFormat::BC1UIntNormalized,
        PixelFormat::BC2UIntNormalized,
        PixelFormat::BC3UIntNormalized,
        PixelFormat::B8G8R8A8UIntNormalized,
        PixelFormat::B8G8R8X8UIntNormalized,
        PixelFormat::B8G8R8A8UIntNormalizedSrgb,
        PixelFormat::B8G8R8X8UIntNormalizedSrgb,
    ];

    #[test]
    fn test_format_translation_is_one_to_one() {
        for format in ALL_FORMATS {
            assert_eq!(PixelFormat::from_native(format.to_native()).unwrap(), format);
        }
    }

    #[test]
    fn test_known_native_codes() {
        assert_eq!(PixelFormat::R16G16B16A16UIntNormalized.to_native(), 11);
        assert_eq!(PixelFormat::R8G8B8A8UIntNormalized.to_native(), 28);
        assert_eq!(PixelFormat::B8G8R8A8UIntNormalized.to_native(), 87);
        assert_eq!(PixelFormat::B8G8R8A8UIntNormalizedSrgb.to_native(), 91);
    }

    #[test]
    fn test_unknown_format_code_is_rejected() {
        let err = PixelFormat::try_from(9999).unwrap_err();
        assert!(matches!(err, CanvasError::UnsupportedFormat(9999)));
    }

    #[test]
    fn test_alpha_mode_codes() {
        assert_eq!(AlphaMode::from_native(0).unwrap(), AlphaMode::Unspecified);
        assert_eq!(AlphaMode::from_native(1).unwrap(), AlphaMode::Premultiplied);
        assert_eq!(AlphaMode::from_native(2).unwrap(), AlphaMode::Straight);
        assert_eq!(AlphaMode::from_native(3).unwrap(), AlphaMode::Ignore);
        assert!(matches!(AlphaMode::try_from(4), Err(CanvasError::UnsupportedAlphaMode(4))));
    }

    #[test]
    fn test_eight_bit_layouts() {
        assert!(PixelFormat::B8G8R8A8UIntNormalized.is_bgra());
        assert!(PixelFormat::R8G8B8A8UIntNormalized.is_8bit_four_channel());
        assert!(!PixelFormat::R8G8B8A8UIntNormalized.is_bgra());
        assert!(!PixelFormat::R16G16B16A16UIntNormalized.is_8bit_four_channel());
    }
}
