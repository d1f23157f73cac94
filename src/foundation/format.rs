use bitflags::bitflags;

/// Pixel format code as exchanged with the compositor.
///
/// Kept as an open integer code: `0` means "let the compositor pick" and unknown codes are
/// passed through untouched.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct PixelFormat(pub i32);

impl PixelFormat {
    /// No explicit format; the compositor chooses.
    pub const UNSPECIFIED: Self = Self(0);
    /// 32-bit RGBA.
    pub const RGBA_8888: Self = Self(1);
    /// 32-bit RGB, alpha ignored.
    pub const RGBX_8888: Self = Self(2);
    /// Packed 24-bit RGB.
    pub const RGB_888: Self = Self(3);
    /// 16-bit RGB 5:6:5.
    pub const RGB_565: Self = Self(4);
    /// 32-bit BGRA.
    pub const BGRA_8888: Self = Self(5);
    /// 16-bit RGBA 5:5:5:1.
    pub const RGBA_5551: Self = Self(6);
    /// 16-bit RGBA 4:4:4:4.
    pub const RGBA_4444: Self = Self(7);
    /// 8-bit alpha.
    pub const A_8: Self = Self(8);
    /// 8-bit luminance.
    pub const L_8: Self = Self(9);
    /// 16-bit luminance + alpha.
    pub const LA_88: Self = Self(0xA);
    /// 8-bit RGB 3:3:2.
    pub const RGB_332: Self = Self(0xB);

    /// Bytes per pixel, `None` for unspecified or unknown codes.
    pub fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            Self::RGBA_8888 | Self::RGBX_8888 | Self::BGRA_8888 => Some(4),
            Self::RGB_888 => Some(3),
            Self::RGB_565 | Self::RGBA_5551 | Self::RGBA_4444 | Self::LA_88 => Some(2),
            Self::A_8 | Self::L_8 | Self::RGB_332 => Some(1),
            _ => None,
        }
    }
}

bitflags! {
    /// Buffer usage bits requested at allocation and carried by every buffer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct Usage: u32 {
        /// CPU reads, rarely.
        const SW_READ_RARELY = 0x0000_0002;
        /// CPU reads, often.
        const SW_READ_OFTEN = 0x0000_0003;
        /// CPU writes, rarely.
        const SW_WRITE_RARELY = 0x0000_0020;
        /// CPU writes, often.
        const SW_WRITE_OFTEN = 0x0000_0030;
        /// Sampled as a GPU texture.
        const HW_TEXTURE = 0x0000_0100;
        /// Rendered into by the GPU.
        const HW_RENDER = 0x0000_0200;
        /// Used by a 2D blitter.
        const HW_2D = 0x0000_0400;
        /// Scanned out by the framebuffer.
        const HW_FB = 0x0000_1000;

        const _ = !0;
    }
}

impl Usage {
    /// What the software render cycle asks for.
    pub const SW_READ_WRITE_OFTEN: Self = Self::SW_READ_OFTEN.union(Self::SW_WRITE_OFTEN);
}

bitflags! {
    /// Surface creation flags fixed when the remote surface is created.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct SurfaceFlags: u32 {
        /// Created hidden.
        const HIDDEN = 0x0000_0004;
        /// Back buffer contents are undefined after a post; disables copy-back.
        const DESTROY_BACKBUFFER = 0x0000_0020;
        /// Contents must not be captured.
        const SECURE = 0x0000_0080;
        /// Pixels are not premultiplied.
        const NON_PREMULTIPLIED = 0x0000_0100;
        /// Buffers are pushed by the compositor side; no client-side dequeue/queue.
        const PUSH_BUFFERS = 0x0000_0200;

        const _ = !0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/format.rs"]
mod tests;
