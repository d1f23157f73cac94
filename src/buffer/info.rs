use crate::buffer::graphic_buffer::GraphicBuffer;
use crate::foundation::format::{PixelFormat, Usage};

/// Parameters for a buffer allocation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferRequest {
    /// Requested width; `0` lets the compositor use the surface size.
    pub width: u32,
    /// Requested height; `0` lets the compositor use the surface size.
    pub height: u32,
    /// Requested format; [`PixelFormat::UNSPECIFIED`] lets the compositor choose.
    pub format: PixelFormat,
    /// Usage bits every buffer must carry.
    pub usage: Usage,
}

/// Negotiated geometry and usage for the buffers of one surface.
///
/// A geometry change marks the state dirty; the next [`BufferInfo::validate_buffer`] fails once
/// and clears it, which is what forces the slot buffer to be reallocated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferInfo {
    width: u32,
    height: u32,
    format: PixelFormat,
    usage: Usage,
    dirty: bool,
}

impl Default for BufferInfo {
    fn default() -> Self {
        Self::with_usage(Usage::HW_RENDER)
    }
}

impl BufferInfo {
    /// Clean state with no explicit geometry and the given usage.
    pub fn with_usage(usage: Usage) -> Self {
        Self {
            width: 0,
            height: 0,
            format: PixelFormat::UNSPECIFIED,
            usage,
            dirty: false,
        }
    }

    /// Update geometry; marks dirty only when any of the three values changes.
    pub fn set_geometry(&mut self, width: u32, height: u32, format: PixelFormat) {
        if self.width != width || self.height != height || self.format != format {
            self.width = width;
            self.height = height;
            self.format = format;
            self.dirty = true;
        }
    }

    /// Replace the requested usage. Never marks dirty.
    pub fn set_usage(&mut self, usage: Usage) {
        self.usage = usage;
    }

    /// Current allocation parameters.
    pub fn request(&self) -> BufferRequest {
        BufferRequest {
            width: self.width,
            height: self.height,
            format: self.format,
            usage: self.usage,
        }
    }

    /// Whether a geometry change is pending.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Decide whether `buffer` can be reused as is.
    ///
    /// Fails when a geometry change is pending, when there is no buffer, or when the buffer lacks
    /// one of the requested usage bits. Any failure clears the dirty flag.
    pub fn validate_buffer(&mut self, buffer: Option<&GraphicBuffer>) -> bool {
        let usable = buffer.is_some_and(|b| b.usage().contains(self.usage));
        if self.dirty || !usable {
            self.dirty = false;
            return false;
        }
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/info.rs"]
mod tests;
