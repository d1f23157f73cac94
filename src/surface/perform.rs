use crate::foundation::error::{SurfaceError, SurfaceResult};
use crate::foundation::format::Usage;
use crate::foundation::geometry::Rect;

/// Id of a rendering API that can own a surface's dequeue/queue path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProducerApi(pub i32);

impl ProducerApi {
    /// The GL/EGL producer, the only one a surface accepts.
    pub const EGL: Self = Self(1);
}

/// Raw operation tags accepted by [`PerformRequest::decode`].
pub mod perform_tag {
    /// [`super::PerformRequest::SetUsage`].
    pub const SET_USAGE: i32 = 0;
    /// [`super::PerformRequest::Connect`].
    pub const CONNECT: i32 = 1;
    /// [`super::PerformRequest::Disconnect`].
    pub const DISCONNECT: i32 = 2;
    /// [`super::PerformRequest::SetCrop`].
    pub const SET_CROP: i32 = 3;
    /// [`super::PerformRequest::SetBufferCount`].
    pub const SET_BUFFER_COUNT: i32 = 4;
    /// [`super::PerformRequest::SetBuffersGeometry`].
    pub const SET_BUFFERS_GEOMETRY: i32 = 5;
}

/// A configuration request for a surface, decoded from the native-window boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerformRequest {
    /// Usage for future allocations.
    SetUsage(Usage),
    /// Claim the surface for a producer.
    Connect(ProducerApi),
    /// Release the surface from a producer.
    Disconnect(ProducerApi),
    /// Crop applied to the next queued buffer.
    SetCrop(Rect),
    /// Resize the slot ring.
    SetBufferCount(usize),
    /// Geometry for future allocations. Kept signed so bad values reach validation.
    SetBuffersGeometry {
        /// Width, `0` for the surface default.
        width: i32,
        /// Height, `0` for the surface default.
        height: i32,
        /// Raw pixel format code.
        format: i32,
    },
}

impl PerformRequest {
    /// Decode a raw tag and its integer arguments.
    ///
    /// Unknown tags fail with `NotFound`; missing or out-of-range arguments with
    /// `InvalidArgument`.
    pub fn decode(tag: i32, args: &[i64]) -> SurfaceResult<Self> {
        let arg = |i: usize| -> SurfaceResult<i32> {
            let raw = *args.get(i).ok_or_else(|| {
                SurfaceError::invalid_argument(format!("perform {tag}: missing argument {i}"))
            })?;
            i32::try_from(raw).map_err(|_| {
                SurfaceError::invalid_argument(format!("perform {tag}: argument {i} out of range"))
            })
        };

        match tag {
            perform_tag::SET_USAGE => Ok(Self::SetUsage(Usage::from_bits_retain(arg(0)? as u32))),
            perform_tag::CONNECT => Ok(Self::Connect(ProducerApi(arg(0)?))),
            perform_tag::DISCONNECT => Ok(Self::Disconnect(ProducerApi(arg(0)?))),
            perform_tag::SET_CROP => Ok(Self::SetCrop(Rect::new(
                arg(0)?,
                arg(1)?,
                arg(2)?,
                arg(3)?,
            ))),
            perform_tag::SET_BUFFER_COUNT => {
                let count = usize::try_from(arg(0)?).map_err(|_| {
                    SurfaceError::invalid_argument("buffer count must not be negative")
                })?;
                Ok(Self::SetBufferCount(count))
            }
            perform_tag::SET_BUFFERS_GEOMETRY => Ok(Self::SetBuffersGeometry {
                width: arg(0)?,
                height: arg(1)?,
                format: arg(2)?,
            }),
            other => Err(SurfaceError::not_found(format!("unknown perform operation {other}"))),
        }
    }
}

/// Values a surface answers through [`crate::NativeWindow::query`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NativeQuery {
    /// Current width.
    Width,
    /// Current height.
    Height,
    /// Pixel format code.
    Format,
}

impl NativeQuery {
    /// Decode a raw query key.
    pub fn from_raw(what: i32) -> SurfaceResult<Self> {
        match what {
            0 => Ok(Self::Width),
            1 => Ok(Self::Height),
            2 => Ok(Self::Format),
            other => Err(SurfaceError::invalid_argument(format!("unknown query {other}"))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/perform.rs"]
mod tests;
