use std::num::NonZeroU64;
use std::sync::Arc;

use crate::buffer::graphic_buffer::GraphicBuffer;
use crate::foundation::error::SurfaceResult;
use crate::foundation::format::{PixelFormat, Usage};
use crate::foundation::geometry::Region;
use crate::remote::shared::SharedBufferClient;

/// Per-client id of a surface on the compositor. Negative values are invalid.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct SurfaceToken(pub i32);

impl SurfaceToken {
    /// Token carried by invalid handles.
    pub const INVALID: Self = Self(-1);

    /// True for non-negative tokens.
    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

/// Identity of a remote capability, comparable across clones and across the process boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CapabilityId(pub NonZeroU64);

/// Surface description returned by the compositor when a surface is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceData {
    /// Client-local token.
    pub token: SurfaceToken,
    /// Version tag; changes whenever the compositor recreates the surface.
    pub identity: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel format.
    pub format: PixelFormat,
}

/// Connection to the compositor, shared by every surface of one client.
///
/// Commands are keyed by [`SurfaceToken`] and may be batched by the transport until
/// [`SurfaceComposerClient::flush_commands`] is called.
pub trait SurfaceComposerClient: Send + Sync {
    /// Capability identity of the connection.
    fn id(&self) -> CapabilityId;
    /// Whether the connection finished initializing.
    fn init_check(&self) -> SurfaceResult<()>;
    /// Attach to the shared slot state of `token`, `None` when the shared block is unavailable.
    fn shared_buffer_client(
        &self,
        token: SurfaceToken,
        buffer_count: usize,
        identity: u32,
    ) -> Option<Box<dyn SharedBufferClient>>;

    /// Destroy the surface.
    fn destroy_surface(&self, token: SurfaceToken) -> SurfaceResult<()>;
    /// Set the z-order layer.
    fn set_layer(&self, token: SurfaceToken, layer: i32) -> SurfaceResult<()>;
    /// Move the surface.
    fn set_position(&self, token: SurfaceToken, x: i32, y: i32) -> SurfaceResult<()>;
    /// Resize the surface.
    fn set_size(&self, token: SurfaceToken, width: u32, height: u32) -> SurfaceResult<()>;
    /// Hide the surface.
    fn hide(&self, token: SurfaceToken) -> SurfaceResult<()>;
    /// Show the surface at `layer`.
    fn show(&self, token: SurfaceToken, layer: i32) -> SurfaceResult<()>;
    /// Freeze the displayed contents.
    fn freeze(&self, token: SurfaceToken) -> SurfaceResult<()>;
    /// Resume displaying new frames.
    fn unfreeze(&self, token: SurfaceToken) -> SurfaceResult<()>;
    /// Update the flags selected by `mask`.
    fn set_flags(&self, token: SurfaceToken, flags: u32, mask: u32) -> SurfaceResult<()>;
    /// Hint which pixels are fully transparent.
    fn set_transparent_region_hint(&self, token: SurfaceToken, region: &Region) -> SurfaceResult<()>;
    /// Set plane alpha.
    fn set_alpha(&self, token: SurfaceToken, alpha: f32) -> SurfaceResult<()>;
    /// Set the 2x2 transform.
    fn set_matrix(&self, token: SurfaceToken, dsdx: f32, dtdx: f32, dsdy: f32, dtdy: f32) -> SurfaceResult<()>;
    /// Set the tint shown while frozen.
    fn set_freeze_tint(&self, token: SurfaceToken, tint: u32) -> SurfaceResult<()>;

    /// Tell the compositor a new frame was queued. Fire and forget.
    fn signal_server(&self);
    /// Send any batched commands now.
    fn flush_commands(&self);
}

/// Compositor-side object backing one surface's buffers.
pub trait RemoteSurface: Send + Sync {
    /// Capability identity of the surface.
    fn id(&self) -> CapabilityId;
    /// Allocate a buffer for `slot`; `Ok(None)` when the compositor had nothing to give.
    fn request_buffer(
        &self,
        slot: usize,
        width: u32,
        height: u32,
        format: PixelFormat,
        usage: Usage,
    ) -> SurfaceResult<Option<Arc<GraphicBuffer>>>;
    /// Change the number of slots on the compositor side.
    fn set_buffer_count(&self, count: usize) -> SurfaceResult<()>;
}

/// Maps capability ids read from a [`crate::Parcel`] back to live capabilities.
pub trait CapabilityResolver {
    /// Connection with the given id, if known to this process.
    fn resolve_client(&self, id: CapabilityId) -> Option<Arc<dyn SurfaceComposerClient>>;
    /// Surface with the given id, if known to this process.
    fn resolve_surface(&self, id: CapabilityId) -> Option<Arc<dyn RemoteSurface>>;
}
