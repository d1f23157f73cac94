//! Client side of a compositor buffer-swap protocol.
//!
//! A process that owns a compositor surface renders into it through a small ring of shared
//! graphic buffers. Slot ownership lives in state shared with the compositor; this crate is the
//! producer end of that ring.
//!
//! # Overview
//!
//! - [`SurfaceControl`]: creator-side handle. Forwards layer, position, size and visibility
//!   changes to the compositor and owns the compositor-side lifetime.
//! - [`Surface`]: the producer. Dequeues a buffer, lets the caller draw, queues it back.
//!   Implements [`NativeWindow`] for rendering-API shims.
//! - [`Surface::lock`] / [`Surface::unlock_and_post`]: software rendering with copy-back of the
//!   unchanged part of the previous frame, so callers only repaint what changed.
//! - [`Parcel`]: flat encoding of a surface handle, used to hand a surface to another process.
//!
//! The compositor connection, the shared slot ring and buffer registration are traits
//! ([`SurfaceComposerClient`], [`RemoteSurface`], [`SharedBufferClient`], [`BufferMapper`]) so
//! transports and tests plug in their own implementations.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate; pixel access goes through closures.
//! - **Logging**: failures are reported through `tracing` at the site they happen and returned as
//!   [`SurfaceError`], which maps onto the protocol status codes via
//!   [`SurfaceError::status_code`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod buffer;
mod config;
mod foundation;
mod remote;
mod surface;

pub use buffer::graphic_buffer::{BufferDesc, BufferHandle, BufferMemory, GraphicBuffer, HeapMemory};
pub use buffer::info::{BufferInfo, BufferRequest};
pub use buffer::mapper::{BufferMapper, RegistryMapper};
pub use config::SurfaceOpts;
pub use foundation::error::{SurfaceError, SurfaceResult};
pub use foundation::format::{PixelFormat, SurfaceFlags, Usage};
pub use foundation::geometry::{Rect, Region};
pub use remote::composer::{
    CapabilityId, CapabilityResolver, RemoteSurface, SurfaceComposerClient, SurfaceData,
    SurfaceToken,
};
pub use remote::shared::SharedBufferClient;
pub use surface::control::SurfaceControl;
pub use surface::parcel::Parcel;
pub use surface::perform::{NativeQuery, PerformRequest, ProducerApi, perform_tag};
pub use surface::swap_chain::{LockedSurface, Surface};
pub use surface::window::{MAX_SWAP_INTERVAL, MIN_SWAP_INTERVAL, NativeWindow};
