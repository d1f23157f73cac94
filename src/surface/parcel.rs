use std::num::NonZeroU64;

use crate::foundation::error::{SurfaceError, SurfaceResult};
use crate::foundation::format::{PixelFormat, SurfaceFlags};
use crate::remote::composer::{CapabilityId, SurfaceToken};

/// Flat little-endian buffer used to carry a surface handle across a process boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parcel {
    data: Vec<u8>,
    pos: usize,
}

impl Parcel {
    /// Empty parcel ready for writing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parcel positioned at the start of `data`, ready for reading.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }

    /// Everything written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Append a signed 32-bit value.
    pub fn write_i32(&mut self, v: i32) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    /// Append an unsigned 32-bit value.
    pub fn write_u32(&mut self, v: u32) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    /// Append a capability reference; `None` is written as the null id `0`.
    pub fn write_capability(&mut self, id: Option<CapabilityId>) {
        let raw = id.map_or(0, |id| id.0.get());
        self.data.extend_from_slice(&raw.to_le_bytes());
    }

    /// Read the next signed 32-bit value.
    pub fn read_i32(&mut self) -> SurfaceResult<i32> {
        Ok(i32::from_le_bytes(self.take::<4>()?))
    }

    /// Read the next unsigned 32-bit value.
    pub fn read_u32(&mut self) -> SurfaceResult<u32> {
        Ok(u32::from_le_bytes(self.take::<4>()?))
    }

    /// Read the next capability reference.
    pub fn read_capability(&mut self) -> SurfaceResult<Option<CapabilityId>> {
        let raw = u64::from_le_bytes(self.take::<8>()?);
        Ok(NonZeroU64::new(raw).map(CapabilityId))
    }

    fn take<const N: usize>(&mut self) -> SurfaceResult<[u8; N]> {
        let end = self.pos + N;
        let bytes = self
            .data
            .get(self.pos..end)
            .and_then(|s| <[u8; N]>::try_from(s).ok())
            .ok_or_else(|| {
                SurfaceError::invalid_argument(format!(
                    "parcel truncated: need {N} bytes at offset {}",
                    self.pos
                ))
            })?;
        self.pos = end;
        Ok(bytes)
    }
}

/// The fields of a surface handle in wire order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HandleRecord {
    pub(crate) client: Option<CapabilityId>,
    pub(crate) surface: Option<CapabilityId>,
    pub(crate) token: SurfaceToken,
    pub(crate) identity: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) format: PixelFormat,
    pub(crate) flags: SurfaceFlags,
}

impl HandleRecord {
    /// What an absent or invalid handle serializes as.
    pub(crate) const INVALID: Self = Self {
        client: None,
        surface: None,
        token: SurfaceToken::INVALID,
        identity: 0,
        width: 0,
        height: 0,
        format: PixelFormat::UNSPECIFIED,
        flags: SurfaceFlags::empty(),
    };

    pub(crate) fn write_to(&self, parcel: &mut Parcel) {
        parcel.write_capability(self.client);
        parcel.write_capability(self.surface);
        parcel.write_i32(self.token.0);
        parcel.write_u32(self.identity);
        parcel.write_i32(self.width as i32);
        parcel.write_i32(self.height as i32);
        parcel.write_i32(self.format.0);
        parcel.write_i32(self.flags.bits() as i32);
    }

    pub(crate) fn read_from(parcel: &mut Parcel) -> SurfaceResult<Self> {
        Ok(Self {
            client: parcel.read_capability()?,
            surface: parcel.read_capability()?,
            token: SurfaceToken(parcel.read_i32()?),
            identity: parcel.read_u32()?,
            width: parcel.read_i32()? as u32,
            height: parcel.read_i32()? as u32,
            format: PixelFormat(parcel.read_i32()?),
            flags: SurfaceFlags::from_bits_retain(parcel.read_i32()? as u32),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/parcel.rs"]
mod tests;
