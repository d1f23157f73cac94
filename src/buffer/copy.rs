use crate::buffer::graphic_buffer::GraphicBuffer;
use crate::foundation::error::{SurfaceError, SurfaceResult};
use crate::foundation::format::Usage;
use crate::foundation::geometry::{Rect, Region};

/// Counters reported by [`copy_rects`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct CopyStats {
    /// Number of contiguous byte-range copies issued.
    pub(crate) copies: usize,
    /// Total bytes moved.
    pub(crate) bytes: usize,
}

/// Copy every rectangle from `src` to the same position in `dst`.
///
/// Strides are in bytes per row. Rectangles whose rows are contiguous in both buffers (full-width
/// rows, equal strides) are moved with a single copy.
pub(crate) fn copy_rects(
    dst: &mut [u8],
    dst_bpr: usize,
    src: &[u8],
    src_bpr: usize,
    bpp: usize,
    rects: &[Rect],
) -> SurfaceResult<CopyStats> {
    let mut stats = CopyStats::default();
    for r in rects.iter().filter(|r| !r.is_empty()) {
        let (Ok(left), Ok(top)) = (usize::try_from(r.left), usize::try_from(r.top)) else {
            return Err(SurfaceError::invalid_argument(format!(
                "copy rect {r:?} starts outside the buffer"
            )));
        };

        let mut rows = r.height() as usize;
        let mut size = r.width() as usize * bpp;
        let mut s = top * src_bpr + left * bpp;
        let mut d = top * dst_bpr + left * bpp;
        if dst_bpr == src_bpr && size == src_bpr {
            size *= rows;
            rows = 1;
        }

        for _ in 0..rows {
            let (Some(from), Some(to)) = (src.get(s..s + size), dst.get_mut(d..d + size)) else {
                return Err(SurfaceError::invalid_argument(format!(
                    "copy rect {r:?} runs past the end of a buffer"
                )));
            };
            to.copy_from_slice(from);
            stats.copies += 1;
            stats.bytes += size;
            s += src_bpr;
            d += dst_bpr;
        }
    }
    Ok(stats)
}

/// Copy `region` from `src` into `dst` pixel for pixel.
///
/// Both buffers must share width, height and format; this is not re-checked here. Each buffer is
/// locked for CPU access over `region.bounds()` for the duration of the copy only.
pub(crate) fn copy_blt(dst: &GraphicBuffer, src: &GraphicBuffer, region: &Region) -> SurfaceResult<()> {
    if region.is_empty() || std::ptr::eq(dst, src) {
        return Ok(());
    }
    let bpp = src.format().bytes_per_pixel().ok_or_else(|| {
        SurfaceError::invalid_argument(format!("no pixel size for format {}", src.format().0))
    })?;
    let bounds = region.bounds();

    let src_locked = src.lock(Usage::SW_READ_OFTEN, bounds);
    if let Err(e) = &src_locked {
        tracing::error!(error = %e, "error locking src buffer");
    }
    let dst_locked = dst.lock(Usage::SW_WRITE_OFTEN, bounds);
    if let Err(e) = &dst_locked {
        tracing::error!(error = %e, "error locking dst buffer");
    }

    let mut result = Ok(());
    if src_locked.is_ok() && dst_locked.is_ok() {
        let src_bpr = src.stride() as usize * bpp;
        let dst_bpr = dst.stride() as usize * bpp;
        let mut copied = Err(SurfaceError::invalid_operation("src buffer not mapped"));
        let mapped = src.with_bytes(|s| {
            let written = dst.with_bytes_mut(|d| {
                copied = copy_rects(d, dst_bpr, s, src_bpr, bpp, region.rects());
            });
            if let Err(e) = written {
                copied = Err(e);
            }
        });
        result = mapped.and(copied.map(|stats| {
            tracing::trace!(copies = stats.copies, bytes = stats.bytes, "copy-back done");
        }));
    }

    if src_locked.is_ok()
        && let Err(e) = src.unlock()
    {
        tracing::error!(error = %e, "error unlocking src buffer");
    }
    if dst_locked.is_ok()
        && let Err(e) = dst.unlock()
    {
        tracing::error!(error = %e, "error unlocking dst buffer");
    }

    src_locked.and(dst_locked).and(result)
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/copy.rs"]
mod tests;
