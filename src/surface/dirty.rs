use std::sync::Arc;

use crate::buffer::graphic_buffer::GraphicBuffer;
use crate::foundation::geometry::Region;

/// What one software frame has to do before the caller starts drawing.
#[derive(Debug)]
pub(crate) struct FramePlan {
    /// Region the caller must repaint; always inside the back buffer bounds.
    pub(crate) dirty: Region,
    /// Region announced to the compositor on queue: the caller's request clipped to the bounds.
    pub(crate) reported: Region,
    /// Pixels to carry over from the previously posted buffer, and where.
    pub(crate) copy_back: Option<(Arc<GraphicBuffer>, Region)>,
}

/// Tracks which part of the back buffer is still valid from earlier frames.
#[derive(Debug, Default)]
pub(crate) struct DirtyTracker {
    clean: Region,
    posted: Option<Arc<GraphicBuffer>>,
}

impl DirtyTracker {
    /// Plan the next frame into `back`.
    ///
    /// Copy-back needs a posted buffer of identical geometry and format, and a back buffer whose
    /// earlier contents survive; `discard_back` says they do not (the surface discards its back
    /// buffer, or the buffer was just allocated). Without both the whole buffer is repainted.
    pub(crate) fn plan(
        &mut self,
        back: &GraphicBuffer,
        requested: Option<Region>,
        discard_back: bool,
    ) -> FramePlan {
        let bounds = back.bounds();
        let reported = requested
            .unwrap_or_else(|| Region::from_rect(bounds))
            .intersect_rect(&bounds);

        let front = self
            .posted
            .as_ref()
            .filter(|front| !discard_back && front.same_geometry(back));

        let (dirty, copy_back) = match front {
            Some(front) => {
                let stale = self.clean.intersect_rect(&bounds).subtract(&reported);
                let copy_back = (!stale.is_empty()).then(|| (Arc::clone(front), stale));
                (reported.clone(), copy_back)
            }
            None => (Region::from_rect(bounds), None),
        };

        self.clean = dirty.clone();
        FramePlan {
            dirty,
            reported,
            copy_back,
        }
    }

    /// Give up on the current plan: the whole of `back` must be repainted.
    pub(crate) fn force_full_redraw(&mut self, back: &GraphicBuffer) -> Region {
        self.clean = Region::from_rect(back.bounds());
        self.clean.clone()
    }

    /// Remember `buffer` as the one now on screen.
    pub(crate) fn set_posted(&mut self, buffer: Arc<GraphicBuffer>) {
        self.posted = Some(buffer);
    }

    pub(crate) fn posted(&self) -> Option<&Arc<GraphicBuffer>> {
        self.posted.as_ref()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/dirty.rs"]
mod tests;
