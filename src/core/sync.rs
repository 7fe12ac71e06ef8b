//! Keeps a scrollable viewport pinned to the newest generated line.

/// A viewport the synchronizer can move.
pub trait ScrollRegion {
    fn content_height(&self) -> usize;
    fn visible_height(&self) -> usize;
    fn set_offset(&mut self, offset: usize);

    fn bottom_offset(&self) -> usize {
        self.content_height().saturating_sub(self.visible_height())
    }
}

/// Re-evaluates on every change of `(loading, revision)` and scrolls to the
/// bottom while a generation is in flight.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AutoScroll {
    last_seen: Option<(bool, u64)>,
}

impl AutoScroll {
    #[must_use]
    pub const fn new() -> Self {
        Self { last_seen: None }
    }

    /// Returns `true` when the region offset was changed.
    ///
    /// A missing region leaves the trigger unconsumed, so the next call with
    /// a mounted region still scrolls.
    pub fn observe<R: ScrollRegion + ?Sized>(
        &mut self,
        loading: bool,
        revision: u64,
        region: Option<&mut R>,
    ) -> bool {
        let key = (loading, revision);
        if self.last_seen == Some(key) {
            return false;
        }

        let Some(region) = region else {
            return false;
        };
        self.last_seen = Some(key);

        if !loading {
            return false;
        }

        let bottom = region.bottom_offset();
        region.set_offset(bottom);
        true
    }

    /// Forces the next `observe` call to re-evaluate.
    pub const fn invalidate(&mut self) {
        self.last_seen = None;
    }
}
