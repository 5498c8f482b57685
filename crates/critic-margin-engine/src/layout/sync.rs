//! Keeps the margin surface in step with the host editor.
//!
//! Scrolling is one-way: the host reports its offset and the margin mirrors
//! it. Card resizes mark the layout dirty; the host calls
//! [`MarginSync::relayout_if_dirty`] once per frame with the current threads.

use log::debug;

use super::{CardPlacement, HeightCache, LayoutConfig, MarginLayout, PositionMapper, layout_threads};
use crate::parsing::threads::CommentThread;

/// Scroll mirror plus the long-lived layout state of one margin.
#[derive(Debug, Clone)]
pub struct MarginSync {
    config: LayoutConfig,
    heights: HeightCache,
    scroll_top: f64,
    host_scroll_height: f64,
    dirty: bool,
    layout: MarginLayout,
}

impl MarginSync {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            heights: HeightCache::new(),
            scroll_top: 0.0,
            host_scroll_height: 0.0,
            dirty: true,
            layout: MarginLayout::default(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Mirrors a host scroll event. Returns the offset the margin should
    /// scroll to.
    ///
    /// A change in the host's scroll height also marks the layout dirty,
    /// since the shared height depends on it.
    pub fn on_scroll(&mut self, scroll_top: f64, host_scroll_height: f64) -> f64 {
        self.scroll_top = scroll_top.max(0.0);
        if host_scroll_height != self.host_scroll_height {
            self.host_scroll_height = host_scroll_height;
            self.dirty = true;
        }
        self.scroll_top
    }

    /// Records a card measurement. Returns whether it dirtied the layout.
    pub fn on_card_resize(&mut self, root: usize, height: f64) -> bool {
        let changed = self.heights.record(root, height);
        if changed {
            debug!("card at {root} resized to {height}");
            self.dirty = true;
        }
        changed
    }

    /// Marks the layout stale, e.g. after the document text changed.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recomputes placements for `threads` and clears the dirty flag.
    ///
    /// Cached heights for roots that no longer exist are dropped first.
    pub fn relayout<M>(&mut self, threads: &[CommentThread], mapper: &M) -> &MarginLayout
    where
        M: PositionMapper + ?Sized,
    {
        let live: Vec<usize> = threads.iter().map(|t| t.from()).collect();
        let pruned = self.heights.retain_roots(&live);
        if pruned > 0 {
            debug!("dropped {pruned} stale card heights");
        }
        self.layout = layout_threads(
            threads,
            mapper,
            &self.heights,
            &self.config,
            self.host_scroll_height,
        );
        self.dirty = false;
        &self.layout
    }

    /// Like [`relayout`](Self::relayout) but only when something changed.
    /// Returns `true` if a new layout was computed.
    pub fn relayout_if_dirty<M>(&mut self, threads: &[CommentThread], mapper: &M) -> bool
    where
        M: PositionMapper + ?Sized,
    {
        if !self.dirty {
            return false;
        }
        self.relayout(threads, mapper);
        true
    }

    pub fn layout(&self) -> &MarginLayout {
        &self.layout
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn heights(&self) -> &HeightCache {
        &self.heights
    }

    /// Cards that intersect the window `[scroll_top, scroll_top + viewport_height)`.
    pub fn visible_cards(&self, viewport_height: f64) -> impl Iterator<Item = &CardPlacement> {
        let top = self.scroll_top;
        let bottom = top + viewport_height;
        self.layout
            .cards
            .iter()
            .filter(move |c| c.bottom() > top && c.layout_y < bottom)
    }
}

impl Default for MarginSync {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}
