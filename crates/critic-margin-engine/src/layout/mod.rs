//! # Margin Layout
//!
//! Places comment cards beside the document so that no two overlap, and keeps
//! the margin's scrollable height in step with the host editor's.
//!
//! ## Modules
//!
//! - **`heights`**: `HeightCache` of measured card heights keyed by thread root offset
//! - **`sync`**: `MarginSync`, the stateful scroll/resize synchronizer
//!
//! All heights and positions are in host units (pixels for a GUI, lines for
//! a terminal).

pub mod heights;
pub mod sync;

pub use heights::{HEIGHT_EPSILON, HeightCache};
pub use sync::MarginSync;

use log::debug;

use crate::parsing::threads::CommentThread;

/// Desired top and current height of one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutItem {
    pub target_y: f64,
    /// Measured, or the default estimate until measured.
    pub height: f64,
}

/// Collision-free top of one card, index-aligned with its [`LayoutItem`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutResult {
    pub layout_y: f64,
}

/// Layout constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Minimum space between consecutive cards.
    pub gap: f64,
    /// Extra room below the last card.
    pub padding: f64,
    /// Height assumed for a card that has not been measured yet.
    pub default_card_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gap: 8.0,
            padding: 64.0,
            default_card_height: 80.0,
        }
    }
}

/// Maps a document offset to a vertical position in the host surface.
pub trait PositionMapper {
    fn offset_to_y(&self, offset: usize) -> f64;
}

impl<F> PositionMapper for F
where
    F: Fn(usize) -> f64,
{
    fn offset_to_y(&self, offset: usize) -> f64 {
        self(offset)
    }
}

/// Greedy top-down placement.
///
/// `items` must already be in document order (ascending `target_y`). Each
/// card goes at its target unless that would overlap the previous card, in
/// which case it goes `gap` below it. Nothing is ever moved up.
pub fn resolve_overlaps(items: &[LayoutItem], gap: f64) -> Vec<LayoutResult> {
    let mut previous_bottom = f64::NEG_INFINITY;
    items
        .iter()
        .map(|item| {
            let layout_y = item.target_y.max(previous_bottom + gap);
            previous_bottom = layout_y + item.height;
            LayoutResult { layout_y }
        })
        .collect()
}

/// Scroll height of the margin: never less than the host's, and tall enough
/// for the last card plus `padding`.
pub fn shared_height(host_scroll_height: f64, last_card_bottom: f64, padding: f64) -> f64 {
    host_scroll_height.max(last_card_bottom + padding)
}

/// Bottom padding the host must add so scrolling to its end reveals the last card.
pub fn editor_padding(host_scroll_height: f64, last_card_bottom: f64, padding: f64) -> f64 {
    (last_card_bottom + padding - host_scroll_height).max(0.0)
}

/// Where one thread's card ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct CardPlacement {
    /// Root offset of the thread; the height cache key.
    pub root: usize,
    pub target_y: f64,
    pub layout_y: f64,
    pub height: f64,
}

impl CardPlacement {
    pub fn bottom(&self) -> f64 {
        self.layout_y + self.height
    }

    /// How far collision resolution pushed the card down.
    pub fn displacement(&self) -> f64 {
        self.layout_y - self.target_y
    }
}

/// One complete layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarginLayout {
    pub cards: Vec<CardPlacement>,
    pub shared_height: f64,
    pub editor_padding: f64,
}

impl MarginLayout {
    pub fn last_card_bottom(&self) -> f64 {
        self.cards.last().map_or(0.0, CardPlacement::bottom)
    }

    pub fn card_for(&self, root: usize) -> Option<&CardPlacement> {
        self.cards.iter().find(|c| c.root == root)
    }
}

/// Lays out one card per thread.
///
/// Targets come from `mapper` at each thread's root offset; heights come from
/// `heights`, falling back to `config.default_card_height`.
pub fn layout_threads<M>(
    threads: &[CommentThread],
    mapper: &M,
    heights: &HeightCache,
    config: &LayoutConfig,
    host_scroll_height: f64,
) -> MarginLayout
where
    M: PositionMapper + ?Sized,
{
    let items: Vec<LayoutItem> = threads
        .iter()
        .map(|t| LayoutItem {
            target_y: mapper.offset_to_y(t.from()),
            height: heights.height_or(t.from(), config.default_card_height),
        })
        .collect();

    let cards: Vec<CardPlacement> = resolve_overlaps(&items, config.gap)
        .into_iter()
        .zip(threads.iter().zip(&items))
        .map(|(result, (thread, item))| CardPlacement {
            root: thread.from(),
            target_y: item.target_y,
            layout_y: result.layout_y,
            height: item.height,
        })
        .collect();

    let last_bottom = cards.last().map_or(0.0, CardPlacement::bottom);
    let layout = MarginLayout {
        shared_height: shared_height(host_scroll_height, last_bottom, config.padding),
        editor_padding: editor_padding(host_scroll_height, last_bottom, config.padding),
        cards,
    };
    debug!(
        "laid out {} cards, shared height {}",
        layout.cards.len(),
        layout.shared_height
    );
    layout
}
