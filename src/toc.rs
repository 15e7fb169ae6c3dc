//! Table of contents and active-section tracking.

use crate::content::{plural, ContentBlock};

/// Default gap left above a section when jumping to it.
pub const DEFAULT_SCROLL_OFFSET: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub index: usize,
    /// Element id of the section, e.g. `content-2`.
    pub anchor: String,
    pub title: String,
    /// e.g. `"3 cited sources"`.
    pub cited_label: String,
}

/// Vertical extent of a rendered section within the scroll container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionBounds {
    pub top: f64,
    pub height: f64,
}

pub fn section_anchor(index: usize) -> String {
    format!("content-{index}")
}

pub fn build_toc(blocks: &[ContentBlock]) -> Vec<TocEntry> {
    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| TocEntry {
            index,
            anchor: section_anchor(index),
            title: block.title(),
            cited_label: plural(block.cited_sources.len(), "cited source"),
        })
        .collect()
}

/// Index of the section with the largest visible area in the viewport.
///
/// Ties go to the earlier section; when nothing is visible the first section
/// is reported.
pub fn most_visible_section(sections: &[SectionBounds], scroll_top: f64, viewport_height: f64) -> usize {
    let viewport_bottom = scroll_top + viewport_height;
    let mut best = 0;
    let mut best_area = 0.0;

    for (index, section) in sections.iter().enumerate() {
        let visible_top = section.top.max(scroll_top);
        let visible_bottom = (section.top + section.height).min(viewport_bottom);
        let area = (visible_bottom - visible_top).max(0.0);
        if area > best_area {
            best_area = area;
            best = index;
        }
    }
    best
}

/// Scroll position that brings a section to `offset` below the container top.
pub fn scroll_target(section_top: f64, offset: f64) -> f64 {
    (section_top - offset).max(0.0)
}
