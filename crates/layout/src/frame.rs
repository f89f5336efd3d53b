use adframe_core::{Cell, LayoutError, LayoutResult, Point, Rect, Size};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::Category;

/// One element of a frame as supplied by the caller.
///
/// `label` is parsed into a [`Category`] at layout time so a bad label fails
/// only the frame it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameItem {
    #[serde(rename = "category")]
    pub label: String,
    /// Where the asset originally came from. Carried but not used for layout.
    #[serde(default)]
    pub remote_ref: String,
    /// Handle the compositor uses to load the asset.
    pub local_ref: String,
}

impl FrameItem {
    pub fn new(
        label: impl Into<String>,
        remote_ref: impl Into<String>,
        local_ref: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            remote_ref: remote_ref.into(),
            local_ref: local_ref.into(),
        }
    }

    pub fn category(&self) -> LayoutResult<Category> {
        self.label.parse()
    }
}

/// An ordered list of items, exactly one of which should be the background.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frame {
    pub items: Vec<FrameItem>,
}

/// Result of searching a frame for its background item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundLookup {
    Found(usize),
    Missing,
    Multiple(Vec<usize>),
}

/// A frame whose categories are parsed and whose background is split out.
#[derive(Debug, Clone)]
pub struct ValidatedFrame<'a> {
    pub background: &'a FrameItem,
    pub placements: Vec<(Category, &'a FrameItem)>,
}

impl Frame {
    pub fn new(items: Vec<FrameItem>) -> Self {
        Self { items }
    }

    /// Locate background items by label without validating the others.
    pub fn find_background(&self) -> BackgroundLookup {
        let indices: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.label == Category::Background.label())
            .map(|(i, _)| i)
            .collect();
        match indices.as_slice() {
            [] => BackgroundLookup::Missing,
            [index] => BackgroundLookup::Found(*index),
            _ => BackgroundLookup::Multiple(indices),
        }
    }

    /// Parse every label and separate the single background from the placement items.
    pub fn validate(&self) -> LayoutResult<ValidatedFrame<'_>> {
        let background = match self.find_background() {
            BackgroundLookup::Found(index) => &self.items[index],
            BackgroundLookup::Missing => {
                return Err(LayoutError::MissingOrDuplicateBackground { found: 0 })
            }
            BackgroundLookup::Multiple(indices) => {
                return Err(LayoutError::MissingOrDuplicateBackground {
                    found: indices.len(),
                })
            }
        };

        let placements = self
            .items
            .iter()
            .map(|item| item.category().map(|category| (category, item)))
            .filter(|parsed| !matches!(parsed, Ok((category, _)) if category.is_background()))
            .collect::<LayoutResult<Vec<_>>>()?;

        Ok(ValidatedFrame {
            background,
            placements,
        })
    }
}

/// A placed element: the asset handle and the rectangle it is fitted into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub category: Category,
    pub local_ref: String,
    pub cell: Cell,
    pub start_point: Point,
    pub dimensions: Size,
}

impl Placement {
    pub fn rect(&self) -> Rect {
        Rect {
            start: self.start_point,
            size: self.dimensions,
        }
    }
}

/// The laid-out form of one frame, ready for compositing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameLayout {
    pub id: Uuid,
    pub canvas: Size,
    pub background_ref: String,
    pub placements: Vec<Placement>,
    pub layout_latency_us: u64,
    pub timestamp: DateTime<Utc>,
}
