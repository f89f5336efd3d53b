use adframe_core::{Cell, LayoutError, LayoutResult, Rect};
use tracing::warn;

use crate::segments::CanvasSegments;

pub const DEFAULT_PADDING: f64 = 10.0;

/// Direction in which a cell's interior is divided among its elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitAxis {
    /// Elements stacked top to bottom.
    Vertical,
    /// Elements side by side.
    Horizontal,
}

impl SplitAxis {
    /// Taller-than-wide interiors stack vertically. Square ones split horizontally.
    pub fn for_interior(interior: &Rect) -> Self {
        if interior.size.height > interior.size.width {
            SplitAxis::Vertical
        } else {
            SplitAxis::Horizontal
        }
    }
}

/// Turns cell assignments into concrete pixel rectangles.
#[derive(Debug, Clone, Copy)]
pub struct RectangleResolver<'a> {
    segments: &'a CanvasSegments,
    padding: f64,
}

impl<'a> RectangleResolver<'a> {
    pub fn new(segments: &'a CanvasSegments, padding: f64) -> LayoutResult<Self> {
        if !padding.is_finite() || padding < 0.0 {
            return Err(LayoutError::InvalidPadding(padding));
        }
        Ok(Self { segments, padding })
    }

    pub fn with_default_padding(segments: &'a CanvasSegments) -> Self {
        Self {
            segments,
            padding: DEFAULT_PADDING,
        }
    }

    /// The padded interior of a cell. Dimensions never go below zero.
    pub fn interior(&self, cell: Cell) -> Rect {
        let segment = self.segments.get(cell);
        let width = segment.horizontal.len() - 2.0 * self.padding;
        let height = segment.vertical.len() - 2.0 * self.padding;
        if width < 0.0 || height < 0.0 {
            warn!(
                %cell,
                padding = self.padding,
                width,
                height,
                "padding exceeds segment size, clamping interior to zero"
            );
        }
        Rect::new(
            segment.horizontal.start + self.padding,
            segment.vertical.start + self.padding,
            width.max(0.0),
            height.max(0.0),
        )
    }

    /// One rectangle per assigned element, in assignment order.
    ///
    /// Elements sharing a cell split its padded interior evenly along the
    /// longer axis, in the order they first appear in `assignment`.
    pub fn resolve(&self, assignment: &[Cell]) -> Vec<Rect> {
        let mut groups: Vec<(Cell, Vec<usize>)> = Vec::new();
        for (index, cell) in assignment.iter().enumerate() {
            match groups.iter_mut().find(|(c, _)| c == cell) {
                Some((_, members)) => members.push(index),
                None => groups.push((*cell, vec![index])),
            }
        }

        let mut rects = vec![Rect::new(0.0, 0.0, 0.0, 0.0); assignment.len()];
        for (cell, members) in groups {
            let interior = self.interior(cell);
            let axis = SplitAxis::for_interior(&interior);
            let count = members.len() as f64;

            for (slot, element) in members.into_iter().enumerate() {
                let offset = slot as f64;
                rects[element] = match axis {
                    SplitAxis::Vertical => {
                        let share = interior.size.height / count;
                        Rect::new(
                            interior.start.x,
                            interior.start.y + offset * share,
                            interior.size.width,
                            share,
                        )
                    }
                    SplitAxis::Horizontal => {
                        let share = interior.size.width / count;
                        Rect::new(
                            interior.start.x + offset * share,
                            interior.start.y,
                            share,
                            interior.size.height,
                        )
                    }
                };
            }
        }
        rects
    }
}

/// Resolve with an explicit padding.
pub fn resolve_rectangles(
    segments: &CanvasSegments,
    assignment: &[Cell],
    padding: f64,
) -> LayoutResult<Vec<Rect>> {
    Ok(RectangleResolver::new(segments, padding)?.resolve(assignment))
}
