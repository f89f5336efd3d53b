use adframe_core::{Cell, LayoutError, LayoutResult, Proportions, Rect, Span};
use serde::{Deserialize, Serialize};

/// One grid segment: its vertical (y) and horizontal (x) pixel ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub vertical: Span,
    pub horizontal: Span,
}

impl Segment {
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.horizontal.start,
            self.vertical.start,
            self.horizontal.len(),
            self.vertical.len(),
        )
    }
}

/// A canvas partitioned into a 3x3 grid of segments, indexed `[vertical][horizontal]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSegments {
    pub width: f64,
    pub height: f64,
    pub proportions: Proportions,
    grid: [[Segment; 3]; 3],
}

impl CanvasSegments {
    /// Divide a `width` x `height` canvas into three bands per axis:
    /// `[0, outer]`, `[outer, outer + mid]`, `[outer + mid, dimension]`.
    pub fn segment(width: f64, height: f64, proportions: Proportions) -> LayoutResult<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(LayoutError::InvalidCanvas { width, height });
        }
        proportions.validate()?;

        let vertical = bands(height, proportions.vertical_mid, proportions.vertical_outer);
        let horizontal = bands(width, proportions.horizontal_mid, proportions.horizontal_outer);

        let grid = vertical.map(|v| horizontal.map(|h| Segment {
            vertical: v,
            horizontal: h,
        }));

        Ok(Self {
            width,
            height,
            proportions,
            grid,
        })
    }

    /// Segment with the default 20/60/20 split on both axes.
    pub fn with_defaults(width: f64, height: f64) -> LayoutResult<Self> {
        Self::segment(width, height, Proportions::default())
    }

    pub fn get(&self, cell: Cell) -> &Segment {
        &self.grid[cell.vertical.offset()][cell.horizontal.offset()]
    }

    pub fn rows(&self) -> &[[Segment; 3]; 3] {
        &self.grid
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

fn bands(dimension: f64, mid: f64, outer: f64) -> [Span; 3] {
    let outer = dimension * outer;
    let mid = dimension * mid;
    [
        Span::new(0.0, outer),
        Span::new(outer, outer + mid),
        Span::new(outer + mid, dimension),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use adframe_core::Band;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_default_segments_320x500() {
        let segments = CanvasSegments::with_defaults(320.0, 500.0).unwrap();

        let top_left = segments.get(Cell::new(Band::First, Band::First));
        assert!((top_left.vertical.end - 100.0).abs() < EPS);
        assert!((top_left.horizontal.end - 64.0).abs() < EPS);

        let center = segments.get(Cell::new(Band::Middle, Band::Middle));
        assert!((center.vertical.start - 100.0).abs() < EPS);
        assert!((center.vertical.end - 400.0).abs() < EPS);
        assert!((center.horizontal.start - 64.0).abs() < EPS);
        assert!((center.horizontal.end - 256.0).abs() < EPS);

        let bottom_right = segments.get(Cell::new(Band::Last, Band::Last));
        assert_eq!(bottom_right.vertical.end, 500.0);
        assert_eq!(bottom_right.horizontal.end, 320.0);
    }

    #[test]
    fn test_segments_tile_the_canvas() {
        let segments = CanvasSegments::with_defaults(1024.0, 768.0).unwrap();
        let total: f64 = segments
            .rows()
            .iter()
            .flatten()
            .map(|s| s.rect().area())
            .sum();
        assert!((total - 1024.0 * 768.0).abs() < 1e-6);
    }

    #[test]
    fn test_rows_share_vertical_range() {
        let segments = CanvasSegments::with_defaults(300.0, 300.0).unwrap();
        for row in segments.rows() {
            assert!(row.iter().all(|s| s.vertical == row[0].vertical));
        }
    }

    #[test]
    fn test_short_proportions_grow_last_band() {
        let proportions = Proportions {
            vertical_mid: 0.5,
            vertical_outer: 0.1,
            ..Default::default()
        };
        let segments = CanvasSegments::segment(100.0, 100.0, proportions).unwrap();
        let last = segments.get(Cell::new(Band::Last, Band::First));
        assert!((last.vertical.start - 60.0).abs() < EPS);
        assert!((last.vertical.len() - 40.0).abs() < EPS);
    }

    #[test]
    fn test_invalid_proportions() {
        let proportions = Proportions {
            vertical_mid: 0.7,
            vertical_outer: 0.2,
            ..Default::default()
        };
        let err = CanvasSegments::segment(320.0, 500.0, proportions).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidProportions(_)));
    }

    #[test]
    fn test_invalid_canvas() {
        assert!(matches!(
            CanvasSegments::with_defaults(0.0, 500.0),
            Err(LayoutError::InvalidCanvas { .. })
        ));
        assert!(CanvasSegments::with_defaults(320.0, f64::NAN).is_err());
    }
}
