//! End-to-end layout of the 320x500 sample frame: policy lookup, candidate
//! generation, diverse selection, and rectangle resolution.

use adframe_core::config::LayoutConfig;
use adframe_core::{Cell, FrequencyScope, LayoutError, Proportions, Rect, Size};
use adframe_layout::{
    select_diverse_positions, CandidateGenerator, CanvasSegments, Category, Frame, FrameItem,
    LayoutEngine, PolicyTable, RectangleResolver,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SAMPLE: [&str; 5] = ["Logo", "CTA Button", "Icon", "Product Image", "Text Elements"];

fn cell(v: u8, h: u8) -> Cell {
    Cell::from_indices(v, h).unwrap()
}

fn canvas() -> Size {
    Size {
        width: 320.0,
        height: 500.0,
    }
}

fn sample_frame() -> Frame {
    let mut items = vec![FrameItem::new("Background", "url_path", "background.png")];
    items.extend(
        SAMPLE
            .iter()
            .map(|label| FrameItem::new(*label, "url_path", format!("{label}.png"))),
    );
    Frame::new(items)
}

#[test]
fn sample_candidates_match_policy() {
    let policy = PolicyTable::builtin();
    let categories: Vec<Category> = SAMPLE.iter().map(|l| l.parse().unwrap()).collect();
    let positions = CandidateGenerator::new(&policy)
        .compute_positions(&categories)
        .unwrap();

    assert_eq!(positions[0], vec![cell(1, 1)]);
    assert_eq!(
        positions[1],
        vec![
            cell(1, 2),
            cell(1, 1),
            cell(1, 3),
            cell(2, 2),
            cell(2, 1),
            cell(2, 3),
            cell(3, 2),
            cell(3, 1),
            cell(3, 3),
        ]
    );
}

#[test]
fn sample_selection_keeps_icon_off_the_logo() {
    let policy = PolicyTable::builtin();
    let categories: Vec<Category> = SAMPLE.iter().map(|l| l.parse().unwrap()).collect();
    let positions = CandidateGenerator::new(&policy)
        .compute_positions(&categories)
        .unwrap();

    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let selected = select_diverse_positions(&positions, &mut rng).unwrap();
        assert_eq!(selected.len(), 5);
        for (choice, options) in selected.iter().zip(&positions) {
            assert!(options.contains(choice));
        }
        // Logo owns (1,1); Icon has (2,1) and (3,1) free of it.
        assert_eq!(selected[0], cell(1, 1));
        assert_ne!(selected[2], selected[0]);
    }
}

#[test]
fn sample_frame_rectangles_inside_canvas() {
    let config = LayoutConfig {
        seed: Some(2024),
        ..Default::default()
    };
    let engine = LayoutEngine::new(PolicyTable::builtin(), &config).unwrap();
    let layout = engine.layout_frame(canvas(), &sample_frame()).unwrap();

    assert_eq!(layout.background_ref, "background.png");
    assert_eq!(layout.placements.len(), 5);

    let bounds = Rect::new(0.0, 0.0, 320.0, 500.0);
    let segments = engine.segments(canvas()).unwrap();
    for placement in &layout.placements {
        let rect = placement.rect();
        assert!(bounds.contains(&rect, 1e-9), "{rect:?} outside canvas");
        assert!(segments.get(placement.cell).rect().contains(&rect, 1e-9));
        assert!(rect.size.width > 0.0 && rect.size.height > 0.0);
    }
}

#[test]
fn center_cell_round_trip() {
    let segments = CanvasSegments::with_defaults(320.0, 500.0).unwrap();
    let rects = RectangleResolver::with_default_padding(&segments).resolve(&[cell(2, 2)]);
    let center = rects[0].center();
    assert!((center.x - 160.0).abs() < 1e-9);
    assert!((center.y - 250.0).abs() < 1e-9);
    assert!((rects[0].size.width - (192.0 - 20.0)).abs() < 1e-9);
    assert!((rects[0].size.height - (300.0 - 20.0)).abs() < 1e-9);
}

#[test]
fn oversized_vertical_proportions_rejected() {
    let proportions = Proportions {
        vertical_mid: 0.7,
        vertical_outer: 0.2,
        ..Default::default()
    };
    assert!(matches!(
        CanvasSegments::segment(320.0, 500.0, proportions),
        Err(LayoutError::InvalidProportions(_))
    ));
}

#[test]
fn batch_report_serializes() {
    let config = LayoutConfig {
        seed: Some(3),
        frequency_scope: FrequencyScope::Batch,
        ..Default::default()
    };
    let engine = LayoutEngine::new(PolicyTable::builtin(), &config).unwrap();
    let frames = vec![sample_frame(), Frame::new(vec![]), sample_frame()];
    let batch = engine.layout_batch(canvas(), &frames);

    let json = serde_json::to_value(batch.reports()).unwrap();
    let reports = json.as_array().unwrap();
    assert_eq!(reports.len(), 3);
    assert!(reports[0]["layout"]["placements"].is_array());
    assert!(reports[1]["error"]
        .as_str()
        .unwrap()
        .contains("exactly one Background"));
    assert_eq!(reports[2]["layout"]["placements"][0]["category"], "Logo");
}
