use std::sync::Arc;
use std::time::Instant;

use adframe_core::config::LayoutConfig;
use adframe_core::{Cell, FrequencyScope, LayoutError, LayoutResult, Proportions, Size};
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::candidates::CandidateGenerator;
use crate::category::Category;
use crate::frame::{Frame, FrameLayout, Placement};
use crate::policy::PolicyTable;
use crate::resolver::RectangleResolver;
use crate::segments::CanvasSegments;
use crate::selector::{DiversePositionSelector, FrequencyCounter};

/// Canvas size key for the segment cache.
type CanvasKey = (u64, u64);

/// Frame layout engine: owns the placement policy, caches canvas segments,
/// and runs the candidate → selection → rectangle pipeline per frame.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    policy: Arc<PolicyTable>,
    proportions: Proportions,
    padding: f64,
    frequency_scope: FrequencyScope,
    segments: Arc<DashMap<CanvasKey, Arc<CanvasSegments>>>,
    selector: DiversePositionSelector,
    rng: Arc<Mutex<StdRng>>,
}

impl LayoutEngine {
    /// Build an engine, rejecting bad proportions or padding before any frame is seen.
    pub fn new(policy: PolicyTable, config: &LayoutConfig) -> LayoutResult<Self> {
        let proportions = config.proportions();
        proportions.validate()?;
        if !config.padding.is_finite() || config.padding < 0.0 {
            return Err(LayoutError::InvalidPadding(config.padding));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            categories = policy.len(),
            padding = config.padding,
            frequency_scope = ?config.frequency_scope,
            seeded = config.seed.is_some(),
            "layout engine initialized"
        );

        Ok(Self {
            policy: Arc::new(policy),
            proportions,
            padding: config.padding,
            frequency_scope: config.frequency_scope,
            segments: Arc::new(DashMap::new()),
            selector: DiversePositionSelector::new(),
            rng: Arc::new(Mutex::new(rng)),
        })
    }

    /// Engine with the built-in policy and default configuration.
    pub fn with_defaults() -> Self {
        Self {
            policy: Arc::new(PolicyTable::builtin()),
            proportions: Proportions::default(),
            padding: crate::resolver::DEFAULT_PADDING,
            frequency_scope: FrequencyScope::Frame,
            segments: Arc::new(DashMap::new()),
            selector: DiversePositionSelector::new(),
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    pub fn frequency_scope(&self) -> FrequencyScope {
        self.frequency_scope
    }

    /// Segments for a canvas size, computed once and cached.
    ///
    /// The cache keeps one entry per distinct canvas size and is never
    /// evicted. Callers laying out an unbounded range of canvas sizes should
    /// not share one long-lived engine.
    pub fn segments(&self, canvas: Size) -> LayoutResult<Arc<CanvasSegments>> {
        let key = (canvas.width.to_bits(), canvas.height.to_bits());
        if let Some(cached) = self.segments.get(&key) {
            return Ok(Arc::clone(cached.value()));
        }
        let computed = Arc::new(CanvasSegments::segment(
            canvas.width,
            canvas.height,
            self.proportions,
        )?);
        debug!(width = canvas.width, height = canvas.height, "cached canvas segments");
        self.segments.insert(key, Arc::clone(&computed));
        Ok(computed)
    }

    /// Candidate cells for each category, in input order.
    pub fn compute_positions(&self, categories: &[Category]) -> LayoutResult<Vec<Vec<Cell>>> {
        CandidateGenerator::new(&self.policy).compute_positions(categories)
    }

    /// Lay out one frame with a fresh frequency counter.
    pub fn layout_frame(&self, canvas: Size, frame: &Frame) -> LayoutResult<FrameLayout> {
        self.layout_frame_with_counter(canvas, frame, &mut FrequencyCounter::new())
    }

    /// Lay out one frame, reading and updating `counter`.
    ///
    /// On error nothing is recorded in `counter`.
    pub fn layout_frame_with_counter(
        &self,
        canvas: Size,
        frame: &Frame,
        counter: &mut FrequencyCounter,
    ) -> LayoutResult<FrameLayout> {
        let start = Instant::now();

        let segments = self.segments(canvas)?;
        let validated = frame.validate()?;
        let categories: Vec<Category> = validated.placements.iter().map(|(c, _)| *c).collect();

        let candidates = self.compute_positions(&categories)?;
        let cells = {
            let mut rng = self.rng.lock();
            self.selector.select(&candidates, counter, &mut *rng)?
        };
        let rects = RectangleResolver::new(&segments, self.padding)?.resolve(&cells);

        let placements = validated
            .placements
            .iter()
            .zip(cells.iter().zip(rects))
            .map(|((category, item), (cell, rect))| Placement {
                category: *category,
                local_ref: item.local_ref.clone(),
                cell: *cell,
                start_point: rect.start,
                dimensions: rect.size,
            })
            .collect::<Vec<_>>();

        let latency = start.elapsed().as_micros() as u64;
        metrics::counter!("layout.frames_composed").increment(1);
        metrics::histogram!("layout.latency_us").record(latency as f64);

        debug!(
            placements = placements.len(),
            latency_us = latency,
            "frame laid out"
        );

        Ok(FrameLayout {
            id: Uuid::new_v4(),
            canvas,
            background_ref: validated.background.local_ref.clone(),
            placements,
            layout_latency_us: latency,
            timestamp: Utc::now(),
        })
    }

    /// Lay out every frame. Each frame succeeds or fails on its own.
    ///
    /// With [`FrequencyScope::Batch`] one counter is shared by all frames in
    /// order; with [`FrequencyScope::Frame`] each frame starts from zero.
    pub fn layout_batch(&self, canvas: Size, frames: &[Frame]) -> BatchLayout {
        let start = Instant::now();
        let mut shared = FrequencyCounter::new();

        let results: Vec<LayoutResult<FrameLayout>> = frames
            .iter()
            .enumerate()
            .map(|(index, frame)| {
                let result = match self.frequency_scope {
                    FrequencyScope::Batch => {
                        self.layout_frame_with_counter(canvas, frame, &mut shared)
                    }
                    FrequencyScope::Frame => self.layout_frame(canvas, frame),
                };
                if let Err(e) = &result {
                    metrics::counter!("layout.frames_failed").increment(1);
                    warn!(index, error = %e, "frame layout failed");
                }
                result
            })
            .collect();

        let batch = BatchLayout {
            results,
            frequency: match self.frequency_scope {
                FrequencyScope::Batch => Some(shared),
                FrequencyScope::Frame => None,
            },
        };

        info!(
            frames = frames.len(),
            succeeded = batch.succeeded(),
            failed = batch.failed(),
            latency_us = start.elapsed().as_micros() as u64,
            "batch layout complete"
        );
        batch
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Per-frame layout results for a batch, in input order.
#[derive(Debug)]
pub struct BatchLayout {
    pub results: Vec<LayoutResult<FrameLayout>>,
    /// Final counts of the shared counter, for batch-scoped runs.
    pub frequency: Option<FrequencyCounter>,
}

/// Serializable summary of one frame's outcome.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport<'a> {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<&'a FrameLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchLayout {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn layouts(&self) -> impl Iterator<Item = (usize, &FrameLayout)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().ok().map(|layout| (i, layout)))
    }

    pub fn reports(&self) -> Vec<FrameReport<'_>> {
        self.results
            .iter()
            .enumerate()
            .map(|(index, result)| match result {
                Ok(layout) => FrameReport {
                    index,
                    layout: Some(layout),
                    error: None,
                },
                Err(e) => FrameReport {
                    index,
                    layout: None,
                    error: Some(e.to_string()),
                },
            })
            .collect()
    }
}
