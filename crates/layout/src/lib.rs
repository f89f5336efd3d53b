//! Ad frame layout engine: places categorized creative elements onto a
//! 3x3 grid of a background canvas and resolves them to pixel rectangles.

pub mod candidates;
pub mod category;
pub mod compositor;
pub mod engine;
pub mod frame;
pub mod policy;
pub mod resolver;
pub mod segments;
pub mod selector;

pub use candidates::CandidateGenerator;
pub use category::Category;
pub use compositor::{FrameRenderer, ImageCompositor};
pub use engine::{BatchLayout, LayoutEngine};
pub use frame::{BackgroundLookup, Frame, FrameItem, FrameLayout, Placement};
pub use policy::PolicyTable;
pub use resolver::{resolve_rectangles, RectangleResolver, SplitAxis, DEFAULT_PADDING};
pub use segments::{CanvasSegments, Segment};
pub use selector::{select_diverse_positions, DiversePositionSelector, FrequencyCounter};
