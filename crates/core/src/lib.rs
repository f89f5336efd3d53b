pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, FrequencyScope};
pub use error::{LayoutError, LayoutResult};
pub use types::{Band, Cell, Point, Proportions, Rect, Size, Span};
