pub mod catalog;
pub mod error;
pub mod id;
pub mod layout;
pub mod model;
pub mod snapshot;
pub mod value;

pub use catalog::{Asset, Catalog, Product, ProductId};
pub use error::{CatalogError, EditorError};
pub use id::ElementId;
pub use layout::{EstimatedMetrics, Placement, TextMeasure, Viewport};
pub use model::*;
pub use snapshot::HistoryEntry;

// Re-export kurbo geometry so downstream crates share one set of types
pub use kurbo::{Point, Rect, Size, Vec2};
