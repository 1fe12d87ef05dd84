//! Error kinds surfaced by the editor.
//!
//! Every `EditorError` is local and recoverable: the operation that raised it
//! is refused and the scene graph is left exactly as it was. Only a
//! `CatalogError` at session start is fatal.

use crate::id::ElementId;
use thiserror::Error;

/// A refused editor operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// The image behind `uri` failed to load or decode.
    #[error("image `{uri}` could not be loaded: {reason}")]
    InvalidAsset { uri: String, reason: String },

    /// A style or delete operation was attempted with nothing selected.
    #[error("no element is selected")]
    NoSelection,

    /// A text-only operation targeted a non-text element.
    #[error("element `{0}` is not a text element")]
    NotText(ElementId),

    /// An image-only operation targeted a non-image element.
    #[error("element `{0}` is not an image element")]
    NotImage(ElementId),

    #[error("font `{0}` is not in the configured font set")]
    FontNotAllowed(String),

    #[error("color `{0}` is not in the configured palette")]
    ColorNotAllowed(String),

    #[error("`{0}` is not a valid color")]
    InvalidColor(String),

    /// Font sizes must coerce to a positive number.
    #[error("`{0}` is not a valid font size")]
    InvalidFontSize(String),

    #[error("invalid element size {width}x{height}")]
    InvalidSize { width: f64, height: f64 },

    #[error("product `{0}` is not in the catalog")]
    UnknownProduct(String),

    /// Saving requires an active product.
    #[error("select a product before saving")]
    NoProductSelected,

    #[error("client name is required")]
    EmptyClientName,

    /// The flattening adapter failed. The editor state is untouched.
    #[error("export failed: {0}")]
    ExportFailure(String),

    /// The editor is locked while an export is capturing the scene.
    #[error("an export is in progress")]
    ExportInProgress,
}

/// Fatal failure to build an editor session from the catalog snapshot.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Nothing to personalize: the admin has not configured any product.
    #[error("no products are configured")]
    NoProducts,

    #[error("product `{0}` has an empty id")]
    EmptyProductId(String),
}
