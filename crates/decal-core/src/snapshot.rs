use crate::catalog::ProductId;
use crate::model::OverlayElement;
use serde::Serialize;

/// An immutable, fully owned copy of the scene's overlays at one point in
/// history, plus the product that was active.
///
/// The background image itself is not stored; it is re-resolved from
/// `product` against the catalog on restore.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    elements: Vec<OverlayElement>,
    product: Option<ProductId>,
}

impl HistoryEntry {
    pub fn new(elements: Vec<OverlayElement>, product: Option<ProductId>) -> Self {
        Self { elements, product }
    }

    pub fn elements(&self) -> &[OverlayElement] {
        &self.elements
    }

    pub fn product(&self) -> Option<&ProductId> {
        self.product.as_ref()
    }
}
