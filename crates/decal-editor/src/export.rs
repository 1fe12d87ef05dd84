//! The export boundary.
//!
//! Flattening the scene into a raster image is the host's job; the editor
//! only hands a [`RenderTree`] to a [`Flattener`] and packages the result
//! into a [`DesignRecord`] for persistence.

use decal_core::{OverlayElement, ProductId};
use decal_render::RenderTree;
use serde::{Deserialize, Serialize};

/// Rasterizes a render tree into an opaque image token (typically a PNG
/// data URL).
pub trait Flattener {
    /// # Errors
    /// Any adapter failure, described for display. The editor reports it
    /// as [`decal_core::EditorError::ExportFailure`].
    fn flatten(&mut self, tree: &RenderTree, client_name: &str) -> Result<String, String>;
}

impl<F> Flattener for F
where
    F: FnMut(&RenderTree, &str) -> Result<String, String>,
{
    fn flatten(&mut self, tree: &RenderTree, client_name: &str) -> Result<String, String> {
        self(tree, client_name)
    }
}

/// A saved design, ready for the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRecord {
    pub client_name: String,
    pub product_id: ProductId,
    pub product_name: String,
    /// Opaque token returned by the flattener.
    pub image: String,
    /// Overlays at export time, for re-editing.
    pub elements: Vec<OverlayElement>,
    pub timestamp_ms: u64,
}

impl DesignRecord {
    pub fn to_msgpack(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        rmp_serde::to_vec_named(self)
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, rmp_serde::decode::Error> {
        rmp_serde::from_slice(bytes)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportReceipt {
    pub record: DesignRecord,
}

impl ExportReceipt {
    pub fn token(&self) -> &str {
        &self.record.image
    }
}

/// What the editor remembers between `begin_export` and `finish_export`.
#[derive(Debug, Clone)]
pub(crate) struct PendingExport {
    pub client_name: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub elements: Vec<OverlayElement>,
}

impl PendingExport {
    pub fn into_record(self, image: String, timestamp_ms: u64) -> DesignRecord {
        DesignRecord {
            client_name: self.client_name,
            product_id: self.product_id,
            product_name: self.product_name,
            image,
            elements: self.elements,
            timestamp_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decal_core::{ElementId, ElementKind, ImageElement, Point, Size};
    use pretty_assertions::assert_eq;

    fn record() -> DesignRecord {
        DesignRecord {
            client_name: "Ana".into(),
            product_id: ProductId::new("mug"),
            product_name: "Mug".into(),
            image: "data:image/png;base64,AAAA".into(),
            elements: vec![OverlayElement {
                id: ElementId::intern("image_export"),
                kind: ElementKind::Image(ImageElement {
                    source: "star.png".into(),
                }),
                position: Point::new(1.0, 2.0),
                size: Size::new(3.0, 4.0),
            }],
            timestamp_ms: 1_700_000_000_000,
        }
    }

    #[test]
    fn msgpack_preserves_record() {
        let record = record();
        let bytes = record.to_msgpack().unwrap();
        assert_eq!(DesignRecord::from_msgpack(&bytes).unwrap(), record);
    }

    #[test]
    fn json_uses_camel_case() {
        let json: serde_json::Value = serde_json::from_str(&record().to_json().unwrap()).unwrap();
        assert_eq!(json["clientName"], "Ana");
        assert_eq!(json["productId"], "mug");
        assert_eq!(json["elements"][0]["id"], "image_export");
    }
}
