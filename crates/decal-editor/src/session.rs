//! The editor session: one scene, its history, and the gesture controller.
//!
//! All UI actions go through [`Editor`]. Every mutating action first ends
//! any in-place text edit (committing it if changed) and is refused with
//! [`EditorError::ExportInProgress`] while an export holds the lock.

use crate::config::EditorConfig;
use crate::export::{ExportReceipt, Flattener, PendingExport};
use crate::history::HistoryManager;
use crate::input::InputEvent;
use crate::interaction::{Effect, Effects, GestureState, InteractionController};
use crate::style::StyleApplicator;
use decal_core::{
    Background, Catalog, CatalogError, EditorError, ElementId, EstimatedMetrics, FontSpec,
    NewElement, ProductId, SceneGraph, Size, TextMeasure, Viewport,
};
use decal_render::{RenderTree, hit_test};

/// Outcome of the host's attempt to load an image asset.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageLoad {
    Decoded { width: f64, height: f64 },
    Failed(String),
}

pub struct Editor {
    scene: SceneGraph,
    history: HistoryManager,
    controller: InteractionController,
    catalog: Catalog,
    config: EditorConfig,
    metrics: Box<dyn TextMeasure>,
    export: Option<PendingExport>,
}

fn warn(err: &EditorError) {
    log::warn!("refused: {err}");
}

impl Editor {
    /// Start a session with estimated text metrics.
    ///
    /// # Errors
    /// Fails only when the catalog cannot support a session.
    pub fn new(catalog: Catalog, config: EditorConfig) -> Result<Self, CatalogError> {
        Self::with_metrics(catalog, config, Box::new(EstimatedMetrics))
    }

    pub fn with_metrics(
        catalog: Catalog,
        config: EditorConfig,
        metrics: Box<dyn TextMeasure>,
    ) -> Result<Self, CatalogError> {
        catalog.validate()?;
        let mut scene = SceneGraph::with_placement(config.viewport(), config.placement());
        if let Some(id) = &config.initial_product
            && catalog.product(id).is_none()
        {
            log::warn!("initial product `{id}` not in catalog, using default background");
        }
        scene.set_background(Background::resolve(
            &catalog,
            config.initial_product.as_ref(),
        ));

        let mut history = HistoryManager::new(config.history_capacity);
        history.commit(scene.serialize_snapshot());
        log::info!(
            "editor started: {} products, {}x{} canvas",
            catalog.products.len(),
            config.canvas_width,
            config.canvas_height
        );

        Ok(Self {
            scene,
            history,
            controller: InteractionController::new(config.long_press_ms),
            catalog,
            config,
            metrics,
            export: None,
        })
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn gesture(&self) -> &GestureState {
        self.controller.state()
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.scene.selected()
    }

    /// The text element open for in-place editing, if any.
    pub fn editing(&self) -> Option<ElementId> {
        self.controller.editing()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_exporting(&self) -> bool {
        self.export.is_some()
    }

    pub fn current_product(&self) -> Option<&ProductId> {
        self.scene.background.product.as_ref()
    }

    pub fn render_tree(&self) -> RenderTree {
        RenderTree::from_scene(&self.scene, &self.catalog)
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Feed one input event. Returns whether the scene changed.
    pub fn handle(&mut self, event: &InputEvent) -> Result<bool, EditorError> {
        self.ensure_unlocked()?;
        let hit = event
            .position()
            .and_then(|p| hit_test(&self.scene, p.x, p.y));
        let effects = self.controller.handle(event, hit, &self.scene);
        Ok(self.apply(effects))
    }

    // ─── Scene actions ───────────────────────────────────────────────────

    /// Add a text element with the configured default content, the first
    /// catalog font and the first palette color, centered on the canvas.
    pub fn add_text(&mut self) -> Result<ElementId, EditorError> {
        self.ensure_unlocked()?;
        self.settle();
        let attrs = NewElement::Text {
            content: self.config.default_text.clone(),
            font: FontSpec::new(self.catalog.default_font(), self.config.default_font_size),
            color: self.catalog.default_color(),
        };
        let id = self.scene.add_element(attrs, self.metrics.as_ref());
        self.commit("add text");
        Ok(id)
    }

    /// Add an image once the host has tried to load it. A failed or empty
    /// load leaves the scene untouched.
    pub fn add_image(&mut self, source: &str, load: ImageLoad) -> Result<ElementId, EditorError> {
        self.ensure_unlocked()?;
        let invalid = |reason: &str| EditorError::InvalidAsset {
            uri: source.to_string(),
            reason: reason.to_string(),
        };
        let checked = match load {
            _ if source.trim().is_empty() => Err(invalid("empty source")),
            ImageLoad::Failed(reason) => Err(invalid(&reason)),
            ImageLoad::Decoded { width, height } if !(width > 0.0 && height > 0.0) => {
                Err(invalid("image has no pixels"))
            }
            ImageLoad::Decoded { .. } => Ok(()),
        };
        checked.inspect_err(warn)?;

        self.settle();
        let side = self.config.image_size;
        let id = self.scene.add_element(
            NewElement::Image {
                source: source.to_string(),
                size: Size::new(side, side),
            },
            self.metrics.as_ref(),
        );
        self.commit("add image");
        Ok(id)
    }

    pub fn delete_selected(&mut self) -> Result<ElementId, EditorError> {
        self.ensure_unlocked()?;
        self.settle();
        let id = self.scene.selected().ok_or(EditorError::NoSelection)?;
        self.scene.remove_element(id);
        self.commit("delete");
        Ok(id)
    }

    /// Change the selection. Not a history step.
    pub fn select(&mut self, id: Option<ElementId>) -> Result<(), EditorError> {
        self.ensure_unlocked()?;
        self.settle();
        self.scene.select(id);
        Ok(())
    }

    /// Resize the selected image.
    pub fn resize_selected(&mut self, width: f64, height: f64) -> Result<(), EditorError> {
        self.ensure_unlocked()?;
        self.settle();
        let element = self
            .scene
            .selected_element()
            .ok_or(EditorError::NoSelection)?;
        if element.is_text() {
            return Err(EditorError::NotImage(element.id)).inspect_err(warn);
        }
        let id = element.id;
        if self.scene.resize_element(id, Size::new(width, height)).is_none() {
            return Err(EditorError::InvalidSize { width, height }).inspect_err(warn);
        }
        self.commit("resize");
        Ok(())
    }

    /// Swap the background to a catalog product.
    pub fn select_product(&mut self, id: &str) -> Result<(), EditorError> {
        self.ensure_unlocked()?;
        let id = ProductId::new(id.trim());
        if self.catalog.product(&id).is_none() {
            return Err(EditorError::UnknownProduct(id.to_string())).inspect_err(warn);
        }
        self.settle();
        if self.current_product() == Some(&id) {
            return Ok(());
        }
        self.scene
            .set_background(Background::resolve(&self.catalog, Some(&id)));
        self.commit("product");
        Ok(())
    }

    /// Host canvas resized. Existing elements keep their positions.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) -> Result<(), EditorError> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(EditorError::InvalidSize { width, height }).inspect_err(warn);
        }
        self.scene.canvas = Viewport::new(width, height);
        Ok(())
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        self.ensure_unlocked()?;
        self.settle();
        let Some(entry) = self.history.undo() else {
            return Ok(false);
        };
        self.scene.restore_snapshot(entry, &self.catalog);
        log::debug!("undo -> {:?}", self.history.cursor());
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        self.ensure_unlocked()?;
        self.settle();
        let Some(entry) = self.history.redo() else {
            return Ok(false);
        };
        self.scene.restore_snapshot(entry, &self.catalog);
        log::debug!("redo -> {:?}", self.history.cursor());
        Ok(true)
    }

    /// Drop every overlay and all history, back to the catalog background.
    pub fn reset(&mut self) -> Result<(), EditorError> {
        self.ensure_unlocked()?;
        self.controller.reset();
        self.scene.clear();
        self.scene
            .set_background(Background::from_catalog(&self.catalog));
        self.history.clear();
        self.commit("reset");
        Ok(())
    }

    // ─── Style ───────────────────────────────────────────────────────────

    pub fn set_font(&mut self, family: &str) -> Result<bool, EditorError> {
        self.style()?.set_font(family).inspect_err(warn)
    }

    pub fn set_color(&mut self, color: &str) -> Result<bool, EditorError> {
        self.style()?.set_color(color).inspect_err(warn)
    }

    pub fn set_font_size(&mut self, size: &str) -> Result<bool, EditorError> {
        self.style()?.set_font_size(size).inspect_err(warn)
    }

    fn style(&mut self) -> Result<StyleApplicator<'_>, EditorError> {
        self.ensure_unlocked()?;
        self.settle();
        Ok(StyleApplicator {
            scene: &mut self.scene,
            history: &mut self.history,
            catalog: &self.catalog,
            metrics: self.metrics.as_ref(),
        })
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Validate the save request, lock the editor and return the tree to
    /// flatten. Pair with [`Editor::finish_export`].
    pub fn begin_export(&mut self, client_name: &str) -> Result<RenderTree, EditorError> {
        self.ensure_unlocked()?;
        let client_name = client_name.trim();
        if client_name.is_empty() {
            return Err(EditorError::EmptyClientName).inspect_err(warn);
        }
        let product = self
            .scene
            .background
            .product
            .as_ref()
            .and_then(|id| self.catalog.product(id))
            .ok_or(EditorError::NoProductSelected)
            .inspect_err(warn)?
            .clone();

        self.settle();
        let mut tree = self.render_tree();
        tree.selected = None;
        self.export = Some(PendingExport {
            client_name: client_name.to_string(),
            product_id: product.id,
            product_name: product.name,
            elements: self.scene.elements().to_vec(),
        });
        log::info!("export started for `{client_name}`");
        Ok(tree)
    }

    /// Release the export lock with the flattener's outcome. The scene and
    /// history are unchanged either way.
    pub fn finish_export(
        &mut self,
        result: Result<String, String>,
        timestamp_ms: u64,
    ) -> Result<ExportReceipt, EditorError> {
        let pending = self
            .export
            .take()
            .ok_or_else(|| EditorError::ExportFailure("no export in progress".into()))?;
        let image = result
            .and_then(|token| {
                if token.is_empty() {
                    Err("flattener returned an empty image".to_string())
                } else {
                    Ok(token)
                }
            })
            .map_err(EditorError::ExportFailure)
            .inspect_err(warn)?;
        log::info!("export finished for `{}`", pending.client_name);
        Ok(ExportReceipt {
            record: pending.into_record(image, timestamp_ms),
        })
    }

    /// Validate, flatten and package the design in one call.
    pub fn save(
        &mut self,
        client_name: &str,
        flattener: &mut dyn Flattener,
        timestamp_ms: u64,
    ) -> Result<ExportReceipt, EditorError> {
        let tree = self.begin_export(client_name)?;
        let result = flattener.flatten(&tree, client_name.trim());
        self.finish_export(result, timestamp_ms)
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn ensure_unlocked(&self) -> Result<(), EditorError> {
        if self.export.is_some() {
            return Err(EditorError::ExportInProgress).inspect_err(warn);
        }
        Ok(())
    }

    /// Close any in-place text edit before another action.
    /// End the gesture in flight so no press or drag outlives an action.
    fn settle(&mut self) {
        let effects = self.controller.interrupt();
        self.apply(effects);
    }

    fn commit(&mut self, label: &str) {
        self.history.commit(self.scene.serialize_snapshot());
        log::debug!(
            "commit `{label}` ({} entries, {} elements)",
            self.history.len(),
            self.scene.len()
        );
    }

    fn apply(&mut self, effects: Effects) -> bool {
        let changed = !effects.is_empty();
        for effect in effects {
            match effect {
                Effect::Select(id) => self.scene.select(id),
                Effect::Move { id, position } => {
                    if let Some(applied) = self.scene.move_element(id, position) {
                        log::trace!("move {id} -> ({:.1}, {:.1})", applied.x, applied.y);
                    }
                }
                Effect::SetText { id, content } => {
                    self.scene.set_text(id, &content, self.metrics.as_ref());
                }
                Effect::Commit(label) => self.commit(label),
            }
        }
        changed
    }
}
