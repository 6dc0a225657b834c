use std::cell::{Ref, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use sha1::{Digest, Sha1};
use tracing::{info, warn};

use crate::compiler::variables::variables_block;
use crate::error::CoreError;
use crate::geometry::rect::Size;
use crate::recorder::recorder::ActionRecorder;
use crate::recorder::step::{RecordedStep, Step};
use crate::scan::matcher::DEFAULT_TOLERANCE;
use crate::scan::scan_model::{ElementId, ScanPayload, ScanResult};
use crate::scan::source_tree::{parse_source_tree, NodeId, SourceTree};
use crate::selection::store::{SelectionStore, StoreChange, StoreField, SubscriptionId};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{TraceEvent, TraceKind};
use crate::view::list::ListRenderer;
use crate::view::overlay::OverlayRenderer;
use crate::view::renderer::{attach, ViewRenderer};
use crate::view::tree::TreeRenderer;

/// Which side panel is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    List,
    Source,
}

/// Non-blocking message for the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

/// Outcome of `ingest`.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub element_count: usize,
    pub node_count: usize,
    /// SHA-1 of the source tree text.
    pub source_fingerprint: String,
    pub page_name: Option<String>,
    /// Set when the source tree could not be parsed.
    pub notice: Option<Notice>,
}

// ============================================================================
// Inspector session: one active scan and its three views
// ============================================================================

/// Owns the selection store for the current scan and the three renderers
/// subscribed to it.
///
/// Scan handling is two-phase: `ingest` builds the store and source tree
/// synchronously; `present` draws the views once the caller's visual
/// surface is ready.
pub struct InspectorSession {
    store: SelectionStore,
    source: SourceTree,
    device: Size,
    tolerance: f64,
    view_mode: ViewMode,
    deleted_locators: HashSet<String>,
    overlay: Rc<RefCell<OverlayRenderer>>,
    list: Rc<RefCell<ListRenderer>>,
    tree: Rc<RefCell<TreeRenderer>>,
    tracer: Option<Rc<TraceLogger>>,
    tracer_subscription: Option<SubscriptionId>,
}

impl Default for InspectorSession {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl InspectorSession {
    pub fn new(tolerance: f64) -> Self {
        let mut session = Self {
            store: SelectionStore::new(Vec::new()),
            source: SourceTree::empty(),
            device: Size::default(),
            tolerance,
            view_mode: ViewMode::default(),
            deleted_locators: HashSet::new(),
            overlay: Rc::new(RefCell::new(OverlayRenderer::new())),
            list: Rc::new(RefCell::new(ListRenderer::new())),
            tree: Rc::new(RefCell::new(TreeRenderer::new(tolerance))),
            tracer: None,
            tracer_subscription: None,
        };
        session.apply_view_mode();
        session.wire_store();
        session
    }

    /// Record selection changes and scans to a JSONL trace. Replaces any
    /// tracer attached earlier.
    pub fn attach_tracer(&mut self, tracer: TraceLogger) {
        self.tracer = Some(Rc::new(tracer));
        self.wire_tracer();
    }

    pub fn tracer(&self) -> Option<&TraceLogger> {
        self.tracer.as_deref()
    }

    /// Ingest a backend payload, skipping elements whose locator was
    /// deleted earlier in this session.
    pub fn ingest_payload(&mut self, payload: ScanPayload) -> IngestReport {
        let deleted = &self.deleted_locators;
        let scan = ScanResult::from_payload(payload, |locator| deleted.contains(locator));
        self.ingest(scan)
    }

    /// Phase one: replace the store and parse the source tree. Nothing is
    /// drawn until `present`. A malformed source degrades to an empty tree
    /// with a notice.
    pub fn ingest(&mut self, scan: ScanResult) -> IngestReport {
        let source_fingerprint = fingerprint(&scan.source_tree_text);

        let (source, notice) = match parse_source_tree(&scan.source_tree_text) {
            Ok(tree) => (tree, None),
            Err(e) => {
                warn!(error = %e, "source tree rejected, showing an empty tree");
                let notice = Notice {
                    title: "Source unavailable".to_string(),
                    message: e.to_string(),
                };
                (SourceTree::empty(), Some(notice))
            }
        };

        self.overlay.borrow_mut().clear();
        self.list.borrow_mut().clear();
        self.tree.borrow_mut().clear();

        self.device = scan.device;
        self.source = source;
        self.store = SelectionStore::new(scan.elements);
        self.tracer_subscription = None;
        self.wire_store();
        self.wire_tracer();

        let report = IngestReport {
            element_count: self.store.elements().len(),
            node_count: self.source.len(),
            source_fingerprint,
            page_name: scan.page_name,
            notice,
        };

        info!(
            elements = report.element_count,
            nodes = report.node_count,
            fingerprint = %report.source_fingerprint,
            "scan ingested"
        );
        if let Some(tracer) = &self.tracer {
            tracer.log(
                &TraceEvent::now(TraceKind::ScanIngested)
                    .with_detail(format!("{} elements, {} nodes", report.element_count, report.node_count)),
            );
        }

        report
    }

    /// Phase two: draw all three views into a viewport. A zero viewport
    /// renders at device size.
    pub fn present(&mut self, viewport: Size) -> Result<(), CoreError> {
        if viewport.w < 0.0 || viewport.h < 0.0 || !viewport.w.is_finite() || !viewport.h.is_finite() {
            return Err(CoreError::InvalidViewport(format!("{}x{}", viewport.w, viewport.h)));
        }
        let viewport = if viewport.is_degenerate() {
            self.device
        } else {
            viewport
        };

        let elements = self.store.elements();
        {
            let mut overlay = self.overlay.borrow_mut();
            overlay.set_device_size(self.device);
            overlay.resize_viewport(viewport);
            overlay.render(elements)?;
        }
        self.list.borrow_mut().render(elements)?;
        {
            let mut tree = self.tree.borrow_mut();
            tree.load_source(self.source.clone());
            tree.render(elements)?;
        }

        // Re-apply a selection made before the views existed.
        let selected = self.store.selected();
        if selected.is_some() {
            self.overlay.borrow_mut().on_selection_changed(selected, None)?;
            self.list.borrow_mut().on_selection_changed(selected, None)?;
            self.tree.borrow_mut().on_selection_changed(selected, None)?;
        }
        Ok(())
    }

    pub fn resize_viewport(&mut self, viewport: Size) {
        self.overlay.borrow_mut().resize_viewport(viewport);
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.apply_view_mode();
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    pub fn select(&mut self, id: Option<ElementId>) -> Result<bool, CoreError> {
        self.store.set_selected(id)
    }

    pub fn clear_selection(&mut self) -> Result<bool, CoreError> {
        self.store.set_selected(None)
    }

    /// Click on the screen capture at viewport coordinates.
    pub fn select_at(&mut self, x: f64, y: f64) -> Result<Option<ElementId>, CoreError> {
        let hit = self.overlay.borrow().hit_test(x, y);
        if let Some(id) = hit {
            self.store.set_selected(Some(id))?;
        }
        Ok(hit)
    }

    /// Click on a source tree row. Rows without a matching element are
    /// ignored.
    pub fn select_tree_node(&mut self, node: NodeId) -> Result<Option<ElementId>, CoreError> {
        let element = self.tree.borrow().element_at(node);
        if let Some(id) = element {
            self.store.set_selected(Some(id))?;
        }
        Ok(element)
    }

    pub fn toggle_tree_node(&mut self, node: NodeId) -> Option<bool> {
        self.tree.borrow_mut().toggle(node)
    }

    /// Flag an element deleted and remember its locator for later scans.
    pub fn delete_element(&mut self, id: ElementId) -> Result<bool, CoreError> {
        let locator = self
            .store
            .element(id)
            .map(|el| el.locator_expression.clone())
            .ok_or(CoreError::UnknownElement(id))?;
        let changed = self.store.delete_element(id)?;
        if changed {
            self.deleted_locators.insert(locator);
        }
        Ok(changed)
    }

    /// Forget the current scan entirely.
    pub fn clear(&mut self) {
        self.store.clear();
        self.source = SourceTree::empty();
        self.device = Size::default();
        self.overlay.borrow_mut().clear();
        self.list.borrow_mut().clear();
        self.tree.borrow_mut().clear();
    }

    /// Hand a captured action to the recorder and trace it when accepted.
    pub fn record(&self, recorder: &mut ActionRecorder, step: Step) -> Option<RecordedStep> {
        let recorded = recorder.add_step(step)?.clone();
        if let Some(tracer) = &self.tracer {
            tracer.log(&TraceEvent::now(TraceKind::StepRecorded).with_step(&recorded));
        }
        Some(recorded)
    }

    /// Record a click on the selected element.
    pub fn record_selected_click(&self, recorder: &mut ActionRecorder) -> Option<RecordedStep> {
        let element = self.store.get().selected_element()?.clone();
        self.record(recorder, Step::element_click(&element))
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SelectionStore {
        &mut self.store
    }

    pub fn source(&self) -> &SourceTree {
        &self.source
    }

    pub fn device(&self) -> Size {
        self.device
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn overlay(&self) -> Ref<'_, OverlayRenderer> {
        self.overlay.borrow()
    }

    pub fn list(&self) -> Ref<'_, ListRenderer> {
        self.list.borrow()
    }

    pub fn tree(&self) -> Ref<'_, TreeRenderer> {
        self.tree.borrow()
    }

    pub fn is_locator_deleted(&self, locator: &str) -> bool {
        self.deleted_locators.contains(locator)
    }

    pub fn variables_block(&self) -> String {
        variables_block(self.store.elements())
    }

    fn apply_view_mode(&mut self) {
        self.list
            .borrow_mut()
            .set_visible(self.view_mode == ViewMode::List);
        self.tree
            .borrow_mut()
            .set_visible(self.view_mode == ViewMode::Source);
    }

    fn wire_store(&mut self) {
        attach(&mut self.store, &self.overlay);
        attach(&mut self.store, &self.list);
        attach(&mut self.store, &self.tree);
    }

    fn wire_tracer(&mut self) {
        if let Some(previous) = self.tracer_subscription.take() {
            self.store.unsubscribe(previous);
        }
        let Some(tracer) = self.tracer.clone() else {
            return;
        };
        let id = self.store.subscribe(StoreField::Selected, move |change| {
            if let StoreChange::Selected { new, old } = *change {
                tracer.log(&TraceEvent::now(TraceKind::SelectionChanged).with_selection(new, old));
            }
            Ok(())
        });
        self.tracer_subscription = Some(id);
    }
}

fn fingerprint(text: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
