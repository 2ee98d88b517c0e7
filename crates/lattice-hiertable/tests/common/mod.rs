//! Test doubles for the hierarchy collaborators.
//!
//! Every double records what the hierarchy asked of it into a shared
//! [`Stage`], and reads its scripted behavior from the same place.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use lattice_hiertable::{
    AdapterId, AdapterRef, CaseAdapter, DividerNode, GridKey, GridView, GridViewFactory,
    HierError, HierarchyContainer, HostFrame, RelationPainter, Result, ScrollEchoes,
    ViewportSnapshot,
};

/// A collection level.
#[derive(Debug)]
pub struct TestAdapter {
    pub id: AdapterId,
    pub name: String,
    pub cases: usize,
    pub width: f64,
    pub broken: bool,
}

impl CaseAdapter for TestAdapter {
    fn adapter_id(&self) -> AdapterId {
        self.id
    }

    fn collection_name(&self) -> &str {
        &self.name
    }

    fn case_count(&self) -> usize {
        self.cases
    }

    fn content_width(&self) -> f64 {
        self.width
    }

    fn validate(&self) -> Result<()> {
        if self.broken {
            Err(HierError::invalid_adapter(0, "collection was deleted"))
        } else {
            Ok(())
        }
    }
}

pub fn adapter(id: u64, name: &str) -> AdapterRef {
    Rc::new(TestAdapter {
        id: AdapterId::new(id),
        name: name.to_string(),
        cases: 10,
        width: 120.0,
        broken: false,
    })
}

pub fn broken_adapter(id: u64, name: &str) -> AdapterRef {
    Rc::new(TestAdapter {
        id: AdapterId::new(id),
        name: name.to_string(),
        cases: 0,
        width: 0.0,
        broken: true,
    })
}

/// A call made on a grid view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    AlignWithRight,
    AlignWithLeft,
    Refresh,
    RefreshScroll,
    UpdateColumnInfo,
    UpdateRowData,
    UpdateRowCount(bool),
    UpdateSelectedRows,
    ScrollSelectionIntoView,
    Teardown,
}

/// Shared record of calls plus scripted view behavior.
#[derive(Debug)]
pub struct Stage {
    pub calls: Vec<(AdapterId, Call)>,
    pub created: Vec<AdapterId>,
    /// Views listed here move (and report `true`) when asked to align.
    pub moves: HashSet<AdapterId>,
    /// Views listed here fail when asked to align.
    pub failing: HashSet<AdapterId>,
    /// Scroll events a view raises each time it moves.
    pub echoes_per_move: usize,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            created: Vec::new(),
            moves: HashSet::new(),
            failing: HashSet::new(),
            echoes_per_move: 1,
        }
    }
}

impl Stage {
    pub fn calls_to(&self, id: u64, call: Call) -> usize {
        let id = AdapterId::new(id);
        self.calls.iter().filter(|&&(who, c)| who == id && c == call).count()
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls.iter().filter(|&&(_, c)| c == call).count()
    }

    pub fn order_of(&self, call: Call) -> Vec<u64> {
        self.calls
            .iter()
            .filter(|&&(_, c)| c == call)
            .map(|&(who, _)| who.as_u64())
            .collect()
    }
}

pub type SharedStage = Rc<RefCell<Stage>>;

/// A grid view that records calls and follows the stage's script.
pub struct RecordingView {
    id: AdapterId,
    stage: SharedStage,
    top_row: usize,
}

impl RecordingView {
    fn align(&mut self, call: Call, anchor: &ViewportSnapshot, echoes: &mut ScrollEchoes) -> Result<bool> {
        let mut stage = self.stage.borrow_mut();
        stage.calls.push((self.id, call));
        if stage.failing.contains(&self.id) {
            return Err(HierError::alignment(0, "grid is not rendered"));
        }
        let moved = stage.moves.contains(&self.id);
        if moved {
            self.top_row = anchor.first_visible_row;
            for _ in 0..stage.echoes_per_move {
                echoes.raise();
            }
        }
        Ok(moved)
    }

    fn record(&self, call: Call) {
        self.stage.borrow_mut().calls.push((self.id, call));
    }
}

impl GridView for RecordingView {
    fn viewport(&self) -> ViewportSnapshot {
        ViewportSnapshot::new(self.top_row, self.top_row + 19, self.top_row as f64 * 20.0)
    }

    fn scroll_to_align_with_right(&mut self, right: &ViewportSnapshot, echoes: &mut ScrollEchoes) -> Result<bool> {
        self.align(Call::AlignWithRight, right, echoes)
    }

    fn scroll_to_align_with_left(&mut self, left: &ViewportSnapshot, echoes: &mut ScrollEchoes) -> Result<bool> {
        self.align(Call::AlignWithLeft, left, echoes)
    }

    fn refresh(&mut self) {
        self.record(Call::Refresh);
    }

    fn refresh_scroll(&mut self) {
        self.record(Call::RefreshScroll);
    }

    fn update_column_info(&mut self) {
        self.record(Call::UpdateColumnInfo);
    }

    fn update_row_data(&mut self) {
        self.record(Call::UpdateRowData);
    }

    fn update_row_count(&mut self, force_redraw: bool) {
        self.record(Call::UpdateRowCount(force_redraw));
    }

    fn update_selected_rows(&mut self) {
        self.record(Call::UpdateSelectedRows);
    }

    fn scroll_selection_into_view(&mut self) {
        self.record(Call::ScrollSelectionIntoView);
    }

    fn teardown(&mut self) {
        self.record(Call::Teardown);
    }
}

pub struct RecordingFactory {
    stage: SharedStage,
}

impl GridViewFactory for RecordingFactory {
    fn create_view(&mut self, adapter: &AdapterRef) -> Box<dyn GridView> {
        let id = adapter.adapter_id();
        self.stage.borrow_mut().created.push(id);
        Box::new(RecordingView {
            id,
            stage: self.stage.clone(),
            top_row: 0,
        })
    }
}

pub fn hierarchy() -> (HierarchyContainer, SharedStage) {
    init_tracing();
    let stage = SharedStage::default();
    let container = HierarchyContainer::new(RecordingFactory {
        stage: stage.clone(),
    });
    (container, stage)
}

/// Hosting frame state shared with the test.
#[derive(Debug, Default)]
pub struct FrameState {
    pub width: Option<f64>,
    pub requests: Vec<f64>,
    pub unavailable: bool,
}

pub struct RecordingHost {
    state: Rc<RefCell<FrameState>>,
}

impl HostFrame for RecordingHost {
    fn frame_width(&self) -> Option<f64> {
        self.state.borrow().width
    }

    fn request_width(&mut self, width: f64) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.unavailable {
            return Err(HierError::HostUnavailable);
        }
        state.requests.push(width);
        state.width = Some(width);
        Ok(())
    }
}

pub fn attach_host(container: &mut HierarchyContainer, width: f64) -> Rc<RefCell<FrameState>> {
    let state = Rc::new(RefCell::new(FrameState {
        width: Some(width),
        ..Default::default()
    }));
    container.set_host(Some(Box::new(RecordingHost {
        state: state.clone(),
    })));
    state
}

/// Records relation-line repaints as (left, right) pairs.
#[derive(Debug, Default)]
pub struct PainterState {
    pub repaints: Vec<(GridKey, GridKey)>,
    pub fail: bool,
}

pub struct RecordingPainter {
    state: Rc<RefCell<PainterState>>,
}

impl RelationPainter for RecordingPainter {
    fn repaint(&mut self, divider: &DividerNode, _left: &ViewportSnapshot, _right: &ViewportSnapshot) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail {
            return Err(HierError::divider_refresh("canvas lost"));
        }
        state.repaints.push((divider.left_table(), divider.right_table()));
        Ok(())
    }
}

pub fn attach_painter(container: &mut HierarchyContainer) -> Rc<RefCell<PainterState>> {
    let state = Rc::new(RefCell::new(PainterState::default()));
    container.set_relation_painter(Some(Box::new(RecordingPainter {
        state: state.clone(),
    })));
    state
}

/// Key of the table bound to adapter `id`.
pub fn key(container: &HierarchyContainer, id: u64) -> GridKey {
    container
        .grid_for_adapter(AdapterId::new(id))
        .expect("adapter has a table")
}

/// Check every structural invariant of the sequence.
pub fn assert_invariants(container: &HierarchyContainer) {
    use lattice_hiertable::HierNode;

    let sequence = container.sequence();
    let grids = container.grid_keys();
    let dividers = container.divider_keys();

    assert_eq!(container.grid_count(), grids.len());
    assert_eq!(container.divider_count(), dividers.len());
    assert_eq!(dividers.len(), grids.len().saturating_sub(1));
    assert_eq!(sequence.len(), grids.len() + dividers.len());

    for (i, node) in sequence.iter().enumerate() {
        match (i % 2, node) {
            (0, HierNode::Grid(_)) | (1, HierNode::Divider(_)) => {}
            _ => panic!("sequence does not alternate at {i}: {sequence:?}"),
        }
    }

    let rightmost: Vec<GridKey> = container
        .grids()
        .filter(|(_, grid)| grid.is_rightmost())
        .map(|(key, _)| key)
        .collect();
    assert_eq!(rightmost, grids.last().copied().into_iter().collect::<Vec<_>>());

    for (level, &key) in grids.iter().enumerate() {
        let grid = container.grid(key).unwrap();
        assert_eq!(grid.level(), level);
        assert_eq!(grid.parent(), level.checked_sub(1).map(|i| grids[i]));
        assert_eq!(grid.child(), grids.get(level + 1).copied());
    }

    for (i, &divider_key) in dividers.iter().enumerate() {
        let divider = container.divider(divider_key).unwrap();
        assert_eq!(divider.left_table(), grids[i]);
        assert_eq!(divider.right_table(), grids[i + 1]);
    }
}

pub fn by_id(container: &HierarchyContainer) -> HashMap<u64, GridKey> {
    container
        .grids()
        .map(|(key, grid)| (grid.adapter_id().as_u64(), key))
        .collect()
}

/// Route the crate's logs to the test harness, once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
