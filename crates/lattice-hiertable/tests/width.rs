//! Integration tests for the width cascade and readiness gating.

mod common;

use std::sync::Arc;

use common::{SharedStage, adapter, attach_host, hierarchy, key};
use lattice_hiertable::{HierLayoutConfig, HierarchyContainer, WidthChange};
use parking_lot::Mutex;

/// People, Visits, Tests.
fn three_levels() -> (HierarchyContainer, SharedStage) {
    let (mut hierarchy, stage) = hierarchy();
    hierarchy.set_nodes([adapter(1, "People"), adapter(2, "Visits"), adapter(3, "Tests")]);
    (hierarchy, stage)
}

/// Report widths for the outer and inner table and let deferred work run.
fn make_ready(hierarchy: &mut HierarchyContainer) {
    let (outer, inner) = (key(hierarchy, 1), key(hierarchy, 3));
    hierarchy.notify_width_changed(outer, 200.0);
    hierarchy.notify_width_changed(inner, 150.0);
    hierarchy.process_deferred();
}

#[test]
fn test_no_request_before_ready() {
    let (mut hierarchy, _stage) = three_levels();
    let frame = attach_host(&mut hierarchy, 1000.0);

    let change = hierarchy.notify_width_changed(key(&hierarchy, 1), 200.0);
    assert_eq!(
        change,
        Some(WidthChange::Applied {
            resize: None,
            became_ready: false,
        })
    );
    hierarchy.notify_width_changed(key(&hierarchy, 2), 90.0);
    hierarchy.process_deferred();

    assert!(!hierarchy.is_ready());
    assert!(frame.borrow().requests.is_empty());
    // The content width is still tracked while assembling.
    assert_eq!(hierarchy.container_max_width(), Some(200.0 + 90.0 + 60.0 + 96.0 + 2.0));
}

#[test]
fn test_rightmost_report_completes_construction() {
    let (mut hierarchy, _stage) = three_levels();
    let frame = attach_host(&mut hierarchy, 1000.0);
    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    hierarchy.ready_changed.connect(move |&ready| events_clone.lock().push(ready));

    hierarchy.notify_width_changed(key(&hierarchy, 1), 200.0);
    let change = hierarchy.notify_width_changed(key(&hierarchy, 3), 150.0);

    assert_eq!(
        change,
        Some(WidthChange::Applied {
            resize: None,
            became_ready: true,
        })
    );
    assert!(hierarchy.is_ready());
    assert_eq!(*events.lock(), vec![true]);
    // The first request waits for deferred work.
    assert!(frame.borrow().requests.is_empty());

    hierarchy.process_deferred();

    assert_eq!(frame.borrow().requests, vec![508.0]);
    assert_eq!(hierarchy.container_max_width(), Some(508.0));
}

#[test]
fn test_request_never_exceeds_frame() {
    let (mut hierarchy, _stage) = three_levels();
    let frame = attach_host(&mut hierarchy, 300.0);

    make_ready(&mut hierarchy);

    assert_eq!(frame.borrow().requests, vec![300.0]);
    assert_eq!(hierarchy.container_max_width(), Some(508.0));
}

#[test]
fn test_frame_only_shrinks() {
    let (mut hierarchy, _stage) = three_levels();
    let frame = attach_host(&mut hierarchy, 1000.0);
    make_ready(&mut hierarchy);

    let change = hierarchy.notify_width_changed(key(&hierarchy, 2), 100.0);
    assert_eq!(
        change,
        Some(WidthChange::Applied {
            resize: Some(508.0),
            became_ready: false,
        })
    );
    assert_eq!(hierarchy.container_max_width(), Some(548.0));

    // The user widens the frame; the next change may use the room.
    frame.borrow_mut().width = Some(2000.0);
    hierarchy.notify_width_changed(key(&hierarchy, 2), 110.0);

    assert_eq!(frame.borrow().requests, vec![508.0, 508.0, 558.0]);
}

#[test]
fn test_same_width_is_ignored() {
    let (mut hierarchy, _stage) = three_levels();
    let frame = attach_host(&mut hierarchy, 1000.0);
    make_ready(&mut hierarchy);
    let requests = frame.borrow().requests.len();

    let change = hierarchy.notify_width_changed(key(&hierarchy, 3), 150.0);

    assert_eq!(change, Some(WidthChange::Unchanged));
    assert!(!hierarchy.has_pending_work());
    assert_eq!(frame.borrow().requests.len(), requests);
}

#[test]
fn test_narrow_content_is_clamped() {
    let (mut hierarchy, _stage) = three_levels();
    let people = key(&hierarchy, 1);

    hierarchy.notify_width_changed(people, 12.0);

    let grid = hierarchy.grid(people).unwrap();
    assert_eq!(grid.maximum_width(), Some(12.0));
    assert_eq!(grid.size(), 60.0);
}

#[test]
fn test_unavailable_frame_retries_on_next_change() {
    let (mut hierarchy, _stage) = three_levels();
    let frame = attach_host(&mut hierarchy, 1000.0);
    make_ready(&mut hierarchy);
    frame.borrow_mut().unavailable = true;

    let change = hierarchy.notify_width_changed(key(&hierarchy, 2), 100.0);
    assert_eq!(
        change,
        Some(WidthChange::Applied {
            resize: None,
            became_ready: false,
        })
    );
    assert_eq!(frame.borrow().requests, vec![508.0]);

    frame.borrow_mut().unavailable = false;
    frame.borrow_mut().width = Some(1000.0);
    hierarchy.notify_width_changed(key(&hierarchy, 2), 120.0);

    assert_eq!(frame.borrow().requests, vec![508.0, 568.0]);
}

#[test]
fn test_without_host() {
    let (mut hierarchy, _stage) = three_levels();
    make_ready(&mut hierarchy);

    assert!(hierarchy.is_ready());
    assert_eq!(hierarchy.cascade_width(), None);
    assert_eq!(hierarchy.container_max_width(), Some(508.0));
}

#[test]
fn test_frame_without_width() {
    let (mut hierarchy, _stage) = three_levels();
    let frame = attach_host(&mut hierarchy, 1000.0);
    frame.borrow_mut().width = None;

    make_ready(&mut hierarchy);

    assert!(frame.borrow().requests.is_empty());
}

#[test]
fn test_resize_requested_signal() {
    let (mut hierarchy, _stage) = three_levels();
    attach_host(&mut hierarchy, 1000.0);
    let widths = Arc::new(Mutex::new(Vec::new()));
    let widths_clone = widths.clone();
    hierarchy.resize_requested.connect(move |&width| widths_clone.lock().push(width));

    make_ready(&mut hierarchy);
    hierarchy.notify_width_changed(key(&hierarchy, 1), 180.0);

    assert_eq!(*widths.lock(), vec![508.0, 488.0]);
}

#[test]
fn test_retile_reports_layout_width() {
    let (mut hierarchy, _stage) = three_levels();
    let layouts = Arc::new(Mutex::new(Vec::new()));
    let layouts_clone = layouts.clone();
    hierarchy.layout_changed.connect(move |&width| layouts_clone.lock().push(width));

    hierarchy.notify_width_changed(key(&hierarchy, 1), 200.0);
    assert!(layouts.lock().is_empty());
    hierarchy.process_deferred();

    assert_eq!(*layouts.lock(), vec![200.0 + 60.0 + 60.0 + 96.0 + 2.0]);
    assert_eq!(hierarchy.tiled_width(), hierarchy.layout_width());

    // Nothing moved, nothing reported.
    hierarchy.set_config(HierLayoutConfig::default());
    hierarchy.process_deferred();
    assert_eq!(layouts.lock().len(), 1);
}

#[test]
fn test_config_change_relays_out() {
    let (mut hierarchy, _stage) = three_levels();
    let frame = attach_host(&mut hierarchy, 1000.0);
    make_ready(&mut hierarchy);

    let config = HierLayoutConfig::builder().divider_width(20.0).build();
    hierarchy.set_config(config);
    assert!(hierarchy.has_pending_work());
    hierarchy.process_deferred();

    assert_eq!(hierarchy.layout_width(), 200.0 + 60.0 + 150.0 + 40.0 + 2.0);
    assert_eq!(frame.borrow().requests, vec![508.0, 452.0]);
}

#[test]
fn test_stale_key_width_change() {
    let (mut hierarchy, _stage) = three_levels();
    let stale = key(&hierarchy, 3);
    hierarchy.set_nodes([adapter(1, "People")]);

    assert_eq!(hierarchy.notify_width_changed(stale, 300.0), None);
}

#[test]
fn test_teardown_rearms_readiness() {
    let (mut hierarchy, _stage) = three_levels();
    make_ready(&mut hierarchy);
    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    hierarchy.ready_changed.connect(move |&ready| events_clone.lock().push(ready));

    hierarchy.teardown();

    assert!(!hierarchy.is_ready());
    assert_eq!(hierarchy.container_max_width(), None);
    assert_eq!(*events.lock(), vec![false]);

    hierarchy.set_nodes([adapter(4, "Orders")]);
    let orders = key(&hierarchy, 4);
    let change = hierarchy.notify_width_changed(orders, 90.0);
    assert_eq!(
        change,
        Some(WidthChange::Applied {
            resize: None,
            became_ready: true,
        })
    );
    assert_eq!(*events.lock(), vec![false, true]);
}

#[test]
fn test_emptying_rearms_readiness() {
    let (mut hierarchy, _stage) = three_levels();
    make_ready(&mut hierarchy);

    hierarchy.set_nodes(Vec::new());

    assert!(!hierarchy.is_ready());
    assert_eq!(hierarchy.layout_width(), 0.0);
}

#[test]
fn test_new_rightmost_after_ready_does_not_reset() {
    let (mut hierarchy, _stage) = three_levels();
    make_ready(&mut hierarchy);

    hierarchy.set_nodes([
        adapter(1, "People"),
        adapter(2, "Visits"),
        adapter(3, "Tests"),
        adapter(4, "Samples"),
    ]);
    let change = hierarchy.notify_width_changed(key(&hierarchy, 4), 80.0);

    assert!(hierarchy.is_ready());
    assert!(matches!(
        change,
        Some(WidthChange::Applied {
            became_ready: false,
            ..
        })
    ));
}
