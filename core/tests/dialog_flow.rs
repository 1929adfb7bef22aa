use std::cell::RefCell;
use std::rc::Rc;

use kaiwabako_core::{
    ClampContext, DialogCore, DialogEvent, DialogHooks, DialogProp, Identity, Margins, UpdateError,
    BODY_SEED,
};

fn test_context() -> ClampContext {
    ClampContext {
        viewport_width: 1000,
        viewport_height: 800,
        element_width: 300,
        element_height: 260,
        offset_x: 0,
        offset_y: 0,
    }
}

fn build_dialog() -> (Rc<DialogCore>, Rc<RefCell<Vec<DialogEvent>>>) {
    let core = DialogCore::new(
        1,
        0,
        "Dialog Title".to_string(),
        Margins::default(),
        Identity::guest(),
    );
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    core.init(DialogHooks {
        on_event: Rc::new(move |event| sink.borrow_mut().push(event.clone())),
        on_apply: Rc::new(|_, _| {}),
    });
    core.set_clamp_context(test_context());
    core.mark_rendered();
    events.borrow_mut().clear();
    (core, events)
}

fn names(events: &[DialogEvent]) -> Vec<&'static str> {
    events.iter().map(|event| event.name()).collect()
}

#[test]
fn first_render_is_announced_once() {
    let core = DialogCore::new(
        7,
        0,
        "Dialog Title".to_string(),
        Margins::default(),
        Identity::guest(),
    );
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    core.init(DialogHooks {
        on_event: Rc::new(move |event| sink.borrow_mut().push(event.clone())),
        on_apply: Rc::new(|_, _| {}),
    });
    core.mark_rendered();
    core.mark_rendered();
    assert_eq!(names(&events.borrow()), vec!["rendered"]);
}

#[test]
fn update_before_render_is_refused_but_keeps_the_write() {
    let core = DialogCore::new(
        2,
        0,
        "Dialog Title".to_string(),
        Margins::default(),
        Identity::guest(),
    );
    let result = core.set_x(40);
    assert_eq!(result, Err(UpdateError::NotRendered(DialogProp::X)));
    assert_eq!(core.snapshot().x, 40);
}

#[test]
fn empty_send_changes_nothing() {
    let (core, events) = build_dialog();
    assert_eq!(core.send("").unwrap(), false);
    assert_eq!(core.snapshot().body, BODY_SEED);
    assert!(events.borrow().is_empty());
}

#[test]
fn send_appends_one_line_and_announces_once() {
    let (core, events) = build_dialog();
    assert!(core.send("hi").unwrap());

    let body = core.snapshot().body;
    assert_eq!(body, format!("{BODY_SEED}You: hi\n"));

    let events = events.borrow();
    assert_eq!(
        names(&events),
        vec!["updating", "updated", "send"],
        "one body update then one send"
    );
    match events.last().unwrap() {
        DialogEvent::Send { user, message } => {
            assert_eq!(user.name, "You");
            assert_eq!(message, "hi");
        }
        other => panic!("expected send, got {other:?}"),
    }
}

#[test]
fn receive_appends_sender_line() {
    let (core, events) = build_dialog();
    core.receive(Identity::new("Bob", "member", 9), "yo").unwrap();

    assert!(core.snapshot().body.ends_with("Bob: yo\n"));
    let received: Vec<_> = events
        .borrow()
        .iter()
        .filter(|event| event.name() == "received")
        .cloned()
        .collect();
    assert_eq!(received.len(), 1);
}

#[test]
fn hide_toggle_emits_hide_then_show() {
    let (core, events) = build_dialog();
    core.set_hide(true).unwrap();
    core.set_hide(false).unwrap();

    let visibility: Vec<&str> = events
        .borrow()
        .iter()
        .filter(|event| matches!(event, DialogEvent::Hide | DialogEvent::Show))
        .map(|event| event.name())
        .collect();
    assert_eq!(visibility, vec!["hide", "show"]);
    assert!(!core.snapshot().hide);
}

#[test]
fn position_updates_are_clamped() {
    let (core, _) = build_dialog();
    core.set_position(-500, 5000).unwrap();
    let state = core.snapshot();
    assert_eq!(state.x, 2);
    assert_eq!(state.y, 800 - 260 - 1 + 3);
}

#[test]
fn drag_captures_pointer_offset() {
    let (core, events) = build_dialog();
    core.set_position(100, 100).unwrap();
    events.borrow_mut().clear();

    core.begin_drag(50, 50);
    let state = core.snapshot();
    assert!(state.is_dragging);
    assert_eq!((state.x_diff, state.y_diff), (-50, -50));
    assert_eq!(names(&events.borrow()), vec!["moving"]);
}

#[test]
fn drag_move_targets_pointer_minus_offset_then_clamps() {
    let (core, _) = build_dialog();
    core.set_position(100, 100).unwrap();
    core.begin_drag(50, 50);

    assert!(core.drag_move(200, 200).unwrap());
    let state = core.snapshot();
    assert_eq!((state.x, state.y), (250, 250));
    assert!(state.stop_click);

    assert!(core.drag_move(5000, 5000).unwrap());
    let state = core.snapshot();
    assert_eq!(state.x, 1000 - 300 - 1 + 3);
    assert_eq!(state.y, 800 - 260 - 1 + 3);
}

#[test]
fn drag_move_without_session_is_ignored() {
    let (core, events) = build_dialog();
    assert!(!core.drag_move(10, 10).unwrap());
    assert!(events.borrow().is_empty());
}

#[test]
fn release_then_timer_emits_placed_and_clears_suppression() {
    let (core, events) = build_dialog();
    core.set_position(100, 100).unwrap();
    core.begin_drag(50, 50);
    core.drag_move(60, 60).unwrap();

    assert!(core.end_drag());
    assert!(!core.is_dragging());
    assert!(core.stop_click(), "suppression holds until the timer fires");

    core.finish_drag();
    assert!(!core.stop_click());
    assert_eq!(events.borrow().last().map(|event| event.name()), Some("placed"));
}

#[test]
fn release_without_session_reports_no_drag() {
    let (core, _) = build_dialog();
    assert!(!core.end_drag());
}

#[test]
fn resize_reclamps_current_position() {
    let (core, _) = build_dialog();
    core.set_position(600, 500).unwrap();

    let mut ctx = test_context();
    ctx.viewport_width = 640;
    ctx.viewport_height = 480;
    core.set_clamp_context(ctx);
    core.reclamp().unwrap();

    let state = core.snapshot();
    assert_eq!(state.x, 640 - 300 - 1 + 3);
    assert_eq!(state.y, 480 - 260 - 1 + 3);
}

#[test]
fn user_update_notifies_without_visual_side_effect() {
    let (core, events) = build_dialog();
    let applied = Rc::new(RefCell::new(Vec::new()));
    let applied_sink = applied.clone();
    let sink = events.clone();
    core.init(DialogHooks {
        on_event: Rc::new(move |event| sink.borrow_mut().push(event.clone())),
        on_apply: Rc::new(move |prop, _| applied_sink.borrow_mut().push(prop)),
    });

    core.set_user(Identity::new("Mika", "member", 3)).unwrap();
    assert_eq!(core.snapshot().user.name, "Mika");
    assert_eq!(*applied.borrow(), vec![DialogProp::User]);
}
