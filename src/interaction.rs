use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Event, KeyboardEvent, MouseEvent};

use crate::dialog::DialogChat;

// Release-after-drag looks like a click to the host page for a moment; the
// suppression flag holds until this delay elapses and `placed` goes out.
pub(crate) const PLACED_DELAY_MS: u32 = 100;

/// Listeners scoped to the rendered subtree. Rebuilt on every render, so the
/// old bindings drop with the old subtree.
pub(crate) fn element_listeners(dialog: &Rc<DialogChat>) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    let Some((header, close, input, send)) = dialog.binding_parts() else {
        return listeners;
    };

    let weak = Rc::downgrade(dialog);
    let listener = EventListener::new_with_options(
        &header,
        "mousedown",
        EventListenerOptions {
            phase: EventListenerPhase::Bubble,
            passive: false,
        },
        move |event: &Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let Some(dialog) = weak.upgrade() else {
                return;
            };
            event.prevent_default();
            dialog.start_drag_session(event.page_x(), event.page_y());
        },
    );
    listeners.push(listener);

    let weak = Rc::downgrade(dialog);
    let listener = EventListener::new(&send, "click", move |event: &Event| {
        let Some(dialog) = weak.upgrade() else {
            return;
        };
        event.prevent_default();
        dialog.send_current();
    });
    listeners.push(listener);

    let weak = Rc::downgrade(dialog);
    let listener = EventListener::new(&input, "keydown", move |event: &Event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if event.code() != "Enter" {
            return;
        }
        let Some(dialog) = weak.upgrade() else {
            return;
        };
        event.prevent_default();
        dialog.send_current();
    });
    listeners.push(listener);

    let weak = Rc::downgrade(dialog);
    let listener = EventListener::new(&close, "click", move |_event: &Event| {
        if let Some(dialog) = weak.upgrade() {
            dialog.close();
        }
    });
    listeners.push(listener);

    let weak = Rc::downgrade(dialog);
    let listener = EventListener::new(dialog.root(), "focus", move |_event: &Event| {
        if let Some(dialog) = weak.upgrade() {
            dialog.claim_top();
        }
    });
    listeners.push(listener);

    listeners
}

/// Page-level listeners shared by a drag session: move/release on the
/// document, reclamp on viewport resize. Installed once per instance, on
/// first render, so re-renders never accumulate them.
pub(crate) fn page_listeners(dialog: &Rc<DialogChat>) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    let document = dialog.document().clone();
    let window = dialog.window().clone();

    let weak = Rc::downgrade(dialog);
    let listener = EventListener::new(&document, "mousemove", move |event: &Event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        if let Some(dialog) = weak.upgrade() {
            dialog.drag_to(event.page_x(), event.page_y());
        }
    });
    listeners.push(listener);

    let weak = Rc::downgrade(dialog);
    let listener = EventListener::new_with_options(
        &document,
        "mouseup",
        EventListenerOptions {
            phase: EventListenerPhase::Bubble,
            passive: false,
        },
        move |event: &Event| {
            let Some(dialog) = weak.upgrade() else {
                return;
            };
            if !dialog.end_drag_session() {
                return;
            }
            event.prevent_default();
            let weak = weak.clone();
            Timeout::new(PLACED_DELAY_MS, move || {
                if let Some(dialog) = weak.upgrade() {
                    dialog.finish_drag_session();
                }
            })
            .forget();
        },
    );
    listeners.push(listener);

    let weak = Rc::downgrade(dialog);
    let listener = EventListener::new(&window, "resize", move |_event: &Event| {
        if let Some(dialog) = weak.upgrade() {
            dialog.refresh_clamp();
        }
    });
    listeners.push(listener);

    listeners
}
