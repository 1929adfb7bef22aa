use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;
use web_sys::{CustomEvent, CustomEventInit, Element};

use kaiwabako_core::{DialogEvent, DialogId, Identity};

/// Broadcasts a notification from the dialog root as DOM CustomEvents.
/// Update notifications go out twice: `updating` then `updating.<prop>`, but
/// `updated.<prop>` then `updated` — the order hosts already listen for.
pub(crate) fn dispatch(root: &Element, id: DialogId, event: &DialogEvent) {
    let detail = build_detail(root, id, event);
    match event {
        DialogEvent::Updating(_) => {
            fire(root, event.name(), &detail);
            if let Some(name) = event.qualified_name() {
                fire(root, &name, &detail);
            }
        }
        DialogEvent::Updated(_) => {
            if let Some(name) = event.qualified_name() {
                fire(root, &name, &detail);
            }
            fire(root, event.name(), &detail);
        }
        _ => fire(root, event.name(), &detail),
    }
}

fn build_detail(root: &Element, id: DialogId, event: &DialogEvent) -> Object {
    let detail = Object::new();
    set(&detail, "id", &JsValue::from_f64(f64::from(id)));
    set(&detail, "element", &JsValue::from(root.clone()));
    match event {
        DialogEvent::Updating(prop) | DialogEvent::Updated(prop) => {
            set(&detail, "prop", &JsValue::from_str(prop.as_str()));
        }
        DialogEvent::Send { user, message } | DialogEvent::Received { user, message } => {
            set(&detail, "user", &identity_value(user));
            set(&detail, "message", &JsValue::from_str(message));
        }
        _ => {}
    }
    detail
}

fn identity_value(user: &Identity) -> JsValue {
    let value = Object::new();
    set(&value, "name", &JsValue::from_str(&user.name));
    set(&value, "type", &JsValue::from_str(&user.kind));
    set(&value, "id", &JsValue::from_f64(user.id as f64));
    value.into()
}

fn set(target: &Object, key: &str, value: &JsValue) {
    let _ = Reflect::set(target, &JsValue::from_str(key), value);
}

fn fire(root: &Element, name: &str, detail: &Object) {
    let init = CustomEventInit::new();
    init.set_detail(detail);
    let Ok(event) = CustomEvent::new_with_event_init_dict(name, &init) else {
        return;
    };
    let _ = root.dispatch_event(&event);
}
