use std::cell::RefCell;
use std::rc::Rc;

use gloo::console;
use gloo::events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Window};

use kaiwabako_core::{
    DialogCore, DialogHooks, DialogId, DialogProp, DialogState, Identity, Margins, UpdateError,
    DEFAULT_TITLE,
};

use crate::emitter;
use crate::identity::IdentityProvider;
use crate::interaction;
use crate::manager::DialogManager;
use crate::view::{self, DialogParts};

/// Construction-time configuration. A missing title falls back to the host
/// element's `title` attribute, then to the stock default.
#[derive(Clone, Debug, Default)]
pub struct DialogConfig {
    pub title: Option<String>,
    pub margins: Margins,
}

/// One mounted chat dialog: a movable titled panel with a scrollback log and
/// a message-input footer, rendered into the host page and announced to it
/// via CustomEvents on the widget root.
pub struct DialogChat {
    window: Window,
    document: Document,
    root: HtmlElement,
    core: Rc<DialogCore>,
    manager: Rc<DialogManager>,
    identity: Option<Rc<dyn IdentityProvider>>,
    parts: RefCell<Option<DialogParts>>,
    listeners: RefCell<Vec<EventListener>>,
    page_listeners: RefCell<Vec<EventListener>>,
}

impl DialogChat {
    /// Builds the widget under `parent`, registers it with the manager,
    /// mirrors the identity collaborator if one is given, and runs the first
    /// render.
    pub fn mount(
        parent: &Element,
        config: DialogConfig,
        manager: Rc<DialogManager>,
        identity: Option<Rc<dyn IdentityProvider>>,
    ) -> Result<Rc<Self>, JsValue> {
        let document = parent
            .owner_document()
            .ok_or_else(|| JsValue::from_str("host element is not attached to a document"))?;
        let window = document
            .default_view()
            .ok_or_else(|| JsValue::from_str("document has no window"))?;

        let entry = manager.register();
        let title = config
            .title
            .or_else(|| parent.get_attribute("title"))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let user = identity
            .as_ref()
            .and_then(|provider| provider.current_user())
            .unwrap_or_else(Identity::guest);
        let core = DialogCore::new(entry.id, entry.z, title, config.margins, user);

        let root: HtmlElement = document.create_element("div")?.dyn_into()?;
        root.set_id(&format!("kaiwabako-dialog-{}", entry.id));
        let _ = root.set_attribute("tabindex", "0");
        parent.append_child(&root)?;

        let dialog = Rc::new(Self {
            window,
            document,
            root,
            core,
            manager: manager.clone(),
            identity,
            parts: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            page_listeners: RefCell::new(Vec::new()),
        });

        let emit_root = dialog.root.clone();
        let emit_id = entry.id;
        let weak = Rc::downgrade(&dialog);
        dialog.core.init(DialogHooks {
            on_event: Rc::new(move |event| {
                emitter::dispatch(&emit_root, emit_id, event);
            }),
            on_apply: Rc::new(move |prop, state| {
                if let Some(dialog) = weak.upgrade() {
                    dialog.apply(prop, state);
                }
            }),
        });

        let weak = Rc::downgrade(&dialog);
        manager.add_z_hook(
            entry.id,
            Rc::new(move |z| {
                if let Some(dialog) = weak.upgrade() {
                    dialog.report(dialog.core.set_z(z));
                }
            }),
        );

        if let Some(provider) = dialog.identity.clone() {
            let weak = Rc::downgrade(&dialog);
            provider.on_user_changed(Rc::new(move |user| {
                if let Some(dialog) = weak.upgrade() {
                    dialog.report(
                        dialog
                            .core
                            .set_user(user.unwrap_or_else(Identity::guest)),
                    );
                }
            }));
        }

        dialog.render()?;
        Ok(dialog)
    }

    /// Rebuilds the visual subtree and rebinds its listeners. Idempotent:
    /// the old subtree and its bindings are dropped, and the shared
    /// move/release/resize listeners are only installed on the first run.
    pub fn render(self: &Rc<Self>) -> Result<(), JsValue> {
        let state = self.core.snapshot();
        let parts = view::build(&self.document, &self.root, &state)?;
        *self.parts.borrow_mut() = Some(parts);
        view::apply_position(&self.root, state.x, state.y);
        view::apply_stacking(&self.root, state.z);
        view::apply_visibility(&self.root, state.hide);

        *self.listeners.borrow_mut() = interaction::element_listeners(self);

        let ctx = view::measure_context(&self.window, &self.document, &self.root);
        self.core.set_clamp_context(ctx);

        if !state.rendered {
            *self.page_listeners.borrow_mut() = interaction::page_listeners(self);
            self.core.mark_rendered();
        } else {
            self.report(self.core.reclamp());
        }
        Ok(())
    }

    /// Removes the widget from the page and deregisters it so stacking and
    /// the shared listeners do not leak.
    pub fn unmount(&self) {
        self.manager.deregister(self.id());
        self.listeners.borrow_mut().clear();
        self.page_listeners.borrow_mut().clear();
        *self.parts.borrow_mut() = None;
        self.root.remove();
    }

    pub fn id(&self) -> DialogId {
        self.core.id()
    }

    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    pub fn state(&self) -> DialogState {
        self.core.snapshot()
    }

    pub fn open(&self) {
        self.report(self.core.set_hide(false));
    }

    pub fn show(&self) {
        self.open();
    }

    pub fn close(&self) {
        self.report(self.core.set_hide(true));
    }

    pub fn hide(&self) {
        self.close();
    }

    pub fn is_hidden(&self) -> bool {
        self.core.snapshot().hide
    }

    pub fn set_hide(&self, hide: bool) {
        self.report(self.core.set_hide(hide));
    }

    pub fn title(&self) -> String {
        self.core.snapshot().title
    }

    pub fn set_title(&self, title: &str) {
        self.report(self.core.set_title(title));
    }

    pub fn body(&self) -> String {
        self.core.snapshot().body
    }

    pub fn set_body(&self, body: &str) {
        self.report(self.core.set_body(body));
    }

    pub fn x(&self) -> i32 {
        self.core.snapshot().x
    }

    pub fn set_x(&self, x: i32) {
        self.report(self.core.set_x(x));
    }

    pub fn y(&self) -> i32 {
        self.core.snapshot().y
    }

    pub fn set_y(&self, y: i32) {
        self.report(self.core.set_y(y));
    }

    pub fn set_position(&self, x: i32, y: i32) {
        self.report(self.core.set_position(x, y));
    }

    pub fn z(&self) -> usize {
        self.core.snapshot().z
    }

    pub fn set_z(&self, z: usize) {
        self.report(self.core.set_z(z));
    }

    pub fn user(&self) -> Identity {
        self.core.snapshot().user
    }

    pub fn set_user(&self, user: Identity) {
        self.report(self.core.set_user(user));
    }

    pub fn is_dragging(&self) -> bool {
        self.core.is_dragging()
    }

    /// Click-suppression flag armed during a drag and cleared by the release
    /// timer. Nothing inside the widget consumes it; hosts may.
    pub fn stop_click(&self) -> bool {
        self.core.stop_click()
    }

    /// Raises this dialog above every other one registered with the manager.
    pub fn claim_top(&self) {
        self.manager.claim_top(self.id());
    }

    /// Programmatic send; returns whether a non-empty message went out.
    pub fn send(&self, message: &str) -> bool {
        match self.core.send(message) {
            Ok(sent) => sent,
            Err(err) => {
                console::error!(err.to_string());
                false
            }
        }
    }

    /// A message delivered by the host's transport.
    pub fn receive(&self, user: Identity, message: &str) {
        self.report(self.core.receive(user, message));
    }

    /// Submits whatever is in the input box and clears it on success.
    pub fn send_current(&self) {
        let Some(input) = self
            .parts
            .borrow()
            .as_ref()
            .map(|parts| parts.input.clone())
        else {
            return;
        };
        let message = input.value();
        if self.send(&message) {
            input.set_value("");
        }
    }

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn binding_parts(
        &self,
    ) -> Option<(Element, Element, HtmlInputElement, Element)> {
        self.parts.borrow().as_ref().map(|parts| {
            (
                parts.header.clone(),
                parts.close.clone(),
                parts.input.clone(),
                parts.send.clone(),
            )
        })
    }

    pub(crate) fn start_drag_session(&self, page_x: i32, page_y: i32) {
        self.core.begin_drag(page_x, page_y);
        self.manager.claim_top(self.id());
    }

    pub(crate) fn drag_to(&self, page_x: i32, page_y: i32) {
        self.report(self.core.drag_move(page_x, page_y));
    }

    pub(crate) fn end_drag_session(&self) -> bool {
        self.core.end_drag()
    }

    pub(crate) fn finish_drag_session(&self) {
        self.core.finish_drag();
    }

    /// Re-measures after a viewport resize and reclamps the position.
    pub(crate) fn refresh_clamp(&self) {
        let ctx = view::measure_context(&self.window, &self.document, &self.root);
        self.core.set_clamp_context(ctx);
        self.report(self.core.reclamp());
    }

    fn apply(&self, prop: DialogProp, state: &DialogState) {
        match prop {
            DialogProp::X | DialogProp::Y => {
                view::apply_position(&self.root, state.x, state.y);
            }
            DialogProp::Z => view::apply_stacking(&self.root, state.z),
            DialogProp::Hide => view::apply_visibility(&self.root, state.hide),
            DialogProp::Title => {
                if let Some(parts) = self.parts.borrow().as_ref() {
                    parts.title.set_text_content(Some(&state.title));
                }
            }
            DialogProp::Body => {
                if let Some(parts) = self.parts.borrow().as_ref() {
                    parts.body.set_text_content(Some(&state.body));
                }
            }
            // reserved: accepted, no visual side effect yet
            DialogProp::User => {}
        }
    }

    fn report<T>(&self, result: Result<T, UpdateError>) {
        if let Err(err) = result {
            console::error!(err.to_string());
        }
    }
}
