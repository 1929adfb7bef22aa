use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::chat::{compose_line, is_sendable};
use crate::events::DialogEvent;
use crate::geometry::{ClampContext, Margins};
use crate::state::{DialogId, DialogProp, DialogState, Identity};

/// Hooks installed by the embedder. `on_event` receives every notification in
/// emission order; `on_apply` runs between the updating/updated pair and is
/// where visual side effects happen.
#[derive(Clone)]
pub struct DialogHooks {
    pub on_event: Rc<dyn Fn(&DialogEvent)>,
    pub on_apply: Rc<dyn Fn(DialogProp, &DialogState)>,
}

impl DialogHooks {
    pub fn empty() -> Self {
        Self {
            on_event: Rc::new(|_| {}),
            on_apply: Rc::new(|_, _| {}),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateError {
    /// A property update was requested before the first render completed.
    /// The write itself is kept; only the notification is refused.
    NotRendered(DialogProp),
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateError::NotRendered(prop) => {
                write!(f, "update for '{}' before first render", prop.as_str())
            }
        }
    }
}

impl std::error::Error for UpdateError {}

/// Observer-style state store for one dialog instance. All mutation is
/// synchronous on the caller's thread; one write produces one update
/// notification, no batching.
pub struct DialogCore {
    state: RefCell<DialogState>,
    clamp: Cell<ClampContext>,
    hooks: RefCell<Option<DialogHooks>>,
}

impl DialogCore {
    pub fn new(id: DialogId, z: usize, title: String, margins: Margins, user: Identity) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(DialogState::new(id, z, title, margins, user)),
            clamp: Cell::new(ClampContext::default()),
            hooks: RefCell::new(None),
        })
    }

    pub fn init(&self, hooks: DialogHooks) {
        *self.hooks.borrow_mut() = Some(hooks);
    }

    pub fn id(&self) -> DialogId {
        self.state.borrow().id
    }

    pub fn snapshot(&self) -> DialogState {
        self.state.borrow().clone()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().is_dragging
    }

    pub fn stop_click(&self) -> bool {
        self.state.borrow().stop_click
    }

    /// Refreshed by the embedder from live measurements on render and on
    /// viewport resize.
    pub fn set_clamp_context(&self, ctx: ClampContext) {
        self.clamp.set(ctx);
    }

    pub fn clamp_context(&self) -> ClampContext {
        self.clamp.get()
    }

    /// Flips the rendered gate and announces the first render. Subsequent
    /// calls are no-ops so re-renders do not re-announce.
    pub fn mark_rendered(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.rendered {
                return;
            }
            state.rendered = true;
        }
        self.emit(&DialogEvent::Rendered);
    }

    pub fn set_title(&self, title: impl Into<String>) -> Result<(), UpdateError> {
        self.state.borrow_mut().title = title.into();
        self.update(DialogProp::Title)
    }

    pub fn set_body(&self, body: impl Into<String>) -> Result<(), UpdateError> {
        self.state.borrow_mut().body = body.into();
        self.update(DialogProp::Body)
    }

    pub fn set_x(&self, x: i32) -> Result<(), UpdateError> {
        self.state.borrow_mut().x = x;
        self.update(DialogProp::X)
    }

    pub fn set_y(&self, y: i32) -> Result<(), UpdateError> {
        self.state.borrow_mut().y = y;
        self.update(DialogProp::Y)
    }

    pub fn set_position(&self, x: i32, y: i32) -> Result<(), UpdateError> {
        self.set_x(x)?;
        self.set_y(y)
    }

    pub fn set_z(&self, z: usize) -> Result<(), UpdateError> {
        self.state.borrow_mut().z = z;
        self.update(DialogProp::Z)
    }

    pub fn set_hide(&self, hide: bool) -> Result<(), UpdateError> {
        self.state.borrow_mut().hide = hide;
        self.update(DialogProp::Hide)
    }

    pub fn set_user(&self, user: Identity) -> Result<(), UpdateError> {
        self.state.borrow_mut().user = user;
        self.update(DialogProp::User)
    }

    /// Re-applies the clamp against the current context, e.g. after a
    /// viewport resize. Both axes are reclamped by the position update.
    pub fn reclamp(&self) -> Result<(), UpdateError> {
        self.update(DialogProp::X)
    }

    /// Appends `user: message` to the body and announces the send. Empty
    /// input is silently rejected; returns whether a message went out.
    pub fn send(&self, message: &str) -> Result<bool, UpdateError> {
        if !is_sendable(message) {
            return Ok(false);
        }
        let user = {
            let mut state = self.state.borrow_mut();
            let user = state.user.clone();
            let line = compose_line(&user.name, message);
            state.body.push_str(&line);
            user
        };
        self.update(DialogProp::Body)?;
        self.emit(&DialogEvent::Send {
            user,
            message: message.to_string(),
        });
        Ok(true)
    }

    /// Appends a line for a message delivered by the host and announces it.
    pub fn receive(&self, user: Identity, message: &str) -> Result<(), UpdateError> {
        {
            let mut state = self.state.borrow_mut();
            let line = compose_line(&user.name, message);
            state.body.push_str(&line);
        }
        self.update(DialogProp::Body)?;
        self.emit(&DialogEvent::Received {
            user,
            message: message.to_string(),
        });
        Ok(())
    }

    /// Idle -> Dragging: captures the pointer offset relative to the current
    /// position and announces the move. The caller claims top afterwards.
    pub fn begin_drag(&self, pointer_x: i32, pointer_y: i32) {
        {
            let mut state = self.state.borrow_mut();
            state.is_dragging = true;
            state.x_diff = pointer_x - state.x;
            state.y_diff = pointer_y - state.y;
        }
        self.emit(&DialogEvent::Moving);
    }

    /// Dragging -> Dragging: repositions to the clamped pointer-minus-offset
    /// target and arms the click suppression flag. Returns false when no drag
    /// session is live.
    pub fn drag_move(&self, pointer_x: i32, pointer_y: i32) -> Result<bool, UpdateError> {
        let (target_x, target_y) = {
            let mut state = self.state.borrow_mut();
            if !state.is_dragging {
                return Ok(false);
            }
            state.stop_click = true;
            (pointer_x - state.x_diff, pointer_y - state.y_diff)
        };
        self.set_x(target_x)?;
        self.set_y(target_y)?;
        Ok(true)
    }

    /// Dragging -> Idle. Returns whether a drag session actually ended; the
    /// embedder schedules `finish_drag` on a short timer only in that case.
    pub fn end_drag(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.is_dragging {
            return false;
        }
        state.is_dragging = false;
        true
    }

    /// Runs when the release timer fires: clears click suppression and
    /// announces placement. Harmless on a defunct instance.
    pub fn finish_drag(&self) {
        self.state.borrow_mut().stop_click = false;
        self.emit(&DialogEvent::Placed);
    }

    /// One write, one notify: updating (generic + prop-qualified), side
    /// effects, then updated. Position updates reclamp both axes first.
    /// Refused with an error until the first render has completed.
    fn update(&self, prop: DialogProp) -> Result<(), UpdateError> {
        if !self.state.borrow().rendered {
            return Err(UpdateError::NotRendered(prop));
        }
        self.emit(&DialogEvent::Updating(prop));
        if matches!(prop, DialogProp::X | DialogProp::Y) {
            let ctx = self.clamp.get();
            let mut state = self.state.borrow_mut();
            let margins = state.margins;
            state.x = ctx.clamp_x(state.x, margins);
            state.y = ctx.clamp_y(state.y, margins);
        }
        let snapshot = self.state.borrow().clone();
        self.apply(prop, &snapshot);
        if prop == DialogProp::Hide {
            let visibility = if snapshot.hide {
                DialogEvent::Hide
            } else {
                DialogEvent::Show
            };
            self.emit(&visibility);
        }
        self.emit(&DialogEvent::Updated(prop));
        Ok(())
    }

    fn emit(&self, event: &DialogEvent) {
        let hook = self
            .hooks
            .borrow()
            .as_ref()
            .map(|hooks| hooks.on_event.clone());
        if let Some(hook) = hook {
            hook(event);
        }
    }

    fn apply(&self, prop: DialogProp, state: &DialogState) {
        let hook = self
            .hooks
            .borrow()
            .as_ref()
            .map(|hooks| hooks.on_apply.clone());
        if let Some(hook) = hook {
            hook(prop, state);
        }
    }
}
