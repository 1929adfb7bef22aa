use crate::state::{DialogProp, Identity};

/// Lifecycle and interaction notifications broadcast to the host page.
/// `Updating`/`Updated` are additionally dispatched under a prop-qualified
/// name (`updating.x`, `updated.title`).
#[derive(Clone, Debug, PartialEq)]
pub enum DialogEvent {
    Rendered,
    Updating(DialogProp),
    Updated(DialogProp),
    Moving,
    Placed,
    Send { user: Identity, message: String },
    Received { user: Identity, message: String },
    Show,
    Hide,
}

impl DialogEvent {
    /// Wire name dispatched to the host page.
    pub fn name(&self) -> &'static str {
        match self {
            DialogEvent::Rendered => "rendered",
            DialogEvent::Updating(_) => "updating",
            DialogEvent::Updated(_) => "updated",
            DialogEvent::Moving => "moving",
            DialogEvent::Placed => "placed",
            DialogEvent::Send { .. } => "send",
            DialogEvent::Received { .. } => "received",
            DialogEvent::Show => "show",
            DialogEvent::Hide => "hide",
        }
    }

    pub fn prop(&self) -> Option<DialogProp> {
        match self {
            DialogEvent::Updating(prop) | DialogEvent::Updated(prop) => Some(*prop),
            _ => None,
        }
    }

    /// Prop-qualified companion name for update notifications.
    pub fn qualified_name(&self) -> Option<String> {
        match self {
            DialogEvent::Updating(prop) => Some(format!("updating.{}", prop.as_str())),
            DialogEvent::Updated(prop) => Some(format!("updated.{}", prop.as_str())),
            _ => None,
        }
    }
}
