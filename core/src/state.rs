use serde::{Deserialize, Serialize};

use crate::geometry::Margins;

pub type DialogId = u32;

pub const DEFAULT_TITLE: &str = "Dialog Title";
pub const BODY_SEED: &str = "Chat open ...\n";
pub const DEFAULT_X: i32 = 100;
pub const DEFAULT_Y: i32 = 100;

pub const GUEST_NAME: &str = "You";
pub const GUEST_KIND: &str = "guest";

/// Display identity of the local sender, mirrored from the host's identity
/// collaborator when one is present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u64,
}

impl Identity {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, id: u64) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            id,
        }
    }

    pub fn guest() -> Self {
        Self::new(GUEST_NAME, GUEST_KIND, 0)
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::guest()
    }
}

/// Observable properties of a dialog instance. Every write to one of these
/// flows through a single update notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogProp {
    Title,
    Body,
    X,
    Y,
    Z,
    Hide,
    User,
}

impl DialogProp {
    pub const ALL: [DialogProp; 7] = [
        DialogProp::Title,
        DialogProp::Body,
        DialogProp::X,
        DialogProp::Y,
        DialogProp::Z,
        DialogProp::Hide,
        DialogProp::User,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DialogProp::Title => "title",
            DialogProp::Body => "body",
            DialogProp::X => "x",
            DialogProp::Y => "y",
            DialogProp::Z => "z",
            DialogProp::Hide => "hide",
            DialogProp::User => "user",
        }
    }
}

/// Per-instance mutable record. `x_diff`/`y_diff`/`is_dragging` are only
/// meaningful while a drag session is live; `stop_click` is set during a drag
/// and cleared by the release timer.
#[derive(Clone, Debug, PartialEq)]
pub struct DialogState {
    pub id: DialogId,
    pub title: String,
    pub body: String,
    pub user: Identity,
    pub is_dragging: bool,
    pub hide: bool,
    pub x_diff: i32,
    pub y_diff: i32,
    pub x: i32,
    pub y: i32,
    pub z: usize,
    pub margins: Margins,
    pub rendered: bool,
    pub stop_click: bool,
}

impl DialogState {
    pub fn new(id: DialogId, z: usize, title: String, margins: Margins, user: Identity) -> Self {
        Self {
            id,
            title,
            body: BODY_SEED.to_string(),
            user,
            is_dragging: false,
            hide: false,
            x_diff: 0,
            y_diff: 0,
            x: DEFAULT_X,
            y: DEFAULT_Y,
            z,
            margins,
            rendered: false,
            stop_click: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_serializes_with_type_key() {
        let json = serde_json::to_string(&Identity::guest()).unwrap();
        assert_eq!(json, r#"{"name":"You","type":"guest","id":0}"#);
    }

    #[test]
    fn identity_round_trips() {
        let user: Identity =
            serde_json::from_str(r#"{"name":"Bob","type":"member","id":7}"#).unwrap();
        assert_eq!(user, Identity::new("Bob", "member", 7));
    }

    #[test]
    fn prop_names_match_wire_vocabulary() {
        let names: Vec<&str> = DialogProp::ALL.iter().map(|prop| prop.as_str()).collect();
        assert_eq!(names, ["title", "body", "x", "y", "z", "hide", "user"]);
    }
}
