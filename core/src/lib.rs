pub mod chat;
pub mod dialog;
pub mod events;
pub mod geometry;
pub mod registry;
pub mod state;

pub use chat::{compose_line, is_sendable};
pub use dialog::{DialogCore, DialogHooks, UpdateError};
pub use events::DialogEvent;
pub use geometry::{clamp_axis, ClampContext, Margins, CLAMP_FAR_PAD, CLAMP_NEAR_PAD};
pub use registry::{DialogRegistry, RegistryEntry, ZAssignment};
pub use state::{DialogId, DialogProp, DialogState, Identity, BODY_SEED, DEFAULT_TITLE};
