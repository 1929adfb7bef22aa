use std::cell::RefCell;
use std::rc::Rc;

use kaiwabako_core::Identity;

pub type IdentityHook = Rc<dyn Fn(Option<Identity>)>;

/// Host-supplied source for the local user's display identity. The dialog
/// mirrors every change into its own state; a missing or unusable value
/// falls back to the guest identity.
pub trait IdentityProvider {
    fn current_user(&self) -> Option<Identity>;
    fn on_user_changed(&self, hook: IdentityHook);
}

/// Identity source backed by a plain slot. Enough for hosts without a
/// session manager, and for tests.
pub struct FixedIdentityProvider {
    user: RefCell<Option<Identity>>,
    hooks: RefCell<Vec<IdentityHook>>,
}

impl FixedIdentityProvider {
    pub fn new(user: Identity) -> Rc<Self> {
        Rc::new(Self {
            user: RefCell::new(Some(user)),
            hooks: RefCell::new(Vec::new()),
        })
    }

    pub fn set_user(&self, user: Option<Identity>) {
        *self.user.borrow_mut() = user.clone();
        let hooks = self.hooks.borrow().clone();
        for hook in hooks {
            hook(user.clone());
        }
    }
}

impl IdentityProvider for FixedIdentityProvider {
    fn current_user(&self) -> Option<Identity> {
        self.user.borrow().clone()
    }

    fn on_user_changed(&self, hook: IdentityHook) {
        self.hooks.borrow_mut().push(hook);
    }
}
