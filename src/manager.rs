use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use kaiwabako_core::{DialogId, DialogRegistry, RegistryEntry};

pub(crate) type ZHook = Rc<dyn Fn(usize)>;

/// Explicit owner of the live-instance registry. Hosts create one manager
/// and hand it to every dialog they mount; stacking is recomputed across
/// exactly the dialogs registered with it, and unmounting deregisters so no
/// stale entries linger.
pub struct DialogManager {
    registry: RefCell<DialogRegistry>,
    z_hooks: RefCell<HashMap<DialogId, ZHook>>,
}

impl DialogManager {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            registry: RefCell::new(DialogRegistry::new()),
            z_hooks: RefCell::new(HashMap::new()),
        })
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.borrow().is_empty()
    }

    /// Back-to-front ids by current stacking value.
    pub fn ids_by_z(&self) -> Vec<DialogId> {
        self.registry.borrow().ids_by_z()
    }

    /// Gives `id` the top stacking candidate and fans the dense reassignment
    /// out through every registered dialog, each one reacting to its own
    /// z-change.
    pub fn claim_top(&self, id: DialogId) {
        let assignments = self.registry.borrow_mut().claim_top(id);
        let hooks = self.z_hooks.borrow().clone();
        for assignment in assignments {
            if let Some(hook) = hooks.get(&assignment.id) {
                hook(assignment.z);
            }
        }
    }

    pub(crate) fn register(&self) -> RegistryEntry {
        self.registry.borrow_mut().register()
    }

    pub(crate) fn add_z_hook(&self, id: DialogId, hook: ZHook) {
        self.z_hooks.borrow_mut().insert(id, hook);
    }

    pub(crate) fn deregister(&self, id: DialogId) {
        self.registry.borrow_mut().deregister(id);
        self.z_hooks.borrow_mut().remove(&id);
    }
}
