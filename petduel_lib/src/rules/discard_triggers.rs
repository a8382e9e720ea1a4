use crate::rules::cards::{DiscardTrigger, InstanceId};
use std::collections::HashMap;

/// Effects bound to specific card instances that fire when that instance is discarded.
#[derive(Debug, Clone, Default)]
pub struct DiscardTriggers {
    registered: HashMap<InstanceId, DiscardTrigger>,
}

impl DiscardTriggers {
    /// A later registration on the same instance replaces the earlier one.
    pub fn register(&mut self, instance_id: InstanceId, trigger: DiscardTrigger) {
        self.registered.insert(instance_id, trigger);
    }

    /// Removes and returns the trigger of a discarded instance.
    pub fn take(&mut self, instance_id: InstanceId) -> Option<DiscardTrigger> {
        self.registered.remove(&instance_id)
    }

    pub fn is_registered(&self, instance_id: InstanceId) -> bool {
        self.registered.contains_key(&instance_id)
    }

    pub fn clear(&mut self) {
        self.registered.clear();
    }
}
