use std::sync::RwLock;

/// Ordered set of virtual device names exposed under the synthetic root.
///
/// The root directory `/` is not backed by any real directory; listing it
/// yields one entry per registered device, in slot order. Device names
/// carry their trailing colon (`ux0:`). Removal invalidates the slot in
/// place instead of compacting, so a later `add` fills the hole and the
/// exposure order of the remaining entries never shifts. The construction
/// capacity is a pre-allocation hint only; the table grows past it.
pub struct DeviceRegistry {
    slots: RwLock<Vec<Option<String>>>,
}

impl DeviceRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: RwLock::new(Vec::with_capacity(capacity)),
        }
    }

    /// Registers a device into the first free slot. Returns false when the
    /// name is already present.
    pub fn add(&self, name: &str) -> bool {
        let mut slots = self.slots.write().unwrap();
        if slots.iter().flatten().any(|d| d == name) {
            return false;
        }
        if let Some(slot) = slots.iter_mut().find(|s| s.is_none()) {
            *slot = Some(name.to_string());
            return true;
        }
        slots.push(Some(name.to_string()));
        true
    }

    /// Unregisters a device. Returns false if the name is absent.
    pub fn remove(&self, name: &str) -> bool {
        let mut slots = self.slots.write().unwrap();
        match slots.iter_mut().find(|s| s.as_deref() == Some(name)) {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    }

    /// Snapshot of the registered names, in slot order.
    pub fn list(&self) -> Vec<String> {
        self.slots
            .read()
            .unwrap()
            .iter()
            .flatten()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.read().unwrap().iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_preserves_registration_order() {
        let registry = DeviceRegistry::with_capacity(4);
        assert!(registry.add("ux0:"));
        assert!(registry.add("ur0:"));
        assert!(registry.add("gro0:"));
        assert_eq!(registry.list(), ["ux0:", "ur0:", "gro0:"]);
    }

    #[test]
    fn duplicate_add_is_rejected() {
        let registry = DeviceRegistry::with_capacity(4);
        assert!(registry.add("ux0:"));
        assert!(!registry.add("ux0:"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_unknown_device_reports_false() {
        let registry = DeviceRegistry::with_capacity(4);
        registry.add("ux0:");
        assert!(!registry.remove("uma0:"));
        assert!(registry.remove("ux0:"));
        assert!(registry.is_empty());
    }

    #[test]
    fn add_after_remove_reuses_the_freed_slot() {
        let registry = DeviceRegistry::with_capacity(4);
        registry.add("ux0:");
        registry.add("ur0:");
        registry.add("uma0:");

        assert!(registry.remove("ur0:"));
        assert!(registry.add("gro0:"));
        assert_eq!(registry.list(), ["ux0:", "gro0:", "uma0:"]);
    }

    #[test]
    fn table_grows_past_its_preallocation_hint() {
        let registry = DeviceRegistry::with_capacity(2);
        assert!(registry.add("ux0:"));
        assert!(registry.add("ur0:"));
        assert!(registry.add("uma0:"));
        assert_eq!(registry.list(), ["ux0:", "ur0:", "uma0:"]);

        registry.remove("ux0:");
        assert!(registry.add("gro0:"));
        assert_eq!(registry.list(), ["gro0:", "ur0:", "uma0:"]);
    }
}
