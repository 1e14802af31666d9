use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

/// Key holding the player's upgrade bitmask.
pub const UPGRADES_KEY: i32 = -1;

pub type VariableSnapshot = BTreeMap<i32, i32>;

struct Observer {
    alive: Rc<Cell<bool>>,
    callback: Box<dyn FnMut(i32)>,
}

#[derive(Default)]
struct Variable {
    value: i32,
    observers: Vec<Observer>,
}

/// Unsubscribes its observer when dropped.
#[must_use = "dropping the handle unsubscribes the observer"]
#[derive(Debug)]
pub struct ObserverHandle {
    alive: Rc<Cell<bool>>,
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        self.alive.set(false);
    }
}

/// Integer-keyed progression variables (upgrades, switches, one-shot pickups).
#[derive(Default)]
pub struct VariableStore {
    entries: BTreeMap<i32, Variable>,
}

impl fmt::Debug for VariableStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(key, var)| (key, var.value)))
            .finish()
    }
}

impl VariableStore {
    /// Reads `key`, creating it with value 0 on first access.
    pub fn get(&mut self, key: i32) -> i32 {
        self.entries.entry(key).or_default().value
    }

    pub fn peek(&self, key: i32) -> Option<i32> {
        self.entries.get(&key).map(|var| var.value)
    }

    pub fn set(&mut self, key: i32, value: i32) {
        let var = self.entries.entry(key).or_default();
        var.value = value;
        var.observers.retain(|observer| observer.alive.get());
        for observer in &mut var.observers {
            (observer.callback)(value);
        }
        debug!(key, value, observers = var.observers.len(), "variable_set");
    }

    pub fn observe(&mut self, key: i32, callback: impl FnMut(i32) + 'static) -> ObserverHandle {
        let alive = Rc::new(Cell::new(true));
        self.entries.entry(key).or_default().observers.push(Observer {
            alive: Rc::clone(&alive),
            callback: Box::new(callback),
        });
        ObserverHandle { alive }
    }

    pub fn snapshot(&self) -> VariableSnapshot {
        self.entries
            .iter()
            .map(|(key, var)| (*key, var.value))
            .collect()
    }

    /// Replaces every entry with the snapshot's. Observers do not survive.
    pub fn restore(&mut self, snapshot: &VariableSnapshot) {
        self.entries.clear();
        for (key, value) in snapshot {
            self.entries.insert(
                *key,
                Variable {
                    value: *value,
                    observers: Vec::new(),
                },
            );
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
