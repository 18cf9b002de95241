use std::fmt;

use crate::network::netlist::InstanceId;
use crate::network::value::Value;

/// Index of a pin in a [`Netlist`](crate::network::Netlist)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct PinId(u32);

impl PinId {
    pub(crate) fn from_index(i: usize) -> PinId {
        PinId(i as u32)
    }

    /// Position of the pin in the arena
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Which named slot of its owner a pin implements
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum PinSlot {
    /// i-th input of the owner
    Input(usize),
    /// i-th output of the owner
    Output(usize),
}

/// Wiring primitive: a tri-state value, whether it was assigned in the current query, and the
/// pins its value is pushed to
///
/// Followers are only added while an instance is being built; simulation only changes the value
/// and the driven flag.
#[derive(Debug, Clone)]
pub struct Pin {
    pub(crate) owner: InstanceId,
    pub(crate) slot: PinSlot,
    pub(crate) value: Value,
    pub(crate) driven: bool,
    pub(crate) followers: Vec<PinId>,
}

impl Pin {
    /// Create an undriven pin with no follower
    pub fn new(owner: InstanceId, slot: PinSlot) -> Pin {
        Pin {
            owner,
            slot,
            value: Value::Undefined,
            driven: false,
            followers: Vec::new(),
        }
    }

    /// Instance owning the pin
    pub fn owner(&self) -> InstanceId {
        self.owner
    }

    /// Slot of the owner implemented by the pin
    pub fn slot(&self) -> PinSlot {
        self.slot
    }

    /// Current value
    pub fn value(&self) -> Value {
        self.value
    }

    /// Whether the pin was assigned since the last reset
    pub fn is_driven(&self) -> bool {
        self.driven
    }

    /// Pins the value is pushed to
    pub fn followers(&self) -> &[PinId] {
        &self.followers
    }

    /// Forget the assignment, keeping value and wiring
    pub fn reset(&mut self) {
        self.driven = false;
    }

    /// Returns true if this is an input slot
    pub fn is_input(&self) -> bool {
        matches!(self.slot, PinSlot::Input(_))
    }
}
