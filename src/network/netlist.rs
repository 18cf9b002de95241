use std::fmt;
use std::rc::Rc;

use crate::network::definition::{Definition, GateDefinition};
use crate::network::pin::{Pin, PinId, PinSlot};
use crate::network::value::Value;
use crate::sim::Worklist;

/// Index of an instance in a [`Netlist`]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct InstanceId(u32);

impl InstanceId {
    pub(crate) fn from_index(i: usize) -> InstanceId {
        InstanceId(i as u32)
    }

    /// Position of the instance in the arena
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.0)
    }
}

/// Simulation state of a gate instance
///
/// Only `Ready` gates are evaluated by a tick, and feedback resolution only looks at
/// `AwaitingInputs` gates. Assigning an input of a `Computed` gate makes it `Ready` again.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InstanceState {
    /// Some inputs have not been driven yet
    AwaitingInputs,
    /// All inputs are driven, outputs not computed from them yet
    Ready,
    /// Outputs computed, no input changed since
    Computed,
}

/// A placed copy of a definition, with its own pins
#[derive(Debug, Clone)]
pub struct Instance {
    pub(crate) name: String,
    pub(crate) definition: Rc<Definition>,
    pub(crate) inputs: Vec<PinId>,
    pub(crate) outputs: Vec<PinId>,
    pub(crate) children: Vec<InstanceId>,
    pub(crate) computed: bool,
}

impl Instance {
    /// Hierarchical name, such as `top.adder.x0`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Definition the instance was built from
    pub fn definition(&self) -> &Rc<Definition> {
        &self.definition
    }

    /// Truth table, if this is a gate instance
    pub fn gate(&self) -> Option<&GateDefinition> {
        match self.definition.as_ref() {
            Definition::Gate(g) => Some(g),
            Definition::Composite(_) => None,
        }
    }

    /// Returns true for gate instances; composite pins are only passthroughs
    pub fn is_gate(&self) -> bool {
        self.gate().is_some()
    }

    /// Input pins, in declaration order
    pub fn inputs(&self) -> &[PinId] {
        &self.inputs
    }

    /// Output pins, in declaration order
    pub fn outputs(&self) -> &[PinId] {
        &self.outputs
    }

    /// Sub-instances of a composite, in declaration order
    pub fn children(&self) -> &[InstanceId] {
        &self.children
    }
}

/// Arena holding every pin and instance of a built network
///
/// Pins and instances are addressed by index, and are never removed.
#[derive(Debug, Clone, Default)]
pub struct Netlist {
    pins: Vec<Pin>,
    instances: Vec<Instance>,
}

impl Netlist {
    /// Create an empty netlist
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pins
    pub fn nb_pins(&self) -> usize {
        self.pins.len()
    }

    /// Number of instances
    pub fn nb_instances(&self) -> usize {
        self.instances.len()
    }

    /// Get the pin with a given id
    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id.index()]
    }

    /// Get the instance with a given id
    pub fn instance(&self, id: InstanceId) -> &Instance {
        &self.instances[id.index()]
    }

    /// Iterate over all instance ids, in creation order
    pub fn instance_ids(&self) -> impl Iterator<Item = InstanceId> {
        (0..self.instances.len()).map(InstanceId::from_index)
    }

    /// Iterate over all pin ids, in creation order
    pub fn pin_ids(&self) -> impl Iterator<Item = PinId> {
        (0..self.pins.len()).map(PinId::from_index)
    }

    /// Create a new instance without pins
    pub(crate) fn add_instance(&mut self, name: String, definition: Rc<Definition>) -> InstanceId {
        let id = InstanceId::from_index(self.instances.len());
        self.instances.push(Instance {
            name,
            definition,
            inputs: Vec::new(),
            outputs: Vec::new(),
            children: Vec::new(),
            computed: false,
        });
        id
    }

    /// Create a fresh pin for the next input or output slot of an instance
    pub(crate) fn add_pin(&mut self, owner: InstanceId, is_input: bool) -> PinId {
        let id = PinId::from_index(self.pins.len());
        let inst = &mut self.instances[owner.index()];
        let slot = if is_input {
            inst.inputs.push(id);
            PinSlot::Input(inst.inputs.len() - 1)
        } else {
            inst.outputs.push(id);
            PinSlot::Output(inst.outputs.len() - 1)
        };
        self.pins.push(Pin::new(owner, slot));
        id
    }

    pub(crate) fn add_child(&mut self, parent: InstanceId, child: InstanceId) {
        self.instances[parent.index()].children.push(child);
    }

    pub(crate) fn add_follower(&mut self, from: PinId, to: PinId) {
        self.pins[from.index()].followers.push(to);
    }

    /// Assign a value to a pin and push it to its followers, depth-first
    ///
    /// Nothing happens for a pin that is already driven to the same value. Gate instances
    /// whose inputs are assigned are marked in the worklist.
    pub fn set_value(&mut self, pin: PinId, value: Value, worklist: &mut Worklist) {
        let mut stack = vec![pin];
        while let Some(id) = stack.pop() {
            let p = &mut self.pins[id.index()];
            if p.driven && p.value == value {
                continue;
            }
            p.value = value;
            p.driven = true;
            if p.is_input() {
                let owner = &mut self.instances[p.owner.index()];
                if owner.is_gate() {
                    owner.computed = false;
                    worklist.mark(p.owner);
                }
            }
            stack.extend(p.followers.iter().rev());
        }
    }

    /// Push the current value of a pin to its followers, without checking the pin itself
    pub fn propagate(&mut self, pin: PinId, worklist: &mut Worklist) {
        let p = &self.pins[pin.index()];
        let value = p.value;
        for f in p.followers.clone() {
            self.set_value(f, value, worklist);
        }
    }

    /// Clear the driven flag of every pin, except the ones given
    pub fn reset(&mut self, keep: &[PinId]) {
        for p in &mut self.pins {
            p.reset();
        }
        for id in keep {
            self.pins[id.index()].driven = true;
        }
        for inst in &mut self.instances {
            if !inst.inputs.is_empty() {
                inst.computed = false;
            }
        }
    }

    /// Current values of the inputs of an instance
    pub fn input_values(&self, id: InstanceId) -> Vec<Value> {
        self.instance(id)
            .inputs
            .iter()
            .map(|p| self.pin(*p).value)
            .collect()
    }

    /// Returns true if every input of the instance is driven
    pub fn is_ready(&self, id: InstanceId) -> bool {
        self.instance(id)
            .inputs
            .iter()
            .all(|p| self.pin(*p).driven)
    }

    /// State of a gate instance
    pub fn state(&self, id: InstanceId) -> InstanceState {
        if self.instance(id).computed {
            InstanceState::Computed
        } else if self.is_ready(id) {
            InstanceState::Ready
        } else {
            InstanceState::AwaitingInputs
        }
    }

    pub(crate) fn set_computed(&mut self, id: InstanceId) {
        self.instances[id.index()].computed = true;
    }

    /// Force a value on a pin, without propagation; used for permanently driven pins
    pub(crate) fn force(&mut self, pin: PinId, value: Value) {
        let p = &mut self.pins[pin.index()];
        p.value = value;
        p.driven = true;
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::{InstanceState, Netlist};
    use crate::network::definition::{Definition, GateDefinition, TransitionRow};
    use crate::network::value::Value::{self, *};
    use crate::sim::Worklist;

    fn buf() -> Rc<Definition> {
        let mut g = GateDefinition::new("BUF", &["a"], &["q"]);
        g.add_row(TransitionRow::new(&[Zero], &[Zero])).unwrap();
        g.add_row(TransitionRow::new(&[One], &[One])).unwrap();
        Rc::new(Definition::Gate(g))
    }

    /// Two buffers, the output of the first one feeding the second one
    fn chain() -> Netlist {
        let mut n = Netlist::new();
        let def = buf();
        for name in ["b0", "b1"] {
            let id = n.add_instance(name.to_string(), def.clone());
            n.add_pin(id, true);
            n.add_pin(id, false);
        }
        let out0 = n.instance(n.instance_ids().next().unwrap()).outputs()[0];
        let in1 = n.instance(n.instance_ids().nth(1).unwrap()).inputs()[0];
        n.add_follower(out0, in1);
        n
    }

    #[test]
    fn test_set_value_propagates() {
        let mut n = chain();
        let mut w = Worklist::new(n.nb_instances());
        let b0 = n.instance_ids().next().unwrap();
        let b1 = n.instance_ids().nth(1).unwrap();
        let out0 = n.instance(b0).outputs()[0];
        let in1 = n.instance(b1).inputs()[0];
        n.set_value(out0, One, &mut w);
        assert_eq!(n.pin(in1).value(), One);
        assert!(n.pin(in1).is_driven());
        // Output pins do not mark their owner
        assert_eq!(w.take(), vec![b1]);
        assert_eq!(n.state(b1), InstanceState::Ready);
        assert_eq!(n.state(b0), InstanceState::AwaitingInputs);
    }

    #[test]
    fn test_idempotent_redrive() {
        let mut n = chain();
        let mut w = Worklist::new(n.nb_instances());
        let b1 = n.instance_ids().nth(1).unwrap();
        let in1 = n.instance(b1).inputs()[0];
        n.set_value(in1, Zero, &mut w);
        assert_eq!(w.len(), 1);
        w.take();
        n.set_computed(b1);
        n.set_value(in1, Zero, &mut w);
        assert!(w.is_empty());
        assert_eq!(n.state(b1), InstanceState::Computed);
        n.set_value(in1, Value::Undefined, &mut w);
        assert_eq!(w.len(), 1);
        assert_eq!(n.state(b1), InstanceState::Ready);
    }

    #[test]
    fn test_reset() {
        let mut n = chain();
        let mut w = Worklist::new(n.nb_instances());
        let b0 = n.instance_ids().next().unwrap();
        let in0 = n.instance(b0).inputs()[0];
        let out0 = n.instance(b0).outputs()[0];
        n.set_value(in0, One, &mut w);
        n.set_value(out0, One, &mut w);
        n.reset(&[out0]);
        assert!(!n.pin(in0).is_driven());
        assert!(n.pin(out0).is_driven());
        // Values and wiring are untouched
        assert_eq!(n.pin(in0).value(), One);
        assert_eq!(n.pin(out0).followers().len(), 1);
        // A reset pin takes a new assignment of the same value
        n.set_value(in0, One, &mut w);
        assert!(w.contains(b0));
    }
}
