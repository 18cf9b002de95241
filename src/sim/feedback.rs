//! Resolution of combinational feedback loops
//!
//! When no instance is dirty but some gates still wait for inputs, these inputs may sit on a
//! loop that nothing outside seeds. Such inputs are forced to Undefined, which restarts the
//! simulation.

use fxhash::FxHashSet;
use tracing::debug;

use crate::network::{InstanceId, InstanceState, Netlist, PinId, PinSlot, Value};
use crate::sim::Worklist;

/// Returns true if the target pin can be reached from the starting pins
///
/// The search follows wiring edges, and goes through gates from their inputs to their outputs.
/// Each pin is visited at most once.
pub fn reaches(netlist: &Netlist, from: &[PinId], target: PinId) -> bool {
    let mut visited = FxHashSet::default();
    let mut stack: Vec<PinId> = from.iter().rev().copied().collect();
    while let Some(p) = stack.pop() {
        if p == target {
            return true;
        }
        if !visited.insert(p) {
            continue;
        }
        let pin = netlist.pin(p);
        stack.extend(pin.followers().iter().rev());
        if let PinSlot::Input(_) = pin.slot() {
            let owner = netlist.instance(pin.owner());
            if owner.is_gate() {
                stack.extend(owner.outputs().iter().rev());
            }
        }
    }
    false
}

/// Force to Undefined every undriven gate input that depends on one of the gate's own outputs
///
/// Gates are visited in the order given, and their inputs in declaration order.
/// Returns the number of pins forced; zero means that no progress is possible.
pub fn resolve_feedback(
    netlist: &mut Netlist,
    gates: &[InstanceId],
    worklist: &mut Worklist,
) -> usize {
    let mut nb_forced = 0;
    for &id in gates {
        if netlist.state(id) != InstanceState::AwaitingInputs {
            continue;
        }
        let inst = netlist.instance(id);
        let outputs = inst.outputs().to_vec();
        let undriven: Vec<PinId> = inst
            .inputs()
            .iter()
            .copied()
            .filter(|p| !netlist.pin(*p).is_driven())
            .collect();
        for p in undriven {
            if reaches(netlist, &outputs, p) {
                debug!(
                    instance = netlist.instance(id).name(),
                    pin = %p,
                    "forcing feedback input to undefined"
                );
                netlist.set_value(p, Value::Undefined, worklist);
                nb_forced += 1;
            }
        }
    }
    nb_forced
}

#[cfg(test)]
mod tests {
    use super::{reaches, resolve_feedback};
    use crate::network::{
        CompositeBuilder, GateDefinition, InstanceState, Library, TransitionRow, Value::*,
    };
    use crate::sim::Worklist;

    fn library() -> Library {
        let mut lib = Library::new();
        let mut not = GateDefinition::new("NOT", &["a"], &["q"]);
        not.add_row(TransitionRow::new(&[Zero], &[One])).unwrap();
        not.add_row(TransitionRow::new(&[One], &[Zero])).unwrap();
        lib.add_gate(not).unwrap();
        let mut and = GateDefinition::new("AND2", &["a", "b"], &["q"]);
        and.add_row(TransitionRow::new(&[One, One], &[One]))
            .unwrap();
        lib.add_gate(and).unwrap();
        lib
    }

    #[test]
    fn test_reaches_through_gates() {
        let mut lib = library();
        let mut net = CompositeBuilder::new("NET", &["x"], &["q"]);
        net.add_instance("g", "AND2")
            .add_instance("n", "NOT")
            .connect("x", "g.a")
            .connect("g.q", "n.a")
            .connect("n.q", "g.b")
            .connect("n.q", "q");
        lib.set_network(net).unwrap();
        let network = lib.build_network().unwrap();
        let netlist = network.netlist();
        let g = network.gates()[0];
        let n = network.gates()[1];
        let g_in = netlist.instance(g).inputs().to_vec();
        let g_out = netlist.instance(g).outputs().to_vec();
        let n_out = netlist.instance(n).outputs().to_vec();
        assert!(reaches(netlist, &g_out, g_in[1]));
        assert!(!reaches(netlist, &g_out, g_in[0]));
        assert!(reaches(netlist, &n_out, g_in[1]));
        assert!(!reaches(netlist, &[], g_in[1]));
    }

    #[test]
    fn test_resolve_only_loops() {
        let mut lib = library();
        let mut net = CompositeBuilder::new("NET", &["x"], &["q", "r"]);
        net.add_instance("g", "AND2")
            .add_instance("n", "NOT")
            .connect("x", "g.a")
            .connect("g.q", "n.a")
            .connect("n.q", "g.b")
            .connect("n.q", "q")
            .connect("g.q", "r");
        lib.set_network(net).unwrap();
        let mut network = lib.build_network().unwrap();
        let gates = network.gates().to_vec();
        let netlist = network.netlist_mut();
        let mut w = Worklist::new(netlist.nb_instances());
        let g = gates[0];
        assert_eq!(netlist.state(g), InstanceState::AwaitingInputs);
        // Both gates are on the loop: each gets its input forced
        assert_eq!(resolve_feedback(netlist, &gates, &mut w), 2);
        assert_eq!(w.take(), gates);
        let g_b = netlist.instance(g).inputs()[1];
        assert_eq!(netlist.pin(g_b).value(), Undefined);
        assert!(netlist.pin(g_b).is_driven());
        // The input from outside the loop is left alone
        let g_a = netlist.instance(g).inputs()[0];
        assert!(!netlist.pin(g_a).is_driven());
        assert_eq!(netlist.state(g), InstanceState::AwaitingInputs);
        // Nothing left to force
        assert_eq!(resolve_feedback(netlist, &gates, &mut w), 0);
        assert!(w.is_empty());
    }
}
