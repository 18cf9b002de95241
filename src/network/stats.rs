//! Compute network statistics
//!
//! ```
//! # use tristate::network::{CompositeBuilder, GateDefinition, Library, TransitionRow, Value::*};
//! # let mut lib = Library::new();
//! # let mut not = GateDefinition::new("NOT", &["a"], &["q"]);
//! # not.add_row(TransitionRow::new(&[Zero], &[One])).unwrap();
//! # lib.add_gate(not).unwrap();
//! # let mut net = CompositeBuilder::new("NET", &["x"], &["y"]);
//! # net.add_instance("n", "NOT").connect("x", "n.a").connect("n.q", "y");
//! # lib.set_network(net).unwrap();
//! # let network = lib.build_network().unwrap();
//! use tristate::network::stats::stats;
//! let stats = stats(&network);
//!
//! assert_eq!(stats.nb_gates, 1);
//!
//! // Show the statistics
//! println!("{}", stats);
//! ```

use std::fmt;

use itertools::Itertools;

use crate::network::Network;

/// Number of inputs, outputs, instances and pins in a network
#[derive(Clone, Debug)]
pub struct NetworkStats {
    /// Number of declared inputs
    pub nb_inputs: usize,
    /// Number of outputs
    pub nb_outputs: usize,
    /// Number of gate instances
    pub nb_gates: usize,
    /// Number of composite instances, including the network itself
    pub nb_composites: usize,
    /// Number of pins, including the constants
    pub nb_pins: usize,
    /// Number of wiring edges
    pub nb_edges: usize,
    /// Depth of the instance hierarchy; 1 for a network made of gates only
    pub depth: usize,
    /// Number of instances of each gate definition, sorted by name
    pub gate_usage: Vec<(String, usize)>,
}

impl fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stats:")?;
        writeln!(f, "  Inputs: {}", self.nb_inputs)?;
        writeln!(f, "  Outputs: {}", self.nb_outputs)?;
        writeln!(f, "  Gates: {}", self.nb_gates)?;
        for (name, count) in &self.gate_usage {
            writeln!(f, "      {}: {}", name, count)?;
        }
        writeln!(f, "  Composites: {}", self.nb_composites)?;
        writeln!(f, "  Pins: {}", self.nb_pins)?;
        writeln!(f, "  Edges: {}", self.nb_edges)?;
        writeln!(f, "  Depth: {}", self.depth)
    }
}

/// Compute the statistics of a network
pub fn stats(network: &Network) -> NetworkStats {
    let netlist = network.netlist();
    let mut nb_gates = 0;
    let mut nb_composites = 0;
    let mut usage = Vec::new();
    for id in netlist.instance_ids() {
        let inst = netlist.instance(id);
        match inst.gate() {
            Some(g) => {
                nb_gates += 1;
                usage.push(g.name().to_string());
            }
            None => nb_composites += 1,
        }
    }
    let gate_usage = usage
        .into_iter()
        .counts()
        .into_iter()
        .sorted()
        .collect();
    let nb_edges = netlist
        .pin_ids()
        .map(|p| netlist.pin(p).followers().len())
        .sum();

    let mut depth = 0;
    let mut stack = vec![(network.top(), 0)];
    while let Some((id, d)) = stack.pop() {
        depth = depth.max(d);
        for c in netlist.instance(id).children() {
            stack.push((*c, d + 1));
        }
    }

    NetworkStats {
        nb_inputs: network.nb_inputs(),
        nb_outputs: network.nb_outputs(),
        nb_gates,
        nb_composites,
        nb_pins: netlist.nb_pins(),
        nb_edges,
        depth,
        gate_usage,
    }
}
