//! Simulation of a network, tick by tick, until its values settle
//!
//! Each query resets the network, drives the inputs, then repeatedly evaluates every dirty
//! gate whose inputs are all driven. All gates of a tick read the values from the start of the
//! tick, and their outputs are assigned once every one of them is evaluated. When nothing is
//! dirty, feedback loops waiting for a seed are forced to Undefined; the query ends when no
//! progress is possible or after [`ITERATION_LIMIT`] ticks.

mod feedback;
mod patterns;
mod worklist;

use tracing::{debug, warn};

use crate::error::Result;
use crate::network::{InstanceState, Network, PinId, Value};

pub use feedback::{reaches, resolve_feedback};
pub use patterns::{binary_pattern, generate_random_patterns};
pub use worklist::Worklist;

/// Maximum number of ticks for a single query
pub const ITERATION_LIMIT: u64 = 1_000_000;

/// Outcome of a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimResult {
    /// Number of ticks executed
    pub ticks: u64,
    /// Values of the network outputs
    pub outputs: Vec<Value>,
    /// False if the simulation stopped at the iteration limit
    pub converged: bool,
}

/// Tick-based simulator
#[derive(Debug, Clone, Copy)]
pub struct Simulator {
    iteration_limit: u64,
}

impl Default for Simulator {
    fn default() -> Self {
        Simulator {
            iteration_limit: ITERATION_LIMIT,
        }
    }
}

impl Simulator {
    /// Create a simulator with the default iteration limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a simulator with a custom iteration limit
    pub fn with_iteration_limit(iteration_limit: u64) -> Self {
        Simulator { iteration_limit }
    }

    /// Maximum number of ticks per query
    pub fn iteration_limit(&self) -> u64 {
        self.iteration_limit
    }

    /// Run a query on the network
    ///
    /// Fails only if the input vector does not match the network inputs, in which case the
    /// network is left untouched. Reaching the iteration limit is a normal outcome.
    pub fn run(&self, network: &mut Network, inputs: &[Value]) -> Result<SimResult> {
        network.check_arity(inputs)?;
        let gates = network.gates().to_vec();
        let mut worklist = Worklist::new(network.netlist().nb_instances());
        network.reset();
        network.drive(inputs, &mut worklist);

        let netlist = network.netlist_mut();
        let mut ticks = 0;
        let mut converged = false;
        while ticks < self.iteration_limit {
            if worklist.is_empty()
                && resolve_feedback(netlist, &gates, &mut worklist) == 0
            {
                converged = true;
                break;
            }
            let mut updates: Vec<(PinId, Value)> = Vec::new();
            for id in worklist.take() {
                if netlist.state(id) != InstanceState::Ready {
                    continue;
                }
                let Some(gate) = netlist.instance(id).gate() else {
                    continue;
                };
                let values = gate.evaluate(&netlist.input_values(id));
                let pins = netlist.instance(id).outputs();
                updates.extend(pins.iter().copied().zip(values));
                netlist.set_computed(id);
            }
            for (p, v) in updates {
                netlist.set_value(p, v, &mut worklist);
            }
            ticks += 1;
        }

        if converged {
            debug!(network = network.name(), ticks, "simulation settled");
        } else {
            warn!(
                network = network.name(),
                ticks, "simulation stopped at the iteration limit"
            );
        }
        Ok(SimResult {
            ticks,
            outputs: network.output_values(),
            converged,
        })
    }

    /// Run one query per input vector, in order
    pub fn run_all(
        &self,
        network: &mut Network,
        patterns: &[Vec<Value>],
    ) -> Result<Vec<SimResult>> {
        patterns.iter().map(|p| self.run(network, p)).collect()
    }
}

/// Run a query with the default iteration limit; return the number of ticks and the outputs
pub fn evaluate(network: &mut Network, inputs: &[Value]) -> Result<(u64, Vec<Value>)> {
    let res = Simulator::new().run(network, inputs)?;
    Ok((res.ticks, res.outputs))
}
