use std::rc::Rc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::network::definition::Definition;
use crate::network::instance::Instancer;
use crate::network::netlist::{InstanceId, Netlist};
use crate::network::pin::PinId;
use crate::network::value::Value;
use crate::sim::Worklist;

/// The top-level composite instance, which is driven with input vectors
///
/// The network is built once and reused for every query: only pin values and driven flags
/// change afterwards.
#[derive(Debug, Clone)]
pub struct Network {
    netlist: Netlist,
    top: InstanceId,
    inputs: Vec<PinId>,
    constants: [PinId; 2],
    outputs: Vec<PinId>,
    sources: Vec<PinId>,
    gates: Vec<InstanceId>,
}

impl Network {
    /// Build the network from its (composite) definition
    ///
    /// Gates without inputs are evaluated here, once; their outputs stay driven for the
    /// lifetime of the network, like the constant pins.
    pub fn build(definition: &Rc<Definition>) -> Result<Network> {
        let mut netlist = Netlist::new();
        let (top, _) = Instancer::new(&mut netlist).instantiate_network(definition, "top")?;
        let top_inst = netlist.instance(top);
        let nb_declared = top_inst.inputs().len() - 2;
        let inputs = top_inst.inputs()[..nb_declared].to_vec();
        let constants = [
            top_inst.inputs()[nb_declared],
            top_inst.inputs()[nb_declared + 1],
        ];
        let outputs = top_inst.outputs().to_vec();

        netlist.force(constants[0], Value::Zero);
        netlist.force(constants[1], Value::One);
        let mut sources = constants.to_vec();
        let mut gates = Vec::new();
        for id in netlist.instance_ids().collect::<Vec<_>>() {
            let inst = netlist.instance(id);
            let Some(gate) = inst.gate() else {
                continue;
            };
            if gate.nb_inputs() != 0 {
                gates.push(id);
                continue;
            }
            let values = gate.evaluate(&[]);
            let pins = inst.outputs().to_vec();
            for (p, v) in pins.iter().zip(values) {
                netlist.force(*p, v);
            }
            netlist.set_computed(id);
            sources.extend(pins);
        }
        debug!(
            name = definition.name(),
            instances = netlist.nb_instances(),
            pins = netlist.nb_pins(),
            gates = gates.len(),
            "built network"
        );
        Ok(Network {
            netlist,
            top,
            inputs,
            constants,
            outputs,
            sources,
            gates,
        })
    }

    /// Name of the network definition
    pub fn name(&self) -> &str {
        self.netlist.instance(self.top).definition().name()
    }

    /// The underlying arena
    pub fn netlist(&self) -> &Netlist {
        &self.netlist
    }

    pub(crate) fn netlist_mut(&mut self) -> &mut Netlist {
        &mut self.netlist
    }

    /// Top-level instance
    pub fn top(&self) -> InstanceId {
        self.top
    }

    /// Number of declared inputs, not counting the constants
    pub fn nb_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Number of outputs
    pub fn nb_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Declared input pins, in order
    pub fn inputs(&self) -> &[PinId] {
        &self.inputs
    }

    /// Output pins, in order
    pub fn outputs(&self) -> &[PinId] {
        &self.outputs
    }

    /// Constant pins, driven to Zero and One
    pub fn constants(&self) -> [PinId; 2] {
        self.constants
    }

    /// Declared input names
    pub fn input_names(&self) -> &[String] {
        self.netlist.instance(self.top).definition().inputs()
    }

    /// Output names
    pub fn output_names(&self) -> &[String] {
        self.netlist.instance(self.top).definition().outputs()
    }

    /// Gate instances with at least one input, in creation order
    pub fn gates(&self) -> &[InstanceId] {
        &self.gates
    }

    /// Values of the outputs; outputs not driven in the last query are Undefined
    pub fn output_values(&self) -> Vec<Value> {
        self.outputs
            .iter()
            .map(|p| {
                let pin = self.netlist.pin(*p);
                if pin.is_driven() {
                    pin.value()
                } else {
                    Value::Undefined
                }
            })
            .collect()
    }

    /// Clear every pin, except the permanently driven ones
    pub(crate) fn reset(&mut self) {
        self.netlist.reset(&self.sources);
    }

    /// Check the length of an input vector
    pub fn check_arity(&self, values: &[Value]) -> Result<()> {
        if values.len() != self.nb_inputs() {
            return Err(Error::Arity {
                expected: self.nb_inputs(),
                got: values.len(),
            });
        }
        Ok(())
    }

    /// Push the permanently driven pins and the input vector into the network
    pub(crate) fn drive(&mut self, values: &[Value], worklist: &mut Worklist) {
        debug_assert_eq!(values.len(), self.nb_inputs());
        for p in &self.sources {
            self.netlist.propagate(*p, worklist);
        }
        for (p, v) in self.inputs.iter().zip(values) {
            self.netlist.set_value(*p, *v, worklist);
        }
    }
}

/// Build the network designated in a set of definitions
pub fn build_network(definition: &Rc<Definition>) -> Result<Network> {
    Network::build(definition)
}
