//! Registry of definitions, and construction of the network from them
//!
//! ```
//! # use tristate::network::{CompositeBuilder, GateDefinition, Library, TransitionRow, Value::*};
//! let mut lib = Library::new();
//! let mut not = GateDefinition::new("NOT", &["a"], &["q"]);
//! not.add_row(TransitionRow::new(&[Zero], &[One])).unwrap();
//! not.add_row(TransitionRow::new(&[One], &[Zero])).unwrap();
//! lib.add_gate(not).unwrap();
//!
//! let mut net = CompositeBuilder::new("NET", &["x"], &["y"]);
//! net.add_instance("n", "NOT").connect("x", "n.a").connect("n.q", "y");
//! lib.set_network(net).unwrap();
//!
//! let mut network = lib.build_network().unwrap();
//! assert_eq!(tristate::sim::evaluate(&mut network, &[One]).unwrap(), (1, vec![Zero]));
//! ```

use std::rc::Rc;

use fxhash::FxHashMap;
use itertools::Itertools;
use tracing::debug;

use crate::error::{Error, Result};
use crate::network::definition::{
    CompositeDefinition, Definition, Endpoint, GateDefinition, SubInstance,
};
use crate::network::network::Network;

/// Textual description of a composite, before validation
///
/// Endpoints are written `name` for a pin of the composite itself, `inst.pin` for a pin of
/// a sub-instance, and `0` or `1` for the constants of the network.
#[derive(Debug, Clone)]
pub struct CompositeBuilder {
    name: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
    instances: Vec<(String, String)>,
    connections: Vec<(String, String)>,
}

impl CompositeBuilder {
    /// Start a new composite with the given boundary pins
    pub fn new<S: AsRef<str>>(name: &str, inputs: &[S], outputs: &[S]) -> CompositeBuilder {
        CompositeBuilder {
            name: name.to_string(),
            inputs: inputs.iter().map(|s| s.as_ref().to_string()).collect(),
            outputs: outputs.iter().map(|s| s.as_ref().to_string()).collect(),
            instances: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Name of the composite
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Place a registered definition under a new name
    pub fn add_instance(&mut self, name: &str, definition: &str) -> &mut Self {
        self.instances
            .push((name.to_string(), definition.to_string()));
        self
    }

    /// Push the value of one endpoint to another
    pub fn connect(&mut self, from: &str, to: &str) -> &mut Self {
        self.connections.push((from.to_string(), to.to_string()));
        self
    }
}

/// Set of registered definitions, plus the network definition
///
/// Definitions may only refer to definitions registered before them, so that templates
/// cannot be recursive. All topology checks happen here: the simulator trusts the result.
#[derive(Debug, Clone, Default)]
pub struct Library {
    definitions: Vec<Rc<Definition>>,
    by_name: FxHashMap<String, usize>,
    network: Option<Rc<Definition>>,
}

impl Library {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered definitions, not counting the network
    pub fn nb_definitions(&self) -> usize {
        self.definitions.len()
    }

    /// Registered definitions, in registration order
    pub fn definitions(&self) -> &[Rc<Definition>] {
        &self.definitions
    }

    /// Get a definition by name
    pub fn get(&self, name: &str) -> Option<&Rc<Definition>> {
        self.by_name.get(name).map(|&i| &self.definitions[i])
    }

    /// Network definition, if set
    pub fn network(&self) -> Option<&Rc<Definition>> {
        self.network.as_ref()
    }

    /// Register a gate
    pub fn add_gate(&mut self, gate: GateDefinition) -> Result<Rc<Definition>> {
        check_unique(gate.name(), gate.inputs().iter().chain(gate.outputs()))?;
        debug!(
            name = gate.name(),
            inputs = gate.nb_inputs(),
            outputs = gate.nb_outputs(),
            rows = gate.rows().len(),
            "registered gate"
        );
        self.register(Definition::Gate(gate))
    }

    /// Validate and register a composite
    pub fn add_composite(&mut self, builder: CompositeBuilder) -> Result<Rc<Definition>> {
        let c = self.resolve(&builder, false)?;
        debug!(
            name = c.name(),
            instances = c.instances().len(),
            connections = c.connections().len(),
            "registered composite"
        );
        self.register(Definition::Composite(c))
    }

    /// Validate and set the network definition; the constants `0` and `1` are available
    pub fn set_network(&mut self, builder: CompositeBuilder) -> Result<()> {
        if self.network.is_some() {
            return Err(Error::DuplicateDefinition(builder.name));
        }
        let c = self.resolve(&builder, true)?;
        debug!(
            name = c.name(),
            instances = c.instances().len(),
            connections = c.connections().len(),
            "registered network"
        );
        self.network = Some(Rc::new(Definition::Composite(c)));
        Ok(())
    }

    /// Build the network
    pub fn build_network(&self) -> Result<Network> {
        let definition = self.network.as_ref().ok_or(Error::MissingNetwork)?;
        Network::build(definition)
    }

    fn register(&mut self, definition: Definition) -> Result<Rc<Definition>> {
        let name = definition.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(Error::DuplicateDefinition(name));
        }
        let definition = Rc::new(definition);
        self.by_name.insert(name, self.definitions.len());
        self.definitions.push(definition.clone());
        Ok(definition)
    }

    /// Check a composite and translate its textual endpoints
    fn resolve(&self, b: &CompositeBuilder, is_network: bool) -> Result<CompositeDefinition> {
        check_unique(&b.name, b.inputs.iter().chain(&b.outputs))?;
        check_unique(&b.name, b.instances.iter().map(|(n, _)| n))?;

        let mut instances = Vec::new();
        for (name, def_name) in &b.instances {
            let definition = self
                .get(def_name)
                .ok_or_else(|| Error::UnknownDefinition(def_name.clone()))?;
            instances.push(SubInstance {
                name: name.clone(),
                definition: definition.clone(),
            });
        }

        let resolver = Resolver {
            builder: b,
            instances: &instances,
            is_network,
        };
        let mut connections = Vec::new();
        let mut nb_drivers: FxHashMap<Endpoint, usize> = FxHashMap::default();
        let mut nb_followers: FxHashMap<Endpoint, usize> = FxHashMap::default();
        for (from, to) in &b.connections {
            let f = resolver.endpoint(from)?;
            let t = resolver.endpoint(to)?;
            let legal = matches!(
                (f, t),
                (Endpoint::Input(_), Endpoint::SubInput { .. })
                    | (Endpoint::Constant(_), Endpoint::SubInput { .. })
                    | (Endpoint::SubOutput { .. }, Endpoint::SubInput { .. })
                    | (Endpoint::SubOutput { .. }, Endpoint::Output(_))
            );
            if !legal {
                return Err(Error::InvalidConnection {
                    definition: b.name.clone(),
                    from: from.clone(),
                    to: to.clone(),
                });
            }
            let count = nb_drivers.entry(t).or_default();
            *count += 1;
            if *count > 1 {
                return Err(Error::MultipleDrivers {
                    definition: b.name.clone(),
                    endpoint: to.clone(),
                });
            }
            *nb_followers.entry(f).or_default() += 1;
            connections.push((f, t));
        }

        for (i, name) in b.inputs.iter().enumerate() {
            if !nb_followers.contains_key(&Endpoint::Input(i)) {
                return Err(Error::UnusedInput {
                    definition: b.name.clone(),
                    endpoint: name.clone(),
                });
            }
        }
        let mut sinks: Vec<(Endpoint, String)> = b
            .outputs
            .iter()
            .enumerate()
            .map(|(i, name)| (Endpoint::Output(i), name.clone()))
            .collect();
        for (k, sub) in instances.iter().enumerate() {
            for (pin, name) in sub.definition.inputs().iter().enumerate() {
                sinks.push((
                    Endpoint::SubInput { instance: k, pin },
                    format!("{}.{}", sub.name, name),
                ));
            }
        }
        for (e, name) in sinks {
            if !nb_drivers.contains_key(&e) {
                return Err(Error::Undriven {
                    definition: b.name.clone(),
                    endpoint: name,
                });
            }
        }

        Ok(CompositeDefinition::new(
            &b.name,
            b.inputs.clone(),
            b.outputs.clone(),
            instances,
            connections,
        ))
    }
}

/// Translation of textual endpoints for one composite
struct Resolver<'a> {
    builder: &'a CompositeBuilder,
    instances: &'a [SubInstance],
    is_network: bool,
}

impl<'a> Resolver<'a> {
    fn endpoint(&self, s: &str) -> Result<Endpoint> {
        let b = self.builder;
        let found = if let Some((inst, pin)) = s.split_once('.') {
            self.instances
                .iter()
                .position(|sub| sub.name == inst)
                .and_then(|k| {
                    let def = &self.instances[k].definition;
                    if let Some(p) = def.inputs().iter().position(|n| n == pin) {
                        Some(Endpoint::SubInput { instance: k, pin: p })
                    } else {
                        def.outputs()
                            .iter()
                            .position(|n| n == pin)
                            .map(|p| Endpoint::SubOutput { instance: k, pin: p })
                    }
                })
        } else if let Some(i) = b.inputs.iter().position(|n| n == s) {
            Some(Endpoint::Input(i))
        } else if let Some(i) = b.outputs.iter().position(|n| n == s) {
            Some(Endpoint::Output(i))
        } else if self.is_network && (s == "0" || s == "1") {
            Some(Endpoint::Constant(s == "1"))
        } else {
            None
        };
        found.ok_or_else(|| Error::UnknownEndpoint {
            definition: b.name.clone(),
            endpoint: s.to_string(),
        })
    }
}

/// Check that names are not declared twice in a definition
fn check_unique<'a, I: Iterator<Item = &'a String>>(definition: &str, names: I) -> Result<()> {
    if let Some(name) = names.duplicates().next() {
        return Err(Error::DuplicateName {
            definition: definition.to_string(),
            name: name.clone(),
        });
    }
    Ok(())
}
