use std::fmt;
use std::rc::Rc;

use fxhash::FxHashMap;

use crate::error::{Error, Result};
use crate::network::value::Value;

/// One row of a truth table: an input pattern and the corresponding outputs
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct TransitionRow {
    inputs: Box<[Value]>,
    outputs: Box<[Value]>,
}

impl TransitionRow {
    /// Create a new row
    pub fn new(inputs: &[Value], outputs: &[Value]) -> TransitionRow {
        TransitionRow {
            inputs: inputs.into(),
            outputs: outputs.into(),
        }
    }

    /// Input pattern of the row
    pub fn inputs(&self) -> &[Value] {
        &self.inputs
    }

    /// Output values of the row
    pub fn outputs(&self) -> &[Value] {
        &self.outputs
    }
}

impl fmt::Display for TransitionRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            Value::format_pattern(&self.inputs),
            Value::format_pattern(&self.outputs)
        )
    }
}

/// Gate template, defined by an explicit tri-state truth table
///
/// Patterns that are not in the table follow a fixed fallback policy:
///   * a pattern containing an Undefined value yields Undefined on every output;
///   * a fully defined pattern yields Zero on every output.
#[derive(Debug, Clone)]
pub struct GateDefinition {
    name: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
    rows: Vec<TransitionRow>,
    index: FxHashMap<Box<[Value]>, usize>,
}

impl GateDefinition {
    /// Create a new gate with an empty truth table
    pub fn new<S: AsRef<str>>(name: &str, inputs: &[S], outputs: &[S]) -> GateDefinition {
        GateDefinition {
            name: name.to_string(),
            inputs: inputs.iter().map(|s| s.as_ref().to_string()).collect(),
            outputs: outputs.iter().map(|s| s.as_ref().to_string()).collect(),
            rows: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Name of the gate
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered input names
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Ordered output names
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Number of inputs
    pub fn nb_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Number of outputs
    pub fn nb_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Rows of the truth table, in registration order
    pub fn rows(&self) -> &[TransitionRow] {
        &self.rows
    }

    /// Register a new row in the truth table
    ///
    /// Fails if the row does not have the width of the gate, or if a row with the same input
    /// pattern already exists.
    pub fn add_row(&mut self, row: TransitionRow) -> Result<()> {
        if row.inputs.len() != self.nb_inputs() || row.outputs.len() != self.nb_outputs() {
            return Err(Error::RowWidth {
                gate: self.name.clone(),
                row: row.to_string(),
                nb_inputs: self.nb_inputs(),
                nb_outputs: self.nb_outputs(),
            });
        }
        if self.index.contains_key(&row.inputs) {
            return Err(Error::DuplicateRule {
                gate: self.name.clone(),
                pattern: Value::format_pattern(&row.inputs),
            });
        }
        self.index.insert(row.inputs.clone(), self.rows.len());
        self.rows.push(row);
        Ok(())
    }

    /// Compute the outputs for an input pattern
    ///
    /// Exact match first, then Undefined propagation, then the all-Zero default.
    /// The order of the last two rules matters.
    pub fn evaluate(&self, pattern: &[Value]) -> Vec<Value> {
        debug_assert_eq!(pattern.len(), self.nb_inputs());
        if let Some(&i) = self.index.get(pattern) {
            self.rows[i].outputs.to_vec()
        } else if pattern.contains(&Value::Undefined) {
            vec![Value::Undefined; self.nb_outputs()]
        } else {
            vec![Value::Zero; self.nb_outputs()]
        }
    }
}

/// A pin of a composite template, as seen from inside the composite
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Endpoint {
    /// Boundary input of the composite
    Input(usize),
    /// Boundary output of the composite
    Output(usize),
    /// Input of a sub-instance
    SubInput {
        /// Index of the sub-instance
        instance: usize,
        /// Index of the input in the sub-instance's definition
        pin: usize,
    },
    /// Output of a sub-instance
    SubOutput {
        /// Index of the sub-instance
        instance: usize,
        /// Index of the output in the sub-instance's definition
        pin: usize,
    },
    /// Implicit constant pin; only available in the network
    Constant(bool),
}

/// Named placement of a definition inside a composite
#[derive(Debug, Clone)]
pub struct SubInstance {
    /// Name of the placement, unique in the composite
    pub name: String,
    /// Definition being placed
    pub definition: Rc<Definition>,
}

/// Composite template, made of sub-instances and wiring between them
///
/// Connections are directed: the value of the first endpoint is pushed to the second.
/// The structure is not validated on creation; [`Library`](crate::network::Library) is the
/// normal way to obtain one.
#[derive(Debug, Clone)]
pub struct CompositeDefinition {
    name: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
    instances: Vec<SubInstance>,
    connections: Vec<(Endpoint, Endpoint)>,
}

impl CompositeDefinition {
    /// Create a composite from already resolved parts
    pub fn new(
        name: &str,
        inputs: Vec<String>,
        outputs: Vec<String>,
        instances: Vec<SubInstance>,
        connections: Vec<(Endpoint, Endpoint)>,
    ) -> CompositeDefinition {
        CompositeDefinition {
            name: name.to_string(),
            inputs,
            outputs,
            instances,
            connections,
        }
    }

    /// Name of the composite
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered input names
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Ordered output names
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Sub-instances, in declaration order
    pub fn instances(&self) -> &[SubInstance] {
        &self.instances
    }

    /// Wiring edges, in declaration order
    pub fn connections(&self) -> &[(Endpoint, Endpoint)] {
        &self.connections
    }
}

/// Any registered template
#[derive(Debug, Clone)]
pub enum Definition {
    /// Truth-table gate
    Gate(GateDefinition),
    /// Composite built from other definitions
    Composite(CompositeDefinition),
}

impl Definition {
    /// Name of the definition
    pub fn name(&self) -> &str {
        match self {
            Definition::Gate(g) => g.name(),
            Definition::Composite(c) => c.name(),
        }
    }

    /// Ordered input names
    pub fn inputs(&self) -> &[String] {
        match self {
            Definition::Gate(g) => g.inputs(),
            Definition::Composite(c) => c.inputs(),
        }
    }

    /// Ordered output names
    pub fn outputs(&self) -> &[String] {
        match self {
            Definition::Gate(g) => g.outputs(),
            Definition::Composite(c) => c.outputs(),
        }
    }
}
