//! Instantiation of definitions into a netlist
//!
//! Instantiation happens in two passes. The build pass creates every instance and pin of the
//! subtree, depth-first, and records for each template pin the fresh pin that implements it.
//! The rewire pass then translates every wiring edge of every composite through this
//! substitution map. Edges may reference pins created at any depth, so they can only be
//! resolved once the whole subtree exists.

use std::rc::Rc;

use fxhash::FxHashMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::network::definition::{CompositeDefinition, Definition, Endpoint};
use crate::network::netlist::{InstanceId, Netlist};
use crate::network::pin::PinId;

/// Template pin, qualified by the composite instance whose definition declares it
pub type TemplatePin = (InstanceId, Endpoint);

/// Mapping from template pins to the pins created for them
pub type Substitution = FxHashMap<TemplatePin, PinId>;

/// Builds independent copies of definitions into a netlist
pub struct Instancer<'a> {
    netlist: &'a mut Netlist,
    substitution: Substitution,
    composites: Vec<(InstanceId, Rc<Definition>)>,
}

impl<'a> Instancer<'a> {
    /// Create an instancer adding to the given netlist
    pub fn new(netlist: &'a mut Netlist) -> Instancer<'a> {
        Instancer {
            netlist,
            substitution: Substitution::default(),
            composites: Vec::new(),
        }
    }

    /// Instantiate a definition, returning the new instance and the substitution map
    ///
    /// Every pin of the result is freshly created: nothing is shared with the template or with
    /// another instantiation.
    pub fn instantiate(
        mut self,
        definition: &Rc<Definition>,
        name: &str,
    ) -> Result<(InstanceId, Substitution)> {
        let id = self.build(definition, name.to_string());
        self.rewire()?;
        Ok((id, self.substitution))
    }

    /// Instantiate the top-level composite, with two extra input pins for the constants
    ///
    /// The constant pins are the last two inputs of the instance, for Zero then One.
    pub fn instantiate_network(
        mut self,
        definition: &Rc<Definition>,
        name: &str,
    ) -> Result<(InstanceId, Substitution)> {
        if !matches!(definition.as_ref(), Definition::Composite(_)) {
            return Err(Error::InternalConsistency(format!(
                "network {} is not a composite",
                definition.name()
            )));
        }
        let id = self.build(definition, name.to_string());
        for c in [false, true] {
            let pin = self.netlist.add_pin(id, true);
            self.substitution.insert((id, Endpoint::Constant(c)), pin);
        }
        self.rewire()?;
        Ok((id, self.substitution))
    }

    /// Build pass: create instances and pins, recording the substitution
    fn build(&mut self, definition: &Rc<Definition>, name: String) -> InstanceId {
        let id = self.netlist.add_instance(name, definition.clone());
        match definition.as_ref() {
            Definition::Gate(g) => {
                for _ in 0..g.nb_inputs() {
                    self.netlist.add_pin(id, true);
                }
                for _ in 0..g.nb_outputs() {
                    self.netlist.add_pin(id, false);
                }
            }
            Definition::Composite(c) => {
                for i in 0..c.inputs().len() {
                    let pin = self.netlist.add_pin(id, true);
                    self.substitution.insert((id, Endpoint::Input(i)), pin);
                }
                for i in 0..c.outputs().len() {
                    let pin = self.netlist.add_pin(id, false);
                    self.substitution.insert((id, Endpoint::Output(i)), pin);
                }
                for (k, sub) in c.instances().iter().enumerate() {
                    let child_name = format!("{}.{}", self.netlist.instance(id).name(), sub.name);
                    let child = self.build(&sub.definition, child_name);
                    self.netlist.add_child(id, child);
                    let inst = self.netlist.instance(child);
                    for (pin, p) in inst.inputs().iter().enumerate() {
                        self.substitution
                            .insert((id, Endpoint::SubInput { instance: k, pin }), *p);
                    }
                    for (pin, p) in inst.outputs().iter().enumerate() {
                        self.substitution
                            .insert((id, Endpoint::SubOutput { instance: k, pin }), *p);
                    }
                }
                self.composites.push((id, definition.clone()));
            }
        }
        id
    }

    /// Rewire pass: translate the edges of every composite built
    fn rewire(&mut self) -> Result<()> {
        for (id, definition) in std::mem::take(&mut self.composites) {
            let Definition::Composite(c) = definition.as_ref() else {
                continue;
            };
            for (from, to) in c.connections() {
                let from_pin = self.lookup(id, c, from)?;
                let to_pin = self.lookup(id, c, to)?;
                self.netlist.add_follower(from_pin, to_pin);
            }
            debug!(
                instance = self.netlist.instance(id).name(),
                edges = c.connections().len(),
                "rewired composite"
            );
        }
        Ok(())
    }

    fn lookup(&self, id: InstanceId, c: &CompositeDefinition, e: &Endpoint) -> Result<PinId> {
        self.substitution.get(&(id, *e)).copied().ok_or_else(|| {
            Error::InternalConsistency(format!(
                "{} ({}): no pin for template endpoint {:?}",
                c.name(),
                self.netlist.instance(id).name(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use fxhash::FxHashSet;

    use super::Instancer;
    use crate::error::Error;
    use crate::network::definition::{
        CompositeDefinition, Definition, Endpoint, GateDefinition, SubInstance, TransitionRow,
    };
    use crate::network::netlist::Netlist;
    use crate::network::value::Value::*;
    use crate::sim::Worklist;

    fn not() -> Rc<Definition> {
        let mut g = GateDefinition::new("NOT", &["a"], &["q"]);
        g.add_row(TransitionRow::new(&[Zero], &[One])).unwrap();
        g.add_row(TransitionRow::new(&[One], &[Zero])).unwrap();
        Rc::new(Definition::Gate(g))
    }

    /// Two inverters in series
    fn buf(not: &Rc<Definition>) -> Rc<Definition> {
        let subs = vec![
            SubInstance {
                name: "n0".to_string(),
                definition: not.clone(),
            },
            SubInstance {
                name: "n1".to_string(),
                definition: not.clone(),
            },
        ];
        let connections = vec![
            (Endpoint::Input(0), Endpoint::SubInput { instance: 0, pin: 0 }),
            (
                Endpoint::SubOutput { instance: 0, pin: 0 },
                Endpoint::SubInput { instance: 1, pin: 0 },
            ),
            (Endpoint::SubOutput { instance: 1, pin: 0 }, Endpoint::Output(0)),
        ];
        Rc::new(Definition::Composite(CompositeDefinition::new(
            "BUF",
            vec!["a".to_string()],
            vec!["q".to_string()],
            subs,
            connections,
        )))
    }

    #[test]
    fn test_gate_instances_independent() {
        let def = not();
        let mut n = Netlist::new();
        let (a, _) = Instancer::new(&mut n).instantiate(&def, "a").unwrap();
        let (b, _) = Instancer::new(&mut n).instantiate(&def, "b").unwrap();
        assert_eq!(n.nb_pins(), 4);

        let mut w = Worklist::new(n.nb_instances());
        let in_a = n.instance(a).inputs()[0];
        let in_b = n.instance(b).inputs()[0];
        let out_b = n.instance(b).outputs()[0];
        n.set_value(in_a, One, &mut w);
        assert!(!n.pin(in_b).is_driven());
        assert!(!n.pin(out_b).is_driven());
        assert_eq!(n.pin(in_b).value(), Undefined);
        assert!(w.contains(a));
        assert!(!w.contains(b));
    }

    #[test]
    fn test_composite_rewired() {
        let not = not();
        let def = buf(&not);
        let mut n = Netlist::new();
        let (id, subst) = Instancer::new(&mut n).instantiate(&def, "top").unwrap();
        assert_eq!(n.nb_instances(), 3);
        assert_eq!(n.nb_pins(), 6);
        let inst = n.instance(id);
        assert_eq!(inst.children().len(), 2);
        let n0 = inst.children()[0];
        let n1 = inst.children()[1];
        assert_eq!(n.instance(n0).name(), "top.n0");
        assert_eq!(
            subst[&(id, Endpoint::SubInput { instance: 1, pin: 0 })],
            n.instance(n1).inputs()[0]
        );

        // Boundary input forwards to the first inverter, which forwards to the second one
        assert_eq!(
            n.pin(inst.inputs()[0]).followers(),
            &[n.instance(n0).inputs()[0]]
        );
        assert_eq!(
            n.pin(n.instance(n0).outputs()[0]).followers(),
            &[n.instance(n1).inputs()[0]]
        );
        assert_eq!(
            n.pin(n.instance(n1).outputs()[0]).followers(),
            &[inst.outputs()[0]]
        );
    }

    #[test]
    fn test_nested_no_shared_pins() {
        let not = not();
        let b = buf(&not);
        let top = Rc::new(Definition::Composite(CompositeDefinition::new(
            "TOP",
            vec!["a".to_string()],
            vec!["q".to_string()],
            vec![
                SubInstance {
                    name: "x".to_string(),
                    definition: b.clone(),
                },
                SubInstance {
                    name: "y".to_string(),
                    definition: b.clone(),
                },
            ],
            vec![
                (Endpoint::Input(0), Endpoint::SubInput { instance: 0, pin: 0 }),
                (
                    Endpoint::SubOutput { instance: 0, pin: 0 },
                    Endpoint::SubInput { instance: 1, pin: 0 },
                ),
                (Endpoint::SubOutput { instance: 1, pin: 0 }, Endpoint::Output(0)),
            ],
        )));
        let mut n = Netlist::new();
        Instancer::new(&mut n).instantiate(&top, "t").unwrap();
        assert_eq!(n.nb_instances(), 7);

        // Every pin belongs to exactly one instance
        let mut seen = FxHashSet::default();
        for id in n.instance_ids() {
            for p in n.instance(id).inputs().iter().chain(n.instance(id).outputs()) {
                assert!(seen.insert(*p));
                assert_eq!(n.pin(*p).owner(), id);
            }
        }
        assert_eq!(seen.len(), n.nb_pins());

        // The four inverters are chained
        let mut nb_edges = 0;
        for p in n.pin_ids() {
            nb_edges += n.pin(p).followers().len();
        }
        assert_eq!(nb_edges, 3 + 3 + 3);
    }

    #[test]
    fn test_unresolved_endpoint() {
        let not = not();
        let bad = Rc::new(Definition::Composite(CompositeDefinition::new(
            "BAD",
            vec!["a".to_string()],
            vec!["q".to_string()],
            vec![SubInstance {
                name: "n".to_string(),
                definition: not,
            }],
            vec![
                (Endpoint::Input(0), Endpoint::SubInput { instance: 0, pin: 3 }),
                (Endpoint::Constant(true), Endpoint::Output(0)),
            ],
        )));
        let mut n = Netlist::new();
        let res = Instancer::new(&mut n).instantiate(&bad, "bad");
        assert!(matches!(res, Err(Error::InternalConsistency(_))));
    }

    #[test]
    fn test_network_constants() {
        let not = not();
        let top = Rc::new(Definition::Composite(CompositeDefinition::new(
            "NET",
            Vec::new(),
            vec!["q".to_string()],
            vec![SubInstance {
                name: "n".to_string(),
                definition: not.clone(),
            }],
            vec![
                (Endpoint::Constant(true), Endpoint::SubInput { instance: 0, pin: 0 }),
                (Endpoint::SubOutput { instance: 0, pin: 0 }, Endpoint::Output(0)),
            ],
        )));
        let mut n = Netlist::new();
        let (id, subst) = Instancer::new(&mut n)
            .instantiate_network(&top, "net")
            .unwrap();
        assert_eq!(n.instance(id).inputs().len(), 2);
        let one = subst[&(id, Endpoint::Constant(true))];
        assert_eq!(one, n.instance(id).inputs()[1]);
        assert_eq!(n.pin(one).followers().len(), 1);

        // The same composite without constants is malformed
        let mut n = Netlist::new();
        let res = Instancer::new(&mut n).instantiate(&top, "net");
        assert!(matches!(res, Err(Error::InternalConsistency(_))));
        let res = Instancer::new(&mut n).instantiate_network(&not, "net");
        assert!(matches!(res, Err(Error::InternalConsistency(_))));
    }
}
