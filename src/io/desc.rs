//! IO for description files
//!
//! These files list gates, composites and the network in blocks:
//! ```text
//!     # This is a comment
//!     GATE AND2
//!     INPUTS a b
//!     OUTPUTS q
//!     00 0
//!     01 0
//!     10 0
//!     11 1
//!     END
//!
//!     COMPOSITE AND3
//!     INPUTS a b c
//!     OUTPUTS q
//!     INSTANCE g0 AND2
//!     INSTANCE g1 AND2
//!     a -> g0.a
//!     b -> g0.b
//!     g0.q -> g1.a
//!     c -> g1.b
//!     g1.q -> q
//!     END
//!
//!     NETWORK top
//!     INPUTS x y
//!     OUTPUTS z
//!     INSTANCE g AND3
//!     x -> g.a
//!     y -> g.b
//!     1 -> g.c
//!     g.q -> z
//!     END
//! ```
//! Truth table rows give the input pattern then the outputs, with `0`, `1` or `X` for each
//! value, and `-` for an empty pattern.

use std::io::{BufRead, BufReader, Read};

use crate::error::{Error, Result};
use crate::network::{CompositeBuilder, GateDefinition, Library, TransitionRow, Value};

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        line,
        message: message.into(),
    }
}

/// Block being read
enum Block {
    Gate {
        name: String,
        inputs: Option<Vec<String>>,
        outputs: Option<Vec<String>>,
        rows: Vec<(usize, Vec<Value>, Vec<Value>)>,
    },
    Composite {
        name: String,
        is_network: bool,
        inputs: Option<Vec<String>>,
        outputs: Option<Vec<String>>,
        instances: Vec<(String, String)>,
        connections: Vec<(String, String)>,
    },
}

impl Block {
    fn set_pins(&mut self, line: usize, keyword: &str, names: Vec<String>) -> Result<()> {
        let (inputs, outputs) = match self {
            Block::Gate {
                inputs, outputs, ..
            } => (inputs, outputs),
            Block::Composite {
                inputs, outputs, ..
            } => (inputs, outputs),
        };
        let slot = if keyword == "INPUTS" { inputs } else { outputs };
        if slot.is_some() {
            return Err(parse_error(line, format!("{keyword} given twice")));
        }
        *slot = Some(names);
        Ok(())
    }

    /// Register the finished block
    fn finish(self, line: usize, lib: &mut Library) -> Result<()> {
        match self {
            Block::Gate {
                name,
                inputs,
                outputs,
                rows,
            } => {
                let (inputs, outputs) = pins_or_error(line, &name, inputs, outputs)?;
                let mut gate = GateDefinition::new(&name, &inputs, &outputs);
                for (row_line, ins, outs) in rows {
                    gate.add_row(TransitionRow::new(&ins, &outs))
                        .map_err(|e| Error::AtLine {
                            line: row_line,
                            source: Box::new(e),
                        })?;
                }
                lib.add_gate(gate)?;
            }
            Block::Composite {
                name,
                is_network,
                inputs,
                outputs,
                instances,
                connections,
            } => {
                let (inputs, outputs) = pins_or_error(line, &name, inputs, outputs)?;
                let mut b = CompositeBuilder::new(&name, &inputs, &outputs);
                for (inst, def) in &instances {
                    b.add_instance(inst, def);
                }
                for (from, to) in &connections {
                    b.connect(from, to);
                }
                if is_network {
                    lib.set_network(b)?;
                } else {
                    lib.add_composite(b)?;
                }
            }
        }
        Ok(())
    }
}

fn pins_or_error(
    line: usize,
    name: &str,
    inputs: Option<Vec<String>>,
    outputs: Option<Vec<String>>,
) -> Result<(Vec<String>, Vec<String>)> {
    match (inputs, outputs) {
        (Some(i), Some(o)) => Ok((i, o)),
        (None, _) => Err(parse_error(line, format!("{name} has no INPUTS line"))),
        (_, None) => Err(parse_error(line, format!("{name} has no OUTPUTS line"))),
    }
}

/// Read a library in description format
pub fn read_description<R: Read>(r: R) -> Result<Library> {
    let mut lib = Library::new();
    let mut block: Option<Block> = None;
    let mut last_line = 0;
    for (i, l) in BufReader::new(r).lines().enumerate() {
        let line = i + 1;
        last_line = line;
        let l = l?;
        let t = l.trim();
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        let words: Vec<&str> = t.split_whitespace().collect();
        let Some(current) = block.as_mut() else {
            block = Some(match words[0] {
                "GATE" | "COMPOSITE" => {
                    if words.len() != 2 {
                        return Err(parse_error(line, format!("expected {} <name>", words[0])));
                    }
                    if words[0] == "GATE" {
                        Block::Gate {
                            name: words[1].to_string(),
                            inputs: None,
                            outputs: None,
                            rows: Vec::new(),
                        }
                    } else {
                        Block::Composite {
                            name: words[1].to_string(),
                            is_network: false,
                            inputs: None,
                            outputs: None,
                            instances: Vec::new(),
                            connections: Vec::new(),
                        }
                    }
                }
                "NETWORK" => {
                    if words.len() > 2 {
                        return Err(parse_error(line, "expected NETWORK [<name>]"));
                    }
                    Block::Composite {
                        name: words.get(1).unwrap_or(&"network").to_string(),
                        is_network: true,
                        inputs: None,
                        outputs: None,
                        instances: Vec::new(),
                        connections: Vec::new(),
                    }
                }
                w => return Err(parse_error(line, format!("unknown keyword {w}"))),
            });
            continue;
        };

        match words[0] {
            "END" => {
                if let Some(b) = block.take() {
                    b.finish(line, &mut lib)?;
                }
            }
            "INPUTS" | "OUTPUTS" => {
                let names = words[1..].iter().map(|s| s.to_string()).collect();
                current.set_pins(line, words[0], names)?;
            }
            _ => match current {
                Block::Gate { rows, .. } => {
                    if words.len() != 2 {
                        return Err(parse_error(line, "expected <inputs> <outputs>"));
                    }
                    let ins = Value::parse_pattern(words[0])
                        .ok_or_else(|| parse_error(line, format!("bad pattern {}", words[0])))?;
                    let outs = Value::parse_pattern(words[1])
                        .ok_or_else(|| parse_error(line, format!("bad pattern {}", words[1])))?;
                    rows.push((line, ins, outs));
                }
                Block::Composite {
                    instances,
                    connections,
                    ..
                } => {
                    if words[0] == "INSTANCE" && words.len() == 3 {
                        instances.push((words[1].to_string(), words[2].to_string()));
                    } else if words.len() == 3 && words[1] == "->" {
                        connections.push((words[0].to_string(), words[2].to_string()));
                    } else {
                        return Err(parse_error(line, format!("cannot parse '{t}'")));
                    }
                }
            },
        }
    }
    if block.is_some() {
        return Err(parse_error(last_line, "missing END at end of file"));
    }
    Ok(lib)
}

#[cfg(test)]
mod tests {
    use super::read_description;
    use crate::error::Error;
    use crate::network::Value::*;
    use crate::sim::evaluate;

    const EXAMPLE: &str = "# Half adder
GATE AND2
INPUTS a b
OUTPUTS q
00 0
01 0
10 0
11 1
END

GATE XOR2
INPUTS a b
OUTPUTS q
00 0
01 1
10 1
11 0
END

GATE VDD
INPUTS
OUTPUTS q
- 1
END

COMPOSITE HA
INPUTS a b
OUTPUTS s c
INSTANCE x XOR2
INSTANCE n AND2
a -> x.a
b -> x.b
a -> n.a
b -> n.b
x.q -> s
n.q -> c
END

NETWORK top
INPUTS a b
OUTPUTS s c k
INSTANCE h HA
INSTANCE k AND2
INSTANCE v VDD
a  ->  h.a
b -> h.b
h.s -> s
h.c -> c
v.q -> k.a
1 -> k.b
k.q -> k
END
";

    #[test]
    fn test_read() {
        let lib = read_description(EXAMPLE.as_bytes()).unwrap();
        assert_eq!(lib.nb_definitions(), 4);
        let mut net = lib.build_network().unwrap();
        assert_eq!(net.nb_inputs(), 2);
        assert_eq!(net.nb_outputs(), 3);
        let (_, out) = evaluate(&mut net, &[One, One]).unwrap();
        assert_eq!(out, vec![Zero, One, One]);
        let (_, out) = evaluate(&mut net, &[One, Zero]).unwrap();
        assert_eq!(out, vec![One, Zero, One]);
        let (_, out) = evaluate(&mut net, &[Undefined, Zero]).unwrap();
        assert_eq!(out, vec![Undefined, Undefined, One]);
    }

    #[test]
    fn test_errors() {
        let res = read_description("GATE A\nINPUTS a\nOUTPUTS q\n0 2\nEND\n".as_bytes());
        assert!(matches!(res, Err(Error::Parse { line: 4, .. })));
        let res = read_description("GATE A\nINPUTS a\nOUTPUTS q\n0 1\n0 0\nEND\n".as_bytes());
        let Err(Error::AtLine { line, source }) = res else {
            panic!("expected an error with a line");
        };
        assert_eq!(line, 5);
        assert!(matches!(*source, Error::DuplicateRule { .. }));
        let res = read_description("GATE A\nINPUTS a b\nOUTPUTS q\n\n01 1\n0 1\nEND\n".as_bytes());
        let Err(Error::AtLine { line, source }) = res else {
            panic!("expected an error with a line");
        };
        assert_eq!(line, 6);
        assert!(matches!(*source, Error::RowWidth { .. }));
        let res = read_description("GATE A\nOUTPUTS q\n- 1\nEND\n".as_bytes());
        assert!(matches!(res, Err(Error::Parse { line: 4, .. })));
        let res = read_description("GATE A\nINPUTS\nOUTPUTS q\n\n# done\n".as_bytes());
        assert!(matches!(res, Err(Error::Parse { line: 5, .. })));
        let res = read_description("WIRE a\n".as_bytes());
        assert!(matches!(res, Err(Error::Parse { line: 1, .. })));
        let res = read_description(
            "COMPOSITE C\nINPUTS a\nOUTPUTS q\nINSTANCE g NOPE\na -> g.a\ng.q -> q\nEND\n"
                .as_bytes(),
        );
        assert!(matches!(res, Err(Error::UnknownDefinition(_))));
    }
}
