//! Simulation of hierarchical tri-state logic networks
//!
//! This crate simulates networks built from gates described by truth tables over three values:
//! `0`, `1` and `X` (undefined). Gates are assembled into reusable composites, and a single
//! composite is designated as the network to simulate.
//!
//! # Usage
//!
//! Networks are read from description files, and simulated on input vectors:
//!
//! ```bash
//! # Show available commands
//! tristate help
//! # Show statistics about the network
//! tristate show mydesign.net
//! # Simulate the network on input vectors, one per line
//! tristate simulate mydesign.net -i vectors.txt -o results.txt
//! # Simulate random binary vectors
//! tristate simulate mydesign.net --random 100 --seed 3
//! # Print the response to every binary input vector
//! tristate exhaustive mydesign.net
//! ```
//!
//! Log messages are enabled with the `RUST_LOG` environment variable, for example `RUST_LOG=debug`.
//!
//! # Simulation model
//!
//! Each definition is instantiated independently: two instances of the same gate never share
//! state. Wires push values from a pin to its followers. A gate is evaluated once all its inputs
//! have been driven, and all the gates evaluated in a tick see the values from the start of that
//! tick. When no gate can make progress, feedback loops that wait on themselves are
//! seeded with `X`. A query ends when the values settle, or after [`ITERATION_LIMIT`] ticks.
//!
//! Gate evaluation looks for the row matching the input pattern exactly. If there is none, the
//! outputs are all `X` when an input is `X`, and all `0` otherwise.
//!
//! For example, here is an AND gate driven by two inputs:
//! ```
//! use tristate::{CompositeBuilder, GateDefinition, Library, TransitionRow, Value::*};
//!
//! let mut and2 = GateDefinition::new("AND2", &["a", "b"], &["q"]);
//! and2.add_row(TransitionRow::new(&[Zero, Zero], &[Zero])).unwrap();
//! and2.add_row(TransitionRow::new(&[Zero, One], &[Zero])).unwrap();
//! and2.add_row(TransitionRow::new(&[One, Zero], &[Zero])).unwrap();
//! and2.add_row(TransitionRow::new(&[One, One], &[One])).unwrap();
//!
//! let mut lib = Library::new();
//! lib.add_gate(and2).unwrap();
//! let mut top = CompositeBuilder::new("top", &["a", "b"], &["q"]);
//! top.add_instance("g", "AND2")
//!     .connect("a", "g.a")
//!     .connect("b", "g.b")
//!     .connect("g.q", "q");
//! lib.set_network(top).unwrap();
//!
//! let mut network = lib.build_network().unwrap();
//! assert_eq!(tristate::evaluate(&mut network, &[One, One]).unwrap(), (1, vec![One]));
//! assert_eq!(tristate::evaluate(&mut network, &[One, Zero]).unwrap(), (1, vec![Zero]));
//! assert_eq!(
//!     tristate::evaluate(&mut network, &[Undefined, One]).unwrap(),
//!     (1, vec![Undefined])
//! );
//! ```
//!
//! ## Datastructures
//!
//! Definitions are shared templates. Building the network copies them into a single arena of
//! pins and instances, addressed by index, so that a simulation only touches plain vectors.

#![warn(missing_docs)]

pub mod cmd;
pub mod error;
pub mod io;
pub mod network;
pub mod sim;

pub use error::{Error, Result};
pub use network::{
    build_network, stats, CompositeBuilder, GateDefinition, Library, Network, TransitionRow,
    Value,
};
pub use sim::{evaluate, SimResult, Simulator, ITERATION_LIMIT};
