//! Representation of definitions and of the instantiated network

mod definition;
pub mod instance;
mod library;
mod netlist;
mod network;
mod pin;
pub mod stats;
mod value;

pub use definition::{
    CompositeDefinition, Definition, Endpoint, GateDefinition, SubInstance, TransitionRow,
};
pub use library::{CompositeBuilder, Library};
pub use netlist::{Instance, InstanceId, InstanceState, Netlist};
pub use network::{build_network, Network};
pub use pin::{Pin, PinId, PinSlot};
pub use value::Value;
