//! Error types for building and simulating networks

use thiserror::Error;

/// Errors raised while registering definitions, building or querying a network
#[derive(Debug, Error)]
pub enum Error {
    /// The input vector does not match the number of declared inputs of the network
    #[error("expected {expected} input values, got {got}")]
    Arity {
        /// Number of declared (non-constant) network inputs
        expected: usize,
        /// Length of the vector supplied by the caller
        got: usize,
    },

    /// Two rows of the same gate share an input pattern
    #[error("gate {gate} already has a row for pattern {pattern}")]
    DuplicateRule {
        /// Name of the gate definition
        gate: String,
        /// The duplicated input pattern
        pattern: String,
    },

    /// A template could not be instantiated consistently
    #[error("internal consistency error: {0}")]
    InternalConsistency(String),

    /// A truth table row does not have the width of the gate
    #[error("gate {gate}: row {row} should have {nb_inputs} inputs and {nb_outputs} outputs")]
    RowWidth {
        /// Name of the gate definition
        gate: String,
        /// The offending row
        row: String,
        /// Declared number of inputs
        nb_inputs: usize,
        /// Declared number of outputs
        nb_outputs: usize,
    },

    /// A definition with this name is already registered
    #[error("definition {0} is defined twice")]
    DuplicateDefinition(String),

    /// A composite refers to a definition that is not registered
    #[error("unknown definition {0}")]
    UnknownDefinition(String),

    /// A pin or instance name is declared twice in the same definition
    #[error("{definition}: {name} is declared twice")]
    DuplicateName {
        /// Name of the definition
        definition: String,
        /// The duplicated name
        name: String,
    },

    /// A connection refers to a pin that does not exist
    #[error("{definition}: unknown endpoint {endpoint}")]
    UnknownEndpoint {
        /// Name of the definition
        definition: String,
        /// The endpoint as written
        endpoint: String,
    },

    /// A connection goes in a direction that is not allowed
    #[error("{definition}: cannot connect {from} to {to}")]
    InvalidConnection {
        /// Name of the definition
        definition: String,
        /// Source endpoint as written
        from: String,
        /// Target endpoint as written
        to: String,
    },

    /// A pin is driven by more than one connection
    #[error("{definition}: {endpoint} is driven more than once")]
    MultipleDrivers {
        /// Name of the definition
        definition: String,
        /// The pin driven multiple times
        endpoint: String,
    },

    /// A pin that must be driven has no driver
    #[error("{definition}: {endpoint} is not driven")]
    Undriven {
        /// Name of the definition
        definition: String,
        /// The undriven pin
        endpoint: String,
    },

    /// A boundary input is not connected to anything
    #[error("{definition}: input {endpoint} is not used")]
    UnusedInput {
        /// Name of the definition
        definition: String,
        /// The unused input
        endpoint: String,
    },

    /// No network definition was given to the library
    #[error("no network definition")]
    MissingNetwork,

    /// A description or pattern file is malformed
    #[error("line {line}: {message}")]
    Parse {
        /// Line number, starting at 1
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// Error raised by a definition read from a file, with the line it comes from
    #[error("line {line}: {source}")]
    AtLine {
        /// Line number, starting at 1
        line: usize,
        /// The underlying error
        #[source]
        source: Box<Error>,
    },

        /// Error during file IO
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
