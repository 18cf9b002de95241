//! Command line interface

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use kdam::{tqdm, BarExt};
use tracing::info;

use crate::error::Result;
use crate::io::{read_description_file, read_pattern_file, write_result_file, write_results};
use crate::network::stats::stats;
use crate::network::{Network, Value};
use crate::sim::{binary_pattern, generate_random_patterns, Simulator, ITERATION_LIMIT};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics about a network
    ///
    /// Will print statistics on the number of inputs, outputs, gates and pins in the network.
    #[clap()]
    Show(ShowArgs),

    /// Simulate a network on input vectors
    ///
    /// Input vectors hold one character per input, 0, 1 or X:
    ///    01X
    ///    110
    /// Each result line gives the outputs and the number of ticks:
    ///    1: 0X 3
    #[clap(alias = "sim")]
    Simulate(SimulateArgs),

    /// Print the response of a network to every binary input vector
    #[clap()]
    Exhaustive(ExhaustiveArgs),
}

impl Commands {
    /// Run the command
    pub fn run(&self) -> Result<()> {
        match self {
            Commands::Show(a) => a.run(),
            Commands::Simulate(a) => a.run(),
            Commands::Exhaustive(a) => a.run(),
        }
    }
}

fn read_network(file: &Path) -> Result<Network> {
    let lib = read_description_file(file)?;
    let network = lib.build_network()?;
    info!(
        network = network.name(),
        inputs = network.nb_inputs(),
        outputs = network.nb_outputs(),
        "network built"
    );
    Ok(network)
}

/// Command arguments for network informations
#[derive(Args)]
pub struct ShowArgs {
    /// Network to show
    file: PathBuf,
}

impl ShowArgs {
    /// Print the statistics of the network
    pub fn run(&self) -> Result<()> {
        let network = read_network(&self.file)?;
        println!("Network {}:", network.name());
        println!("  Inputs: {}", network.input_names().iter().join(" "));
        println!("  Outputs: {}", network.output_names().iter().join(" "));
        println!("{}", stats(&network));
        Ok(())
    }
}

/// Command arguments for simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Network to simulate
    network: PathBuf,

    /// Input vectors file
    #[arg(short = 'i', long, conflicts_with = "random")]
    input: Option<PathBuf>,

    /// Number of random binary vectors to simulate instead of an input file
    #[arg(short = 'r', long)]
    random: Option<usize>,

    /// Random seed for the generated vectors
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Output file for the results; standard output if not given
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Maximum number of ticks per vector
    #[arg(long, default_value_t = ITERATION_LIMIT)]
    max_iterations: u64,
}

impl SimulateArgs {
    /// Simulate every input vector and write the results
    pub fn run(&self) -> Result<()> {
        let mut network = read_network(&self.network)?;
        let patterns = match &self.input {
            Some(f) => read_pattern_file(f)?,
            None => {
                let nb = self.random.unwrap_or(4 * (network.nb_inputs() + 1));
                generate_random_patterns(network.nb_inputs(), nb, self.seed)
            }
        };
        let sim = Simulator::with_iteration_limit(self.max_iterations);
        let results = sim.run_all(&mut network, &patterns)?;
        let nb_capped = results.iter().filter(|r| !r.converged).count();
        info!(
            vectors = results.len(),
            capped = nb_capped,
            "simulation done"
        );
        match &self.output {
            Some(f) => write_result_file(f, &results),
            None => write_results(&mut std::io::stdout().lock(), &results),
        }
    }
}

/// Command arguments for exhaustive simulation
#[derive(Args)]
pub struct ExhaustiveArgs {
    /// Network to simulate
    network: PathBuf,

    /// Maximum number of ticks per vector
    #[arg(long, default_value_t = ITERATION_LIMIT)]
    max_iterations: u64,
}

impl ExhaustiveArgs {
    /// Print the truth table of the network
    pub fn run(&self) -> Result<()> {
        let mut network = read_network(&self.network)?;
        let nb_inputs = network.nb_inputs();
        if nb_inputs >= 32 {
            eprintln!("Too many inputs for exhaustive simulation: {nb_inputs}");
            std::process::exit(1);
        }
        let nb_vectors = 1u64 << nb_inputs;
        let sim = Simulator::with_iteration_limit(self.max_iterations);

        let mut lines = Vec::new();
        let mut progress = tqdm!(total = nb_vectors as usize);
        progress.set_description("Vectors simulated");
        for i in 0..nb_vectors {
            let inputs = binary_pattern(nb_inputs, i);
            let res = sim.run(&mut network, &inputs)?;
            let mut line = format!(
                "{} {} {}",
                Value::format_pattern(&inputs),
                Value::format_pattern(&res.outputs),
                res.ticks
            );
            if !res.converged {
                line.push_str(" !");
            }
            lines.push(line);
            progress.update(1)?;
        }
        progress.refresh()?;
        eprintln!();

        let mut out = std::io::stdout().lock();
        writeln!(
            out,
            "# {} -> {}",
            network.input_names().iter().join(" "),
            network.output_names().iter().join(" ")
        )?;
        for l in lines {
            writeln!(out, "{l}")?;
        }
        Ok(())
    }
}
