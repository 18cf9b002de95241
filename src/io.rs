//! Read and write description and pattern files

mod desc;
mod patterns;

use std::fs::File;
use std::path::Path;

pub use desc::read_description;
pub use patterns::{read_patterns, write_patterns, write_results};

use crate::error::Result;
use crate::network::{Library, Value};
use crate::sim::SimResult;

/// Read a library from a description file
pub fn read_description_file(path: &Path) -> Result<Library> {
    let f = File::open(path)?;
    read_description(f)
}

/// Read input vectors from a file
pub fn read_pattern_file(path: &Path) -> Result<Vec<Vec<Value>>> {
    let f = File::open(path)?;
    read_patterns(f)
}

/// Write simulation results to a file
pub fn write_result_file(path: &Path, results: &[SimResult]) -> Result<()> {
    let mut f = File::create(path)?;
    write_results(&mut f, results)
}
