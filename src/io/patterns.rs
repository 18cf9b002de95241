//! IO for input vectors and simulation results
//!
//! Input files hold one vector per line, one character per input:
//! ```text
//!     # a b c
//!     01X
//!     110
//! ```
//! Results are written one line per vector, with the outputs and the number of ticks:
//! ```text
//!     1: 0X 3
//!     2: 10 2
//! ```
//! A trailing `!` marks a simulation stopped at the iteration limit.

use std::io::{BufRead, BufReader, Read, Write};

use crate::error::{Error, Result};
use crate::network::Value;
use crate::sim::SimResult;

/// Read input vectors
pub fn read_patterns<R: Read>(r: R) -> Result<Vec<Vec<Value>>> {
    let mut ret = Vec::new();
    for (i, l) in BufReader::new(r).lines().enumerate() {
        let l = l?;
        let t = l.trim();
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        let p = Value::parse_pattern(t).ok_or_else(|| Error::Parse {
            line: i + 1,
            message: format!("bad pattern {t}"),
        })?;
        ret.push(p);
    }
    Ok(ret)
}

/// Write input vectors
pub fn write_patterns<W: Write>(w: &mut W, patterns: &[Vec<Value>]) -> Result<()> {
    for p in patterns {
        writeln!(w, "{}", Value::format_pattern(p))?;
    }
    Ok(())
}

/// Write simulation results
pub fn write_results<W: Write>(w: &mut W, results: &[SimResult]) -> Result<()> {
    for (i, r) in results.iter().enumerate() {
        write!(
            w,
            "{}: {} {}",
            i + 1,
            Value::format_pattern(&r.outputs),
            r.ticks
        )?;
        if !r.converged {
            write!(w, " !")?;
        }
        writeln!(w)?;
    }
    Ok(())
}
