//! Line-oriented rendering of scheduler verdicts, breadth-first results and halting
//! distributions, as plain text or as one JSON object per line.

use std::io::{self, Write};
use std::time::Instant;

use serde::Serialize;

use crate::distribution::{BreadthSearch, Distribution};
use crate::scheduler::Verdict;

/// Output format of a [`Reporter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct Record<'a> {
    #[serde(flatten)]
    verdict: &'a Verdict,
    elapsed_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    speedup: Option<u128>,
}

/// Number of `size`-state machines without any pruning: each of the `2 * size` table entries
/// is either a halt or one of `4 * size` moves. `None` if it does not fit in a `u128`.
pub fn naive_machine_count(size: usize) -> Option<u128> {
    (4 * size as u128 + 1).checked_pow(2 * size as u32)
}

/// How many times fewer machines the search visited than the naive enumeration contains.
pub fn speedup(size: usize, machines_searched: u64) -> Option<u128> {
    let naive = naive_machine_count(size)?;
    naive.checked_div(machines_searched as u128)
}

/// Writes verdicts and distributions to an output stream.
///
/// Elapsed times are measured from the reporter's creation.
pub struct Reporter<W: Write> {
    out: W,
    format: Format,
    start: Instant,
}

impl<W: Write> Reporter<W> {
    /// Creates a reporter and starts its clock.
    ///
    /// # Arguments
    ///
    /// * `out` - Where lines are written. Pass `&mut` a writer to keep using it afterwards.
    /// * `format` - Plain text lines or one JSON object per line.
    pub fn new(out: W, format: Format) -> Self {
        Self {
            out,
            format,
            start: Instant::now(),
        }
    }

    /// Writes one verdict line.
    pub fn verdict(&mut self, verdict: &Verdict) -> io::Result<()> {
        let elapsed = self.start.elapsed().as_secs();
        match self.format {
            Format::Text => writeln!(self.out, "{}", render_verdict(verdict, elapsed)),
            Format::Json => {
                let speedup = match verdict {
                    Verdict::Confirmed { .. } => {
                        speedup(verdict.size(), verdict.machines_searched())
                    }
                    _ => None,
                };
                let record = Record {
                    verdict,
                    elapsed_secs: elapsed,
                    speedup,
                };
                serde_json::to_writer(&mut self.out, &record)?;
                writeln!(self.out)
            }
        }
    }

    /// Writes a halting distribution.
    pub fn distribution(&mut self, distribution: &Distribution) -> io::Result<()> {
        match self.format {
            Format::Text => {
                for (step, count) in &distribution.halting {
                    writeln!(self.out, "Halting on step {}: {} machines", step, count)?;
                }
                writeln!(
                    self.out,
                    "Didn't halt in {} steps: {} machines",
                    distribution.max_steps, distribution.running
                )
            }
            Format::Json => {
                serde_json::to_writer(&mut self.out, distribution)?;
                writeln!(self.out)
            }
        }
    }

    /// Writes the outcome of a breadth-first Lazy Beaver search.
    pub fn breadth(&mut self, result: &BreadthSearch) -> io::Result<()> {
        let elapsed = self.start.elapsed().as_secs();
        match self.format {
            Format::Text => writeln!(self.out, "{}", render_breadth(result, elapsed)),
            Format::Json => {
                serde_json::to_writer(&mut self.out, result)?;
                writeln!(self.out)
            }
        }
    }

    /// Flushes the underlying writer.
    ///
    /// # Returns
    ///
    /// * `Ok(())` once every line written so far has reached the writer's destination.
    /// * `Err(io::Error)` if the writer fails to flush.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Renders a breadth-first result as a single line of text.
pub fn render_breadth(result: &BreadthSearch, elapsed_secs: u64) -> String {
    let details = format!(
        "breadth-first, peak frontier {}, {} pruned, {}s",
        result.peak_frontier, result.pruned, elapsed_secs
    );
    match result.value {
        Some(value) => format!("LB({}) = {} [{}]", result.size, value, details),
        None => format!("LB({}) > {} [{}]", result.size, result.max_steps, details),
    }
}

/// Renders a verdict as a single line of text.
pub fn render_verdict(verdict: &Verdict, elapsed_secs: u64) -> String {
    match verdict {
        Verdict::Confirmed {
            size,
            value,
            machines_searched,
            ..
        } => {
            let speedup = speedup(*size, *machines_searched)
                .map(|x| format!(", {}x speedup", x))
                .unwrap_or_default();
            format!(
                "LB({}) = {} [{} machines, {}s{}]",
                size, value, machines_searched, elapsed_secs, speedup
            )
        }
        Verdict::Exceeds {
            size,
            budget,
            machines_searched,
        } => format!(
            "LB({}) > {} [{} machines, {}s]",
            size, budget, machines_searched, elapsed_secs
        ),
        Verdict::Unresolved {
            size,
            budget,
            machines_searched,
        } => format!(
            "LB({}) = ??? [> {}, increase the maximum budget; {} machines, {}s]",
            size, budget, machines_searched, elapsed_secs
        ),
    }
}
