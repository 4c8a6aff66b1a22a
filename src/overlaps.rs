//! Overlap queries through an external overlap engine.
//!
//! bedsim does not count overlaps itself: it runs an external engine (by default
//! [`ailist`](https://github.com/databio/AIList)) on two BED files and parses the
//! per-range overlap counts it prints. The engine is called as
//! `<engine> <first> <second>` and prints one row per range of `<second>`:
//!
//! ```text
//! chr1:   0       10      3
//! ```
//!
//! i.e. the sequence name (possibly with a trailing `:`), start, end, and the
//! number of ranges in `<first>` overlapping it (the *last* column).
//!
//! How the rows are framed in the engine's standard output (preamble and summary
//! lines) is specific to the engine version, so it is isolated behind the
//! [`OutputFraming`] trait.

use log::debug;
use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::{error::BedSimError, io::parsers::utils::parse_column, Position};

/// The default overlap engine binary.
pub const DEFAULT_ENGINE: &str = "ailist";

/// How often a running engine is polled when a timeout is set.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Which input's ranges key the rows of an [`OverlapTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKey {
    /// One row per database range, counting overlapping query ranges.
    Database,
    /// One row per query range, counting overlapping database ranges.
    Query,
}

/// One row of engine output: a range and its number of overlaps.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct OverlapRow {
    pub seqname: String,
    pub start: Position,
    pub end: Position,
    pub overlaps: u32,
}

impl OverlapRow {
    pub fn new(seqname: impl Into<String>, start: Position, end: Position, overlaps: u32) -> Self {
        Self {
            seqname: seqname.into(),
            start,
            end,
            overlaps,
        }
    }

    /// The `(seqname, start, end)` join key.
    pub fn key(&self) -> (&str, Position, Position) {
        (self.seqname.as_str(), self.start, self.end)
    }
}

/// The parsed output of an overlap query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlapTable {
    rows: Vec<OverlapRow>,
}

impl OverlapTable {
    pub fn new(rows: Vec<OverlapRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[OverlapRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The number of rows with at least one overlap.
    pub fn num_overlapping(&self) -> usize {
        self.rows.iter().filter(|row| row.overlaps != 0).count()
    }

    /// Sort rows by `(seqname, start, end)`.
    pub fn sort(&mut self) {
        self.rows.sort_by(|a, b| a.key().cmp(&b.key()));
    }

    /// Whether any row with this key has at least one overlap.
    ///
    /// The table must be sorted with [`OverlapTable::sort()`] first.
    pub fn has_overlap(&self, key: (&str, Position, Position)) -> bool {
        let first = self.rows.partition_point(|row| row.key() < key);
        self.rows[first..]
            .iter()
            .take_while(|row| row.key() == key)
            .any(|row| row.overlaps >= 1)
    }

    /// Fail if the engine returned more rows than the keyed file has ranges,
    /// which indicates the output framing was misread.
    pub fn check_row_count(&self, keyed_ranges: usize) -> Result<(), BedSimError> {
        if self.rows.len() > keyed_ranges {
            return Err(BedSimError::EngineRowCountMismatch {
                expected: keyed_ranges,
                found: self.rows.len(),
            });
        }
        Ok(())
    }
}

/// Extracts the table body (the overlap rows) from an engine's standard output.
pub trait OutputFraming: Send + Sync {
    fn body<'a>(&self, stdout: &'a str) -> Result<&'a str, BedSimError>;
}

/// The framing of `ailist` output: a two-line preamble, the rows, and a
/// two-line summary.
#[derive(Clone, Copy, Debug, Default)]
pub struct AilistFraming;

impl OutputFraming for AilistFraming {
    fn body<'a>(&self, stdout: &'a str) -> Result<&'a str, BedSimError> {
        // drop the summary: the last three newline-delimited sections
        // (two lines and the empty string after the final newline)
        let mut sections = stdout.rsplitn(4, '\n');
        let mut dropped = 0;
        while dropped < 3 && sections.next().is_some() {
            dropped += 1;
        }
        let remainder = match (dropped, sections.next()) {
            (3, Some(remainder)) => remainder,
            _ => {
                return Err(BedSimError::EngineOutputFraming(format!(
                    "expected a two-line summary, got {} lines of output",
                    stdout.lines().count()
                )))
            }
        };

        // drop the two-line preamble
        let mut lines = remainder.splitn(3, '\n');
        lines.next();
        if lines.next().is_none() {
            return Err(BedSimError::EngineOutputFraming(
                "expected a two-line preamble".to_string(),
            ));
        }
        Ok(lines.next().unwrap_or(""))
    }
}

/// Output that is nothing but the rows, e.g. from a wrapper script.
#[derive(Clone, Copy, Debug, Default)]
pub struct BareFraming;

impl OutputFraming for BareFraming {
    fn body<'a>(&self, stdout: &'a str) -> Result<&'a str, BedSimError> {
        Ok(stdout)
    }
}

/// Parse the body of the engine output into [`OverlapRow`]s.
///
/// Each non-empty line needs at least four tab-separated columns: sequence
/// name (a trailing `:` is removed), start, end, and, in the last column, the
/// overlap count.
pub fn parse_overlap_rows(body: &str) -> Result<Vec<OverlapRow>, BedSimError> {
    let mut rows = Vec::new();
    for line in body.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() < 4 {
            return Err(BedSimError::EngineOutputTooFewColumns(line.to_string()));
        }
        let parse_err = |e| BedSimError::EngineOutputParse(e, line.to_string());
        let seqname = columns[0].trim().trim_end_matches(':');
        let start: Position = parse_column(columns[1]).map_err(parse_err)?;
        let end: Position = parse_column(columns[2]).map_err(parse_err)?;
        let overlaps: u32 = parse_column(columns[columns.len() - 1]).map_err(parse_err)?;
        rows.push(OverlapRow::new(seqname, start, end, overlaps));
    }
    Ok(rows)
}

/// Check whether a program can be run: either an existing file path, or a
/// name found in one of the directories on `PATH`.
pub fn is_command_callable(program: impl AsRef<Path>) -> bool {
    let program = program.as_ref();
    if program.components().count() > 1 {
        return is_executable(program);
    }
    let path = std::env::var_os("PATH").unwrap_or_else(OsString::new);
    std::env::split_paths(&path).any(|dir| is_executable(&dir.join(program)))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// An external overlap engine.
pub struct OverlapEngine {
    program: PathBuf,
    framing: Box<dyn OutputFraming>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for OverlapEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlapEngine")
            .field("program", &self.program)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for OverlapEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE)
    }
}

impl OverlapEngine {
    /// Create a new engine, run as `program`, with `ailist` output framing and no timeout.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            framing: Box::new(AilistFraming),
            timeout: None,
        }
    }

    /// Use a different [`OutputFraming`] for this engine's output.
    pub fn with_framing(mut self, framing: impl OutputFraming + 'static) -> Self {
        self.framing = Box::new(framing);
        self
    }

    /// Kill the engine and fail if a single query takes longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn name(&self) -> String {
        self.program.display().to_string()
    }

    /// Whether the engine binary can be found.
    pub fn is_callable(&self) -> bool {
        is_command_callable(&self.program)
    }

    /// Fail with [`BedSimError::EngineNotCallable`] if the engine binary can't be found.
    pub fn ensure_callable(&self) -> Result<(), BedSimError> {
        if self.is_callable() {
            Ok(())
        } else {
            Err(BedSimError::EngineNotCallable(self.name()))
        }
    }

    /// Run an overlap query of `query` against `database`, with the output rows keyed
    /// by the ranges of the file chosen by `keyed_by`.
    pub fn query(
        &self,
        query: impl AsRef<Path>,
        database: impl AsRef<Path>,
        keyed_by: OutputKey,
    ) -> Result<OverlapTable, BedSimError> {
        let (first, second) = match keyed_by {
            OutputKey::Database => (query.as_ref(), database.as_ref()),
            OutputKey::Query => (database.as_ref(), query.as_ref()),
        };
        debug!(
            "running {} {} {}",
            self.name(),
            first.display(),
            second.display()
        );
        let stdout = self.run(first, second)?;
        let body = self.framing.body(&stdout)?;
        let rows = parse_overlap_rows(body)?;
        Ok(OverlapTable::new(rows))
    }

    fn run(&self, first: &Path, second: &Path) -> Result<String, BedSimError> {
        let child = Command::new(&self.program)
            .arg(first)
            .arg(second)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BedSimError::EngineSpawn(self.name(), e))?;

        let (status, stdout, stderr) = match self.timeout {
            None => {
                let output = child.wait_with_output()?;
                (output.status, output.stdout, output.stderr)
            }
            Some(timeout) => self.wait_with_timeout(child, timeout)?,
        };

        if !status.success() {
            return Err(BedSimError::EngineFailed {
                program: self.name(),
                status,
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }
        String::from_utf8(stdout)
            .map_err(|_| BedSimError::EngineOutputFraming("output is not valid UTF-8".to_string()))
    }

    /// Wait for the child, draining its pipes on helper threads so a full pipe
    /// can't block it, and kill it once `timeout` has passed.
    fn wait_with_timeout(
        &self,
        mut child: Child,
        timeout: Duration,
    ) -> Result<(ExitStatus, Vec<u8>, Vec<u8>), BedSimError> {
        let stdout_reader = child.stdout.take().map(drain);
        let stderr_reader = child.stderr.take().map(drain);

        let deadline = Instant::now() + timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                // the child may have exited in the meantime; either way it's gone
                let _ = child.kill();
                let _ = child.wait();
                return Err(BedSimError::EngineTimeout(self.name(), timeout));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = collect(stdout_reader)?;
        let stderr = collect(stderr_reader)?;
        Ok((status, stdout, stderr))
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        pipe.read_to_end(&mut buffer)?;
        Ok(buffer)
    })
}

fn collect(
    reader: Option<thread::JoinHandle<std::io::Result<Vec<u8>>>>,
) -> Result<Vec<u8>, BedSimError> {
    match reader {
        Some(handle) => handle.join().unwrap_or_else(|_| {
            Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "pipe reader thread panicked",
            ))
        })
        .map_err(BedSimError::from),
        None => Ok(Vec::new()),
    }
}
