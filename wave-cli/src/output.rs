use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use wave_core::{DerivedParams, Snapshot, SnapshotSink};

/// Significant digits in the text output (matches C's `%g`).
const SIG_DIGITS: usize = 6;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("cannot encode snapshot row: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
#[error("cannot write '{}': {source}", path.display())]
pub struct SinkError {
    pub path: PathBuf,
    #[source]
    pub source: OutputError,
}

/// Format like `printf("%g")`: six significant digits, no trailing zeros,
/// exponent notation outside `1e-4 <= |v| < 1e6`.
pub fn fmt_g(v: f64) -> String {
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // rounding to SIG_DIGITS may bump the exponent (9.999995 -> 1e+01),
    // so take it from the rounded form
    let sci = format!("{:.*e}", SIG_DIGITS - 1, v);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };

    if exp < -4 || exp >= SIG_DIGITS as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(mantissa), sign, exp.abs())
    } else {
        let decimals = (SIG_DIGITS as i32 - 1 - exp) as usize;
        trim_zeros(&format!("{:.*}", decimals, v)).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Plain-text snapshots: a `#`-prefixed parameter header, then one
/// blank-line separated block of `x rho` lines per snapshot.
pub struct TextWriter<W: Write> {
    out: W,
    blocks: usize,
}

impl<W: Write> TextWriter<W> {
    pub fn new(out: W) -> Self {
        TextWriter { out, blocks: 0 }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_header(&mut self, p: &DerivedParams) -> io::Result<()> {
        let input = p.input();
        let w = &mut self.out;
        writeln!(w, "#c        {}", fmt_g(input.c))?;
        writeln!(w, "#tau      {}", fmt_g(input.tau))?;
        writeln!(w, "#x1       {}", fmt_g(input.x1))?;
        writeln!(w, "#x2       {}", fmt_g(input.x2))?;
        writeln!(w, "#runtime  {}", fmt_g(input.runtime))?;
        writeln!(w, "#dx       {}", fmt_g(input.dx))?;
        writeln!(w, "#outtime  {}", fmt_g(input.outtime))?;
        writeln!(w, "#filename {}", input.outfilename)?;
        writeln!(w, "#ngrid (derived) {}", p.ngrid())?;
        writeln!(w, "#dt    (derived) {}", fmt_g(p.dt()))?;
        writeln!(w, "#nsteps(derived) {}", p.nsteps())?;
        writeln!(w, "#nper  (derived) {}", p.nper())?;
        Ok(())
    }
}

impl<W: Write> SnapshotSink for TextWriter<W> {
    type Error = OutputError;

    fn begin(&mut self, params: &DerivedParams) -> Result<(), OutputError> {
        self.write_header(params)?;
        Ok(())
    }

    fn snapshot(&mut self, snap: &Snapshot<'_>) -> Result<(), OutputError> {
        if self.blocks == 0 {
            write!(self.out, "\n#t = {}\n", fmt_g(snap.time))?;
        } else {
            write!(self.out, "\n\n# t = {}\n", fmt_g(snap.time))?;
        }
        for (x, rho) in snap.points() {
            writeln!(self.out, "{} {}", fmt_g(x), fmt_g(rho))?;
        }
        self.blocks += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), OutputError> {
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct SnapshotRow {
    snapshot_idx: usize,
    step: usize,
    time: f64,
    max_abs: f64,

    ngrid: usize,
    dt: f64,
    nper: usize,
}

/// One JSON object per snapshot, newline separated.
pub struct MetaWriter<W: Write> {
    out: W,
    rows: usize,
    ngrid: usize,
    dt: f64,
    nper: usize,
}

impl<W: Write> MetaWriter<W> {
    pub fn new(out: W) -> Self {
        MetaWriter {
            out,
            rows: 0,
            ngrid: 0,
            dt: 0.0,
            nper: 0,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SnapshotSink for MetaWriter<W> {
    type Error = OutputError;

    fn begin(&mut self, params: &DerivedParams) -> Result<(), OutputError> {
        self.ngrid = params.ngrid();
        self.dt = params.dt();
        self.nper = params.nper();
        Ok(())
    }

    fn snapshot(&mut self, snap: &Snapshot<'_>) -> Result<(), OutputError> {
        let row = SnapshotRow {
            snapshot_idx: self.rows,
            step: snap.step,
            time: snap.time,
            max_abs: snap.max_abs(),
            ngrid: self.ngrid,
            dt: self.dt,
            nper: self.nper,
        };
        serde_json::to_writer(&mut self.out, &row)?;
        self.out.write_all(b"\n")?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), OutputError> {
        self.out.flush()?;
        Ok(())
    }
}

/// Text output plus the optional snapshot index, each tagged with its path
/// for error reports.
pub struct OutputSink<T: Write, M: Write> {
    text: (PathBuf, TextWriter<T>),
    meta: Option<(PathBuf, MetaWriter<M>)>,
}

impl<T: Write, M: Write> OutputSink<T, M> {
    pub fn new(text: (PathBuf, TextWriter<T>), meta: Option<(PathBuf, MetaWriter<M>)>) -> Self {
        OutputSink { text, meta }
    }

    fn each(
        &mut self,
        mut text: impl FnMut(&mut TextWriter<T>) -> Result<(), OutputError>,
        mut meta: impl FnMut(&mut MetaWriter<M>) -> Result<(), OutputError>,
    ) -> Result<(), SinkError> {
        let (path, writer) = &mut self.text;
        text(writer).map_err(|source| SinkError {
            path: path.clone(),
            source,
        })?;
        if let Some((path, writer)) = &mut self.meta {
            meta(writer).map_err(|source| SinkError {
                path: path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl<T: Write, M: Write> SnapshotSink for OutputSink<T, M> {
    type Error = SinkError;

    fn begin(&mut self, params: &DerivedParams) -> Result<(), SinkError> {
        self.each(|w| w.begin(params), |m| m.begin(params))
    }

    fn snapshot(&mut self, snap: &Snapshot<'_>) -> Result<(), SinkError> {
        self.each(|w| w.snapshot(snap), |m| m.snapshot(snap))
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.each(|w| w.finish(), |m| m.finish())
    }
}
