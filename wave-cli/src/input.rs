use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use wave_core::WaveParams;

/// Numeric fields in file order; `outfilename` follows them.
const NUMERIC_FIELDS: [&str; 7] = ["c", "tau", "x1", "x2", "runtime", "dx", "outtime"];

#[derive(Debug, Error)]
pub enum InputError {
    #[error("parameter file '{}' not found", path.display())]
    NotFound { path: PathBuf },

    #[error("error while reading file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("in parameter file '{}': {source}", path.display())]
    Params {
        path: PathBuf,
        #[source]
        source: ParamError,
    },
}

impl InputError {
    /// Bad values (as opposed to an unreadable file).
    pub fn is_value_error(&self) -> bool {
        matches!(
            self,
            InputError::Params {
                source: ParamError::Invalid(_),
                ..
            }
        )
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("cannot read fields:{}", Bullets(.0))]
    Parse(Vec<FieldProblem>),

    #[error("parameter value error:{}", Bullets(.0))]
    Invalid(Vec<Violation>),
}

#[derive(Debug, Error, PartialEq)]
pub enum FieldProblem {
    #[error("missing value for {field}")]
    Missing { field: &'static str },

    #[error("{field}: '{token}' is not a number")]
    NotANumber { field: &'static str, token: String },

    #[error("{field}: '{token}' is not finite")]
    NonFinite { field: &'static str, token: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum Violation {
    #[error("wave speed c must be positive (got {0})")]
    WaveSpeed(f64),

    #[error("damping time tau must be positive (got {0})")]
    DampingTime(f64),

    #[error("x1 must be less than x2 (got {x1} >= {x2})")]
    Domain { x1: f64, x2: f64 },

    #[error("dx must be positive (got {0})")]
    Spacing(f64),

    #[error("dx too large for domain ({dx} > {length})")]
    SpacingTooLarge { dx: f64, length: f64 },

    #[error("runtime must not be negative (got {0})")]
    Runtime(f64),

    #[error("outtime must not be negative (got {0})")]
    Outtime(f64),

    #[error("no output filename given")]
    NoOutputFile,
}

struct Bullets<'a, T>(&'a [T]);

impl<T: fmt::Display> fmt::Display for Bullets<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.0 {
            write!(f, "\n  - {item}")?;
        }
        Ok(())
    }
}

pub fn read_params(path: &Path) -> Result<WaveParams, InputError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            InputError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            InputError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let params = parse_params(&text).map_err(|source| InputError::Params {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("read {params:?} from {}", path.display());
    Ok(params)
}

/// Parse `c tau x1 x2 runtime dx outtime outfilename` (whitespace separated,
/// anything after the filename is ignored) and range-check the result.
///
/// Every unreadable field is reported, then every violated range, rather
/// than stopping at the first problem.
pub fn parse_params(text: &str) -> Result<WaveParams, ParamError> {
    let mut tokens = text.split_whitespace();
    let mut values = [0.0f64; NUMERIC_FIELDS.len()];
    let mut problems = Vec::new();

    for (slot, field) in values.iter_mut().zip(NUMERIC_FIELDS) {
        match parse_number(field, tokens.next()) {
            Ok(v) => *slot = v,
            Err(p) => problems.push(p),
        }
    }

    let outfilename = tokens.next().map(str::to_owned);
    if outfilename.is_none() {
        problems.push(FieldProblem::Missing {
            field: "outfilename",
        });
    }

    if !problems.is_empty() {
        return Err(ParamError::Parse(problems));
    }

    let [c, tau, x1, x2, runtime, dx, outtime] = values;
    let params = WaveParams {
        c,
        tau,
        x1,
        x2,
        runtime,
        dx,
        outtime,
        outfilename: outfilename.unwrap_or_default(),
    };

    let violations = validate(&params);
    if violations.is_empty() {
        Ok(params)
    } else {
        Err(ParamError::Invalid(violations))
    }
}

fn parse_number(field: &'static str, token: Option<&str>) -> Result<f64, FieldProblem> {
    let token = token.ok_or(FieldProblem::Missing { field })?;
    let v: f64 = token.parse().map_err(|_| FieldProblem::NotANumber {
        field,
        token: token.to_owned(),
    })?;
    if !v.is_finite() {
        return Err(FieldProblem::NonFinite {
            field,
            token: token.to_owned(),
        });
    }
    Ok(v)
}

pub fn validate(p: &WaveParams) -> Vec<Violation> {
    let mut out = Vec::new();

    if p.c <= 0.0 {
        out.push(Violation::WaveSpeed(p.c));
    }
    if p.tau <= 0.0 {
        out.push(Violation::DampingTime(p.tau));
    }
    if p.x1 >= p.x2 {
        out.push(Violation::Domain { x1: p.x1, x2: p.x2 });
    }
    if p.dx <= 0.0 {
        out.push(Violation::Spacing(p.dx));
    } else if p.x1 < p.x2 && p.dx > p.length() {
        out.push(Violation::SpacingTooLarge {
            dx: p.dx,
            length: p.length(),
        });
    }
    if p.runtime < 0.0 {
        out.push(Violation::Runtime(p.runtime));
    }
    if p.outtime < 0.0 {
        out.push(Violation::Outtime(p.outtime));
    }
    if p.outfilename.is_empty() {
        out.push(Violation::NoOutputFile);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_fields_in_order() {
        let p = parse_params("1.0 20.0\n-5 5\n 4.0 0.01 0.25 waveout.dat\n").unwrap();
        assert_eq!(
            p,
            WaveParams {
                c: 1.0,
                tau: 20.0,
                x1: -5.0,
                x2: 5.0,
                runtime: 4.0,
                dx: 0.01,
                outtime: 0.25,
                outfilename: "waveout.dat".into(),
            }
        );
    }

    #[test]
    fn ignores_trailing_tokens() {
        let p = parse_params("1 1 0 1 0 0.1 1 out.txt extra stuff").unwrap();
        assert_eq!(p.outfilename, "out.txt");
    }

    #[test]
    fn reports_every_bad_field() {
        let err = parse_params("1 abc 0 1 nan 0.1").unwrap_err();
        assert_eq!(
            err,
            ParamError::Parse(vec![
                FieldProblem::NotANumber {
                    field: "tau",
                    token: "abc".into()
                },
                FieldProblem::NonFinite {
                    field: "runtime",
                    token: "nan".into()
                },
                FieldProblem::Missing { field: "outtime" },
                FieldProblem::Missing {
                    field: "outfilename"
                },
            ])
        );
    }

    #[test]
    fn empty_file_is_all_missing() {
        match parse_params("").unwrap_err() {
            ParamError::Parse(problems) => assert_eq!(problems.len(), 8),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn aggregates_range_violations() {
        let err = parse_params("0 -1 2 1 -3 0.5 -1 out.dat").unwrap_err();
        assert_eq!(
            err,
            ParamError::Invalid(vec![
                Violation::WaveSpeed(0.0),
                Violation::DampingTime(-1.0),
                Violation::Domain { x1: 2.0, x2: 1.0 },
                Violation::Runtime(-3.0),
                Violation::Outtime(-1.0),
            ])
        );
    }

    #[test]
    fn spacing_checks() {
        let zero = parse_params("1 1 0 1 0 0 1 out.dat").unwrap_err();
        assert_eq!(zero, ParamError::Invalid(vec![Violation::Spacing(0.0)]));

        let wide = parse_params("1 1 0 1 0 2 1 out.dat").unwrap_err();
        assert_eq!(
            wide,
            ParamError::Invalid(vec![Violation::SpacingTooLarge {
                dx: 2.0,
                length: 1.0
            }])
        );
    }

    #[test]
    fn error_lists_each_problem() {
        let err = parse_params("0 -1 0 1 0 0.1 1 out.dat").unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("parameter value error:"));
        assert!(msg.contains("\n  - wave speed c must be positive"));
        assert!(msg.contains("\n  - damping time tau must be positive"));
    }

    #[test]
    fn value_errors_are_told_apart() {
        let invalid = InputError::Params {
            path: "p.txt".into(),
            source: ParamError::Invalid(vec![Violation::NoOutputFile]),
        };
        let garbled = InputError::Params {
            path: "p.txt".into(),
            source: ParamError::Parse(vec![FieldProblem::Missing { field: "c" }]),
        };
        assert!(invalid.is_value_error());
        assert!(!garbled.is_value_error());
    }

    #[test]
    fn missing_file() {
        let err = read_params(Path::new("/nonexistent/wave1d/params.txt")).unwrap_err();
        assert!(matches!(err, InputError::NotFound { .. }));
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wave1d-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn reads_a_parameter_file() {
        let dir = scratch_dir("read");
        let path = dir.join("params.txt");
        std::fs::write(&path, "1.0 20.0 -5 5 4.0 0.01 0.25 waveout.dat\n").unwrap();

        let p = read_params(&path).unwrap();
        assert_eq!(p.c, 1.0);
        assert_eq!(p.dx, 0.01);
        assert_eq!(p.outfilename, "waveout.dat");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let dir = scratch_dir("unreadable");

        // a directory exists but cannot be read as text
        let err = read_params(&dir).unwrap_err();
        assert!(matches!(err, InputError::Read { .. }), "{err:?}");
        assert!(!err.is_value_error());

        let binary = dir.join("params.bin");
        std::fs::write(&binary, [0xff, 0xfe, 0x00, 0x80]).unwrap();
        let err = read_params(&binary).unwrap_err();
        assert!(matches!(err, InputError::Read { .. }), "{err:?}");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn bad_values_in_file_carry_the_path() {
        let dir = scratch_dir("values");
        let path = dir.join("params.txt");
        std::fs::write(&path, "-1 1 0 1 0 0.1 1 out.dat").unwrap();

        match read_params(&path).unwrap_err() {
            InputError::Params { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source, ParamError::Invalid(vec![Violation::WaveSpeed(-1.0)]));
            }
            other => panic!("unexpected {other:?}"),
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
