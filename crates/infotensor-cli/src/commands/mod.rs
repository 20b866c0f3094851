pub mod eval;
pub mod inspect;
pub mod metrics;
pub mod random;

use std::fmt::Write as _;

use infotensor_core::{MetricArg, MetricOutput, ProbabilityTensor};
use ndarray::{ArrayD, IxDyn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// On-disk form of a tensor: labels, shape and row-major mass.
///
/// With `counts: true` the mass holds raw non-negative counts that are
/// normalized on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorDocument {
    pub labels: Vec<String>,
    pub shape: Vec<usize>,
    pub mass: Vec<f64>,
    #[serde(default = "default_normalized")]
    pub normalized: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub counts: bool,
}

fn default_normalized() -> bool {
    true
}

impl TensorDocument {
    pub fn from_tensor(pdf: &ProbabilityTensor) -> Self {
        Self {
            labels: pdf.label_names(),
            shape: pdf.shape().to_vec(),
            mass: pdf.mass().iter().copied().collect(),
            normalized: pdf.is_normalized(),
            counts: false,
        }
    }

    pub fn into_tensor(self) -> infotensor_core::Result<ProbabilityTensor> {
        if self.counts {
            let counts = ArrayD::from_shape_vec(IxDyn(&self.shape), self.mass)?;
            ProbabilityTensor::from_counts(counts, self.labels)
        } else {
            ProbabilityTensor::from_shape_vec(&self.shape, self.mass, self.labels, self.normalized)
        }
    }
}

/// Read and validate a tensor document.
pub fn load_tensor(path: &str) -> Result<ProbabilityTensor, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("Failed to read {path}: {e}"))?;
    let doc: TensorDocument =
        serde_json::from_str(&text).map_err(|e| format!("Invalid tensor document {path}: {e}"))?;
    let pdf = doc
        .into_tensor()
        .map_err(|e| format!("Invalid tensor in {path}: {e}"))?;
    log::debug!("loaded {path}: labels {:?}, shape {:?}", pdf.label_names(), pdf.shape());
    Ok(pdf)
}

/// Serialize `value` as pretty JSON to `path`.
pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), String> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| format!("Failed to encode JSON: {e}"))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write {path}: {e}"))
}

/// Print `message` to stderr and exit non-zero.
pub fn fail(message: &str) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

/// Seeded RNG when `seed` is given, OS-seeded otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Interpret one `--arg` value.
///
/// `true`/`false` are flags, anything with a comma is a list (bin indices
/// when every item is a non-negative integer, labels otherwise), anything
/// numeric is a number and every other word is text.
pub fn parse_arg(raw: &str) -> MetricArg<'static> {
    let raw = raw.trim();
    match raw {
        "true" => return MetricArg::Bool(true),
        "false" => return MetricArg::Bool(false),
        _ => {}
    }
    if raw.contains(',') {
        let items: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        let indices: Result<Vec<usize>, _> = items.iter().map(|s| s.parse::<usize>()).collect();
        return match indices {
            Ok(indices) => MetricArg::Indices(indices),
            Err(_) => MetricArg::Labels(items.into_iter().map(String::from).collect()),
        };
    }
    match raw.parse::<f64>() {
        Ok(value) => MetricArg::Number(value),
        Err(_) => MetricArg::Text(raw.to_string()),
    }
}

/// Split a comma-separated list, dropping empty items.
pub fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Human-readable table of a metric result.
pub fn render(output: &MetricOutput) -> String {
    let mut out = String::new();
    match output {
        MetricOutput::Scalar { value } => {
            let _ = writeln!(out, "  {value:.6}");
        }
        MetricOutput::Vector { keys, values } => {
            for (key, value) in keys.iter().zip(values) {
                let _ = writeln!(out, "  {key:<24} {value:>12.6}");
            }
        }
        MetricOutput::Matrix {
            rows,
            columns,
            values,
        } => {
            let _ = write!(out, "  {:<16}", "");
            for column in columns {
                let _ = write!(out, " {column:>12}");
            }
            out.push('\n');
            for (row, cells) in rows.iter().zip(values) {
                let _ = write!(out, "  {row:<16}");
                for cell in cells {
                    let _ = write!(out, " {cell:>12.6}");
                }
                out.push('\n');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_doc(dir: &tempfile::TempDir, name: &str, json: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, json).unwrap();
        path.to_string_lossy().into_owned()
    }

    // -----------------------------------------------------------------------
    // Tensor document tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_load_normalized_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(
            &dir,
            "pair.json",
            r#"{"labels": ["A", "B"], "shape": [2, 2], "mass": [0.5, 0.0, 0.0, 0.5]}"#,
        );
        let pdf = load_tensor(&path).unwrap();
        assert_eq!(pdf.label_names(), vec!["A", "B"]);
        assert_eq!(pdf.shape(), &[2, 2]);
        assert!(pdf.is_normalized());
        assert_eq!(pdf.mass_at(&[1, 1]).unwrap(), 0.5);
    }

    #[test]
    fn test_load_counts_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(
            &dir,
            "counts.json",
            r#"{"labels": ["X"], "shape": [4], "mass": [1, 1, 2, 4], "counts": true}"#,
        );
        let pdf = load_tensor(&path).unwrap();
        assert!(pdf.is_normalized());
        assert!((pdf.mass_at(&[3]).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_document_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = ProbabilityTensor::from_shape_vec(
            &[2, 3],
            vec![0.1, 0.2, 0.1, 0.3, 0.2, 0.1],
            ["t", "X_1"],
            true,
        )
        .unwrap();
        let path = dir.path().join("t.json").to_string_lossy().into_owned();
        write_json(&path, &TensorDocument::from_tensor(&pdf)).unwrap();
        let loaded = load_tensor(&path).unwrap();
        assert_eq!(loaded.label_names(), pdf.label_names());
        assert_eq!(loaded.shape(), pdf.shape());
        assert!(loaded.is_normalized());
        for (a, b) in loaded.mass().iter().zip(pdf.mass().iter()) {
            assert!((a - b).abs() < 1e-15);
        }
    }

    #[test]
    fn test_invalid_documents_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let bad_json = write_doc(&dir, "bad.json", "{not json");
        let err = load_tensor(&bad_json).unwrap_err();
        assert!(err.starts_with("Invalid tensor document"), "{err}");
        assert!(err.contains("bad.json"), "{err}");

        let unnormalized = write_doc(
            &dir,
            "sum.json",
            r#"{"labels": ["A"], "shape": [2], "mass": [0.5, 0.2]}"#,
        );
        let err = load_tensor(&unnormalized).unwrap_err();
        assert!(err.starts_with("Invalid tensor in"), "{err}");

        let missing = dir.path().join("missing.json").to_string_lossy().into_owned();
        assert!(load_tensor(&missing).unwrap_err().starts_with("Failed to read"));
    }

    // -----------------------------------------------------------------------
    // Argument parsing tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_parse_flags_and_numbers() {
        assert_eq!(parse_arg("true"), MetricArg::Bool(true));
        assert_eq!(parse_arg("false"), MetricArg::Bool(false));
        assert_eq!(parse_arg("0.5"), MetricArg::Number(0.5));
        assert_eq!(parse_arg("-2"), MetricArg::Number(-2.0));
        assert_eq!(parse_arg(" 3 "), MetricArg::Number(3.0));
    }

    #[test]
    fn test_parse_lists() {
        assert_eq!(parse_arg("0,2"), MetricArg::Indices(vec![0, 2]));
        assert_eq!(
            parse_arg("X_1, Y"),
            MetricArg::Labels(vec!["X_1".to_string(), "Y".to_string()])
        );
        assert_eq!(parse_arg("A,"), MetricArg::Labels(vec!["A".to_string()]));
    }

    #[test]
    fn test_parse_words_as_text() {
        assert_eq!(parse_arg("X"), MetricArg::Text("X".to_string()));
        assert_eq!(parse_arg("log10"), MetricArg::Text("log10".to_string()));
    }

    #[test]
    fn test_split_list_trims() {
        assert_eq!(split_list(" a, b,,c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }

    // -----------------------------------------------------------------------
    // Rendering tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_render_shapes() {
        assert_eq!(render(&MetricOutput::scalar(1.0)), "  1.000000\n");

        let vector = render(&MetricOutput::vector([("A", 0.5), ("B", 1.0)]));
        assert_eq!(vector.lines().count(), 2);
        assert!(vector.lines().next().unwrap().trim_start().starts_with('A'));

        let matrix = render(&MetricOutput::matrix(
            vec!["0".into(), "1".into()],
            vec!["X_1".into()],
            vec![vec![0.0], vec![1.0]],
        ));
        let lines: Vec<&str> = matrix.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("X_1"));
        assert!(lines[2].ends_with("1.000000"));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        use rand::Rng;
        let a: u64 = make_rng(Some(9)).random();
        let b: u64 = make_rng(Some(9)).random();
        assert_eq!(a, b);
    }
}
