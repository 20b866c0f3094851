//! Name-based metric dispatch.
//!
//! Every metric is registered under a stable name with a fixed positional
//! argument range. [`evaluate`] checks the argument count before it looks at
//! any argument, then converts each positional [`MetricArg`] to the type the
//! metric expects.

use rand::Rng;

use crate::error::{Error, Result};
use crate::metrics::{
    SamplingPlan, decay, divergence, entropy, fisher, integration, multi_information,
    mutual_information, surprise,
};
use crate::numeric::LogBase;
use crate::output::MetricOutput;
use crate::tensor::ProbabilityTensor;

/// Metadata for one registered metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricInfo {
    /// Registry name (e.g. `"shannon"`).
    pub name: &'static str,
    /// Positional signature, `?` marking optional arguments.
    pub signature: &'static str,
    /// One-line human-readable description.
    pub description: &'static str,
    pub min_args: usize,
    pub max_args: usize,
}

/// Every registered metric.
pub const METRICS: &[MetricInfo] = &[
    // Base metrics
    MetricInfo {
        name: "shannon",
        signature: "pdf, variable, logbase?, normalize?",
        description: "Shannon entropy of each addressed marginal",
        min_args: 2,
        max_args: 4,
    },
    MetricInfo {
        name: "joint_entropy",
        signature: "pdf, logbase?",
        description: "Entropy of the full joint distribution",
        min_args: 1,
        max_args: 2,
    },
    MetricInfo {
        name: "conditional_entropy",
        signature: "pdf, variable, condition, logbase?",
        description: "H(variable | condition) for each addressed variable",
        min_args: 3,
        max_args: 4,
    },
    MetricInfo {
        name: "mutual_information",
        signature: "pdf, a, b, logbase?",
        description: "Mutual information for every label pair in a x b",
        min_args: 3,
        max_args: 4,
    },
    MetricInfo {
        name: "mutual_information_entropies",
        signature: "pdf, a, b, logbase?",
        description: "Mutual information as H(a) - H(a | b)",
        min_args: 3,
        max_args: 4,
    },
    MetricInfo {
        name: "kullback_leibler",
        signature: "p, q, var_p, var_q, logbase?",
        description: "KL divergence between paired marginals of two tensors",
        min_args: 4,
        max_args: 5,
    },
    MetricInfo {
        name: "hellinger_distance",
        signature: "p, q, var_p, var_q",
        description: "Hellinger distance between paired marginals of two tensors",
        min_args: 4,
        max_args: 4,
    },
    MetricInfo {
        name: "fisher",
        signature: "pdf, variables, d_par, d_val, logbase?, periodic?",
        description: "Fisher information along a discrete parameter axis",
        min_args: 4,
        max_args: 6,
    },
    MetricInfo {
        name: "surprise",
        signature: "pdf, variable, values, logbase?",
        description: "Surprise log(1/p) of selected outcomes",
        min_args: 3,
        max_args: 4,
    },
    MetricInfo {
        name: "multi_information",
        signature: "pdf, variables, sample_variables?, sample_values?, logbase?",
        description: "Multi-information of the joint against its marginals",
        min_args: 2,
        max_args: 5,
    },
    // Time-series metrics
    MetricInfo {
        name: "idt_system",
        signature: "pdf, time, variables, epsilon, dt, logbase?",
        description: "Decay time of normalized entropy per variable",
        min_args: 5,
        max_args: 6,
    },
    MetricInfo {
        name: "idt_individual",
        signature: "pdf, time, variables, dt, sample_n?, sample_t?, logbase?",
        description: "Decay time of shared information per variable",
        min_args: 4,
        max_args: 7,
    },
    MetricInfo {
        name: "information_integration",
        signature: "pdf, time, state, sample_n?, sample_t?, sample_values?, logbase?",
        description: "Joint minus pairwise information per variable and time bin",
        min_args: 3,
        max_args: 7,
    },
];

/// All registered metrics, in listing order.
pub fn all_metrics() -> &'static [MetricInfo] {
    METRICS
}

/// Look a metric up by name.
pub fn find_metric(name: &str) -> Result<&'static MetricInfo> {
    METRICS
        .iter()
        .find(|m| m.name == name)
        .ok_or_else(|| Error::UnknownMetric(name.to_string()))
}

/// Check an argument count against a metric's range.
pub fn check_arity(info: &MetricInfo, got: usize) -> Result<()> {
    if got < info.min_args || got > info.max_args {
        return Err(Error::ArityMismatch {
            metric: info.name.to_string(),
            min: info.min_args,
            max: info.max_args,
            got,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// One positional metric argument.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricArg<'a> {
    Tensor(&'a ProbabilityTensor),
    /// A single label selector, a log-base name or any other word.
    Text(String),
    Labels(Vec<String>),
    Number(f64),
    Indices(Vec<usize>),
    Bool(bool),
}

impl MetricArg<'_> {
    /// Short name of the argument kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Tensor(_) => "tensor",
            Self::Text(_) => "text",
            Self::Labels(_) => "labels",
            Self::Number(_) => "number",
            Self::Indices(_) => "indices",
            Self::Bool(_) => "bool",
        }
    }
}

impl<'a> From<&'a ProbabilityTensor> for MetricArg<'a> {
    fn from(pdf: &'a ProbabilityTensor) -> Self {
        Self::Tensor(pdf)
    }
}

impl From<&str> for MetricArg<'_> {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MetricArg<'_> {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<String>> for MetricArg<'_> {
    fn from(labels: Vec<String>) -> Self {
        Self::Labels(labels)
    }
}

impl From<&[&str]> for MetricArg<'_> {
    fn from(labels: &[&str]) -> Self {
        Self::Labels(labels.iter().map(|s| s.to_string()).collect())
    }
}

impl From<f64> for MetricArg<'_> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Vec<usize>> for MetricArg<'_> {
    fn from(indices: Vec<usize>) -> Self {
        Self::Indices(indices)
    }
}

impl From<bool> for MetricArg<'_> {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

/// Typed access to the positional arguments of one call.
struct Args<'a, 'b> {
    metric: &'static str,
    args: &'b [MetricArg<'a>],
}

impl<'a, 'b> Args<'a, 'b> {
    fn mismatch(&self, position: usize, expected: &'static str) -> Error {
        Error::ArgumentType {
            metric: self.metric.to_string(),
            position,
            expected,
        }
    }

    fn tensor(&self, position: usize) -> Result<&'a ProbabilityTensor> {
        match self.args.get(position) {
            Some(MetricArg::Tensor(pdf)) => Ok(*pdf),
            _ => Err(self.mismatch(position, "a tensor")),
        }
    }

    fn labels(&self, position: usize) -> Result<Vec<String>> {
        match self.args.get(position) {
            Some(MetricArg::Text(label)) => Ok(vec![label.clone()]),
            Some(MetricArg::Labels(labels)) => Ok(labels.clone()),
            _ => Err(self.mismatch(position, "a label or a list of labels")),
        }
    }

    fn text(&self, position: usize) -> Result<&'b str> {
        match self.args.get(position) {
            Some(MetricArg::Text(text)) => Ok(text.as_str()),
            Some(MetricArg::Labels(labels)) if labels.len() == 1 => Ok(labels[0].as_str()),
            _ => Err(self.mismatch(position, "a single label")),
        }
    }

    fn number(&self, position: usize) -> Result<f64> {
        match self.args.get(position) {
            Some(MetricArg::Number(value)) => Ok(*value),
            _ => Err(self.mismatch(position, "a number")),
        }
    }

    fn number_or(&self, position: usize, default: f64) -> Result<f64> {
        if position >= self.args.len() {
            return Ok(default);
        }
        self.number(position)
    }

    fn indices(&self, position: usize) -> Result<Vec<usize>> {
        match self.args.get(position) {
            Some(MetricArg::Indices(indices)) => Ok(indices.clone()),
            Some(MetricArg::Number(value)) if *value >= 0.0 && value.fract() == 0.0 => {
                Ok(vec![*value as usize])
            }
            _ => Err(self.mismatch(position, "a list of bin indices")),
        }
    }

    fn log_base(&self, position: usize) -> Result<LogBase> {
        match self.args.get(position) {
            None => Ok(LogBase::default()),
            Some(MetricArg::Text(name)) => name.parse(),
            _ => Err(self.mismatch(position, "a log base name")),
        }
    }

    fn flag_or(&self, position: usize, default: bool) -> Result<bool> {
        match self.args.get(position) {
            None => Ok(default),
            Some(MetricArg::Bool(flag)) => Ok(*flag),
            _ => Err(self.mismatch(position, "true or false")),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Evaluate the metric registered as `name` on positional `args`.
///
/// The argument count is checked against the metric's range before any
/// argument is converted or any computation starts. `rng` drives the
/// sampling metrics and is left untouched by the others.
pub fn evaluate<R: Rng + ?Sized>(
    name: &str,
    args: &[MetricArg<'_>],
    rng: &mut R,
) -> Result<MetricOutput> {
    let info = find_metric(name)?;
    check_arity(info, args.len())?;
    log::debug!("evaluating {} with {} arguments", info.name, args.len());
    let a = Args {
        metric: info.name,
        args,
    };

    match info.name {
        "shannon" => entropy::shannon(
            a.tensor(0)?,
            &a.labels(1)?,
            a.log_base(2)?,
            a.flag_or(3, false)?,
        ),
        "joint_entropy" => Ok(MetricOutput::scalar(entropy::joint_entropy(
            a.tensor(0)?,
            a.log_base(1)?,
        ))),
        "conditional_entropy" => entropy::conditional_entropy(
            a.tensor(0)?,
            &a.labels(1)?,
            &a.labels(2)?,
            a.log_base(3)?,
        ),
        "mutual_information" => mutual_information::mutual_information(
            a.tensor(0)?,
            &a.labels(1)?,
            &a.labels(2)?,
            a.log_base(3)?,
        ),
        "mutual_information_entropies" => mutual_information::mutual_information_entropies(
            a.tensor(0)?,
            &a.labels(1)?,
            &a.labels(2)?,
            a.log_base(3)?,
        ),
        "kullback_leibler" => divergence::kullback_leibler(
            a.tensor(0)?,
            a.tensor(1)?,
            &a.labels(2)?,
            &a.labels(3)?,
            a.log_base(4)?,
        ),
        "hellinger_distance" => divergence::hellinger_distance(
            a.tensor(0)?,
            a.tensor(1)?,
            &a.labels(2)?,
            &a.labels(3)?,
        ),
        "fisher" => fisher::fisher(
            a.tensor(0)?,
            &a.labels(1)?,
            a.number(2)?,
            a.number(3)?,
            a.log_base(4)?,
            a.flag_or(5, false)?,
        ),
        "surprise" => surprise::surprise(
            a.tensor(0)?,
            &a.labels(1)?,
            &a.indices(2)?,
            a.log_base(3)?,
        ),
        "multi_information" => multi_information::multi_information(
            a.tensor(0)?,
            &a.labels(1)?,
            a.number_or(2, 1.0)?,
            a.number_or(3, 1.0)?,
            a.log_base(4)?,
            rng,
        )
        .map(MetricOutput::scalar),
        "idt_system" => decay::idt_system(
            a.tensor(0)?,
            a.text(1)?,
            &a.labels(2)?,
            a.number(3)?,
            a.number(4)?,
            a.log_base(5)?,
        ),
        "idt_individual" => decay::idt_individual(
            a.tensor(0)?,
            a.text(1)?,
            &a.labels(2)?,
            a.number(3)?,
            a.number_or(4, 1.0)?,
            a.number_or(5, 1.0)?,
            a.log_base(6)?,
            rng,
        ),
        "information_integration" => {
            let plan = SamplingPlan {
                variables: a.number_or(3, 1.0)?,
                time: a.number_or(4, 1.0)?,
                values: a.number_or(5, 1.0)?,
            };
            integration::information_integration(
                a.tensor(0)?,
                a.text(1)?,
                &a.labels(2)?,
                &plan,
                a.log_base(6)?,
                rng,
            )
        }
        other => Err(Error::UnknownMetric(other.to_string())),
    }
}
