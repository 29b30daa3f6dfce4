pub mod families;

use crate::error::{Result, TuneError};
use crate::types::ModelFamily;
use serde::{Deserialize, Serialize};

pub use families::space_for;

/// Kind and domain of one tunable hyperparameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// Ordered set of choices; bit width is derived from the domain size
    Categorical(&'static [&'static str]),
    /// Inclusive integer range discretized over `bits` bits
    IntRange { min: i64, max: i64, bits: u32 },
    /// Inclusive float range discretized over `bits` bits
    FloatRange { min: f64, max: f64, bits: u32 },
    /// Boolean, one bit
    Flag,
}

/// One tunable hyperparameter: name plus kind/domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
}

impl ParamSpec {
    pub const fn new(name: &'static str, kind: ParamKind) -> Self {
        Self { name, kind }
    }

    /// Genome bits allocated to this spec
    pub fn width(&self) -> usize {
        match self.kind {
            ParamKind::Categorical(domain) => bits_needed(domain.len() as u64) as usize,
            ParamKind::IntRange { bits, .. } => bits as usize,
            ParamKind::FloatRange { bits, .. } => bits as usize,
            ParamKind::Flag => 1,
        }
    }
}

/// Minimum bit width that can index `n` distinct values
pub(crate) fn bits_needed(n: u64) -> u32 {
    if n <= 2 {
        1
    } else {
        64 - (n - 1).leading_zeros()
    }
}

/// Cross-field validity check applied to a fully decoded configuration.
///
/// Returns the rejection reason when two decoded fields are incompatible for
/// the underlying estimator.
pub type ValidityRule = fn(&crate::types::Configuration) -> std::result::Result<(), &'static str>;

/// Ordered, declarative description of one family's search space.
///
/// The codec and evaluator operate generically over whatever specs are
/// present; adding or removing a spec only touches the family table.
#[derive(Debug, Clone)]
pub struct ParameterSpace {
    family: ModelFamily,
    specs: Vec<ParamSpec>,
    rules: Vec<ValidityRule>,
}

impl ParameterSpace {
    pub fn new(family: ModelFamily, specs: Vec<ParamSpec>, rules: Vec<ValidityRule>) -> Self {
        Self {
            family,
            specs,
            rules,
        }
    }

    pub fn family(&self) -> ModelFamily {
        self.family
    }

    pub fn specs(&self) -> &[ParamSpec] {
        &self.specs
    }

    pub fn rules(&self) -> &[ValidityRule] {
        &self.rules
    }

    /// Total genome bits across all specs
    pub fn genome_length(&self) -> usize {
        self.specs.iter().map(ParamSpec::width).sum()
    }

    pub fn validate(&self) -> Result<()> {
        if self.specs.is_empty() {
            return Err(TuneError::Configuration(format!(
                "parameter space for {} has no specs",
                self.family
            )));
        }

        for (i, spec) in self.specs.iter().enumerate() {
            if self.specs[..i].iter().any(|other| other.name == spec.name) {
                return Err(TuneError::Configuration(format!(
                    "duplicate parameter name '{}' in {} space",
                    spec.name, self.family
                )));
            }

            match spec.kind {
                ParamKind::Categorical(domain) => {
                    if domain.is_empty() {
                        return Err(TuneError::Configuration(format!(
                            "categorical parameter '{}' has an empty domain",
                            spec.name
                        )));
                    }
                }
                ParamKind::IntRange { min, max, bits } => {
                    if min > max {
                        return Err(TuneError::Configuration(format!(
                            "integer parameter '{}' has min {min} > max {max}",
                            spec.name
                        )));
                    }
                    let span = (max - min + 1) as u64;
                    if bits == 0 || bits > 32 || bits < bits_needed(span) {
                        return Err(TuneError::Configuration(format!(
                            "integer parameter '{}' needs at least {} bits for [{min}, {max}], got {bits}",
                            spec.name,
                            bits_needed(span)
                        )));
                    }
                }
                ParamKind::FloatRange { min, max, bits } => {
                    if !min.is_finite() || !max.is_finite() || min >= max {
                        return Err(TuneError::Configuration(format!(
                            "float parameter '{}' has an invalid range [{min}, {max}]",
                            spec.name
                        )));
                    }
                    if bits == 0 || bits > 32 {
                        return Err(TuneError::Configuration(format!(
                            "float parameter '{}' has an invalid bit width {bits}",
                            spec.name
                        )));
                    }
                }
                ParamKind::Flag => {}
            }
        }

        Ok(())
    }

    /// Introspectable description of the space, for display layers and tooling
    pub fn to_manifest(&self) -> SpaceManifest {
        SpaceManifest {
            family: self.family.id().to_string(),
            fields: self
                .specs
                .iter()
                .map(|spec| {
                    let (field_type, choices, min, max) = match spec.kind {
                        ParamKind::Categorical(domain) => (
                            "categorical",
                            Some(domain.iter().map(|s| s.to_string()).collect()),
                            None,
                            None,
                        ),
                        ParamKind::IntRange { min, max, .. } => {
                            ("integer", None, Some(min as f64), Some(max as f64))
                        }
                        ParamKind::FloatRange { min, max, .. } => {
                            ("float", None, Some(min), Some(max))
                        }
                        ParamKind::Flag => ("boolean", None, None, None),
                    };
                    FieldManifest {
                        name: spec.name.to_string(),
                        field_type: field_type.to_string(),
                        choices,
                        min,
                        max,
                        bits: spec.width(),
                    }
                })
                .collect(),
        }
    }
}

/// Manifest describing one family's search space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceManifest {
    pub family: String,
    pub fields: Vec<FieldManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldManifest {
    pub name: String,
    pub field_type: String,
    pub choices: Option<Vec<String>>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub bits: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_needed() {
        assert_eq!(bits_needed(1), 1);
        assert_eq!(bits_needed(2), 1);
        assert_eq!(bits_needed(3), 2);
        assert_eq!(bits_needed(4), 2);
        assert_eq!(bits_needed(5), 3);
        assert_eq!(bits_needed(8), 3);
        assert_eq!(bits_needed(9), 4);
    }

    #[test]
    fn test_spec_widths() {
        let spec = ParamSpec::new("solver", ParamKind::Categorical(&["a", "b", "c", "d", "e"]));
        assert_eq!(spec.width(), 3);
        let spec = ParamSpec::new("flag", ParamKind::Flag);
        assert_eq!(spec.width(), 1);
        let spec = ParamSpec::new(
            "depth",
            ParamKind::IntRange {
                min: 2,
                max: 10,
                bits: 4,
            },
        );
        assert_eq!(spec.width(), 4);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let space = ParameterSpace::new(
            ModelFamily::Logistic,
            vec![
                ParamSpec::new("x", ParamKind::Flag),
                ParamSpec::new("x", ParamKind::Flag),
            ],
            vec![],
        );
        assert!(space.validate().is_err());
    }

    #[test]
    fn test_undersized_int_width_rejected() {
        // [0, 100] needs 7 bits
        let space = ParameterSpace::new(
            ModelFamily::Logistic,
            vec![ParamSpec::new(
                "n",
                ParamKind::IntRange {
                    min: 0,
                    max: 100,
                    bits: 6,
                },
            )],
            vec![],
        );
        assert!(space.validate().is_err());
    }

    #[test]
    fn test_genome_length_is_sum_of_widths() {
        let space = ParameterSpace::new(
            ModelFamily::Logistic,
            vec![
                ParamSpec::new("a", ParamKind::Categorical(&["x", "y"])),
                ParamSpec::new("b", ParamKind::Categorical(&["p", "q", "r", "s"])),
                ParamSpec::new("c", ParamKind::Flag),
            ],
            vec![],
        );
        assert_eq!(space.genome_length(), 1 + 2 + 1);
    }

    #[test]
    fn test_manifest_reports_domains() {
        let space = space_for(ModelFamily::Logistic);
        let manifest = space.to_manifest();
        assert_eq!(manifest.family, "logistic");
        let solver = manifest
            .fields
            .iter()
            .find(|f| f.name == "solver")
            .expect("solver field");
        assert_eq!(solver.field_type, "categorical");
        assert_eq!(solver.choices.as_ref().map(Vec::len), Some(5));
    }
}
