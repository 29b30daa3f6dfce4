use crate::error::TuneError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Model families with a known parameter space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFamily {
    Logistic,
    GradientBoost,
    Xgboost,
    RandomForest,
    RandomForestReg,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 5] = [
        ModelFamily::Logistic,
        ModelFamily::GradientBoost,
        ModelFamily::Xgboost,
        ModelFamily::RandomForest,
        ModelFamily::RandomForestReg,
    ];

    /// Stable identifier, also accepted by `FromStr`
    pub fn id(self) -> &'static str {
        match self {
            ModelFamily::Logistic => "logistic",
            ModelFamily::GradientBoost => "gradientboost",
            ModelFamily::Xgboost => "xgboost",
            ModelFamily::RandomForest => "randomforest",
            ModelFamily::RandomForestReg => "randomforest_reg",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModelFamily {
    type Err = TuneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelFamily::ALL
            .into_iter()
            .find(|family| family.id() == s)
            .ok_or_else(|| TuneError::UnsupportedFamily(s.to_string()))
    }
}

/// Whether higher or lower metric values win selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationDirection {
    Maximize,
    Minimize,
}

impl OptimizationDirection {
    /// Worst-possible fitness, assigned to invalid or failing configurations
    pub fn sentinel(self) -> f64 {
        match self {
            OptimizationDirection::Maximize => f64::NEG_INFINITY,
            OptimizationDirection::Minimize => f64::INFINITY,
        }
    }

    /// True if `a` is a strictly better fitness than `b`
    pub fn improves(self, a: f64, b: f64) -> bool {
        match self {
            OptimizationDirection::Maximize => a > b,
            OptimizationDirection::Minimize => a < b,
        }
    }
}

/// A concrete hyperparameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Decoded hyperparameter assignment, keyed by spec name.
///
/// Only ever produced by decoding a genome through a codec; consumed as the
/// keyword set for building an estimator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    values: BTreeMap<String, ParamValue>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ParamValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ParamValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(ParamValue::Float(x)) => Some(*x),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(ParamValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}

/// One ranked search result, best-first when returned from `Tuner::get_best`.
///
/// `configuration` is `None` only for genomes that decode to a not-configurable
/// combination, which can reach the top ranks only when the whole population
/// is invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub fitness: f64,
    pub configuration: Option<Configuration>,
}
