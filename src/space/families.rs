//! Static search-space tables for the supported model families.
//!
//! Domains and cross-field rules follow the estimators' documented parameter
//! contracts; the codec and evaluator never special-case a family beyond
//! looking up its table here.

use super::{ParamKind, ParamSpec, ParameterSpace};
use crate::types::{Configuration, ModelFamily};

/// Look up the parameter space for a family.
///
/// Every `ModelFamily` value has a table; unsupported families are
/// unrepresentable and rejected earlier, at `ModelFamily::from_str`.
pub fn space_for(family: ModelFamily) -> ParameterSpace {
    match family {
        ModelFamily::Logistic => logistic_space(),
        ModelFamily::GradientBoost => gradient_boost_space(),
        ModelFamily::Xgboost => xgboost_space(),
        ModelFamily::RandomForest => random_forest_space(),
        ModelFamily::RandomForestReg => random_forest_reg_space(),
    }
}

fn logistic_space() -> ParameterSpace {
    ParameterSpace::new(
        ModelFamily::Logistic,
        vec![
            ParamSpec::new("penalty", ParamKind::Categorical(&["l1", "l2"])),
            ParamSpec::new("dual", ParamKind::Flag),
            ParamSpec::new(
                "C",
                ParamKind::FloatRange {
                    min: 0.001,
                    max: 100.0,
                    bits: 10,
                },
            ),
            ParamSpec::new(
                "solver",
                ParamKind::Categorical(&["newton-cg", "lbfgs", "liblinear", "sag", "saga"]),
            ),
            ParamSpec::new("fit_intercept", ParamKind::Flag),
            ParamSpec::new(
                "max_iter",
                ParamKind::IntRange {
                    min: 50,
                    max: 500,
                    bits: 9,
                },
            ),
        ],
        vec![solver_supports_penalty, dual_needs_liblinear_l2],
    )
}

fn gradient_boost_space() -> ParameterSpace {
    ParameterSpace::new(
        ModelFamily::GradientBoost,
        vec![
            ParamSpec::new(
                "learning_rate",
                ParamKind::FloatRange {
                    min: 0.01,
                    max: 0.5,
                    bits: 8,
                },
            ),
            ParamSpec::new(
                "n_estimators",
                ParamKind::IntRange {
                    min: 50,
                    max: 500,
                    bits: 9,
                },
            ),
            ParamSpec::new(
                "max_depth",
                ParamKind::IntRange {
                    min: 2,
                    max: 10,
                    bits: 4,
                },
            ),
            ParamSpec::new(
                "subsample",
                ParamKind::FloatRange {
                    min: 0.5,
                    max: 1.0,
                    bits: 6,
                },
            ),
            ParamSpec::new(
                "min_samples_split",
                ParamKind::IntRange {
                    min: 2,
                    max: 20,
                    bits: 5,
                },
            ),
            ParamSpec::new("max_features", ParamKind::Categorical(&["sqrt", "log2"])),
        ],
        vec![],
    )
}

fn xgboost_space() -> ParameterSpace {
    ParameterSpace::new(
        ModelFamily::Xgboost,
        vec![
            ParamSpec::new(
                "learning_rate",
                ParamKind::FloatRange {
                    min: 0.01,
                    max: 0.5,
                    bits: 8,
                },
            ),
            ParamSpec::new(
                "n_estimators",
                ParamKind::IntRange {
                    min: 50,
                    max: 500,
                    bits: 9,
                },
            ),
            ParamSpec::new(
                "max_depth",
                ParamKind::IntRange {
                    min: 2,
                    max: 12,
                    bits: 4,
                },
            ),
            ParamSpec::new(
                "min_child_weight",
                ParamKind::IntRange {
                    min: 1,
                    max: 10,
                    bits: 4,
                },
            ),
            ParamSpec::new(
                "gamma",
                ParamKind::FloatRange {
                    min: 0.0,
                    max: 5.0,
                    bits: 6,
                },
            ),
            ParamSpec::new(
                "subsample",
                ParamKind::FloatRange {
                    min: 0.5,
                    max: 1.0,
                    bits: 6,
                },
            ),
            ParamSpec::new(
                "colsample_bytree",
                ParamKind::FloatRange {
                    min: 0.5,
                    max: 1.0,
                    bits: 6,
                },
            ),
            ParamSpec::new("booster", ParamKind::Categorical(&["gbtree", "dart"])),
        ],
        vec![],
    )
}

fn random_forest_space() -> ParameterSpace {
    ParameterSpace::new(
        ModelFamily::RandomForest,
        forest_specs(&["gini", "entropy"]),
        vec![oob_needs_bootstrap],
    )
}

fn random_forest_reg_space() -> ParameterSpace {
    ParameterSpace::new(
        ModelFamily::RandomForestReg,
        forest_specs(&["squared_error", "absolute_error"]),
        vec![oob_needs_bootstrap],
    )
}

fn forest_specs(criteria: &'static [&'static str]) -> Vec<ParamSpec> {
    vec![
        ParamSpec::new(
            "n_estimators",
            ParamKind::IntRange {
                min: 10,
                max: 500,
                bits: 9,
            },
        ),
        ParamSpec::new(
            "max_depth",
            ParamKind::IntRange {
                min: 2,
                max: 20,
                bits: 5,
            },
        ),
        ParamSpec::new(
            "min_samples_split",
            ParamKind::IntRange {
                min: 2,
                max: 20,
                bits: 5,
            },
        ),
        ParamSpec::new(
            "min_samples_leaf",
            ParamKind::IntRange {
                min: 1,
                max: 10,
                bits: 4,
            },
        ),
        ParamSpec::new("max_features", ParamKind::Categorical(&["sqrt", "log2"])),
        ParamSpec::new("criterion", ParamKind::Categorical(criteria)),
        ParamSpec::new("bootstrap", ParamKind::Flag),
        ParamSpec::new("oob_score", ParamKind::Flag),
    ]
}

/// The l1 penalty is only implemented by the liblinear and saga solvers;
/// newton-cg, lbfgs and sag accept l2 only.
fn solver_supports_penalty(config: &Configuration) -> Result<(), &'static str> {
    let penalty = config.get_str("penalty").unwrap_or("l2");
    let solver = config.get_str("solver").unwrap_or("lbfgs");
    if penalty == "l1" && !matches!(solver, "liblinear" | "saga") {
        return Err("l1 penalty requires the liblinear or saga solver");
    }
    Ok(())
}

/// The dual formulation exists only for liblinear with the l2 penalty.
fn dual_needs_liblinear_l2(config: &Configuration) -> Result<(), &'static str> {
    if config.get_bool("dual").unwrap_or(false) {
        let solver = config.get_str("solver").unwrap_or("lbfgs");
        let penalty = config.get_str("penalty").unwrap_or("l2");
        if solver != "liblinear" || penalty != "l2" {
            return Err("dual formulation requires the liblinear solver with l2 penalty");
        }
    }
    Ok(())
}

/// Out-of-bag scoring needs bootstrap sampling to leave samples out.
fn oob_needs_bootstrap(config: &Configuration) -> Result<(), &'static str> {
    if config.get_bool("oob_score").unwrap_or(false) && !config.get_bool("bootstrap").unwrap_or(true)
    {
        return Err("oob_score requires bootstrap sampling");
    }
    Ok(())
}
