//! Scenario condition trees
//!
//! A condition is either a single sensor comparison (leaf) or an AND/OR
//! group over further conditions. Groups must never be empty.

use serde::{Deserialize, Serialize};

/// Source of measurement values a condition is evaluated against
pub trait MeasurementSource {
    /// Value of `measurement` for `field` (e.g. `water_level` of tank `C1`)
    fn measurement(&self, measurement: &str, field: &str) -> Option<f64>;
}

/// A recursive scenario condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScenarioCondition {
    Group(ConditionGroup),
    Leaf(Comparison),
}

/// Boolean group over child conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    pub operator: Operator,
    pub conditionlist: Vec<ScenarioCondition>,
}

/// Group operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "and", alias = "AND")]
    And,
    #[serde(rename = "or", alias = "OR")]
    Or,
}

/// Single sensor comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    #[serde(rename = "type")]
    pub kind: ComparisonKind,
    pub measurement: String,
    pub field: String,
    pub value: f64,
}

/// Comparison kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonKind {
    /// Measured value strictly greater than the threshold
    More,
    /// Measured value strictly less than the threshold
    Less,
    /// Measured value exactly equal to the threshold
    Equal,
}

impl ScenarioCondition {
    /// Shorthand for a leaf comparison
    pub fn leaf(kind: ComparisonKind, measurement: &str, field: &str, value: f64) -> Self {
        ScenarioCondition::Leaf(Comparison {
            kind,
            measurement: measurement.to_string(),
            field: field.to_string(),
            value,
        })
    }

    /// Shorthand for an AND group
    pub fn all(conditions: Vec<ScenarioCondition>) -> Self {
        ScenarioCondition::Group(ConditionGroup {
            operator: Operator::And,
            conditionlist: conditions,
        })
    }

    /// Shorthand for an OR group
    pub fn any(conditions: Vec<ScenarioCondition>) -> Self {
        ScenarioCondition::Group(ConditionGroup {
            operator: Operator::Or,
            conditionlist: conditions,
        })
    }

    /// Evaluate the tree against a measurement source.
    ///
    /// A leaf whose measurement is unavailable is false.
    pub fn evaluate<S: MeasurementSource + ?Sized>(&self, source: &S) -> bool {
        match self {
            ScenarioCondition::Leaf(comparison) => comparison.evaluate(source),
            ScenarioCondition::Group(group) => match group.operator {
                Operator::And => group.conditionlist.iter().all(|c| c.evaluate(source)),
                Operator::Or => group.conditionlist.iter().any(|c| c.evaluate(source)),
            },
        }
    }

    /// Paths of every empty group in the tree, `$` being the root
    pub fn empty_groups(&self) -> Vec<String> {
        let mut found = Vec::new();
        self.collect_empty_groups("$", &mut found);
        found
    }

    fn collect_empty_groups(&self, path: &str, found: &mut Vec<String>) {
        if let ScenarioCondition::Group(group) = self {
            if group.conditionlist.is_empty() {
                found.push(path.to_string());
            }
            for (idx, child) in group.conditionlist.iter().enumerate() {
                child.collect_empty_groups(&format!("{}.conditionlist[{}]", path, idx), found);
            }
        }
    }
}

impl Comparison {
    pub fn evaluate<S: MeasurementSource + ?Sized>(&self, source: &S) -> bool {
        let Some(measured) = source.measurement(&self.measurement, &self.field) else {
            return false;
        };
        match self.kind {
            ComparisonKind::More => measured > self.value,
            ComparisonKind::Less => measured < self.value,
            ComparisonKind::Equal => measured == self.value,
        }
    }
}
