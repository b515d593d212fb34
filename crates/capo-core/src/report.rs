//! Serializable analysis report
//!
//! Node handles are backend specific and not serializable, so the report
//! replaces every element with an [`ElementSnapshot`]. Two backends that
//! parsed the same markup produce equal reports (locations aside).

use crate::adapter::{SourceLocation, TreeAdapter};
use crate::analyzer::AnalysisResult;
use crate::validation::ValidationPayload;
use crate::weights::ElementCategory;
use serde::Serialize;

/// Backend-independent description of one element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSnapshot {
    /// Position among the `<head>` children, when it is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub tag: String,
    pub markup: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl ElementSnapshot {
    fn capture<A: TreeAdapter>(adapter: &A, children: &[A::Node], element: &A::Node) -> Self {
        Self {
            index: children.iter().position(|child| child == element),
            tag: adapter.tag_name(element),
            markup: adapter.stringify(element),
            location: adapter.location(element),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    pub element: ElementSnapshot,
    pub category: ElementCategory,
    pub weight: u8,
    pub valid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningEntry {
    pub message: String,
    pub elements: Vec<ElementSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomValidationEntry {
    pub element: ElementSnapshot,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<ValidationPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationEntry {
    pub index: usize,
    pub element: ElementSnapshot,
    pub previous_element: ElementSnapshot,
    pub weight: u8,
    pub previous_weight: u8,
    pub category: ElementCategory,
    pub previous_category: ElementCategory,
    pub message: String,
}

/// Report handed to presentation layers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub adapter: String,
    pub weights: Vec<WeightEntry>,
    pub validation_warnings: Vec<WarningEntry>,
    pub custom_validations: Vec<CustomValidationEntry>,
    pub ordering_violations: Vec<ViolationEntry>,
}

impl AnalysisReport {
    pub fn new<A: TreeAdapter>(adapter: &A, result: &AnalysisResult<A::Node>) -> Self {
        let children: Vec<A::Node> = result.weights.iter().map(|w| w.element.clone()).collect();
        let snapshot = |element: &A::Node| ElementSnapshot::capture(adapter, &children, element);

        let weights = result
            .weights
            .iter()
            .map(|info| WeightEntry {
                element: snapshot(&info.element),
                category: info.category,
                weight: info.weight,
                valid: !result.is_flagged(&info.element),
            })
            .collect();

        let validation_warnings = result
            .validation_warnings
            .iter()
            .map(|warning| WarningEntry {
                message: warning.message.clone(),
                elements: warning.elements.iter().map(snapshot).collect(),
            })
            .collect();

        let custom_validations = result
            .custom_validations
            .iter()
            .map(|validation| CustomValidationEntry {
                element: snapshot(&validation.element),
                warnings: validation.warnings.clone(),
                payload: validation.payload.clone(),
            })
            .collect();

        let ordering_violations = result
            .ordering_violations()
            .into_iter()
            .map(|violation| ViolationEntry {
                index: violation.index,
                element: snapshot(&violation.element),
                previous_element: snapshot(&violation.previous_element),
                weight: violation.weight,
                previous_weight: violation.previous_weight,
                category: violation.category,
                previous_category: violation.previous_category,
                message: violation.message,
            })
            .collect();

        Self {
            adapter: adapter.name().to_string(),
            weights,
            validation_warnings,
            custom_validations,
            ordering_violations,
        }
    }

    /// True when no pass reported anything
    pub fn is_clean(&self) -> bool {
        self.validation_warnings.is_empty()
            && self.ordering_violations.is_empty()
            && self.custom_validations.iter().all(|v| v.warnings.is_empty())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
