//! Stage definitions: which raw columns each stage reads, which derived
//! columns it writes, and how values are resolved.
//!
//! Definitions are fixed per [`StageId`]; nothing is inferred from the data
//! except the members of a field group (`edinvest_01`, `edinvest_02`, ...).

use std::sync::LazyLock;

use ecds_model::{ReferenceTable, StageId, UnmappedPolicy};
use polars::prelude::DataFrame;
use regex::Regex;
use serde::Serialize;

use crate::error::{Result, TransformError};

/// `<prefix>_NN` with a two-digit suffix.
static GROUP_MEMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9]*)_([0-9]{2})$").expect("Invalid field group regex")
});

/// Suffix appended to a source column to name its derived column.
pub const CATEGORY_SUFFIX: &str = "_cat";

/// Raw column(s) a stage reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageInput {
    /// One named column, which must be present.
    Column(&'static str),
    /// Every column named `<prefix>_NN`; zero members is allowed.
    Group { prefix: &'static str },
}

/// How a stage turns raw values into labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Labelled numeric intervals.
    Binned,
    /// Value map lookup with an explicit unmapped policy.
    Remap {
        table: ReferenceTable,
        policy: UnmappedPolicy,
    },
    /// ACSC lookup restricted to the mapping's categories.
    Acsc,
}

impl StageKind {
    pub fn display_name(&self) -> String {
        match self {
            Self::Binned => "Binned".to_string(),
            Self::Remap { policy, .. } => format!("Remap ({policy})"),
            Self::Acsc => "ACSC lookup".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageDefinition {
    pub stage: StageId,
    pub input: StageInput,
    /// Fixed output name; `None` derives `<input>_cat` per source column.
    pub output: Option<&'static str>,
    pub kind: StageKind,
}

fn pass_through(stage: StageId, table: ReferenceTable, column: &'static str) -> StageDefinition {
    remap(
        stage,
        table,
        StageInput::Column(column),
        None,
        UnmappedPolicy::PassThrough,
    )
}

fn remap(
    stage: StageId,
    table: ReferenceTable,
    input: StageInput,
    output: Option<&'static str>,
    policy: UnmappedPolicy,
) -> StageDefinition {
    StageDefinition {
        stage,
        input,
        output,
        kind: StageKind::Remap { table, policy },
    }
}

impl StageDefinition {
    /// The definition for a stage.
    pub fn of(stage: StageId) -> Self {
        match stage {
            StageId::Age => Self {
                stage,
                input: StageInput::Column("activage"),
                output: Some("activage_cat"),
                kind: StageKind::Binned,
            },
            StageId::Acsc => Self {
                stage,
                input: StageInput::Column("eddiag_01"),
                output: Some("eddiag_01_acsc"),
                kind: StageKind::Acsc,
            },
            StageId::AccommodationStatus => {
                pass_through(stage, ReferenceTable::AccommodationStatus, "accommodationstatus")
            }
            StageId::DischargeStatus => {
                pass_through(stage, ReferenceTable::DischargeStatus, "disstatus")
            }
            StageId::Acuity => pass_through(stage, ReferenceTable::Acuity, "edacuity"),
            StageId::ArrivalMode => {
                pass_through(stage, ReferenceTable::ArrivalMode, "edarrivalmode")
            }
            StageId::AttendDispatch => {
                pass_through(stage, ReferenceTable::AttendDispatch, "edattenddispatch")
            }
            StageId::AttendSource => {
                pass_through(stage, ReferenceTable::AttendSource, "edattendsource")
            }
            StageId::Ethnicity => pass_through(stage, ReferenceTable::Ethnicity, "ethnos"),
            StageId::Gender => pass_through(stage, ReferenceTable::Gender, "gender"),
            // Only the first recorded diagnosis carries the seasonal category.
            StageId::SeasonalDiagnosis => remap(
                stage,
                ReferenceTable::SeasonalDiagnosis,
                StageInput::Column("eddiag_01"),
                Some("eddiag_seasonal_cat"),
                UnmappedPolicy::Null,
            ),
            // Null rather than a default label for unknown qualifiers.
            StageId::DiagnosisQualifier => remap(
                stage,
                ReferenceTable::DiagnosisQualifier,
                StageInput::Column("eddiagqual_01"),
                None,
                UnmappedPolicy::Null,
            ),
            StageId::Investigation => remap(
                stage,
                ReferenceTable::Investigation,
                StageInput::Group { prefix: "edinvest" },
                None,
                UnmappedPolicy::default_label("Urgent"),
            ),
            StageId::Treatment => remap(
                stage,
                ReferenceTable::Treatment,
                StageInput::Group { prefix: "edtreat" },
                None,
                UnmappedPolicy::default_label("Urgent"),
            ),
            StageId::ReferralService => remap(
                stage,
                ReferenceTable::ReferralService,
                StageInput::Column("edrefservice"),
                None,
                UnmappedPolicy::default_label("Other"),
            ),
        }
    }

    /// Resolve the concrete input and output columns against a frame.
    pub fn resolve(&self, df: &DataFrame) -> Result<StagePlan> {
        let inputs: Vec<String> = match &self.input {
            StageInput::Column(name) => {
                if df.column(name).is_err() {
                    return Err(TransformError::MissingColumn {
                        stage: self.stage,
                        column: (*name).to_string(),
                    });
                }
                vec![(*name).to_string()]
            }
            StageInput::Group { prefix } => group_columns(df, prefix),
        };

        let outputs = match self.output {
            Some(output) => vec![output.to_string()],
            None => inputs
                .iter()
                .map(|input| format!("{input}{CATEGORY_SUFFIX}"))
                .collect(),
        };

        Ok(StagePlan {
            stage: self.stage,
            kind: self.kind.clone(),
            inputs,
            outputs,
        })
    }
}

/// A stage resolved against a concrete frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagePlan {
    pub stage: StageId,
    pub kind: StageKind,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl StagePlan {
    /// `(source, target)` column pairs.
    pub fn column_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inputs
            .iter()
            .map(String::as_str)
            .zip(self.outputs.iter().map(String::as_str))
    }
}

/// Members of a field group in frame order.
pub fn group_columns(df: &DataFrame, prefix: &str) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .filter(|name| is_group_member(name.as_str(), prefix))
        .map(|name| name.to_string())
        .collect()
}

fn is_group_member(column: &str, prefix: &str) -> bool {
    GROUP_MEMBER_REGEX
        .captures(column)
        .is_some_and(|caps| &caps[1] == prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_membership_requires_two_digit_suffix() {
        assert!(is_group_member("edinvest_01", "edinvest"));
        assert!(is_group_member("edinvest_12", "edinvest"));
        assert!(!is_group_member("edinvest_1", "edinvest"));
        assert!(!is_group_member("edinvest_001", "edinvest"));
        assert!(!is_group_member("edinvest_01_cat", "edinvest"));
        assert!(!is_group_member("edtreat_01", "edinvest"));
    }

    #[test]
    fn value_map_stages_use_their_own_table() {
        for stage in StageId::ALL {
            if let StageKind::Remap { table, .. } = StageDefinition::of(stage).kind {
                assert_eq!(Some(table), stage.reference_table());
            }
        }
    }

    #[test]
    fn kind_display_names() {
        assert_eq!(StageKind::Binned.display_name(), "Binned");
        assert_eq!(
            StageDefinition::of(StageId::ReferralService)
                .kind
                .display_name(),
            "Remap (default \"Other\")"
        );
    }
}
