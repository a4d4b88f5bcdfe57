//! Identifiers for the feature derivation stages and their reference tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// One stage of the categorization pipeline.
///
/// [`StageId::ALL`] lists the stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StageId {
    #[serde(rename = "age")]
    Age,
    #[serde(rename = "accommodationstatus")]
    AccommodationStatus,
    #[serde(rename = "acsc")]
    Acsc,
    #[serde(rename = "disstatus")]
    DischargeStatus,
    #[serde(rename = "edacuity")]
    Acuity,
    #[serde(rename = "edarrivalmode")]
    ArrivalMode,
    #[serde(rename = "edattenddispatch")]
    AttendDispatch,
    #[serde(rename = "edattendsource")]
    AttendSource,
    #[serde(rename = "eddiag_seasonal")]
    SeasonalDiagnosis,
    #[serde(rename = "eddiagqual")]
    DiagnosisQualifier,
    #[serde(rename = "edinvest")]
    Investigation,
    #[serde(rename = "edrefservice")]
    ReferralService,
    #[serde(rename = "edtreat")]
    Treatment,
    #[serde(rename = "ethnos")]
    Ethnicity,
    #[serde(rename = "gender")]
    Gender,
}

impl StageId {
    pub const ALL: [StageId; 15] = [
        Self::Age,
        Self::AccommodationStatus,
        Self::Acsc,
        Self::DischargeStatus,
        Self::Acuity,
        Self::ArrivalMode,
        Self::AttendDispatch,
        Self::AttendSource,
        Self::SeasonalDiagnosis,
        Self::DiagnosisQualifier,
        Self::Investigation,
        Self::ReferralService,
        Self::Treatment,
        Self::Ethnicity,
        Self::Gender,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::AccommodationStatus => "accommodationstatus",
            Self::Acsc => "acsc",
            Self::DischargeStatus => "disstatus",
            Self::Acuity => "edacuity",
            Self::ArrivalMode => "edarrivalmode",
            Self::AttendDispatch => "edattenddispatch",
            Self::AttendSource => "edattendsource",
            Self::SeasonalDiagnosis => "eddiag_seasonal",
            Self::DiagnosisQualifier => "eddiagqual",
            Self::Investigation => "edinvest",
            Self::ReferralService => "edrefservice",
            Self::Treatment => "edtreat",
            Self::Ethnicity => "ethnos",
            Self::Gender => "gender",
        }
    }

    /// Value map consumed by this stage. Age and ACSC use dedicated tables.
    pub fn reference_table(self) -> Option<ReferenceTable> {
        let table = match self {
            Self::Age | Self::Acsc => return None,
            Self::AccommodationStatus => ReferenceTable::AccommodationStatus,
            Self::DischargeStatus => ReferenceTable::DischargeStatus,
            Self::Acuity => ReferenceTable::Acuity,
            Self::ArrivalMode => ReferenceTable::ArrivalMode,
            Self::AttendDispatch => ReferenceTable::AttendDispatch,
            Self::AttendSource => ReferenceTable::AttendSource,
            Self::SeasonalDiagnosis => ReferenceTable::SeasonalDiagnosis,
            Self::DiagnosisQualifier => ReferenceTable::DiagnosisQualifier,
            Self::Investigation => ReferenceTable::Investigation,
            Self::ReferralService => ReferenceTable::ReferralService,
            Self::Treatment => ReferenceTable::Treatment,
            Self::Ethnicity => ReferenceTable::Ethnicity,
            Self::Gender => ReferenceTable::Gender,
        };
        Some(table)
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ModelError::UnknownStage {
                name: s.to_string(),
            })
    }
}

/// A code-to-label value map in the reference set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReferenceTable {
    #[serde(rename = "accommodationstatus")]
    AccommodationStatus,
    #[serde(rename = "disstatus")]
    DischargeStatus,
    #[serde(rename = "edacuity")]
    Acuity,
    #[serde(rename = "edarrivalmode")]
    ArrivalMode,
    #[serde(rename = "edattenddispatch")]
    AttendDispatch,
    #[serde(rename = "edattendsource")]
    AttendSource,
    #[serde(rename = "eddiag_seasonal")]
    SeasonalDiagnosis,
    #[serde(rename = "eddiagqual")]
    DiagnosisQualifier,
    #[serde(rename = "edinvest")]
    Investigation,
    #[serde(rename = "edrefservice")]
    ReferralService,
    #[serde(rename = "edtreat")]
    Treatment,
    #[serde(rename = "ethnos")]
    Ethnicity,
    #[serde(rename = "gender")]
    Gender,
}

impl ReferenceTable {
    pub const ALL: [ReferenceTable; 13] = [
        Self::AccommodationStatus,
        Self::DischargeStatus,
        Self::Acuity,
        Self::ArrivalMode,
        Self::AttendDispatch,
        Self::AttendSource,
        Self::SeasonalDiagnosis,
        Self::DiagnosisQualifier,
        Self::Investigation,
        Self::ReferralService,
        Self::Treatment,
        Self::Ethnicity,
        Self::Gender,
    ];

    /// Manifest role naming this table's file.
    pub fn role(self) -> &'static str {
        match self {
            Self::AccommodationStatus => "accommodationstatus",
            Self::DischargeStatus => "disstatus",
            Self::Acuity => "edacuity",
            Self::ArrivalMode => "edarrivalmode",
            Self::AttendDispatch => "edattenddispatch",
            Self::AttendSource => "edattendsource",
            Self::SeasonalDiagnosis => "eddiag_seasonal",
            Self::DiagnosisQualifier => "eddiagqual",
            Self::Investigation => "edinvest",
            Self::ReferralService => "edrefservice",
            Self::Treatment => "edtreat",
            Self::Ethnicity => "ethnos",
            Self::Gender => "gender",
        }
    }
}

impl fmt::Display for ReferenceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role())
    }
}

impl FromStr for ReferenceTable {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|table| table.role() == s.trim())
            .ok_or_else(|| ModelError::UnknownTable {
                name: s.to_string(),
            })
    }
}
