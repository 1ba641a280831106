use serde::{Deserialize, Serialize};

/// The risk level computed by Incognia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Assessment {
    /// Low risk.
    #[display("low_risk")]
    LowRisk,
    /// High risk.
    #[display("high_risk")]
    HighRisk,
    /// Not enough data to assess the risk.
    #[display("unknown_risk")]
    UnknownRisk,
}

/// Whether a reason comes from data of the calling tenant or from the whole network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonSource {
    /// Data reported by the calling tenant.
    Local,
    /// Data from the whole Incognia network.
    Global,
}

/// A reason behind an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    /// The reason code, like `trusted_location` or `multiple_accounts`.
    pub code: String,
    /// The origin of the data behind the reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ReasonSource>,
}
