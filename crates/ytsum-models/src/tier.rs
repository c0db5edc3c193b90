//! Account tiers and quota limits.

use serde::{Deserialize, Serialize};

/// Account tier, deciding the per-day generation quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountTier {
    Free,
    Premium,
    Vip,
}

impl AccountTier {
    /// Successful generations admitted per calendar day.
    pub fn daily_limit(&self) -> u32 {
        match self {
            Self::Free => 3,
            Self::Premium => 20,
            Self::Vip => 100,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
            Self::Vip => "vip",
        }
    }
}

impl Default for AccountTier {
    fn default() -> Self {
        Self::Free
    }
}

impl std::fmt::Display for AccountTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated account as the admission layer sees it.
///
/// Credential issuance and user persistence live outside the core; all the
/// quota tracker needs is a stable id and the tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub tier: AccountTier,
}

impl Account {
    pub fn new(id: impl Into<String>, tier: AccountTier) -> Self {
        Self {
            id: id.into(),
            tier,
        }
    }
}
