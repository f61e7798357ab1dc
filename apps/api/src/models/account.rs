use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Record;

/// Subscription tier. Bounds how many CVs an account may hold at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanTier {
    Free,
    Basic,
    Pro,
}

impl PlanTier {
    pub fn default_cv_limit(self) -> u32 {
        match self {
            PlanTier::Free => 5,
            PlanTier::Basic => 15,
            PlanTier::Pro => 25,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Free" => Some(PlanTier::Free),
            "Basic" => Some(PlanTier::Basic),
            "Pro" => Some(PlanTier::Pro),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PlanTier::Free => "Free",
            PlanTier::Basic => "Basic",
            PlanTier::Pro => "Pro",
        };
        f.write_str(name)
    }
}

/// Persisted account record. `password_hash` is an argon2 PHC string and must
/// never leave the server; use `AccountView` for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub plan: PlanTier,
    #[serde(default)]
    pub cv_limit: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Explicit positive limit if set, otherwise the plan default.
    pub fn effective_cv_limit(&self) -> u32 {
        self.cv_limit
            .filter(|limit| *limit > 0)
            .unwrap_or_else(|| self.plan.default_cv_limit())
    }

    pub fn profile(&self) -> CandidateProfile {
        CandidateProfile {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }
}

impl Record for Account {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> Uuid {
        self.user_id
    }

    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Public identity fields handed to prompts and fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Account as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub plan: PlanTier,
    pub cv_limit: u32,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        AccountView {
            user_id: account.user_id,
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            username: account.username.clone(),
            email: account.email.clone(),
            plan: account.plan,
            cv_limit: account.effective_cv_limit(),
            created_at: account.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(plan: PlanTier, cv_limit: Option<u32>) -> Account {
        Account {
            user_id: Uuid::new_v4(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            username: "ghopper".to_string(),
            email: "grace@example.com".to_string(),
            password_hash: "$argon2id$v=19$stub".to_string(),
            plan,
            cv_limit,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_plan_default_limits() {
        assert_eq!(PlanTier::Free.default_cv_limit(), 5);
        assert_eq!(PlanTier::Basic.default_cv_limit(), 15);
        assert_eq!(PlanTier::Pro.default_cv_limit(), 25);
    }

    #[test]
    fn test_explicit_limit_wins_over_plan() {
        assert_eq!(account(PlanTier::Free, Some(8)).effective_cv_limit(), 8);
        assert_eq!(account(PlanTier::Basic, None).effective_cv_limit(), 15);
        assert_eq!(account(PlanTier::Pro, Some(0)).effective_cv_limit(), 25);
    }

    #[test]
    fn test_plan_parse_is_exact() {
        assert_eq!(PlanTier::parse("Pro"), Some(PlanTier::Pro));
        assert_eq!(PlanTier::parse("pro"), None);
        assert_eq!(PlanTier::parse("Enterprise"), None);
    }

    #[test]
    fn test_view_omits_password_hash() {
        let view = AccountView::from(&account(PlanTier::Free, None));
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["plan"], "Free");
        assert_eq!(json["cvLimit"], 5);
    }
}
