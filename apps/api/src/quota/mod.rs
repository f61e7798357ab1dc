//! CV quota per account.
//!
//! The count is always read fresh from the CV collection. Creation handlers
//! hold the account's `CreationLocks` guard from the check until the new CV is
//! stored, so two concurrent creates cannot both pass at `limit - 1`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::OwnedMutexGuard;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::account::{Account, PlanTier};
use crate::models::cv::Cv;
use crate::store::Repository;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    pub allowed: bool,
    pub current_count: usize,
    pub limit: u32,
    pub remaining: u32,
    pub plan: PlanTier,
}

/// Pure quota decision for an account holding `current_count` CVs.
pub fn evaluate(account: &Account, current_count: usize) -> QuotaStatus {
    let limit = account.effective_cv_limit();
    let used = u32::try_from(current_count).unwrap_or(u32::MAX);
    QuotaStatus {
        allowed: used < limit,
        current_count,
        limit,
        remaining: limit.saturating_sub(used),
        plan: account.plan,
    }
}

pub async fn quota_status(
    accounts: &dyn Repository<Account>,
    cvs: &dyn Repository<Cv>,
    account_id: Uuid,
) -> Result<QuotaStatus, AppError> {
    let account = accounts
        .find_by_id(account_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let current_count = cvs.count_by_owner(account_id).await?;
    Ok(evaluate(&account, current_count))
}

/// Rejects with `QuotaExceeded` when the account is at its limit.
pub async fn check_create_allowed(
    accounts: &dyn Repository<Account>,
    cvs: &dyn Repository<Cv>,
    account_id: Uuid,
) -> Result<QuotaStatus, AppError> {
    let status = quota_status(accounts, cvs, account_id).await?;
    if !status.allowed {
        info!(
            "Quota exceeded for {account_id}: {}/{} on {}",
            status.current_count, status.limit, status.plan
        );
        return Err(AppError::QuotaExceeded {
            current: status.current_count,
            limit: status.limit,
            plan: status.plan,
        });
    }
    Ok(status)
}

/// One async mutex per account, serializing quota check and CV insert.
#[derive(Default)]
pub struct CreationLocks {
    locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl CreationLocks {
    pub async fn acquire(&self, account_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(account_id).or_default().clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::Duration;

    fn account(plan: PlanTier) -> Account {
        Account {
            user_id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: String::new(),
            plan,
            cv_limit: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_free_plan_at_limit() {
        let status = evaluate(&account(PlanTier::Free), 5);
        assert_eq!(status.limit, 5);
        assert!(!status.allowed);
        assert_eq!(status.remaining, 0);
    }

    #[test]
    fn test_free_plan_one_below_limit() {
        let status = evaluate(&account(PlanTier::Free), 4);
        assert!(status.allowed);
        assert_eq!(status.remaining, 1);
    }

    #[test]
    fn test_remaining_saturates_above_limit() {
        let mut acct = account(PlanTier::Pro);
        acct.cv_limit = Some(3);
        let status = evaluate(&acct, 7);
        assert_eq!(status.limit, 3);
        assert!(!status.allowed);
        assert_eq!(status.remaining, 0);
    }

    #[tokio::test]
    async fn test_creation_lock_serializes_same_account() {
        let locks = Arc::new(CreationLocks::default());
        let id = Uuid::new_v4();
        let guard = locks.acquire(id).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.acquire(id).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        // A different account is not blocked.
        let _other = locks.acquire(Uuid::new_v4()).await;

        drop(guard);
        contender.await.unwrap();
    }
}
