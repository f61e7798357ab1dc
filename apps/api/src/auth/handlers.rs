//! Axum route handlers for accounts: register, login, profile, plan info and
//! the admin account listing.

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::{hash_password, issue_token, verify_password, AuthUser};
use crate::errors::AppError;
use crate::models::account::{Account, AccountView, PlanTier};
use crate::quota::{evaluate, quota_status, QuotaStatus};
use crate::routes::extract::JsonBody;
use crate::routes::{success, Envelope};
use crate::state::AppState;

const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub plan: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: &'static str,
    pub user: AccountView,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: AccountView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInfo {
    pub plan: PlanTier,
    pub current_count: usize,
    #[serde(rename = "usedCVs")]
    pub used_cvs: usize,
    pub limit: u32,
    pub cv_limit: u32,
    pub remaining: u32,
    pub allowed: bool,
}

impl From<QuotaStatus> for PlanInfo {
    fn from(status: QuotaStatus) -> Self {
        PlanInfo {
            plan: status.plan,
            current_count: status.current_count,
            used_cvs: status.current_count,
            limit: status.limit,
            cv_limit: status.limit,
            remaining: status.remaining,
            allowed: status.allowed,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInfoResponse {
    pub plan_info: PlanInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccountView {
    #[serde(flatten)]
    pub account: AccountView,
    pub current_count: usize,
    pub remaining: u32,
}

#[derive(Debug, Serialize)]
pub struct AdminUsersResponse {
    pub users: Vec<AdminAccountView>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<Envelope<SessionResponse>>), AppError> {
    let first_name = request.first_name.trim();
    let last_name = request.last_name.trim();
    let username = request.username.trim();
    let email = request.email.trim();

    if [
        first_name,
        last_name,
        username,
        email,
        request.password.as_str(),
        request.plan.as_str(),
    ]
    .iter()
    .any(|field| field.is_empty())
    {
        return Err(AppError::Validation(
            "All fields are required including plan selection".to_string(),
        ));
    }

    let plan = PlanTier::parse(&request.plan).ok_or_else(|| {
        AppError::Validation(r#"Plan must be either "Free", "Basic", or "Pro""#.to_string())
    })?;

    let accounts = state.accounts.list_all().await?;
    if accounts.iter().any(|a| a.email.eq_ignore_ascii_case(email)) {
        return Err(AppError::Validation("Email already registered".to_string()));
    }
    if accounts.iter().any(|a| a.username == username) {
        return Err(AppError::Validation("Username already taken".to_string()));
    }

    let account = Account {
        user_id: Uuid::new_v4(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: hash_password(request.password).await?,
        plan,
        cv_limit: Some(plan.default_cv_limit()),
        created_at: Utc::now(),
    };
    state.accounts.append(&account).await?;
    info!("Registered account {} on {} plan", account.user_id, plan);

    let token = issue_token(account.user_id, &account.email, &state.config.jwt_secret)?;

    Ok((
        StatusCode::CREATED,
        success(SessionResponse {
            message: "User registered successfully",
            user: AccountView::from(&account),
            token,
        }),
    ))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<Envelope<SessionResponse>>, AppError> {
    let email = request.email.trim();
    if email.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let account = state
        .accounts
        .list_all()
        .await?
        .into_iter()
        .find(|a| a.email.eq_ignore_ascii_case(email))
        .ok_or_else(invalid)?;

    if !verify_password(request.password, account.password_hash.clone()).await? {
        return Err(invalid());
    }

    let token = issue_token(account.user_id, &account.email, &state.config.jwt_secret)?;

    Ok(success(SessionResponse {
        message: "Login successful",
        user: AccountView::from(&account),
        token,
    }))
}

/// GET /api/auth/profile
pub async fn handle_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Envelope<ProfileResponse>>, AppError> {
    let account = state
        .accounts
        .find_by_id(user.id())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(success(ProfileResponse {
        user: AccountView::from(&account),
    }))
}

/// GET /api/auth/plan-info
pub async fn handle_plan_info(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Envelope<PlanInfoResponse>>, AppError> {
    let status = quota_status(state.accounts.as_ref(), state.cvs.as_ref(), user.id()).await?;
    Ok(success(PlanInfoResponse {
        plan_info: status.into(),
    }))
}

/// GET /api/admin/users
///
/// Hidden (404) unless `ADMIN_TOKEN` is configured and sent as `x-admin-token`.
pub async fn handle_admin_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Envelope<AdminUsersResponse>>, AppError> {
    let presented = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());
    let authorized = matches!(
        (state.config.admin_token.as_deref(), presented),
        (Some(expected), Some(given)) if !expected.is_empty() && expected == given
    );
    if !authorized {
        return Err(AppError::NotFound("Route not found".to_string()));
    }

    let cvs = state.cvs.list_all().await?;
    let users = state
        .accounts
        .list_all()
        .await?
        .iter()
        .map(|account| {
            let count = cvs.iter().filter(|cv| cv.user_id == account.user_id).count();
            let status = evaluate(account, count);
            AdminAccountView {
                account: AccountView::from(account),
                current_count: status.current_count,
                remaining: status.remaining,
            }
        })
        .collect();

    Ok(success(AdminUsersResponse { users }))
}
