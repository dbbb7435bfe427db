use tracing::{info, warn};

use crate::{AppError, AppState, RequestContext};
use backend_domain::{
    current_millis, session_digest, Account, AccountView, AuthResponse, LoginRequest, Money,
    NewAccount, RegisterRequest, Session,
};

const USERNAME_MIN_LEN: usize = 3;
const USERNAME_MAX_LEN: usize = 32;
const PASSWORD_MIN_LEN: usize = 6;

pub async fn register(
    state: &AppState,
    payload: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    let username = normalize_username(&payload.username)?;
    if payload.password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AppError::BadRequest(format!(
            "password must be at least {} characters",
            PASSWORD_MIN_LEN
        )));
    }

    let password_hash = state
        .credentials
        .hash_password(&payload.password)
        .await?;
    let balance = if payload.sandbox_mode {
        state.config.sandbox_balance_cents
    } else {
        state.config.starting_balance_cents
    };

    let account = state
        .accounts
        .create_account(NewAccount {
            username,
            password_hash,
            balance: Money::from_cents(balance),
            sandbox_mode: payload.sandbox_mode,
        })
        .await?;
    state.metrics.record_registration();
    info!(
        "registered account {} ({}, sandbox={})",
        account.id, account.username, account.sandbox_mode
    );

    issue_session(state, &account).await
}

pub async fn login(state: &AppState, payload: LoginRequest) -> Result<AuthResponse, AppError> {
    let username = payload.username.trim();
    let account = state.accounts.find_by_username(username).await?;
    let Some(account) = account else {
        warn!("login rejected for unknown username");
        return Err(AppError::Unauthorized);
    };
    if !state
        .credentials
        .verify_password(&payload.password, &account.password_hash)
        .await
    {
        warn!("login rejected for account {}", account.id);
        return Err(AppError::Unauthorized);
    }
    state.metrics.record_login();

    issue_session(state, &account).await
}

pub async fn logout(state: &AppState, ctx: &RequestContext) -> Result<(), AppError> {
    state.sessions.delete_session(&ctx.session_digest).await?;
    Ok(())
}

async fn issue_session(state: &AppState, account: &Account) -> Result<AuthResponse, AppError> {
    let token = uuid::Uuid::new_v4().to_string();
    state
        .sessions
        .create_session(Session {
            digest: session_digest(&token),
            account_id: account.id.clone(),
            created_at: current_millis(),
        })
        .await?;
    Ok(AuthResponse {
        session_token: token,
        account: AccountView::from(account),
    })
}

fn normalize_username(raw: &str) -> Result<String, AppError> {
    let username = raw.trim();
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(AppError::BadRequest(format!(
            "username must be {}-{} characters",
            USERNAME_MIN_LEN, USERNAME_MAX_LEN
        )));
    }
    if !username
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    {
        return Err(AppError::BadRequest(
            "username may only contain letters, digits and underscores".to_string(),
        ));
    }
    Ok(username.to_string())
}
