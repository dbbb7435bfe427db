use crate::{AppError, AppState, RequestContext};
use backend_domain::session_digest;

pub async fn resolve_session(state: &AppState, token: &str) -> Result<RequestContext, AppError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Unauthorized);
    }
    let digest = session_digest(token);
    let session = state
        .sessions
        .find_session(&digest)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(RequestContext {
        account_id: session.account_id,
        session_digest: digest,
    })
}
