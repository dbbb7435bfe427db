use crate::{AppError, AppState, RequestContext};
use backend_domain::AccountView;

pub async fn current_account(
    state: &AppState,
    ctx: &RequestContext,
) -> Result<AccountView, AppError> {
    let account = state.accounts.get_account(&ctx.account_id).await?;
    Ok(AccountView::from(&account))
}
