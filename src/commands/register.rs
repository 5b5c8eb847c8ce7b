use crate::commands::{CmdCtx, CommandResult, Reply};
use coursereg_core::RegistrationForm;
use std::sync::Arc;

// No validation and no duplicate check: every submitted form is appended.
pub async fn register(ctx: Arc<CmdCtx>, form: &RegistrationForm) -> CommandResult<Reply> {
    tracing::debug!(
        conn = %ctx.conn_id,
        first_name = %form.first_name,
        code = %form.course.code,
        "recording registration"
    );

    let confirmation = ctx.registry.registrations.persist(form).await?;
    Ok(Reply::Confirmation(confirmation))
}
