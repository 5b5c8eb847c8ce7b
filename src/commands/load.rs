use crate::commands::{CmdCtx, CommandResult, Reply};
use std::sync::Arc;

pub async fn load(ctx: Arc<CmdCtx>, session: &str) -> CommandResult<Reply> {
    let courses = ctx.registry.catalog.load_courses(session).await?;

    tracing::debug!(conn = %ctx.conn_id, %session, count = courses.len(), "catalog loaded");
    for course in &courses {
        tracing::trace!(conn = %ctx.conn_id, %course, "offering");
    }

    Ok(Reply::Courses(courses))
}
