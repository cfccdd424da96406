//! The `trailhead history` command: list saved roadmaps, newest first.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use trailhead_db::queries::roadmaps;

pub async fn cmd_history(pool: &PgPool, user_id: Uuid, limit: Option<usize>) -> Result<()> {
    let rows = roadmaps::list_for_user(pool, user_id).await?;

    if rows.is_empty() {
        println!("No saved roadmaps.");
        return Ok(());
    }

    let shown = limit.unwrap_or(rows.len()).min(rows.len());
    for row in &rows[..shown] {
        let mode = if row.is_premium { "detailed" } else { "concise" };
        println!(
            "{}  {}  [{}] {}",
            row.id,
            row.created_at.format("%Y-%m-%d %H:%M"),
            mode,
            row.topic
        );
    }
    if shown < rows.len() {
        println!("({} more not shown)", rows.len() - shown);
    }

    Ok(())
}
