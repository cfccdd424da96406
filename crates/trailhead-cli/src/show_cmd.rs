//! The `trailhead show` command: fetch a saved roadmap and re-display it.
//!
//! The section tree is rebuilt from the stored raw text on every view;
//! nothing parsed is ever persisted.

use anyhow::{Context, Result, bail};
use sqlx::PgPool;
use uuid::Uuid;

use trailhead_core::roadmap::{OutlineState, parse};
use trailhead_db::queries::roadmaps;

use crate::render;

pub async fn cmd_show(pool: &PgPool, roadmap_id: &str, collapsed: bool) -> Result<()> {
    let id = Uuid::parse_str(roadmap_id.trim())
        .with_context(|| format!("invalid roadmap id {roadmap_id:?}"))?;

    let Some(row) = roadmaps::get_roadmap(pool, id).await? else {
        bail!("roadmap {id} not found");
    };

    let sections = parse(&row.roadmap);
    let state = if collapsed {
        OutlineState::collapsed(&sections)
    } else {
        OutlineState::for_sections(&sections)
    };

    println!(
        "{} (generated {})\n",
        row.topic,
        row.created_at.format("%Y-%m-%d %H:%M")
    );
    print!("{}", render::render(&sections, &state));

    Ok(())
}
