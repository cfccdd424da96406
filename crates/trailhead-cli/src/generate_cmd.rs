//! The `trailhead generate` command: prompt the generation endpoint,
//! parse and display the result, then persist it.

use anyhow::{Context, Result, bail};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use trailhead_core::generate::Generator;
use trailhead_core::roadmap::{OutlineState, ParsedSection, parse};
use trailhead_db::queries::roadmaps;

use crate::render;

/// A successful generation, ready to display and persist.
#[derive(Debug)]
pub struct GeneratedRoadmap {
    pub raw: String,
    pub sections: Vec<ParsedSection>,
}

/// Request and parse a roadmap. No persistence happens here, so a failure
/// leaves no trace.
pub async fn run_generation(
    generator: &dyn Generator,
    topic: &str,
    detailed: bool,
) -> Result<GeneratedRoadmap> {
    let topic = topic.trim();
    if topic.is_empty() {
        bail!("topic must not be empty");
    }

    info!(topic, detailed, "requesting roadmap generation");
    let raw = generator
        .generate(topic, detailed)
        .await
        .context("roadmap generation failed")?;

    let sections = parse(&raw);
    Ok(GeneratedRoadmap { raw, sections })
}

/// Execute the full generate flow: generate, render, persist.
///
/// Persistence only happens after a complete, non-empty response; any
/// generation failure surfaces before the insert is attempted.
pub async fn cmd_generate(
    pool: &PgPool,
    generator: &dyn Generator,
    user_id: Uuid,
    topic: &str,
    detailed: bool,
) -> Result<()> {
    let generated = run_generation(generator, topic, detailed).await?;

    let state = OutlineState::for_sections(&generated.sections);
    print!("{}", render::render(&generated.sections, &state));

    let row = roadmaps::insert_roadmap(pool, user_id, topic.trim(), generated.raw.trim(), detailed)
        .await
        .context("generated roadmap could not be saved")?;
    println!("Saved roadmap {} ({})", row.id, row.topic);

    Ok(())
}
