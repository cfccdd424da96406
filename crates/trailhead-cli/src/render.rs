//! Terminal rendering of a parsed roadmap outline.
//!
//! Sections render as headers with an expansion marker and a kind tag;
//! collapsed sections show the header only. The tree itself comes from
//! `trailhead_core::roadmap::parse` and is never mutated here.

use std::fmt::Write;

use trailhead_core::roadmap::{ContentItem, OutlineState, ParsedSection, SectionKind};

/// Render the outline to a plain-text block.
pub fn render(sections: &[ParsedSection], state: &OutlineState) -> String {
    let mut out = String::new();
    for (index, section) in sections.iter().enumerate() {
        let expanded = state.is_expanded(index);
        let marker = if expanded { "v" } else { ">" };
        let tag = kind_tag(SectionKind::classify(&section.title));
        let _ = writeln!(out, "{marker} [{tag}] {}", section.title);

        if !expanded {
            continue;
        }
        for item in &section.items {
            render_item(&mut out, item);
        }
        out.push('\n');
    }
    out
}

fn render_item(out: &mut String, item: &ContentItem) {
    match item {
        ContentItem::Week { label, body } => {
            if body.is_empty() {
                let _ = writeln!(out, "    {label}");
            } else {
                let _ = writeln!(out, "    {label}: {body}");
            }
        }
        ContentItem::Plain { text } => {
            let _ = writeln!(out, "    - {text}");
        }
        ContentItem::Resources { resources } => {
            for resource in resources {
                let _ = write!(out, "    * {} <{}>", resource.label, resource.url);
                if !resource.description.is_empty() {
                    let _ = write!(out, " - {}", resource.description);
                }
                if let Some(id) = resource.youtube_id() {
                    let _ = write!(out, " [video {id}]");
                }
                out.push('\n');
            }
        }
    }
}

fn kind_tag(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Milestone => "stage",
        SectionKind::Timeline => "timeline",
        SectionKind::Reading => "resources",
        SectionKind::Project => "project",
        SectionKind::Checkpoint => "assessment",
        SectionKind::General => "section",
    }
}
