//! Roadmap text parser.
//!
//! Converts the loosely Markdown-formatted text returned by the generation
//! endpoint into an ordered tree of display sections. The parser is pure
//! and never fails: anything it does not recognize degrades into a plain
//! item rather than an error.
//!
//! Structure rules:
//! - Paragraphs are separated by runs of two or more newlines.
//! - A paragraph whose first line is `#` through `######` plus a title
//!   opens a new section; the rest of that paragraph is consumed.
//! - Paragraphs before the first heading are dropped.
//! - Inside a section, each non-blank line becomes a week entry, a
//!   resource, or a plain item. Consecutive resource lines merge into one
//!   group; a group closed by a non-resource line never re-opens.

use serde::{Deserialize, Serialize};

/// A titled group of content items, demarcated by a Markdown heading line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSection {
    pub title: String,
    pub items: Vec<ContentItem>,
}

/// One display item within a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    /// A time-boxed milestone line such as `Week 3: Build the core`.
    Week { label: String, body: String },
    /// One or more consecutive link lines, collapsed into a single group.
    Resources { resources: Vec<Resource> },
    /// Any other line.
    Plain { text: String },
}

/// A single linked learning asset (article, course, or video).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub url: String,
    pub label: String,
    pub description: String,
    pub is_video: bool,
}

impl Resource {
    /// Extract the bare YouTube video identifier for embedding.
    ///
    /// For `watch?v=` URLs the id runs from `v=` to the next `&`; for
    /// short-form URLs it is the final path segment. Returns `None` for
    /// non-video resources and for URLs with no usable segment.
    pub fn youtube_id(&self) -> Option<&str> {
        if !self.is_video {
            return None;
        }
        if let Some(pos) = self.url.find("watch?v=") {
            let tail = &self.url[pos + "watch?v=".len()..];
            tail.split('&').next().filter(|id| !id.is_empty())
        } else {
            self.url.rsplit('/').next().filter(|id| !id.is_empty())
        }
    }
}

/// Parse raw roadmap text into an ordered sequence of sections.
///
/// Re-parsing always rebuilds the full tree; identical input yields a
/// structurally identical result.
pub fn parse(raw: &str) -> Vec<ParsedSection> {
    let mut sections: Vec<ParsedSection> = Vec::new();

    for block in split_blocks(raw) {
        if let Some(title) = heading_title(block) {
            sections.push(ParsedSection {
                title,
                items: Vec::new(),
            });
            continue;
        }

        // Content before any heading has nowhere to go.
        let Some(section) = sections.last_mut() else {
            continue;
        };

        let mut run: Vec<Resource> = Vec::new();
        for line in block.lines() {
            let cleaned = clean_line(line);
            if cleaned.is_empty() {
                continue;
            }

            // Week markers take precedence: a link inside a week line
            // stays part of the week body.
            if let Some((label, body)) = match_week(cleaned) {
                flush_run(&mut run, &mut section.items);
                section.items.push(ContentItem::Week { label, body });
                continue;
            }

            if let Some(resource) = match_resource(cleaned) {
                run.push(resource);
                continue;
            }

            flush_run(&mut run, &mut section.items);
            section.items.push(ContentItem::Plain {
                text: cleaned.to_string(),
            });
        }
        flush_run(&mut run, &mut section.items);
    }

    sections
}

/// Close an open resource run, appending it as a single group.
fn flush_run(run: &mut Vec<Resource>, items: &mut Vec<ContentItem>) {
    if !run.is_empty() {
        items.push(ContentItem::Resources {
            resources: std::mem::take(run),
        });
    }
}

/// Split raw text on runs of two or more newlines.
///
/// A single newline stays inside its block, so multi-line paragraphs
/// survive intact.
fn split_blocks(raw: &str) -> Vec<&str> {
    let bytes = raw.as_bytes();
    let mut blocks = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\n' {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j] == b'\n' {
                j += 1;
            }
            if j - i >= 2 {
                blocks.push(&raw[start..i]);
                start = j;
            }
            i = j;
        } else {
            i += 1;
        }
    }
    if start < raw.len() {
        blocks.push(&raw[start..]);
    }
    blocks
}

/// Recognize a heading paragraph: 1-6 `#` characters at the very start of
/// the block, then an optional space, then a non-empty title on the same
/// line. Headings exist only at paragraph level; `#` later in a block is
/// just a bullet marker.
fn heading_title(block: &str) -> Option<String> {
    let first_line = block.lines().next().unwrap_or("");
    let hashes = first_line.len() - first_line.trim_start_matches('#').len();
    if hashes == 0 {
        return None;
    }
    let title = first_line[hashes.min(6)..].trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Strip leading bullet markers (`-`, `*`, `•`, `#`, whitespace) and
/// surrounding whitespace.
fn clean_line(line: &str) -> &str {
    line.trim_start_matches(|c: char| matches!(c, '-' | '*' | '•' | '#') || c.is_whitespace())
        .trim()
}

/// Match a week marker: `Week <digits>` (case-insensitive), either alone
/// on the line or followed by a colon and a body.
///
/// Returns `(label, body)` with the label in the writer's original casing
/// and an empty body when the line is just the marker.
fn match_week(line: &str) -> Option<(String, String)> {
    let (word, rest) = line.split_at_checked(4)?;
    if !word.eq_ignore_ascii_case("week") {
        return None;
    }
    let digits = rest.strip_prefix(' ')?;
    let digit_count = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if digit_count == 0 {
        return None;
    }

    let label = line[..4 + 1 + digit_count].to_string();
    let after = &digits[digit_count..];
    let body = if after.is_empty() {
        String::new()
    } else {
        after.strip_prefix(':')?.trim_start().to_string()
    };
    Some((label, body))
}

/// Find the first Markdown-style link on the line: `[label](http(s)://url)`
/// with an optional ` - description` suffix. The link may be embedded in
/// surrounding text.
fn match_resource(line: &str) -> Option<Resource> {
    let mut offset = 0;
    while let Some(open) = line[offset..].find('[') {
        let at = offset + open;
        if let Some(resource) = link_at(line, at) {
            return Some(resource);
        }
        offset = at + 1;
    }
    None
}

/// Try to parse a link whose `[` sits at byte offset `open`.
fn link_at(line: &str, open: usize) -> Option<Resource> {
    let after_open = &line[open + 1..];
    let close = after_open.find(']')?;
    if close == 0 {
        return None;
    }
    let label = &after_open[..close];

    let paren = after_open[close + 1..].strip_prefix('(')?;
    if !paren.starts_with("http://") && !paren.starts_with("https://") {
        return None;
    }
    let url_end = paren.find(')')?;
    let url = &paren[..url_end];

    let description = link_description(&paren[url_end + 1..]).unwrap_or_default();

    Some(Resource {
        url: url.to_string(),
        label: label.to_string(),
        description,
        is_video: is_youtube(url),
    })
}

/// Parse the optional ` - description` tail after a link's closing paren.
fn link_description(tail: &str) -> Option<String> {
    let desc = tail.trim_start().strip_prefix('-')?.trim_start();
    if desc.is_empty() {
        None
    } else {
        Some(desc.to_string())
    }
}

/// Whether the URL host is a YouTube domain.
fn is_youtube(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    let Some(rest) = rest else {
        return false;
    };
    let host = rest
        .split(|c| matches!(c, '/' | '?' | '#' | ':'))
        .next()
        .unwrap_or("");
    host == "youtube.com"
        || host.ends_with(".youtube.com")
        || host == "youtu.be"
        || host.ends_with(".youtu.be")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section_titles(sections: &[ParsedSection]) -> Vec<&str> {
        sections.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn empty_input_yields_no_sections() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\n  \n").is_empty());
    }

    #[test]
    fn content_before_first_heading_is_dropped() {
        let sections = parse("orphan paragraph\n\nanother one");
        assert!(sections.is_empty());

        let sections = parse("preamble\n\n# Start\n\nitem");
        assert_eq!(section_titles(&sections), vec!["Start"]);
        assert_eq!(sections[0].items.len(), 1);
    }

    #[test]
    fn headings_open_sections_in_order() {
        let sections = parse("# One\n\n## Two\n\n###### Six");
        assert_eq!(section_titles(&sections), vec!["One", "Two", "Six"]);
        assert!(sections.iter().all(|s| s.items.is_empty()));
    }

    #[test]
    fn heading_without_space_still_matches() {
        let sections = parse("#Rust Roadmap");
        assert_eq!(section_titles(&sections), vec!["Rust Roadmap"]);
    }

    #[test]
    fn bare_hashes_are_not_a_heading() {
        assert!(parse("#\n\n##   ").is_empty());
    }

    #[test]
    fn heading_paragraph_is_fully_consumed() {
        // Extra lines in a heading paragraph produce no items.
        let sections = parse("# Plan\nWeek 1: lost\n\nkept");
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].items,
            vec![ContentItem::Plain {
                text: "kept".to_string()
            }]
        );
    }

    #[test]
    fn week_and_plain_items_in_one_block() {
        let sections = parse("# A\n\nWeek 1: Intro\nLearn basics");
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].items,
            vec![
                ContentItem::Week {
                    label: "Week 1".to_string(),
                    body: "Intro".to_string(),
                },
                ContentItem::Plain {
                    text: "Learn basics".to_string()
                },
            ]
        );
    }

    #[test]
    fn week_marker_is_case_insensitive_and_keeps_casing() {
        let sections = parse("# A\n\nweek 12: deep dive");
        assert_eq!(
            sections[0].items,
            vec![ContentItem::Week {
                label: "week 12".to_string(),
                body: "deep dive".to_string(),
            }]
        );
    }

    #[test]
    fn week_marker_without_colon_has_empty_body() {
        let sections = parse("# A\n\nWeek 3");
        assert_eq!(
            sections[0].items,
            vec![ContentItem::Week {
                label: "Week 3".to_string(),
                body: String::new(),
            }]
        );
    }

    #[test]
    fn week_with_trailing_text_but_no_colon_stays_plain() {
        let sections = parse("# A\n\nWeek 3 overview");
        assert_eq!(
            sections[0].items,
            vec![ContentItem::Plain {
                text: "Week 3 overview".to_string()
            }]
        );
    }

    #[test]
    fn weeks_range_line_stays_plain() {
        let sections = parse("# A\n\nWeeks 1-4 are foundational");
        assert!(matches!(
            sections[0].items[0],
            ContentItem::Plain { .. }
        ));
    }

    #[test]
    fn week_line_containing_link_is_a_week_entry() {
        let sections = parse("# A\n\nWeek 2: watch [intro](https://youtu.be/abc)");
        assert_eq!(
            sections[0].items,
            vec![ContentItem::Week {
                label: "Week 2".to_string(),
                body: "watch [intro](https://youtu.be/abc)".to_string(),
            }]
        );
    }

    #[test]
    fn consecutive_links_merge_into_one_group() {
        let text = "# A\n\n\
                    [Video1](https://youtu.be/abc123)\n\
                    [Video2](https://youtu.be/xyz789)\n\
                    - Do the exercise";
        let sections = parse(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].items.len(), 2);

        let ContentItem::Resources { resources } = &sections[0].items[0] else {
            panic!("expected a resource group, got {:?}", sections[0].items[0]);
        };
        assert_eq!(resources.len(), 2);
        assert!(resources.iter().all(|r| r.is_video));
        assert_eq!(resources[0].youtube_id(), Some("abc123"));
        assert_eq!(resources[1].youtube_id(), Some("xyz789"));

        assert_eq!(
            sections[0].items[1],
            ContentItem::Plain {
                text: "Do the exercise".to_string()
            }
        );
    }

    #[test]
    fn resource_group_does_not_reopen() {
        let text = "# A\n\n\
                    [one](https://a.example/x)\n\
                    interlude\n\
                    [two](https://b.example/y)";
        let sections = parse(text);
        let items = &sections[0].items;
        assert_eq!(items.len(), 3);
        assert!(matches!(&items[0], ContentItem::Resources { resources } if resources.len() == 1));
        assert!(matches!(&items[1], ContentItem::Plain { .. }));
        assert!(matches!(&items[2], ContentItem::Resources { resources } if resources.len() == 1));
    }

    #[test]
    fn resource_run_is_flushed_at_block_end() {
        let sections = parse("# A\n\nsetup\n[doc](https://docs.example/guide)");
        let items = &sections[0].items;
        assert_eq!(items.len(), 2);
        assert!(matches!(&items[1], ContentItem::Resources { resources } if resources.len() == 1));
    }

    #[test]
    fn link_with_description() {
        let sections = parse("# A\n\n[Book](https://doc.rust-lang.org/book) - the official book");
        let ContentItem::Resources { resources } = &sections[0].items[0] else {
            panic!("expected resources");
        };
        assert_eq!(resources[0].label, "Book");
        assert_eq!(resources[0].url, "https://doc.rust-lang.org/book");
        assert_eq!(resources[0].description, "the official book");
        assert!(!resources[0].is_video);
    }

    #[test]
    fn link_without_description_has_empty_description() {
        let sections = parse("# A\n\n[Book](https://doc.rust-lang.org/book)");
        let ContentItem::Resources { resources } = &sections[0].items[0] else {
            panic!("expected resources");
        };
        assert_eq!(resources[0].description, "");
    }

    #[test]
    fn link_embedded_in_text_is_still_a_resource() {
        let sections = parse("# A\n\nSee [the docs](https://docs.example/start) to begin");
        let ContentItem::Resources { resources } = &sections[0].items[0] else {
            panic!("expected resources");
        };
        assert_eq!(resources[0].label, "the docs");
    }

    #[test]
    fn non_http_link_degrades_to_plain() {
        let sections = parse("# A\n\n[ftp mirror](ftp://mirror.example/pub)");
        assert!(matches!(&sections[0].items[0], ContentItem::Plain { .. }));
    }

    #[test]
    fn broken_link_markup_degrades_to_plain() {
        let sections = parse("# A\n\n[label] (https://a.example/x)\n[unclosed](https://a.example/y");
        assert!(
            sections[0]
                .items
                .iter()
                .all(|i| matches!(i, ContentItem::Plain { .. }))
        );
    }

    #[test]
    fn non_youtube_link_is_not_video() {
        let sections = parse("# A\n\n[freeCodeCamp](https://freecodecamp.org/courses)");
        let ContentItem::Resources { resources } = &sections[0].items[0] else {
            panic!("expected resources");
        };
        assert!(!resources[0].is_video);
        assert_eq!(resources[0].youtube_id(), None);
    }

    #[test]
    fn youtube_detection_is_host_based() {
        let cases = [
            ("https://www.youtube.com/watch?v=abc", true),
            ("https://youtube.com/watch?v=abc", true),
            ("https://youtu.be/abc", true),
            ("https://m.youtube.com/watch?v=abc", true),
            ("https://example.com/youtube.com", false),
            ("https://notyoutube.com/v", false),
        ];
        for (url, expected) in cases {
            let sections = parse(&format!("# A\n\n[v]({url})"));
            let ContentItem::Resources { resources } = &sections[0].items[0] else {
                panic!("expected resources for {url}");
            };
            assert_eq!(resources[0].is_video, expected, "url: {url}");
        }
    }

    #[test]
    fn youtube_id_from_watch_url_stops_at_ampersand() {
        let sections = parse("# A\n\n[v](https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10)");
        let ContentItem::Resources { resources } = &sections[0].items[0] else {
            panic!("expected resources");
        };
        assert_eq!(resources[0].youtube_id(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn youtube_id_from_short_url_is_last_segment() {
        let sections = parse("# A\n\n[v](https://youtu.be/dQw4w9WgXcQ)");
        let ContentItem::Resources { resources } = &sections[0].items[0] else {
            panic!("expected resources");
        };
        assert_eq!(resources[0].youtube_id(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn bullet_markers_are_stripped() {
        let sections = parse("# A\n\n- dashed\n* starred\n• dotted\n## hashed");
        let texts: Vec<&str> = sections[0]
            .items
            .iter()
            .map(|i| match i {
                ContentItem::Plain { text } => text.as_str(),
                other => panic!("expected plain, got {other:?}"),
            })
            .collect();
        assert_eq!(texts, vec!["dashed", "starred", "dotted", "hashed"]);
    }

    #[test]
    fn hash_inside_content_block_is_not_a_heading() {
        let sections = parse("# A\n\nintro line\n# not a new section");
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].items[1],
            ContentItem::Plain {
                text: "not a new section".to_string()
            }
        );
    }

    #[test]
    fn horizontal_rules_produce_no_items() {
        let sections = parse("# A\n\n---\nreal content\n***");
        assert_eq!(
            sections[0].items,
            vec![ContentItem::Plain {
                text: "real content".to_string()
            }]
        );
    }

    #[test]
    fn blocks_split_on_two_or_more_newlines() {
        // Three newlines are one separator, not a separator plus a blank.
        let sections = parse("# A\n\n\n\nfirst\nsecond");
        assert_eq!(sections[0].items.len(), 2);
    }

    #[test]
    fn parse_is_idempotent() {
        let text = "# Stage 1\n\nWeek 1: Basics\n[Video](https://youtu.be/abc) - intro\n\n# Stage 2\n\nShip it";
        assert_eq!(parse(text), parse(text));
    }
}
