// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Markdown rendering for reshaped board exports.
//!
//! This module walks the board's lists in their original export order and
//! produces a single Markdown document. Output is a pure function of the
//! list sequence and the reshaped mapping: no randomness, no
//! locale-sensitive formatting.
//!
//! # Output Format
//!
//! - `##` headings for lists, `####` headings for cards (both shiftable
//!   with [`RenderOptions::heading_offset`])
//! - Card labels as escaped `\[name\]` tags after the card title
//! - Card descriptions verbatim
//! - Comments as bullets with a `[YYYY-MM-DD]` date tag, oldest first
//! - Checklists as nested bullets with `[ ]` / `[X]` markers
//!
//! # Example
//!
//! ```
//! use trello2md::parser::parse_board;
//! use trello2md::renderer::{render_board, RenderOptions};
//! use trello2md::reshape::{reshape, ReshapeOptions};
//!
//! let board = parse_board(r#"{
//!     "lists": [{ "id": "L1", "name": "Todo" }],
//!     "cards": [{ "id": "C1", "name": "Task A", "idList": "L1" }]
//! }"#).unwrap();
//!
//! let groups = reshape(&board, &ReshapeOptions::default());
//! let markdown = render_board(&board, &groups, &RenderOptions::default());
//!
//! assert!(markdown.contains("## Todo"));
//! assert!(markdown.contains("#### Task A"));
//! ```

use crate::parser::Board;
use crate::reshape::{CardGroup, ListGroup};
use chrono::DateTime;
use std::collections::HashMap;
use std::fmt::Write;

/// Configuration options for Markdown rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Whether checklist headings carry a literal `Checklist: ` prefix.
    ///
    /// When disabled, the bullet shows the checklist name alone.
    pub checklist_label: bool,

    /// Number of heading levels to shift (0-5).
    ///
    /// A value of 0 produces H2/H4 headings (default).
    /// A value of 1 produces H3/H5 headings, useful for embedding.
    pub heading_offset: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            checklist_label: true,
            heading_offset: 0,
        }
    }
}

/// Returns a markdown heading prefix with the given level and offset.
///
/// The heading level is clamped to a maximum of 6 (H6).
fn heading(level: u8, offset: u8) -> String {
    let actual = (level + offset).min(6);
    "#".repeat(actual as usize)
}

/// Renders a reshaped board as Markdown.
///
/// Walks `board.lists` in export order (the authoritative display order)
/// and skips any list without an entry in `groups`, so lists filtered out
/// during reshaping vanish without a heading.
///
/// # Arguments
///
/// * `board` - The parsed export, consulted only for its ordered list sequence
/// * `groups` - The reshaped mapping from list identifier to enriched list
/// * `opts` - Configuration options controlling the output format
///
/// # Returns
///
/// A `String` containing the complete Markdown document.
#[must_use]
pub fn render_board(
    board: &Board,
    groups: &HashMap<String, ListGroup>,
    opts: &RenderOptions,
) -> String {
    let mut out = String::new();

    for list in &board.lists {
        if let Some(group) = groups.get(&list.id) {
            render_list(&mut out, group, opts);
        }
    }

    out
}

fn render_list(out: &mut String, group: &ListGroup, opts: &RenderOptions) {
    writeln!(
        out,
        "{} {}\n",
        heading(2, opts.heading_offset),
        group.list.name
    )
    .unwrap();

    for card in &group.cards {
        render_card(out, card, opts);
    }

    out.push('\n');
}

fn render_card(out: &mut String, group: &CardGroup, opts: &RenderOptions) {
    write!(
        out,
        "{} {} ",
        heading(4, opts.heading_offset),
        group.card.name
    )
    .unwrap();
    for label in &group.card.labels {
        write!(out, "\\[{}\\] ", escape_brackets(&label.name)).unwrap();
    }
    out.push('\n');

    if !group.card.desc.is_empty() {
        writeln!(out, "{}\n", group.card.desc).unwrap();
    }

    // Exports list comments newest first; reversing emits them in
    // chronological order.
    let has_comments = !group.comments.is_empty();
    for comment in group.comments.iter().rev() {
        writeln!(out, "* [{}] {}", date_tag(&comment.date), comment.text).unwrap();
    }
    if has_comments {
        out.push('\n');
    }

    for checklist in &group.checklists {
        if opts.checklist_label {
            writeln!(out, "* Checklist: {}", checklist.name).unwrap();
        } else {
            writeln!(out, "* {}", checklist.name).unwrap();
        }
        for item in &checklist.check_items {
            let marker = if item.state == "incomplete" {
                "[ ]"
            } else {
                "[X]"
            };
            writeln!(out, "\t* {marker} {}", item.name).unwrap();
        }
    }

    if !has_comments && group.checklists.is_empty() {
        out.push_str("\n\n");
    }
}

/// Formats an ISO 8601 timestamp as a zero-padded `YYYY-MM-DD` date tag.
///
/// Locale-independent by construction. Timestamps that fail to parse fall
/// back to the date portion of the raw string.
fn date_tag(date: &str) -> String {
    DateTime::parse_from_rfc3339(date).map_or_else(
        |_| date.split('T').next().unwrap_or(date).to_owned(),
        |dt| dt.format("%Y-%m-%d").to_string(),
    )
}

/// Escapes square brackets so label names render literally in Markdown.
fn escape_brackets(s: &str) -> String {
    s.replace('[', "\\[").replace(']', "\\]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Board, Card, CheckItem, Checklist, Label, List};
    use crate::reshape::{Comment, ReshapeOptions, reshape};

    fn make_list(id: &str, name: &str) -> List {
        List {
            id: id.into(),
            name: name.into(),
            closed: false,
        }
    }

    fn make_card(name: &str, desc: &str, labels: &[&str]) -> Card {
        Card {
            name: name.into(),
            desc: desc.into(),
            labels: labels
                .iter()
                .map(|l| Label {
                    name: (*l).to_owned(),
                })
                .collect(),
            ..Default::default()
        }
    }

    fn make_comment(date: &str, text: &str) -> Comment {
        Comment {
            date: date.into(),
            text: text.into(),
        }
    }

    fn make_checklist(name: &str, items: &[(&str, &str)]) -> Checklist {
        Checklist {
            name: name.into(),
            check_items: items
                .iter()
                .map(|(item, state)| CheckItem {
                    name: (*item).to_owned(),
                    state: (*state).to_owned(),
                })
                .collect(),
            ..Default::default()
        }
    }

    fn single_list_board(group: ListGroup) -> (Board, HashMap<String, ListGroup>) {
        let board = Board {
            lists: vec![group.list.clone()],
            ..Default::default()
        };
        let mut groups = HashMap::new();
        groups.insert(group.list.id.clone(), group);
        (board, groups)
    }

    fn default_opts() -> RenderOptions {
        RenderOptions::default()
    }

    #[test]
    fn renders_end_to_end_fixture() {
        let (board, groups) = single_list_board(ListGroup {
            list: make_list("L1", "Todo"),
            cards: vec![CardGroup {
                card: make_card("Task A", "do it", &["urgent"]),
                comments: vec![make_comment("2023-03-05T00:00:00Z", "started")],
                checklists: vec![make_checklist(
                    "Steps",
                    &[("a", "complete"), ("b", "incomplete")],
                )],
            }],
        });
        let output = render_board(&board, &groups, &default_opts());

        let expected = "## Todo\n\n\
                        #### Task A \\[urgent\\] \n\
                        do it\n\n\
                        * [2023-03-05] started\n\n\
                        * Checklist: Steps\n\
                        \t* [X] a\n\
                        \t* [ ] b\n\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn renders_only_headings_for_empty_lists() {
        let (board, groups) = single_list_board(ListGroup {
            list: make_list("L1", "Todo"),
            cards: vec![],
        });
        let output = render_board(&board, &groups, &default_opts());

        assert_eq!(output, "## Todo\n\n\n");
        assert!(!output.contains("####"));
    }

    #[test]
    fn skips_list_absent_from_mapping() {
        let board = Board {
            lists: vec![make_list("L1", "Todo"), make_list("L2", "Gone")],
            ..Default::default()
        };
        let mut groups = HashMap::new();
        groups.insert(
            "L1".to_owned(),
            ListGroup {
                list: make_list("L1", "Todo"),
                cards: vec![],
            },
        );
        let output = render_board(&board, &groups, &default_opts());

        assert!(output.contains("## Todo"));
        assert!(!output.contains("Gone"));
    }

    #[test]
    fn omits_description_block_when_empty() {
        let (board, groups) = single_list_board(ListGroup {
            list: make_list("L1", "Todo"),
            cards: vec![CardGroup {
                card: make_card("Task A", "", &[]),
                comments: vec![make_comment("2023-03-05T00:00:00Z", "note")],
                checklists: vec![],
            }],
        });
        let output = render_board(&board, &groups, &default_opts());

        // Heading line goes straight into the comment block.
        assert!(output.contains("#### Task A \n* [2023-03-05] note"));
    }

    #[test]
    fn emits_comments_in_reverse_export_order() {
        let (board, groups) = single_list_board(ListGroup {
            list: make_list("L1", "Todo"),
            cards: vec![CardGroup {
                card: make_card("Task A", "", &[]),
                comments: vec![
                    make_comment("2023-03-07T00:00:00Z", "third"),
                    make_comment("2023-03-06T00:00:00Z", "second"),
                    make_comment("2023-03-05T00:00:00Z", "first"),
                ],
                checklists: vec![],
            }],
        });
        let output = render_board(&board, &groups, &default_opts());

        let first = output.find("first").unwrap();
        let second = output.find("second").unwrap();
        let third = output.find("third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn reversing_emitted_comments_restores_export_order() {
        let export_order = ["newest", "middle", "oldest"];
        let (board, groups) = single_list_board(ListGroup {
            list: make_list("L1", "Todo"),
            cards: vec![CardGroup {
                card: make_card("Task A", "", &[]),
                comments: export_order
                    .iter()
                    .map(|text| make_comment("2023-03-05T00:00:00Z", text))
                    .collect(),
                checklists: vec![],
            }],
        });
        let output = render_board(&board, &groups, &default_opts());

        let emitted: Vec<&str> = output
            .lines()
            .filter_map(|line| line.strip_prefix("* [2023-03-05] "))
            .collect();
        let restored: Vec<&str> = emitted.iter().rev().copied().collect();
        assert_eq!(restored, export_order);
    }

    #[test]
    fn maps_incomplete_state_to_unchecked_marker() {
        let (board, groups) = single_list_board(ListGroup {
            list: make_list("L1", "Todo"),
            cards: vec![CardGroup {
                card: make_card("Task A", "", &[]),
                comments: vec![],
                checklists: vec![make_checklist(
                    "Steps",
                    &[("a", "incomplete"), ("b", "complete"), ("c", "bogus")],
                )],
            }],
        });
        let output = render_board(&board, &groups, &default_opts());

        assert!(output.contains("\t* [ ] a"));
        assert!(output.contains("\t* [X] b"));
        // Unrecognized states default to checked rather than crashing.
        assert!(output.contains("\t* [X] c"));
    }

    #[test]
    fn separates_comments_and_checklists_with_one_blank_line() {
        let (board, groups) = single_list_board(ListGroup {
            list: make_list("L1", "Todo"),
            cards: vec![CardGroup {
                card: make_card("Task A", "", &[]),
                comments: vec![make_comment("2023-03-05T00:00:00Z", "note")],
                checklists: vec![make_checklist("Steps", &[("a", "incomplete")])],
            }],
        });
        let output = render_board(&board, &groups, &default_opts());

        assert!(output.contains("* [2023-03-05] note\n\n* Checklist: Steps"));
    }

    #[test]
    fn checklist_without_comments_has_no_leading_blank_line() {
        let (board, groups) = single_list_board(ListGroup {
            list: make_list("L1", "Todo"),
            cards: vec![CardGroup {
                card: make_card("Task A", "do it", &[]),
                comments: vec![],
                checklists: vec![make_checklist("Steps", &[("a", "incomplete")])],
            }],
        });
        let output = render_board(&board, &groups, &default_opts());

        assert!(output.contains("do it\n\n* Checklist: Steps"));
    }

    #[test]
    fn pads_card_without_comments_or_checklists() {
        let (board, groups) = single_list_board(ListGroup {
            list: make_list("L1", "Todo"),
            cards: vec![CardGroup {
                card: make_card("Task A", "do it", &[]),
                comments: vec![],
                checklists: vec![],
            }],
        });
        let output = render_board(&board, &groups, &default_opts());

        assert!(output.contains("do it\n\n\n\n"));
    }

    #[test]
    fn escapes_brackets_in_label_names() {
        let (board, groups) = single_list_board(ListGroup {
            list: make_list("L1", "Todo"),
            cards: vec![CardGroup {
                card: make_card("Task A", "", &["a[b]c"]),
                comments: vec![],
                checklists: vec![],
            }],
        });
        let output = render_board(&board, &groups, &default_opts());

        assert!(output.contains("\\[a\\[b\\]c\\] "));
    }

    #[test]
    fn renders_multiple_labels_space_joined() {
        let (board, groups) = single_list_board(ListGroup {
            list: make_list("L1", "Todo"),
            cards: vec![CardGroup {
                card: make_card("Task A", "", &["urgent", "later"]),
                comments: vec![],
                checklists: vec![],
            }],
        });
        let output = render_board(&board, &groups, &default_opts());

        assert!(output.contains("#### Task A \\[urgent\\] \\[later\\] "));
    }

    #[test]
    fn omits_checklist_label_when_disabled() {
        let (board, groups) = single_list_board(ListGroup {
            list: make_list("L1", "Todo"),
            cards: vec![CardGroup {
                card: make_card("Task A", "", &[]),
                comments: vec![],
                checklists: vec![make_checklist("Steps", &[("a", "incomplete")])],
            }],
        });
        let opts = RenderOptions {
            checklist_label: false,
            ..Default::default()
        };
        let output = render_board(&board, &groups, &opts);

        assert!(output.contains("* Steps\n"));
        assert!(!output.contains("Checklist:"));
    }

    #[test]
    fn shifts_headings_by_offset() {
        let (board, groups) = single_list_board(ListGroup {
            list: make_list("L1", "Todo"),
            cards: vec![CardGroup {
                card: make_card("Task A", "", &[]),
                comments: vec![],
                checklists: vec![],
            }],
        });
        let opts = RenderOptions {
            heading_offset: 1,
            ..Default::default()
        };
        let output = render_board(&board, &groups, &opts);

        assert!(output.contains("### Todo"));
        assert!(output.contains("##### Task A"));
    }

    #[test]
    fn renders_lists_in_board_order() {
        let board = Board {
            lists: vec![make_list("L2", "Doing"), make_list("L1", "Todo")],
            ..Default::default()
        };
        let groups = reshape(&board, &ReshapeOptions::default());
        let output = render_board(&board, &groups, &default_opts());

        let doing = output.find("## Doing").unwrap();
        let todo = output.find("## Todo").unwrap();
        assert!(doing < todo);
    }

    #[test]
    fn rendering_is_idempotent() {
        let (board, groups) = single_list_board(ListGroup {
            list: make_list("L1", "Todo"),
            cards: vec![CardGroup {
                card: make_card("Task A", "do it", &["urgent"]),
                comments: vec![make_comment("2023-03-05T00:00:00Z", "started")],
                checklists: vec![make_checklist("Steps", &[("a", "complete")])],
            }],
        });

        let first = render_board(&board, &groups, &default_opts());
        let second = render_board(&board, &groups, &default_opts());
        assert_eq!(first, second);
    }

    // Tests for date_tag helper
    #[test]
    fn formats_rfc3339_timestamp_as_date() {
        assert_eq!(date_tag("2023-03-05T14:30:00Z"), "2023-03-05");
        assert_eq!(date_tag("2023-03-05T00:00:00.000Z"), "2023-03-05");
    }

    #[test]
    fn zero_pads_date_components() {
        assert_eq!(date_tag("2023-01-02T00:00:00Z"), "2023-01-02");
    }

    #[test]
    fn falls_back_to_raw_date_portion() {
        assert_eq!(date_tag("2023-03-05Tgarbage"), "2023-03-05");
        assert_eq!(date_tag("not a date"), "not a date");
        assert_eq!(date_tag(""), "");
    }

    // Tests for escape_brackets helper
    #[test]
    fn escapes_both_bracket_kinds() {
        assert_eq!(escape_brackets("[x]"), "\\[x\\]");
        assert_eq!(escape_brackets("plain"), "plain");
        assert_eq!(escape_brackets(""), "");
    }
}
