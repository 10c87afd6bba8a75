// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Reshaping of flat board exports into a nested, queryable structure.
//!
//! Trello exports lists, cards, actions, and checklists as independent
//! arrays linked by identifiers. This module groups them: each surviving
//! list gets its cards, and each card gets its comments and checklists,
//! all in export-relative order.
//!
//! The result is keyed by list identifier. Lists filtered out (archived
//! lists under the default options) simply have no entry, so the renderer
//! probes the map and skips absentees. The input [`Board`] is only
//! borrowed; grouping clones the records it keeps rather than mutating
//! shared state.
//!
//! Records whose owning list or card does not survive are dropped
//! silently. An orphaned reference is not an error.
//!
//! # Example
//!
//! ```
//! use trello2md::parser::parse_board;
//! use trello2md::reshape::{reshape, ReshapeOptions};
//!
//! let board = parse_board(r#"{
//!     "lists": [{ "id": "L1", "name": "Todo" }],
//!     "cards": [{ "id": "C1", "name": "Task A", "idList": "L1" }]
//! }"#).unwrap();
//!
//! let groups = reshape(&board, &ReshapeOptions::default());
//! assert_eq!(groups["L1"].cards.len(), 1);
//! ```

use crate::parser::{Board, Card, Checklist, List};
use std::collections::HashMap;

/// Configuration options for reshaping.
///
/// Archived ("closed") lists and cards are excluded by default; either
/// filter can be turned off independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReshapeOptions {
    /// Whether to keep lists whose closed flag is set.
    pub include_closed_lists: bool,

    /// Whether to keep cards whose closed flag is set.
    pub include_closed_cards: bool,
}

/// A comment on a card, extracted from a comment-type action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    /// The comment's timestamp as an ISO 8601 string.
    pub date: String,

    /// The comment's text.
    pub text: String,
}

/// A card together with its comments and checklists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardGroup {
    /// The card itself.
    pub card: Card,

    /// Comments on the card, in export order (newest first in Trello
    /// exports; the renderer reverses them).
    pub comments: Vec<Comment>,

    /// Checklists attached to the card, in export order.
    pub checklists: Vec<Checklist>,
}

/// A list together with its surviving cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListGroup {
    /// The list itself.
    pub list: List,

    /// The list's cards, filtered per [`ReshapeOptions`], in export order.
    pub cards: Vec<CardGroup>,
}

/// Groups a flat board export by list and card identifier.
///
/// Returns a mapping from list identifier to the list's enriched record.
/// Lists excluded by `opts` have no entry; probing a missing key yields
/// absence, never a panic.
#[must_use]
pub fn reshape(board: &Board, opts: &ReshapeOptions) -> HashMap<String, ListGroup> {
    let mut groups = HashMap::new();

    for list in &board.lists {
        if list.closed && !opts.include_closed_lists {
            continue;
        }

        let cards = board
            .cards
            .iter()
            .filter(|card| card.id_list == list.id)
            .filter(|card| !card.closed || opts.include_closed_cards)
            .map(|card| group_card(board, card))
            .collect();

        groups.insert(
            list.id.clone(),
            ListGroup {
                list: list.clone(),
                cards,
            },
        );
    }

    groups
}

/// Attaches a card's comments and checklists.
fn group_card(board: &Board, card: &Card) -> CardGroup {
    let comments = board
        .actions
        .iter()
        .filter(|action| action.is_comment() && action.card_id == card.id)
        .map(|action| Comment {
            date: action.date.clone(),
            text: action.text.clone(),
        })
        .collect();

    let checklists = board
        .checklists
        .iter()
        .filter(|checklist| checklist.id_card == card.id)
        .cloned()
        .collect();

    CardGroup {
        card: card.clone(),
        comments,
        checklists,
    }
}
