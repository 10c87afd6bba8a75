// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! JSON parsing for Trello board exports.
//!
//! This module handles deserialization of the JSON format produced by
//! Trello's board export feature. The export is flat: lists, cards, actions,
//! and checklists are independent top-level arrays whose records reference
//! each other by identifier.
//!
//! # Format Overview
//!
//! A Trello board export contains:
//! - Board metadata (display name, short URL)
//! - An ordered array of lists (the authoritative display order)
//! - Unordered arrays of cards, actions, and checklists
//!
//! Field access is best-effort: a sparse export with missing fields still
//! parses, and absent values come back empty. Only syntactically invalid
//! JSON is an error.
//!
//! # Example
//!
//! ```
//! use trello2md::parser::parse_board;
//!
//! let json = r#"{
//!     "name": "Demo",
//!     "lists": [{ "id": "L1", "name": "Todo" }],
//!     "cards": [{ "id": "C1", "name": "Task A", "idList": "L1" }]
//! }"#;
//!
//! let board = parse_board(json).unwrap();
//! assert_eq!(board.name, "Demo");
//! assert_eq!(board.lists.len(), 1);
//! ```

use serde::Deserialize;
use snafu::prelude::*;

/// Error type for JSON parsing failures.
#[derive(Debug, Snafu)]
pub enum ParseError {
    /// Failed to parse JSON content.
    #[snafu(display("failed to parse JSON: {source}"))]
    Json {
        /// The underlying JSON parsing error.
        source: serde_json::Error,
    },
}

/// The root structure of a Trello board export.
///
/// Every field defaults when absent so that partial exports still parse;
/// the four record arrays are simply empty in that case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Board {
    /// The board's display name.
    pub name: String,

    /// The board's short URL (or short identifier).
    pub short_url: String,

    /// The board's lists, in display order.
    pub lists: Vec<List>,

    /// All cards on the board, referencing their list by `id_list`.
    pub cards: Vec<Card>,

    /// All actions recorded on the board. Only comment actions are
    /// relevant for rendering.
    pub actions: Vec<Action>,

    /// All checklists on the board, referencing their card by `id_card`.
    pub checklists: Vec<Checklist>,
}

/// A list (column) on the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct List {
    /// The list's identifier.
    pub id: String,

    /// The list's display name.
    pub name: String,

    /// Whether the list has been archived.
    pub closed: bool,
}

/// A card on the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Card {
    /// The card's identifier.
    pub id: String,

    /// The card's display name.
    pub name: String,

    /// The card's free-text description. Empty when the card has none.
    pub desc: String,

    /// Whether the card has been archived.
    pub closed: bool,

    /// The identifier of the list this card belongs to.
    pub id_list: String,

    /// Labels attached to the card.
    pub labels: Vec<Label>,
}

/// A label attached to a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Label {
    /// The label's display name.
    pub name: String,
}

/// An action recorded on the board.
///
/// The export nests the interesting fields (`data.text`, `data.card.id`)
/// and mixes many action types into one array, so this type flattens the
/// parts the renderer needs and is deserialized leniently: a record missing
/// any of them yields empty strings rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Action {
    /// The action's type tag (e.g. `"commentCard"`, `"updateCard"`).
    pub action_type: String,

    /// The action's timestamp as an ISO 8601 string.
    pub date: String,

    /// The comment text, for comment actions.
    pub text: String,

    /// The identifier of the card this action refers to.
    pub card_id: String,
}

impl Action {
    /// Returns `true` if this action is a card comment.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.action_type == "commentCard"
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;

        Ok(Self {
            action_type: get_string(&value, &["type"]).unwrap_or_default(),
            date: get_string(&value, &["date"]).unwrap_or_default(),
            text: get_string(&value, &["data", "text"]).unwrap_or_default(),
            card_id: get_string(&value, &["data", "card", "id"]).unwrap_or_default(),
        })
    }
}

/// A checklist attached to a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Checklist {
    /// The checklist's identifier.
    pub id: String,

    /// The checklist's display name.
    pub name: String,

    /// The identifier of the card this checklist belongs to.
    pub id_card: String,

    /// The checklist's items, in display order.
    pub check_items: Vec<CheckItem>,
}

/// A single item within a checklist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CheckItem {
    /// The item's display name.
    pub name: String,

    /// The item's completion state: `"incomplete"` or `"complete"`.
    ///
    /// Unrecognized values are treated as complete by the renderer.
    pub state: String,
}

/// Navigates a JSON path and returns the string value at the end.
///
/// # Arguments
///
/// * `value` - The root JSON value to navigate from
/// * `path` - A sequence of keys to follow through the JSON structure
fn get_str<'a>(value: &'a serde_json::Value, path: &[&str]) -> Option<&'a str> {
    let mut current = value;
    for key in path {
        current = current.get(*key)?;
    }
    current.as_str()
}

/// Like [`get_str`] but returns an owned `String`.
fn get_string(value: &serde_json::Value, path: &[&str]) -> Option<String> {
    get_str(value, path).map(str::to_owned)
}

/// Parses a JSON string into a [`Board`] structure.
///
/// This is the main entry point for parsing Trello board exports.
///
/// # Arguments
///
/// * `json_str` - The raw JSON content from a Trello board export file
///
/// # Errors
///
/// Returns an error if the JSON is syntactically malformed. Missing fields
/// are not an error; they default to empty.
///
/// # Example
///
/// ```
/// use trello2md::parser::parse_board;
///
/// let board = parse_board(r#"{ "name": "Demo" }"#).unwrap();
/// assert_eq!(board.name, "Demo");
/// assert!(board.lists.is_empty());
/// ```
pub fn parse_board(json_str: &str) -> Result<Board, ParseError> {
    serde_json::from_str(json_str).context(JsonSnafu)
}
