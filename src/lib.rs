// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Convert Trello board exports to Markdown.
//!
//! This crate provides parsing, reshaping, and rendering functionality for
//! transforming Trello's JSON board export format into readable Markdown
//! documents.
//!
//! # Overview
//!
//! A Trello board export is flat: lists, cards, comment actions, and
//! checklists live in independent arrays linked only by identifiers. This
//! crate:
//!
//! 1. Parses the JSON structure into typed Rust representations
//! 2. Reshapes the flat arrays into a nested structure keyed by list
//! 3. Renders the nested structure as Markdown, in the board's list order
//!
//! # Example
//!
//! ```no_run
//! use trello2md::{parser, renderer, reshape};
//!
//! let json = std::fs::read_to_string("board.json").unwrap();
//! let board = parser::parse_board(&json).unwrap();
//!
//! let groups = reshape::reshape(&board, &reshape::ReshapeOptions::default());
//! let markdown = renderer::render_board(&board, &groups, &renderer::RenderOptions::default());
//! println!("{markdown}");
//! ```
//!
//! # Modules
//!
//! - [`parser`]: JSON parsing and type definitions for Trello board exports
//! - [`reshape`]: grouping of flat, identifier-linked records by list and card
//! - [`renderer`]: Markdown generation with configurable output options

#![deny(missing_docs)]

pub mod parser;
pub mod renderer;
pub mod reshape;
