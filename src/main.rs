// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for trello2md.
//!
//! This binary provides the `trello2md` command for converting Trello
//! board exports from JSON to Markdown format, with an optional secondary
//! PDF export handed off to pandoc.

use lexopt::prelude::*;
use snafu::{OptionExt, ensure, prelude::*};
use std::path::{Path, PathBuf};
use trello2md::{parser, renderer, reshape};
use walkdir::WalkDir;

/// Where to write the rendered output.
#[derive(Clone)]
enum OutputTarget {
    /// Write each file to the specified directory.
    Directory(PathBuf),
    /// Write to stdout.
    Stdout,
}

#[allow(clippy::struct_excessive_bools)]
struct Cli {
    input: Vec<PathBuf>,
    output: OutputTarget,
    concat: bool,
    include_closed_lists: bool,
    include_closed_cards: bool,
    checklist_label: bool,
    heading_offset: u8,
    pdf: bool,
    pdf_name: Option<PathBuf>,
    quiet: bool,
    verbose: bool,
    dry_run: bool,
    force: bool,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("at least one input file or directory is required"))]
    NoInputFiles,

    #[snafu(display("cannot output multiple files to stdout without --concat"))]
    MultipleFilesToStdout,

    #[snafu(display("--pdf requires a file or directory output, not stdout"))]
    PdfToStdout,

    #[snafu(display("failed to create output directory: {source}"))]
    CreateOutputDir { source: std::io::Error },

    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to parse {}: {source}", path.display()))]
    ParseFile {
        path: PathBuf,
        source: parser::ParseError,
    },

    #[snafu(display("invalid input filename: no file stem"))]
    InvalidFilename,

    #[snafu(display("failed to write {}: {source}", path.display()))]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn print_help() {
    println!(
        "\
{name} {version}
Convert Trello board exports to Markdown

Usage: {name} [OPTIONS] -o <OUTPUT> <INPUT>...

Arguments:
  <INPUT>...  Input JSON files or directories containing exports

Options:
  -o, --output <OUTPUT>       Output directory (or file with --concat, or - for stdout)
      --concat                Combine all inputs into a single output
      --heading-offset <N>    Shift heading levels by N (0-5, default: 0)

Content selection (last flag wins):
      --include-closed-lists  Keep archived lists (default: excluded)
      --exclude-closed-lists  Drop archived lists
      --include-closed-cards  Keep archived cards (default: excluded)
      --exclude-closed-cards  Drop archived cards
      --checklist-label       Prefix checklist names with 'Checklist: ' (default: on)
      --no-checklist-label    Show checklist names without the prefix

PDF export:
      --pdf                   Also render each output to PDF via pandoc
      --pdf-name <NAME>       PDF file name (default: derived from the board name)

Other options:
  -q, --quiet                 Suppress progress messages
  -v, --verbose               Report list and card counts per input
  -n, --dry-run               Show what would be processed without writing
  -f, --force                 Overwrite existing output files
  -h, --help                  Print help
  -V, --version               Print version",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    );
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    // Show help if no arguments provided
    if std::env::args().len() == 1 {
        print_help();
        std::process::exit(0);
    }

    let mut input = Vec::new();
    let mut output: Option<OutputTarget> = None;
    let mut concat = false;
    // Defaults: closed lists and cards excluded, checklist label on
    let mut include_closed_lists = false;
    let mut include_closed_cards = false;
    let mut checklist_label = true;
    let mut heading_offset: u8 = 0;
    let mut pdf = false;
    let mut pdf_name: Option<PathBuf> = None;
    let mut quiet = false;
    let mut verbose = false;
    let mut dry_run = false;
    let mut force = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('o') | Long("output") => {
                let val: PathBuf = parser.value()?.parse()?;
                output = Some(if val == Path::new("-") {
                    OutputTarget::Stdout
                } else {
                    OutputTarget::Directory(val)
                });
            }
            Long("concat") => concat = true,
            // Include/exclude flags - last one wins
            Long("include-closed-lists") => include_closed_lists = true,
            Long("exclude-closed-lists") => include_closed_lists = false,
            Long("include-closed-cards") => include_closed_cards = true,
            Long("exclude-closed-cards") => include_closed_cards = false,
            Long("checklist-label") => checklist_label = true,
            Long("no-checklist-label") => checklist_label = false,
            Long("heading-offset") => {
                let val: u8 = parser
                    .value()?
                    .parse()
                    .map_err(|_| "heading-offset must be a number 0-5")?;
                if val > 5 {
                    return Err("heading-offset must be 0-5".into());
                }
                heading_offset = val;
            }
            Long("pdf") => pdf = true,
            Long("pdf-name") => {
                pdf_name = Some(parser.value()?.parse()?);
                pdf = true;
            }
            Short('q') | Long("quiet") => quiet = true,
            Short('v') | Long("verbose") => verbose = true,
            Short('n') | Long("dry-run") => dry_run = true,
            Short('f') | Long("force") => force = true,
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) => input.push(val.parse()?),
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Cli {
        input,
        output: output.ok_or("missing required option: --output")?,
        concat,
        include_closed_lists,
        include_closed_cards,
        checklist_label,
        heading_offset,
        pdf,
        pdf_name,
        quiet,
        verbose,
        dry_run,
        force,
    })
}

fn main() -> Result<(), Error> {
    let cli = parse_args().context(ParseArgsSnafu)?;

    ensure!(!cli.input.is_empty(), NoInputFilesSnafu);
    ensure!(
        !(cli.pdf && matches!(cli.output, OutputTarget::Stdout)),
        PdfToStdoutSnafu
    );

    // Collect all input files first
    let files = collect_input_files(&cli.input);

    if cli.concat {
        process_concat(&files, &cli)?;
    } else {
        match &cli.output {
            OutputTarget::Stdout => {
                // Without concat, we can only output one file to stdout
                ensure!(files.len() == 1, MultipleFilesToStdoutSnafu);
                process_to_stdout(&files[0], &cli)?;
            }
            OutputTarget::Directory(dir) => {
                if !cli.dry_run {
                    std::fs::create_dir_all(dir).context(CreateOutputDirSnafu)?;
                }
                for file in &files {
                    process_file(file, dir, &cli)?;
                }
            }
        }
    }

    Ok(())
}

/// Collects all JSON files from the given inputs (files and directories).
fn collect_input_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            {
                files.push(entry.path().to_path_buf());
            }
        } else {
            files.push(input.clone());
        }
    }
    files
}

/// Creates reshape options from CLI arguments.
#[allow(clippy::missing_const_for_fn)]
fn make_reshape_options(cli: &Cli) -> reshape::ReshapeOptions {
    reshape::ReshapeOptions {
        include_closed_lists: cli.include_closed_lists,
        include_closed_cards: cli.include_closed_cards,
    }
}

/// Creates render options from CLI arguments.
#[allow(clippy::missing_const_for_fn)]
fn make_render_options(cli: &Cli) -> renderer::RenderOptions {
    renderer::RenderOptions {
        checklist_label: cli.checklist_label,
        heading_offset: cli.heading_offset,
    }
}

/// Runs the transform pipeline on one export's JSON content.
///
/// Returns the parsed board alongside the rendered Markdown; the board is
/// consulted afterwards for verbose reporting and PDF naming.
fn convert(json: &str, cli: &Cli) -> Result<(parser::Board, String), parser::ParseError> {
    let board = parser::parse_board(json)?;
    let groups = reshape::reshape(&board, &make_reshape_options(cli));
    let markdown = renderer::render_board(&board, &groups, &make_render_options(cli));
    Ok((board, markdown))
}

/// Reports per-input statistics when verbose mode is on.
fn report_stats(input: &Path, board: &parser::Board, cli: &Cli) {
    if cli.verbose && !cli.quiet {
        eprintln!(
            "{}: {} lists, {} cards",
            input.display(),
            board.lists.len(),
            board.cards.len()
        );
    }
}

/// Processes a single file and outputs to stdout.
fn process_to_stdout(input: &Path, cli: &Cli) -> Result<(), Error> {
    if cli.dry_run {
        eprintln!("Would output {}", input.display());
        return Ok(());
    }

    let json = std::fs::read_to_string(input).context(ReadFileSnafu { path: input })?;
    let (board, markdown) = convert(&json, cli).context(ParseFileSnafu { path: input })?;
    report_stats(input, &board, cli);

    print!("{markdown}");
    Ok(())
}

/// Processes multiple files and concatenates them into a single output.
fn process_concat(files: &[PathBuf], cli: &Cli) -> Result<(), Error> {
    let mut output = String::new();
    let mut first_board: Option<parser::Board> = None;

    for (i, path) in files.iter().enumerate() {
        if i > 0 {
            output.push_str("\n---\n\n");
        }
        let json = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
        let (board, markdown) = convert(&json, cli).context(ParseFileSnafu { path })?;
        report_stats(path, &board, cli);
        output.push_str(&markdown);
        first_board.get_or_insert(board);
    }

    match &cli.output {
        OutputTarget::Stdout => {
            if cli.dry_run {
                eprintln!("Would output {} files concatenated", files.len());
            } else {
                print!("{output}");
            }
        }
        OutputTarget::Directory(path) => {
            // In concat mode, treat path as a file, not directory
            if cli.dry_run {
                eprintln!(
                    "Would write {} ({} files concatenated)",
                    path.display(),
                    files.len()
                );
            } else if path.exists() && !cli.force {
                eprintln!(
                    "Skipping {} (already exists, use --force to overwrite)",
                    path.display()
                );
            } else {
                // Create parent directory if needed
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    std::fs::create_dir_all(parent).context(CreateOutputDirSnafu)?;
                }
                std::fs::write(path, &output).context(WriteFileSnafu { path })?;
                if !cli.quiet {
                    eprintln!("Wrote {} ({} files)", path.display(), files.len());
                }
                if cli.pdf && let Some(board) = &first_board {
                    export_pdf(path, &pdf_path(path, board, cli), cli.quiet);
                }
            }
        }
    }

    Ok(())
}

/// Processes a single file and writes to the output directory.
fn process_file(input: &Path, out_dir: &Path, cli: &Cli) -> Result<(), Error> {
    let out_name = input.file_stem().context(InvalidFilenameSnafu)?;
    let out_path = out_dir.join(format!("{}.md", out_name.to_string_lossy()));

    // Handle dry-run mode
    if cli.dry_run {
        eprintln!("Would write {}", out_path.display());
        return Ok(());
    }

    // Check if output exists and handle overwrite
    if out_path.exists() && !cli.force {
        eprintln!(
            "Skipping {} (already exists, use --force to overwrite)",
            out_path.display()
        );
        return Ok(());
    }

    let json = std::fs::read_to_string(input).context(ReadFileSnafu { path: input })?;
    let (board, markdown) = convert(&json, cli).context(ParseFileSnafu { path: input })?;
    report_stats(input, &board, cli);

    std::fs::write(&out_path, &markdown).context(WriteFileSnafu { path: &out_path })?;

    if !cli.quiet {
        eprintln!("Wrote {}", out_path.display());
    }

    if cli.pdf {
        export_pdf(&out_path, &pdf_path(&out_path, &board, cli), cli.quiet);
    }
    Ok(())
}

/// Returns the PDF destination next to the written Markdown file.
///
/// The file name comes from `--pdf-name` when given, otherwise from the
/// board's display name, falling back to the Markdown file stem for
/// unnamed boards.
fn pdf_path(markdown_path: &Path, board: &parser::Board, cli: &Cli) -> PathBuf {
    let file_name = cli.pdf_name.as_ref().map_or_else(
        || {
            let stem = if board.name.is_empty() {
                markdown_path
                    .file_stem()
                    .map_or_else(|| "board".to_owned(), |s| s.to_string_lossy().into_owned())
            } else {
                board.name.replace(['/', '\\'], "-")
            };
            PathBuf::from(format!("{stem}.pdf"))
        },
        |name| {
            let mut name = name.clone();
            if name.extension().is_none() {
                name.set_extension("pdf");
            }
            name
        },
    );

    markdown_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(file_name)
}

/// Hands the written Markdown to pandoc for the secondary PDF export.
///
/// The transform already succeeded by this point, so failures here are
/// reported but do not abort the run.
fn export_pdf(markdown_path: &Path, pdf_path: &Path, quiet: bool) {
    let result = std::process::Command::new("pandoc")
        .arg(markdown_path)
        .arg("-o")
        .arg(pdf_path)
        .status();

    match result {
        Ok(status) if status.success() => {
            if !quiet {
                eprintln!("Wrote {}", pdf_path.display());
            }
        }
        Ok(status) => eprintln!(
            "pandoc exited with {status} while writing {}",
            pdf_path.display()
        ),
        Err(e) => eprintln!("failed to run pandoc: {e}"),
    }
}
