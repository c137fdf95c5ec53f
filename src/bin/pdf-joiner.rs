//! PDF Joiner CLI tool
//!
//! Order PDF files and join them into one document, either in one shot or
//! through an interactive session.

use anyhow::{bail, Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;

use pdf_joiner::inputs::expand_inputs;
use pdf_joiner::logging::init_logging;
use pdf_joiner::list::MIN_MERGE_FILES;
use pdf_joiner::pdf::{extract_metadata, LopdfWriter, WriterOptions, SUPPORTED_PDF_VERSIONS};
use pdf_joiner::shell::Shell;
use pdf_joiner::{Error, FileList};

/// PDF Joiner - Order PDF files and join them into one
#[derive(Parser)]
#[command(name = "pdf-joiner")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Join PDFs in the given order
    pdf-joiner merge -o joined.pdf cover.pdf body.pdf appendix.pdf

    # Join numbered PDFs (each pattern expands in sorted order)
    pdf-joiner merge -o handout.pdf \"[0-9]*.pdf\"

    # Reorder interactively before joining
    pdf-joiner session *.pdf")]
struct Cli {
    /// Log level (trace, debug, info, warn, error); PDF_JOINER_LOG overrides it
    #[arg(long, global = true, env = "PDF_JOINER_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Shorthand for --log-level debug
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct WriterArgs {
    /// Write streams uncompressed
    #[arg(long)]
    no_compress: bool,

    /// PDF version written to the output header
    #[arg(
        long,
        default_value = "1.5",
        value_parser = PossibleValuesParser::new(SUPPORTED_PDF_VERSIONS)
    )]
    pdf_version: String,
}

impl From<WriterArgs> for WriterOptions {
    fn from(args: WriterArgs) -> Self {
        WriterOptions {
            pdf_version: args.pdf_version,
            compress: !args.no_compress,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Join multiple PDF files into one, in the order given
    Merge {
        /// Input PDF files (in order). Supports glob patterns like "*.pdf"
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output PDF file path
        #[arg(short, long)]
        output: PathBuf,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,

        #[command(flatten)]
        writer: WriterArgs,
    },

    /// Build the list interactively, reorder it, then join
    Session {
        /// Files to start the list with. Supports glob patterns
        inputs: Vec<String>,

        #[command(flatten)]
        writer: WriterArgs,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { cli.log_level.as_str() };
    init_logging(level);

    let result = match cli.command {
        Commands::Merge { inputs, output, open, writer } => {
            cmd_merge(inputs, output, open, writer.into())
        }
        Commands::Session { inputs, writer } => cmd_session(inputs, writer.into()),
        Commands::Info { input } => cmd_info(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Open a file with the system default application
fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        process::Command::new("open").arg(path).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        process::Command::new("xdg-open").arg(path).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Join PDFs in argument order
fn cmd_merge(inputs: Vec<String>, output: PathBuf, open: bool, options: WriterOptions) -> Result<()> {
    let inputs = expand_inputs(&inputs)?;

    for path in &inputs {
        if !path.exists() {
            bail!("Input file not found: {}", path.display());
        }
    }

    let mut list = FileList::new();
    let added = list.add(inputs.iter().cloned());
    if added < inputs.len() {
        debug!(skipped = inputs.len() - added, "dropped duplicate inputs");
    }

    if list.len() < MIN_MERGE_FILES {
        return Err(Error::NotEnoughFiles { count: list.len() }.into());
    }

    eprintln!("Merging {} PDF files...", list.len());

    let mut writer = LopdfWriter::new(options);
    list.merge(&output, &mut writer)
        .with_context(|| format!("Could not create {}", output.display()))?;

    eprintln!("Merged to: {}", output.display());

    if open {
        open_file(&output)?;
    }

    Ok(())
}

/// Run the interactive session on stdin/stdout
fn cmd_session(inputs: Vec<String>, options: WriterOptions) -> Result<()> {
    println!("Commands: add, remove, up, down, list, merge, clear, quit (help for details)");

    let mut shell = Shell::new(io::stdout().lock(), options);
    if inputs.is_empty() {
        shell.execute("list");
    } else {
        shell.add_inputs(&inputs);
    }

    shell.run(io::stdin().lock()).context("Session ended unexpectedly")?;
    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: &Path) -> Result<()> {
    let metadata = extract_metadata(input)
        .with_context(|| format!("Could not read {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = metadata.author {
        println!("Author: {}", author);
    }

    Ok(())
}
