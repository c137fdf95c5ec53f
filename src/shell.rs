//! Interactive terminal front end
//!
//! Reads one command per line, forwards it to a [`Session`] and prints the
//! re-rendered list after every change. Positions typed by the user are
//! 1-based.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use clap::{Parser, Subcommand};
use crate::error::Result;
use crate::inputs::expand_inputs;
use crate::pdf::{LopdfWriter, WriterOptions};
use crate::session::{Feedback, ListDisplay, Session, WARNING_TITLE};

const PROMPT: &str = "pdf-joiner> ";

#[derive(Parser, Debug)]
#[command(multicall = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
enum ShellCommand {
    /// Append PDF files (paths or glob patterns) to the end of the list
    Add {
        #[arg(required = true)]
        inputs: Vec<String>,
    },
    /// Remove the file at POSITION
    #[command(visible_alias = "rm")]
    Remove { position: usize },
    /// Move the file at POSITION one place up
    Up { position: usize },
    /// Move the file at POSITION one place down
    Down { position: usize },
    /// Show the list in merge order
    #[command(visible_alias = "ls")]
    List,
    /// Merge the list into OUTPUT and start over
    Merge { output: PathBuf },
    /// Remove every file from the list
    Clear,
    /// Leave the session
    #[command(visible_alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Plain-text list and notification output
///
/// The display traits cannot fail, so the first write error is kept and
/// everything after it is skipped until [`TerminalView::take_error`] is called.
pub struct TerminalView<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// The first write error since the last call, if any
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    fn emit(&mut self, text: fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.out.write_fmt(text) {
            self.error = Some(e);
        }
    }

    fn notify(&mut self, title: &str, message: &str) {
        self.emit(format_args!("{}: {}\n", title, message));
    }
}

impl<W: Write> ListDisplay for TerminalView<W> {
    fn render(&mut self, names: &[String], selected: Option<usize>) {
        if names.is_empty() {
            self.emit(format_args!("No files in the list.\n"));
            return;
        }
        self.emit(format_args!("Files in merge order:\n"));
        for (i, name) in names.iter().enumerate() {
            let marker = if selected == Some(i) { '>' } else { ' ' };
            self.emit(format_args!("{} {:>3}. {}\n", marker, i + 1, name));
        }
    }
}

impl<W: Write> Feedback for TerminalView<W> {
    fn warning(&mut self, title: &str, message: &str) {
        self.notify(title, message);
    }

    fn success(&mut self, title: &str, message: &str) {
        self.notify(title, message);
    }

    fn error(&mut self, title: &str, message: &str) {
        self.notify(title, message);
    }
}

pub struct Shell<W: Write> {
    session: Session<TerminalView<W>>,
    writer_options: WriterOptions,
}

impl<W: Write> Shell<W> {
    pub fn new(out: W, writer_options: WriterOptions) -> Self {
        Self {
            session: Session::new(TerminalView::new(out)),
            writer_options,
        }
    }

    pub fn session(&self) -> &Session<TerminalView<W>> {
        &self.session
    }

    pub fn into_output(self) -> W {
        self.session.into_view().into_inner()
    }

    /// Process commands from `input` until it ends or the user quits.
    ///
    /// Fails on the first read error or the first failed write to the output.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        self.prompt()?;
        for line in input.lines() {
            let flow = self.execute(&line?);
            self.check_output()?;
            if flow == Flow::Quit {
                break;
            }
            self.prompt()?;
        }
        Ok(())
    }

    /// Add paths or glob patterns. Missing files are reported and skipped.
    pub fn add_inputs(&mut self, args: &[String]) {
        let paths = match expand_inputs(args) {
            Ok(paths) => paths,
            Err(e) => {
                self.warn(&e.to_string());
                return;
            }
        };

        let mut existing = Vec::with_capacity(paths.len());
        for path in paths {
            if path.is_file() {
                existing.push(path);
            } else {
                self.warn(&format!("File not found: {}", path.display()));
            }
        }
        self.session.add_files(Some(existing));
    }

    pub fn execute(&mut self, line: &str) -> Flow {
        let words = match split_words(line) {
            Ok(words) => words,
            Err(msg) => {
                self.warn(msg);
                return Flow::Continue;
            }
        };
        if words.is_empty() {
            return Flow::Continue;
        }

        let command = match ShellLine::try_parse_from(&words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                // Covers usage errors as well as `help` output
                self.session.view_mut().emit(format_args!("{}", e));
                return Flow::Continue;
            }
        };

        match command {
            ShellCommand::Add { inputs } => self.add_inputs(&inputs),
            ShellCommand::Remove { position } => {
                if let Some(index) = self.index_for(position) {
                    if !self.session.remove(index) {
                        self.warn(&format!("No file at position {}", position));
                    }
                }
            }
            ShellCommand::Up { position } => {
                if let Some(index) = self.index_for(position) {
                    if !self.session.move_up(index) {
                        self.warn(&format!("Cannot move position {} up", position));
                    }
                }
            }
            ShellCommand::Down { position } => {
                if let Some(index) = self.index_for(position) {
                    if !self.session.move_down(index) {
                        self.warn(&format!("Cannot move position {} down", position));
                    }
                }
            }
            ShellCommand::List => self.session.refresh(),
            ShellCommand::Merge { output } => {
                let mut writer = LopdfWriter::new(self.writer_options.clone());
                self.session.merge(Some(output), &mut writer);
            }
            ShellCommand::Clear => self.session.clear(),
            ShellCommand::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn index_for(&mut self, position: usize) -> Option<usize> {
        let index = position.checked_sub(1);
        if index.is_none() {
            self.warn("Positions start at 1");
        }
        index
    }

    fn warn(&mut self, message: &str) {
        self.session.view_mut().warning(WARNING_TITLE, message);
    }

    fn check_output(&mut self) -> Result<()> {
        match self.session.view_mut().take_error() {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn prompt(&mut self) -> Result<()> {
        self.check_output()?;
        let out = &mut self.session.view_mut().out;
        write!(out, "{}", PROMPT)?;
        out.flush()?;
        Ok(())
    }
}

/// Split a command line into words, honoring single and double quotes
fn split_words(line: &str) -> std::result::Result<Vec<String>, &'static str> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_word = true;
            }
            None if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("Unterminated quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
