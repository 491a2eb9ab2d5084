//! C1: tokenizing a command string into an executable plus argument vector.
//!
//! Honors single quotes, double quotes, and backslash escapes inside both quote kinds.
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// The parsed, executable form of a command: an executable name/path plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argv {
    pub executable: String,
    pub args: Vec<String>,
}

/// Tokenize `input` into an [`Argv`], honoring quotes and backslash escapes.
///
/// Rejects an empty (or all-whitespace) string. An unterminated quote is a parse error.
pub fn parse(input: &str) -> Result<Argv> {
    let tokens = tokenize(input)?;
    let mut iter = tokens.into_iter();
    let executable = iter.next().ok_or(Error::EmptyCommand)?;
    Ok(Argv {
        executable,
        args: iter.collect(),
    })
}

fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut has_current = false;
    let mut chars = input.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                if c == '\\' && matches!(chars.peek(), Some('\\') | Some(q2) if Some(*q2) == Some(q)) {
                    // Backslash escape inside a quote: only `\\` and `\<the current quote char>`
                    // are treated as escapes; anything else keeps the backslash literal.
                    if let Some(&next) = chars.peek() {
                        if next == '\\' || next == q {
                            current.push(chars.next().unwrap());
                            continue;
                        }
                    }
                    current.push(c);
                } else if c == q {
                    quote = None;
                } else {
                    current.push(c);
                }
                has_current = true;
            }
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    has_current = true;
                }
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    } else {
                        current.push('\\');
                    }
                    has_current = true;
                }
                c if c.is_whitespace() => {
                    if has_current {
                        tokens.push(std::mem::take(&mut current));
                        has_current = false;
                    }
                }
                c => {
                    current.push(c);
                    has_current = true;
                }
            },
        }
    }

    if let Some(q) = quote {
        return Err(Error::UnterminatedQuote(q, input.to_string()));
    }

    if has_current {
        tokens.push(current);
    }

    if tokens.is_empty() {
        return Err(Error::EmptyCommand);
    }

    Ok(tokens)
}

/// A named shell, or the platform default, or no shell at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellSpec {
    /// No `shell` field was given.
    Unset,
    /// `shell: true` / `shell: false`.
    Bool(bool),
    /// `shell: "<name>"`.
    Named(String),
}

impl Default for ShellSpec {
    fn default() -> Self {
        ShellSpec::Unset
    }
}

/// A color specifier carried by a command or by `prefixColors`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpec {
    Named(String),
    Hex(u8, u8, u8),
    Rgb(u8, u8, u8),
    Auto,
}

/// The input form of a single command, as it would arrive from CLI/config parsing.
/// Collapses a "bare string, or a record with overrides" union into one struct at the
/// boundary, with every optional field defaulted; downstream components never branch on
/// the input's shape.
#[derive(Debug, Clone, Default)]
pub struct CommandInput {
    pub command: String,
    pub name: Option<String>,
    pub env: HashMap<String, String>,
    pub cwd: Option<PathBuf>,
    pub shell: ShellSpec,
    pub prefix_color: Option<ColorSpec>,
    pub raw: bool,
    pub restart_tries: u32,
    pub restart_delay_ms: u64,
}

impl CommandInput {
    /// Construct a bare command input from just a command string, with every other field
    /// defaulted.
    pub fn bare(command: impl Into<String>) -> Self {
        CommandInput {
            command: command.into(),
            ..Default::default()
        }
    }
}
