//! C7: per-line prefix construction, coloring, and line buffering of child output.
use crossterm::style::Color;

use crate::color;
use crate::task::Task;

/// The shape of prefix produced ahead of each formatted line (§4.7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixKind {
    None,
    Index,
    Name,
    Pid,
    Time,
    Command,
    /// A template string substituting `{index}`, `{pid}`, `{time}`, `{command}`, `{name}`.
    Template(String),
}

impl PrefixKind {
    /// Parse a `--prefix` value: one of the enumerated kind names, or any other string
    /// treated as a template.
    pub fn parse(raw: &str) -> PrefixKind {
        match raw {
            "none" => PrefixKind::None,
            "index" => PrefixKind::Index,
            "name" => PrefixKind::Name,
            "pid" => PrefixKind::Pid,
            "time" => PrefixKind::Time,
            "command" => PrefixKind::Command,
            other => PrefixKind::Template(other.to_string()),
        }
    }
}

/// Builds prefixes and colorizes formatted lines for one run.
pub struct Formatter {
    pub kind: PrefixKind,
    pub timestamp_format: String,
}

impl Formatter {
    pub fn new(kind: PrefixKind, timestamp_format: impl Into<String>) -> Self {
        Formatter { kind, timestamp_format: timestamp_format.into() }
    }

    /// Build the (uncolored) prefix text for one task, including the trailing separator
    /// space/bracket the kind implies. Empty string means no prefix is drawn.
    pub fn build_prefix(&self, task: &Task, pid: Option<u32>) -> String {
        match &self.kind {
            PrefixKind::None => String::new(),
            PrefixKind::Index => format!("[{}] ", task.index),
            PrefixKind::Name => match &task.name {
                Some(name) => format!("[{name}] "),
                None => format!("[{}] ", task.index),
            },
            PrefixKind::Pid => match pid {
                Some(pid) => format!("[{pid}] "),
                None => String::new(),
            },
            PrefixKind::Time => format!("[{}] ", self.format_timestamp()),
            PrefixKind::Command => format!("[{}] ", task.command_prefix_token()),
            PrefixKind::Template(template) => {
                let mut rendered = template.clone();
                rendered = rendered.replace("{index}", &task.index.to_string());
                rendered = rendered.replace("{pid}", &pid.map(|p| p.to_string()).unwrap_or_default());
                rendered = rendered.replace("{time}", &self.format_timestamp());
                rendered = rendered.replace("{command}", &task.command_prefix_token());
                rendered = rendered.replace("{name}", &task.display_name());
                rendered.push(' ');
                rendered
            }
        }
    }

    fn format_timestamp(&self) -> String {
        chrono::Local::now().format(&self.timestamp_format).to_string()
    }

    /// Resolve the color to apply to this task's prefix: a per-task color overrides the
    /// positional `prefixColors[index]`.
    pub fn resolve_color(&self, task: &Task, prefix_colors: &[crate::command::ColorSpec]) -> Option<Color> {
        if let Some(spec) = &task.color {
            return color::resolve(spec, task.index);
        }
        prefix_colors
            .get(task.index)
            .and_then(|spec| color::resolve(spec, task.index))
    }

    /// Render one already-split line with its prefix and color applied.
    pub fn format_line(&self, task: &Task, pid: Option<u32>, color: Option<Color>, line: &str) -> String {
        let prefix = self.build_prefix(task, pid);
        if prefix.is_empty() {
            line.to_string()
        } else {
            format!("{}{line}", color::colorize(&prefix, color))
        }
    }
}

/// Splits a stream of byte chunks into newline-delimited lines, holding a partial suffix
/// across chunks without ever discarding it (flushed explicitly on stream close, per §9).
#[derive(Debug, Default)]
pub struct LineSplitter {
    partial: Vec<u8>,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk, returning the complete lines it produced (newline stripped).
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.partial.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.partial.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.partial.drain(..=pos).collect();
            line.pop(); // drop the '\n'
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Flush any trailing partial line (no forced newline was ever seen). Called on stream
    /// close.
    pub fn flush(&mut self) -> Option<String> {
        if self.partial.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&std::mem::take(&mut self.partial)).into_owned())
        }
    }
}
