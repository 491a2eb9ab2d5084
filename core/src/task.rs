//! Internal data model: the expanded [`Task`], run-wide [`RunOptions`], and a run's
//! [`RunReport`].
use std::collections::HashMap;
use std::path::PathBuf;

use crate::aggregate::SuccessCondition;
use crate::command::{Argv, ColorSpec};
use crate::format::PrefixKind;
use crate::shell::ShellDecision;
use crate::wildcard::WildcardSort;

/// Which exit conditions of any task trigger kill-others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KillOthersOn {
    pub success: bool,
    pub failure: bool,
}

impl KillOthersOn {
    pub fn none() -> Self {
        Self::default()
    }

    /// Does an exit code of `exit_code` match this trigger set?
    pub fn matches(&self, exit_code: i32) -> bool {
        (self.success && exit_code == 0) || (self.failure && exit_code != 0)
    }
}

/// Global defaults and policies for a run (`RunOptions` of §3).
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub cwd: PathBuf,
    pub kill_others_on: KillOthersOn,
    pub max_processes: Option<usize>,
    pub prefix: PrefixKind,
    pub prefix_colors: Vec<ColorSpec>,
    pub success_condition: SuccessCondition,
    pub timestamp_format: String,
    pub raw: bool,
    pub wildcard_sort: WildcardSort,
    pub ignore_missing: bool,
    pub names: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            cwd: PathBuf::from("."),
            kill_others_on: KillOthersOn::none(),
            max_processes: None,
            prefix: PrefixKind::Index,
            prefix_colors: Vec::new(),
            success_condition: SuccessCondition::All,
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            raw: false,
            wildcard_sort: WildcardSort::Alpha,
            ignore_missing: false,
            names: Vec::new(),
        }
    }
}

/// One expanded, resolved unit of work the supervisor admits and spawns.
#[derive(Debug, Clone)]
pub struct Task {
    /// Stable identity assigned at expansion time; never reassigned on restart.
    pub index: usize,
    /// The original (post-shortcut/wildcard-expansion) command string, for diagnostics and
    /// `prefix = command`.
    pub original_command: String,
    pub argv: Argv,
    pub shell: ShellDecision,
    pub env: HashMap<String, String>,
    pub cwd: PathBuf,
    pub name: Option<String>,
    pub color: Option<ColorSpec>,
    pub raw: bool,
    pub restart_budget: u32,
    pub restart_delay_ms: u64,
}

impl Task {
    /// The command token used for `prefix = command`, truncated to 16 characters — an
    /// arbitrary but fixed, documented contract (§9).
    pub fn command_prefix_token(&self) -> String {
        let mut token = self.argv.executable.clone();
        token.truncate(16);
        token
    }

    /// The display name used when `prefix = name`: falls back to the index when absent.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.index.to_string())
    }
}

/// The outcome of one terminated task (a "result" of §3 — an occurrence, not an identity:
/// a restarted task contributes more than one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    pub index: usize,
    pub name: String,
    pub exit_code: i32,
}

/// The full report of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Ordered by completion, not by index.
    pub results: Vec<TaskResult>,
    pub success: bool,
    pub first_exit_code: Option<i32>,
}
