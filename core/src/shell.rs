//! C5: shell resolution — deciding whether and how a task's command runs through a shell.
use crate::command::ShellSpec;

/// Host OS family, as far as shell resolution cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Windows,
    Other,
}

impl Os {
    pub fn current() -> Self {
        if cfg!(windows) {
            Os::Windows
        } else {
            Os::Other
        }
    }
}

/// The resolved shell decision for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellDecision {
    /// Exec the parsed argv directly; no shell involved.
    None,
    /// Run through the named shell executable, passing the full command string as input.
    Shell { executable: String },
}

/// Resolve the shell decision for a task, per the table in §4.5.
pub fn resolve(shell: &ShellSpec, command: &str, os: Os) -> ShellDecision {
    match shell {
        ShellSpec::Named(name) if !name.is_empty() => {
            ShellDecision::Shell { executable: map_known_shell_name(name, os) }
        }
        ShellSpec::Named(_) => ShellDecision::None,
        ShellSpec::Bool(true) => ShellDecision::Shell { executable: default_shell(os) },
        ShellSpec::Bool(false) | ShellSpec::Unset => resolve_windows_heuristic(command, os),
    }
}

fn resolve_windows_heuristic(command: &str, os: Os) -> ShellDecision {
    if os != Os::Windows {
        return ShellDecision::None;
    }
    let lower = command.to_ascii_lowercase();
    if lower.ends_with(".ps1") {
        ShellDecision::Shell { executable: "powershell.exe".to_string() }
    } else if lower.ends_with(".bat") || lower.ends_with(".cmd") {
        ShellDecision::Shell { executable: default_shell(os) }
    } else {
        ShellDecision::None
    }
}

fn default_shell(os: Os) -> String {
    match os {
        Os::Windows => "cmd.exe".to_string(),
        Os::Other => "sh".to_string(),
    }
}

/// Map a known shell name to the OS-appropriate executable; unknown names pass through
/// verbatim as the shell executable to run.
fn map_known_shell_name(name: &str, os: Os) -> String {
    match name {
        "cmd" => match os {
            Os::Windows => "cmd.exe".to_string(),
            Os::Other => "cmd".to_string(),
        },
        "powershell" => match os {
            Os::Windows => "powershell.exe".to_string(),
            Os::Other => "powershell".to_string(),
        },
        "pwsh" => "pwsh".to_string(),
        "bash" => "bash".to_string(),
        "sh" => "sh".to_string(),
        other => other.to_string(),
    }
}
