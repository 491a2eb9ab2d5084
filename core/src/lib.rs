//! Concurrently running a list of commands, interleaving their output, and aggregating
//! their exit statuses under a configurable success policy.
pub mod aggregate;
pub mod availability;
pub mod color;
pub mod command;
pub mod error;
pub mod format;
pub mod manifest;
pub mod shell;
pub mod shortcut;
pub mod supervisor;
pub mod task;
pub mod wildcard;

use std::io::Write;
use std::path::PathBuf;

use command::CommandInput;
use error::Result;
use task::{RunOptions, RunReport, Task};

/// Expand, filter, and run `commands` under `options`. Output is written directly to the
/// parent's stdout/stderr as it streams in; the returned [`RunReport`] is the final summary.
pub fn run(commands: Vec<CommandInput>, options: RunOptions) -> Result<RunReport> {
    let tasks = build_tasks(commands, &options)?;
    Ok(supervisor::run(tasks, &options))
}

/// C1-C5 end to end: shortcut-expand, wildcard-expand (assigning the dense post-expansion
/// index every task keeps for its whole lifetime), resolve argv/shell, then filter by
/// availability.
fn build_tasks(commands: Vec<CommandInput>, options: &RunOptions) -> Result<Vec<Task>> {
    let mut expanded: Vec<(wildcard::Expanded, CommandInput)> = Vec::new();
    for input in commands {
        let cwd = effective_cwd(&input, options);
        let shortcut_expanded = shortcut::expand(&input.command);
        let items = wildcard::expand(
            &shortcut_expanded,
            input.name.as_deref(),
            &cwd,
            options.wildcard_sort,
        );
        for item in items {
            expanded.push((item, input.clone()));
        }
    }

    let mut tasks = Vec::with_capacity(expanded.len());
    for (index, (item, input)) in expanded.into_iter().enumerate() {
        let argv = command::parse(&item.command)?;
        let cwd = effective_cwd(&input, options);
        let os = shell::Os::current();
        let shell = shell::resolve(&input.shell, &item.command, os);

        // `names` overrides apply by post-expansion index; a derived wildcard name is the
        // next fallback, then the command's own explicit name.
        let name = options
            .names
            .get(index)
            .cloned()
            .or_else(|| item.derived_name.clone())
            .or_else(|| input.name.clone());

        tasks.push(Task {
            index,
            original_command: item.command,
            argv,
            shell,
            env: input.env,
            cwd,
            name,
            color: input.prefix_color,
            raw: input.raw || options.raw,
            restart_budget: input.restart_tries,
            restart_delay_ms: input.restart_delay_ms,
        });
    }

    Ok(filter_available(tasks, options))
}

fn effective_cwd(input: &CommandInput, options: &RunOptions) -> PathBuf {
    input.cwd.clone().unwrap_or_else(|| options.cwd.clone())
}

/// Drop unavailable tasks when `ignoreMissing` is set, writing a `[skip]` diagnostic for
/// each; otherwise keep them so their failure surfaces through the child process (§4.4).
fn filter_available(tasks: Vec<Task>, options: &RunOptions) -> Vec<Task> {
    let mut kept = Vec::with_capacity(tasks.len());
    for task in tasks {
        let scripts = manifest::read_scripts(&task.cwd);
        let shell_chosen = !matches!(task.shell, shell::ShellDecision::None);
        match availability::check(&task.argv, &task.cwd, scripts.as_ref(), shell_chosen) {
            Ok(()) => kept.push(task),
            Err(reason) if options.ignore_missing => skip_diagnostic(&task, reason),
            Err(_) => kept.push(task),
        }
    }
    kept
}

fn skip_diagnostic(task: &Task, reason: availability::Unavailable) {
    let _ = writeln!(
        std::io::stderr(),
        "[skip] {} ({}): {}",
        task.display_name(),
        task.original_command,
        reason.reason()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn names_override_applies_to_post_expansion_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{"scripts": {"start-watch:app": "vite", "start-watch:customer": "vite --mode customer", "start-watch:admin": "vite --mode admin"}}"#,
        )
        .unwrap();

        let mut options = RunOptions { cwd: dir.path().to_path_buf(), ..Default::default() };
        options.names = vec!["N-app".into(), "N-customer".into(), "N-admin".into()];

        let commands = vec![CommandInput::bare("pnpm:start-watch:*")];
        let tasks = build_tasks(commands, &options).unwrap();

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].name.as_deref(), Some("N-app"));
        assert_eq!(tasks[1].name.as_deref(), Some("N-customer"));
        assert_eq!(tasks[2].name.as_deref(), Some("N-admin"));
    }

    #[test]
    fn ignore_missing_all_unavailable_yields_zero_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = RunOptions { cwd: dir.path().to_path_buf(), ..Default::default() };
        options.ignore_missing = true;

        let commands = vec![CommandInput::bare("definitely-not-a-real-binary-xyz")];
        let tasks = build_tasks(commands, &options).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn per_task_env_does_not_require_manual_parent_merge() {
        let dir = tempfile::tempdir().unwrap();
        let options = RunOptions { cwd: dir.path().to_path_buf(), ..Default::default() };
        let mut env = HashMap::new();
        env.insert("FOO".to_string(), "bar".to_string());
        let mut input = CommandInput::bare("echo hi");
        input.env = env;

        let tasks = build_tasks(vec![input], &options).unwrap();
        assert_eq!(tasks[0].env.get("FOO").map(String::as_str), Some("bar"));
    }
}
