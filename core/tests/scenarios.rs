//! The "Concrete scenarios" integration tests, run against the public `paracmd_core::run`
//! entry point, one test per scenario.
use std::time::Instant;

use paracmd_core::command::CommandInput;
use paracmd_core::task::{KillOthersOn, RunOptions};

fn options_in(dir: &std::path::Path) -> RunOptions {
    RunOptions { cwd: dir.to_path_buf(), ..Default::default() }
}

#[test]
fn scenario_1_parallel_success() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = options_in(dir.path());
    options.success_condition = "all".parse().unwrap();

    let commands = vec![CommandInput::bare("true"), CommandInput::bare("true")];
    let report = paracmd_core::run(commands, options).unwrap();

    assert_eq!(report.results.len(), 2);
    assert!(report.results.iter().all(|r| r.exit_code == 0));
    assert!(report.success);
}

#[test]
fn scenario_2_kill_others_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = options_in(dir.path());
    options.kill_others_on = KillOthersOn { success: false, failure: true };

    let commands = vec![CommandInput::bare("false"), CommandInput::bare("sleep 10")];

    let start = Instant::now();
    let report = paracmd_core::run(commands, options).unwrap();
    let elapsed = start.elapsed();

    assert!(!report.success);
    assert_eq!(report.results.len(), 2);
    assert!(elapsed.as_secs() < 8, "kill-others should short-circuit the 10s sleeper");
}

#[test]
fn scenario_3_first_success_short_circuit() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = options_in(dir.path());
    options.kill_others_on = KillOthersOn { success: true, failure: false };
    options.success_condition = "first".parse().unwrap();

    let commands = vec![CommandInput::bare("true"), CommandInput::bare("sleep 10")];

    let start = Instant::now();
    let report = paracmd_core::run(commands, options).unwrap();
    let elapsed = start.elapsed();

    assert!(report.success);
    assert_eq!(report.results[0].exit_code, 0);
    assert!(elapsed.as_secs() < 8, "first-success should short-circuit the 10s sleeper");
}

fn write_watch_manifest(dir: &std::path::Path) {
    std::fs::write(
        dir.join("package.json"),
        r#"{"scripts": {
            "start-watch:app": "vite",
            "start-watch:customer": "vite --mode customer",
            "start-watch:admin": "vite --mode admin"
        }}"#,
    )
    .unwrap();
}

#[test]
fn scenario_4_wildcard_alphabetical_vs_insertion_order() {
    let dir = tempfile::tempdir().unwrap();
    write_watch_manifest(dir.path());

    let mut alpha_options = options_in(dir.path());
    alpha_options.wildcard_sort = "alpha".parse().unwrap();
    let report = paracmd_core::run(vec![CommandInput::bare("pnpm:start-watch:*")], alpha_options).unwrap();
    let names: Vec<_> = report.results.iter().map(|r| r.name.clone()).collect();
    assert_eq!(names, vec!["start-watch:admin", "start-watch:app", "start-watch:customer"]);

    let mut package_options = options_in(dir.path());
    package_options.wildcard_sort = "package".parse().unwrap();
    let report = paracmd_core::run(vec![CommandInput::bare("pnpm:start-watch:*")], package_options).unwrap();
    let names: Vec<_> = report.results.iter().map(|r| r.name.clone()).collect();
    assert_eq!(names, vec!["start-watch:app", "start-watch:customer", "start-watch:admin"]);
}

#[test]
fn scenario_5_names_override_by_post_expansion_position() {
    let dir = tempfile::tempdir().unwrap();
    write_watch_manifest(dir.path());

    let mut options = options_in(dir.path());
    options.wildcard_sort = "alpha".parse().unwrap();
    options.names = vec!["N-app".into(), "N-customer".into(), "N-admin".into()];

    let report = paracmd_core::run(vec![CommandInput::bare("pnpm:start-watch:*")], options).unwrap();
    let names: Vec<_> = report.results.iter().map(|r| r.name.clone()).collect();
    // Spawn position 0 is script `admin` (alphabetical), which takes names[0] = "N-app".
    assert_eq!(names, vec!["N-app", "N-customer", "N-admin"]);
}

#[test]
fn scenario_6_restart_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let options = options_in(dir.path());

    let mut input = CommandInput::bare("false");
    input.restart_tries = 1;
    input.restart_delay_ms = 10;

    let report = paracmd_core::run(vec![input], options).unwrap();

    assert!(report.results.len() >= 2);
    assert!(report.results.iter().all(|r| r.exit_code != 0));
    assert!(!report.success);
}

#[test]
fn max_processes_exceeding_queue_length_spawns_everything_without_deadlock() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = options_in(dir.path());
    options.max_processes = Some(10);

    let commands = vec![CommandInput::bare("true"), CommandInput::bare("true"), CommandInput::bare("true")];
    let report = paracmd_core::run(commands, options).unwrap();

    assert_eq!(report.results.len(), 3);
    assert!(report.success);
}

#[test]
fn max_processes_one_serializes_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = options_in(dir.path());
    options.max_processes = Some(1);

    let commands = vec![CommandInput::bare("sleep 1"), CommandInput::bare("sleep 1")];

    let start = Instant::now();
    let report = paracmd_core::run(commands, options).unwrap();
    let elapsed = start.elapsed();

    assert_eq!(report.results.len(), 2);
    assert!(report.success);
    assert!(
        elapsed.as_millis() >= 1900,
        "max_processes=1 should serialize the two 1s sleepers, elapsed={elapsed:?}"
    );
}
