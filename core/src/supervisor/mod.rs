//! C6: the concurrency core — admission, spawning, stream demux, exit bookkeeping,
//! restart, and kill-others.
//!
//! Realized as a single controller loop (this function) polling a `try_wait` tick every
//! 25ms, tightened from the 300ms cadence a background daemon can afford, since this
//! supervisor runs in the foreground for the life of one invocation.
//! Two reader threads per live child push stdout/stderr chunks back to the controller over
//! a channel; the controller is the sole writer to the parent's stdout/stderr, so a single
//! formatted line is always written atomically.
pub mod children;
pub mod finish;
pub mod kill;
pub mod spawn;

use std::collections::{HashMap, VecDeque};
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, RecvTimeoutError, Sender};

use crate::aggregate;
use crate::format::Formatter;
use crate::task::{RunOptions, RunReport, Task, TaskResult};
use children::Children;

const POLL_TICK: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// An event produced by a reader thread and consumed by the controller.
pub enum Event {
    Chunk { index: usize, stream: Stream, data: Vec<u8> },
    StreamClosed { index: usize, stream: Stream },
}

struct PendingRestart {
    ready_at: Instant,
    task: Task,
}

struct State {
    queue: VecDeque<Task>,
    pending_restarts: Vec<PendingRestart>,
    live: Children,
    /// Task metadata for currently-spawned children, looked up by index on exit/chunk.
    in_flight: HashMap<usize, Task>,
    results: Vec<TaskResult>,
    killed: bool,
    first_exit_code: Option<i32>,
    kill_deadline: Option<Instant>,
    max_processes: usize,
}

/// Run the supervisor to completion. Blocks the calling thread until the queue and the live
/// set are both empty, then returns the full [`RunReport`].
pub fn run(tasks: Vec<Task>, options: &RunOptions) -> RunReport {
    let formatter = Formatter::new(options.prefix.clone(), options.timestamp_format.clone());
    let max_processes = options.max_processes.unwrap_or_else(|| tasks.len().max(1)).max(1);
    let (tx, rx) = unbounded();

    let mut state = State {
        queue: tasks.into_iter().collect(),
        pending_restarts: Vec::new(),
        live: Children::default(),
        in_flight: HashMap::new(),
        results: Vec::new(),
        killed: false,
        first_exit_code: None,
        kill_deadline: None,
        max_processes,
    };

    admit(&mut state, &tx, options);

    loop {
        promote_ready_restarts(&mut state);

        match rx.recv_timeout(POLL_TICK) {
            Ok(event) => handle_event(&mut state, event, &formatter, options),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {}
        }

        for finished in finish::poll(&mut state.live) {
            handle_finish(&mut state, finished.index, finished.exit_code, options);
        }

        check_kill_grace(&mut state);
        admit(&mut state, &tx, options);

        if state.queue.is_empty() && state.pending_restarts.is_empty() && state.live.is_empty() {
            break;
        }
    }

    let success = aggregate::evaluate(&state.results, options.success_condition);
    RunReport { results: state.results, success, first_exit_code: state.first_exit_code }
}

/// Admit queued tasks until the live set reaches capacity or the queue is empty.
/// Short-circuits cleanly when `maxProcesses` exceeds the queue length (no deadlock).
fn admit(state: &mut State, tx: &Sender<Event>, options: &RunOptions) {
    if state.killed {
        return;
    }
    while state.live.len() < state.max_processes {
        let Some(task) = state.queue.pop_front() else { break };
        let index = task.index;
        match spawn::spawn(&task, tx.clone()) {
            Ok(live) => {
                state.live.insert(index, live);
                state.in_flight.insert(index, task);
            }
            Err(err) => {
                tracing::warn!(task = index, error = %err, "failed to spawn task");
                let name = task.display_name();
                record_exit(state, index, name, 1, Some(task), options);
            }
        }
    }
}

fn handle_finish(state: &mut State, index: usize, exit_code: i32, options: &RunOptions) {
    let task = state.in_flight.remove(&index);
    let name = task.as_ref().map(Task::display_name).unwrap_or_else(|| index.to_string());
    record_exit(state, index, name, exit_code, task, options);
}

/// Record one task's terminal result, then evaluate restart and kill-others — in that
/// order, matching §4.6: a restart re-queue can itself be wiped out if kill-others fires
/// right after.
fn record_exit(
    state: &mut State,
    index: usize,
    name: String,
    exit_code: i32,
    task: Option<Task>,
    options: &RunOptions,
) {
    state.results.push(TaskResult { index, name, exit_code });
    if state.first_exit_code.is_none() {
        state.first_exit_code = Some(exit_code);
    }

    if !state.killed {
        if let Some(mut task) = task {
            if exit_code != 0 && task.restart_budget > 0 {
                task.restart_budget -= 1;
                if task.restart_delay_ms == 0 {
                    state.queue.push_front(task);
                } else {
                    state.pending_restarts.push(PendingRestart {
                        ready_at: Instant::now() + Duration::from_millis(task.restart_delay_ms),
                        task,
                    });
                }
            }
        }

        if options.kill_others_on.matches(exit_code) {
            trigger_kill_others(state);
        }
    }
}

fn trigger_kill_others(state: &mut State) {
    if state.killed {
        return;
    }
    state.killed = true;
    kill::terminate_all(&mut state.live);
    state.kill_deadline = Some(Instant::now() + kill::GRACE_PERIOD);
    state.queue.clear();
    state.pending_restarts.clear();
}

fn check_kill_grace(state: &mut State) {
    if let Some(deadline) = state.kill_deadline {
        if Instant::now() >= deadline {
            kill::hard_kill_all(&mut state.live);
            state.kill_deadline = None;
        }
    }
}

/// Move any restart whose delay has elapsed to the front of the admission queue.
fn promote_ready_restarts(state: &mut State) {
    let now = Instant::now();
    let (ready, pending): (Vec<_>, Vec<_>) =
        state.pending_restarts.drain(..).partition(|p| p.ready_at <= now);
    state.pending_restarts = pending;
    for pending in ready {
        state.queue.push_front(pending.task);
    }
}

fn handle_event(state: &mut State, event: Event, formatter: &Formatter, options: &RunOptions) {
    match event {
        Event::Chunk { index, stream, data } => emit_chunk(state, index, stream, &data, formatter, options),
        Event::StreamClosed { index, stream } => emit_flush(state, index, stream, formatter, options),
    }
}

fn is_raw(state: &mut State, index: usize, options: &RunOptions) -> bool {
    options.raw || state.live.get_mut(index).map(|live| live.raw).unwrap_or(false)
}

fn emit_chunk(
    state: &mut State,
    index: usize,
    stream: Stream,
    data: &[u8],
    formatter: &Formatter,
    options: &RunOptions,
) {
    if is_raw(state, index, options) {
        write_raw(stream, data);
        return;
    }

    let lines = {
        let Some(live) = state.live.get_mut(index) else { return };
        let splitter = match stream {
            Stream::Stdout => &mut live.stdout_splitter,
            Stream::Stderr => &mut live.stderr_splitter,
        };
        splitter.push(data)
    };
    if lines.is_empty() {
        return;
    }

    let Some(task) = state.in_flight.get(&index) else { return };
    let pid = state.live.get_mut(index).and_then(|live| live.pid);
    let color = formatter.resolve_color(task, &options.prefix_colors);

    for line in lines {
        let formatted = formatter.format_line(task, pid, color, &line);
        write_line(stream, &formatted);
    }
}

fn emit_flush(state: &mut State, index: usize, stream: Stream, formatter: &Formatter, options: &RunOptions) {
    if is_raw(state, index, options) {
        return;
    }

    let remainder = {
        let Some(live) = state.live.get_mut(index) else { return };
        let splitter = match stream {
            Stream::Stdout => &mut live.stdout_splitter,
            Stream::Stderr => &mut live.stderr_splitter,
        };
        splitter.flush()
    };
    let Some(line) = remainder else { return };

    let Some(task) = state.in_flight.get(&index) else { return };
    let pid = state.live.get_mut(index).and_then(|live| live.pid);
    let color = formatter.resolve_color(task, &options.prefix_colors);
    let formatted = formatter.format_line(task, pid, color, &line);
    write_partial(stream, &formatted);
}

fn write_raw(stream: Stream, data: &[u8]) {
    let _ = match stream {
        Stream::Stdout => io::stdout().lock().write_all(data),
        Stream::Stderr => io::stderr().lock().write_all(data),
    };
}

fn write_line(stream: Stream, formatted: &str) {
    let _ = match stream {
        Stream::Stdout => writeln!(io::stdout().lock(), "{formatted}"),
        Stream::Stderr => writeln!(io::stderr().lock(), "{formatted}"),
    };
}

fn write_partial(stream: Stream, formatted: &str) {
    let _ = match stream {
        Stream::Stdout => write!(io::stdout().lock(), "{formatted}"),
        Stream::Stderr => write!(io::stderr().lock(), "{formatted}"),
    };
}
