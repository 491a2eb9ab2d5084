//! Spawning one admitted task and wiring its stdout/stderr reader threads.
use std::io::Read;
use std::process::{Command as StdCommand, Stdio};
use std::thread;

use command_group::CommandGroup;
use crossbeam_channel::Sender;

use crate::error::{Error, Result};
use crate::shell::ShellDecision;
use crate::task::Task;

use super::children::LiveChild;
use super::{Event, Stream};

const READ_BUFFER_SIZE: usize = 8192;

/// Spawn `task`'s process group and start its stdout/stderr reader threads, which forward
/// raw chunks to `tx` as they arrive.
pub fn spawn(task: &Task, tx: Sender<Event>) -> Result<LiveChild> {
    let mut command = build_command(task);
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let mut group_child = command
        .group_spawn()
        .map_err(|e| Error::Io(format!("spawning task {}", task.index), e))?;

    let pid = group_child.id();
    let stdout = group_child.inner().stdout.take();
    let stderr = group_child.inner().stderr.take();

    if let Some(stdout) = stdout {
        spawn_reader(task.index, Stream::Stdout, stdout, tx.clone());
    }
    if let Some(stderr) = stderr {
        spawn_reader(task.index, Stream::Stderr, stderr, tx);
    }

    Ok(LiveChild {
        child: group_child,
        pid: Some(pid),
        name: task.name.clone(),
        raw: task.raw,
        stdout_splitter: crate::format::LineSplitter::new(),
        stderr_splitter: crate::format::LineSplitter::new(),
    })
}

fn spawn_reader(index: usize, stream: Stream, mut source: impl Read + Send + 'static, tx: Sender<Event>) {
    thread::spawn(move || {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        loop {
            match source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(Event::Chunk { index, stream, data: buf[..n].to_vec() }).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
        let _ = tx.send(Event::StreamClosed { index, stream });
    });
}

fn build_command(task: &Task) -> StdCommand {
    let mut command = match &task.shell {
        ShellDecision::None => {
            let mut command = StdCommand::new(&task.argv.executable);
            command.args(&task.argv.args);
            command
        }
        ShellDecision::Shell { executable } => {
            let mut command = StdCommand::new(executable);
            command.arg(shell_flag(executable));
            command.arg(&task.original_command);
            command
        }
    };
    command.current_dir(&task.cwd);
    command.envs(&task.env);
    command
}

/// The flag used to pass a command string to a shell executable.
fn shell_flag(executable: &str) -> &'static str {
    let lower = executable.to_ascii_lowercase();
    if lower.contains("cmd") {
        "/C"
    } else if lower.contains("powershell") || lower.contains("pwsh") {
        "-Command"
    } else {
        "-c"
    }
}
