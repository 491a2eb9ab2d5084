//! Polling live children for exit via `try_wait` and reaping the finished ones.
use super::children::Children;

/// One child that has exited since the last poll.
pub struct Finished {
    pub index: usize,
    pub exit_code: i32,
}

/// Poll every live child once; remove and report the ones that have exited.
pub fn poll(children: &mut Children) -> Vec<Finished> {
    let mut finished = Vec::new();
    for index in children.indices() {
        let Some(live) = children.get_mut(index) else {
            continue;
        };
        let outcome = match live.child.try_wait() {
            Ok(Some(status)) => Some(exit_code_from_status(status)),
            Ok(None) => None,
            // A wait() error on an already-managed child is treated as a failed result
            // rather than left to hang the supervisor forever.
            Err(_) => Some(1),
        };
        if let Some(exit_code) = outcome {
            children.remove(index);
            finished.push(Finished { index, exit_code });
        }
    }
    finished
}

fn exit_code_from_status(status: std::process::ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(code) = status.code() {
            code
        } else if let Some(signal) = status.signal() {
            128 + signal
        } else {
            1
        }
    }
    #[cfg(not(unix))]
    {
        status.code().unwrap_or(1)
    }
}
