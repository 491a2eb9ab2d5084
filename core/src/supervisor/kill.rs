//! Kill-others: sending the terminate signal to every live child, with a hard-kill
//! fallback after a fixed grace period.
use std::time::Duration;

use super::children::{Children, LiveChild};

/// Grace period between the terminate signal and the hard-kill fallback (§4.6).
pub const GRACE_PERIOD: Duration = Duration::from_secs(3);

/// Send the platform terminate signal to every live child. Idempotent at the call site:
/// the controller only calls this once per run, guarded by the `killed` flag.
pub fn terminate_all(children: &mut Children) {
    for index in children.indices() {
        if let Some(live) = children.get_mut(index) {
            let _ = terminate(live);
        }
    }
}

/// Hard-kill every still-live child. Must not wait on the processes it targets.
pub fn hard_kill_all(children: &mut Children) {
    for index in children.indices() {
        if let Some(live) = children.get_mut(index) {
            let _ = live.child.kill();
        }
    }
}

#[cfg(unix)]
fn terminate(live: &mut LiveChild) -> std::io::Result<()> {
    use command_group::{Signal, UnixChildExt};
    live.child.signal(Signal::SIGTERM)
}

#[cfg(not(unix))]
fn terminate(live: &mut LiveChild) -> std::io::Result<()> {
    live.child.kill()
}
