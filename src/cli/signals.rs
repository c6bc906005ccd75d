//! Stop signal for interactive recording
//!
//! A recording ends on the first of: a line on stdin (Enter) or Ctrl-C.
//! If stdin is closed (piped or detached), only Ctrl-C ends it.

use std::io::BufRead;

use tokio::sync::oneshot;
use tracing::debug;

/// Why the recording stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Enter was pressed
    Enter,
    /// Ctrl-C (SIGINT)
    Interrupt,
}

/// Read one line from stdin on a detached thread.
///
/// Resolves to `true` for a line and `false` on EOF or read error. The
/// thread is not joined; a blocking stdin read cannot be cancelled and must
/// not hold up runtime shutdown.
fn spawn_enter_listener() -> oneshot::Receiver<bool> {
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        let mut line = String::new();
        let got_line = matches!(std::io::stdin().lock().read_line(&mut line), Ok(n) if n > 0);
        let _ = tx.send(got_line);
    });
    rx
}

/// Wait until the user asks to stop recording
pub async fn wait_for_stop() -> Result<StopReason, std::io::Error> {
    let enter = spawn_enter_listener();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            Ok(StopReason::Interrupt)
        }
        line = enter => {
            if matches!(line, Ok(true)) {
                return Ok(StopReason::Enter);
            }
            debug!("stdin closed, waiting for Ctrl-C");
            tokio::signal::ctrl_c().await?;
            Ok(StopReason::Interrupt)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_reason_equality() {
        assert_eq!(StopReason::Enter, StopReason::Enter);
        assert_ne!(StopReason::Enter, StopReason::Interrupt);
    }
}
