//! CLI cancellation utilities.
//!
//! Responsibilities:
//! - Install the Ctrl+C listener that ends the process with the SIGINT exit code.
//! - Put the terminal back the way it was before a prompt hid input or the cursor.
//! - Recognise a user-aborted prompt in an `anyhow::Error` chain.
//!
//! Does NOT handle:
//! - Cooperative cancellation of the blocking pipeline; an interrupt exits the
//!   process directly since no partial state is worth unwinding.
//!
//! Invariants:
//! - Cancellation is silent: no message and no stack trace, only exit code 130.
//! - The terminal mode is captured before any prompt runs and restored before exit.

use std::io::{IsTerminal, Write};

use gauth_config::{AuthError, PromptError};

/// Standard Unix exit code for SIGINT: 128 + 2.
pub const SIGINT_EXIT_CODE: u8 = 130;

/// Terminal attributes of stdin at capture time.
///
/// A password prompt turns echo off and a menu hides the cursor; exiting in
/// the middle of either would leave the shell in that state.
#[derive(Clone, Copy)]
pub struct TerminalSnapshot {
    #[cfg(unix)]
    saved: Option<libc::termios>,
}

impl TerminalSnapshot {
    /// Record the current mode. Holds nothing when stdin is not a terminal.
    pub fn capture() -> Self {
        #[cfg(unix)]
        {
            let mut termios = std::mem::MaybeUninit::<libc::termios>::uninit();
            // SAFETY: tcgetattr writes only into the buffer it is given and
            // signals failure through its return value.
            let saved = unsafe {
                (libc::tcgetattr(libc::STDIN_FILENO, termios.as_mut_ptr()) == 0)
                    .then(|| termios.assume_init())
            };
            Self { saved }
        }
        #[cfg(not(unix))]
        {
            Self {}
        }
    }

    pub fn is_captured(&self) -> bool {
        #[cfg(unix)]
        {
            self.saved.is_some()
        }
        #[cfg(not(unix))]
        {
            false
        }
    }

    /// Reapply the captured mode and show the cursor. Errors are ignored.
    pub fn restore(&self) {
        #[cfg(unix)]
        if let Some(termios) = &self.saved {
            // SAFETY: reapplies attributes read from the same descriptor.
            unsafe {
                libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, termios);
            }
        }

        let mut stderr = std::io::stderr();
        if stderr.is_terminal() {
            let _ = stderr.write_all(b"\x1b[?25h");
            let _ = stderr.flush();
        }
    }
}

/// Spawn a task that exits the process when Ctrl+C arrives.
///
/// Must be called from within a Tokio runtime, before the first prompt.
pub fn spawn_interrupt_listener() {
    let terminal = TerminalSnapshot::capture();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::debug!("interrupted by user");
        terminal.restore();
        std::process::exit(i32::from(SIGINT_EXIT_CODE));
    });
}

/// Returns true if this anyhow error represents a user abort.
pub fn is_cancelled_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(cause.downcast_ref::<PromptError>(), Some(PromptError::Aborted))
            || cause
                .downcast_ref::<AuthError>()
                .is_some_and(AuthError::is_aborted)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauth_config::RoleError;

    #[test]
    fn test_aborted_prompt_is_cancellation() {
        assert!(is_cancelled_error(&anyhow::Error::new(PromptError::Aborted)));
        assert!(is_cancelled_error(&anyhow::Error::new(AuthError::Prompt(
            PromptError::Aborted
        ))));
        assert!(is_cancelled_error(&anyhow::Error::new(AuthError::Role(
            RoleError::Prompt(PromptError::Aborted)
        ))));
    }

    #[test]
    fn test_terminal_snapshot_matches_stdin() {
        let snapshot = TerminalSnapshot::capture();
        assert_eq!(
            snapshot.is_captured(),
            cfg!(unix) && std::io::stdin().is_terminal()
        );
        snapshot.restore();
    }

    #[test]
    fn test_other_errors_are_not_cancellation() {
        let io = std::io::Error::other("broken pipe");
        assert!(!is_cancelled_error(&anyhow::Error::new(PromptError::Io(io))));
        assert!(!is_cancelled_error(&anyhow::anyhow!("boom")));
    }
}
