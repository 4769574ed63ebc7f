//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues a command for the backend worker. Returns false when the
/// command never left the UI side (queue full or worker gone), with an
/// explanation placed in the status line; callers that flipped state in
/// anticipation of a reply must roll it back on false.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = match &cmd {
        BackendCommand::ListPosts => "list_posts",
        BackendCommand::FetchPost { .. } => "fetch_post",
        BackendCommand::FetchThumbnail { .. } => "fetch_thumbnail",
        BackendCommand::SubmitContact { .. } => "submit_contact",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "Command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend worker disconnected (possible startup failure); restart the app"
                    .to_string();
            false
        }
    }
}
