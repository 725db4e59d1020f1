//! Asynchronous entry points over a shared [`Session`].
//!
//! Snapshot and image decoding run on the blocking pool with the session
//! unlocked, so pointer input and rendering keep going while they run.

use tokio::task::JoinHandle;
use tracepad_core::{AssetError, Result, ThreadSafe};

use crate::assets::decode_image;
use crate::layers::LayerId;
use crate::restore::RestoreOutcome;
use crate::session::Session;

fn join_failure(e: tokio::task::JoinError) -> AssetError {
    AssetError::Decode {
        reason: format!("decode task failed: {e}"),
    }
}

/// Undoes the last committed change.
///
/// The previous snapshot is decoded off-lock. If another undo or a strokes
/// mutation happens meanwhile, this restore is discarded and
/// [`RestoreOutcome::Superseded`] is returned.
pub async fn undo(session: &ThreadSafe<Session>) -> RestoreOutcome {
    let Some(ticket) = session.lock().undo() else {
        return RestoreOutcome::NothingToUndo;
    };
    let generation = ticket.generation();
    let decoded = tokio::task::spawn_blocking(move || ticket.decode())
        .await
        .unwrap_or_else(|e| Err(join_failure(e)));
    let outcome = session.lock().complete_restore(generation, decoded);
    tracing::debug!(generation, ?outcome, "Undo finished");
    outcome
}

/// Runs [`undo`] as a background task.
pub fn spawn_undo(session: ThreadSafe<Session>) -> JoinHandle<RestoreOutcome> {
    tokio::spawn(async move { undo(&session).await })
}

/// Decodes `bytes` off-lock and loads the result into `target`.
///
/// A decode failure is returned and leaves the layer untouched.
pub async fn load_image(session: &ThreadSafe<Session>, target: LayerId, bytes: Vec<u8>) -> Result<()> {
    let image = tokio::task::spawn_blocking(move || decode_image(&bytes))
        .await
        .unwrap_or_else(|e| Err(join_failure(e)))
        .inspect_err(|e| tracing::warn!(layer = %target, "Image load failed: {}", e))?;
    session.lock().load_image(target, &image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DrawMode;
    use crate::input::PointerEvent;
    use crate::session::SessionOptions;
    use tracepad_core::thread_safe;

    fn shared_session() -> ThreadSafe<Session> {
        thread_safe(
            Session::new(SessionOptions {
                width: 120.0,
                height: 90.0,
                template_guide: false,
                ..Default::default()
            })
            .unwrap(),
        )
    }

    fn dab(session: &ThreadSafe<Session>, x: f64, y: f64) {
        let mut guard = session.lock();
        guard.handle_pointer(PointerEvent::down(x, y));
        guard.handle_pointer(PointerEvent::up(x, y));
    }

    #[tokio::test]
    async fn test_undo_restores_previous_state() {
        let session = shared_session();
        session.lock().set_mode(DrawMode::FreeBrush);
        dab(&session, 30.0, 30.0);
        assert!(!session.lock().layers().strokes().is_blank());

        assert_eq!(undo(&session).await, RestoreOutcome::Applied);
        assert!(session.lock().layers().strokes().is_blank());
        assert_eq!(undo(&session).await, RestoreOutcome::NothingToUndo);
    }

    #[tokio::test]
    async fn test_garbage_image_leaves_layer() {
        let session = shared_session();
        let result = load_image(&session, LayerId::Background, b"nope".to_vec()).await;
        assert!(result.unwrap_err().is_decode_error());
        assert!(!session.lock().layers().has_background());
    }
}
