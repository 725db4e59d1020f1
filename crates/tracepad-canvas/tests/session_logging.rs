//! Session events carry the session id on every log line

use std::io::Write;
use std::sync::{Arc, Mutex};

use tracepad_canvas::{DrawMode, PointerEvent, RestoreOutcome, Session, SessionOptions};
use tracing::Level;

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_commit_and_undo_are_logged_inside_session_span() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let id = tracing::subscriber::with_default(subscriber, || {
        let mut session = Session::new(SessionOptions {
            width: 100.0,
            height: 100.0,
            template_guide: false,
            ..Default::default()
        })
        .unwrap();
        session.set_mode(DrawMode::FreeBrush);
        session.handle_pointer(PointerEvent::down(40.0, 40.0));
        session.handle_pointer(PointerEvent::up(40.0, 40.0));
        assert_eq!(session.undo_now(), RestoreOutcome::Applied);
        session.id()
    });

    let output = log.contents();
    let session_prefix = format!("session{{id={id}}}");
    for message in ["Committed strokes", "Undo scheduled"] {
        let line = output
            .lines()
            .find(|line| line.contains(message))
            .unwrap_or_else(|| panic!("no {message:?} line in:\n{output}"));
        assert!(line.contains(&session_prefix), "{line}");
    }
}
