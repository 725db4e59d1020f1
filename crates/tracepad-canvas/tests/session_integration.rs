//! Integration tests for drawing, committing and undoing through a session

use proptest::prelude::*;
use tracepad_canvas::{DrawMode, LayerId, PointerEvent, RestoreOutcome, Session, SessionOptions};
use tracepad_core::{Point, Rgba};

fn session(history_capacity: usize) -> Session {
    Session::new(SessionOptions {
        width: 240.0,
        height: 180.0,
        template_guide: false,
        history_capacity,
        ..Default::default()
    })
    .unwrap()
}

fn dab(session: &mut Session, x: f64, y: f64) {
    session.handle_pointer(PointerEvent::down(x, y));
    session.handle_pointer(PointerEvent::up(x, y));
}

fn painted(session: &Session, x: f64, y: f64) -> bool {
    session
        .layers()
        .strokes()
        .pixel_at(Point::new(x, y))
        .is_some_and(|c| c.a > 0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn history_stays_between_one_and_capacity(
        capacity in 1usize..8,
        ops in prop::collection::vec(any::<bool>(), 1..40),
    ) {
        let mut session = session(capacity);
        session.set_mode(DrawMode::FreeBrush);
        for (i, draw) in ops.into_iter().enumerate() {
            if draw {
                dab(&mut session, 20.0 + (i % 10) as f64 * 20.0, 90.0);
            } else {
                session.undo_now();
            }
            prop_assert!(session.history_len() >= 1);
            prop_assert!(session.history_len() <= capacity);
        }
    }
}

#[test]
fn test_stroke_then_undo_returns_to_blank() {
    let mut session = session(30);
    session.set_mode(DrawMode::FreeBrush);
    session.handle_pointer(PointerEvent::down(40.0, 40.0));
    session.handle_pointer(PointerEvent::moved(60.0, 40.0));
    session.handle_pointer(PointerEvent::moved(80.0, 45.0));
    session.handle_pointer(PointerEvent::up(80.0, 45.0));
    assert!(!session.layers().strokes().is_blank());
    assert_eq!(session.history_len(), 2);

    assert_eq!(session.undo_now(), RestoreOutcome::Applied);
    assert!(session.layers().strokes().is_blank());
    assert_eq!(session.history_len(), 1);
}

#[test]
fn test_extrapolation_commit_draws_from_first_to_last() {
    let mut session = session(30);
    assert_eq!(session.mode(), DrawMode::Extrapolation);
    for x in [40.0, 100.0, 160.0] {
        session.handle_pointer(PointerEvent::down(x, 90.0));
        session.handle_pointer(PointerEvent::up(x, 90.0));
    }
    assert_eq!(session.waypoints().len(), 3);
    assert!(session.layers().strokes().is_blank());

    assert!(session.commit_extrapolation());
    assert!(painted(&session, 40.0, 90.0));
    assert!(painted(&session, 160.0, 90.0));
    assert!(!painted(&session, 120.0, 20.0));
    assert!(session.waypoints().is_empty());
    assert!(session.layers().guides().is_blank());
    assert_eq!(session.history_len(), 2);
}

#[test]
fn test_commit_with_too_few_waypoints_changes_nothing() {
    let mut session = session(30);
    assert!(!session.commit_extrapolation());

    session.handle_pointer(PointerEvent::down(50.0, 50.0));
    session.handle_pointer(PointerEvent::up(50.0, 50.0));
    assert!(!session.commit_extrapolation());
    assert_eq!(session.waypoints().len(), 1);
    assert!(session.layers().strokes().is_blank());
    assert_eq!(session.history_len(), 1);
}

#[test]
fn test_brush_stroke_under_rotation_lands_at_logical_point() {
    let mut session = session(30);
    session.set_angle(90.0);
    session.set_mode(DrawMode::FreeBrush);
    // A quarter turn about (120, 90) shows logical (150, 90) at device (120, 120).
    dab(&mut session, 120.0, 120.0);
    assert!(painted(&session, 150.0, 90.0));
    assert!(!painted(&session, 120.0, 120.0));
}

#[test]
fn test_newer_undo_supersedes_pending_one() {
    let mut session = session(30);
    session.set_mode(DrawMode::FreeBrush);
    dab(&mut session, 30.0, 30.0);
    dab(&mut session, 90.0, 30.0);
    dab(&mut session, 150.0, 30.0);

    let first = session.undo().unwrap();
    let second = session.undo().unwrap();
    assert_eq!(
        session.complete_restore(first.generation(), first.decode()),
        RestoreOutcome::Superseded
    );
    assert_eq!(
        session.complete_restore(second.generation(), second.decode()),
        RestoreOutcome::Applied
    );
    assert!(painted(&session, 30.0, 30.0));
    assert!(!painted(&session, 90.0, 30.0));
    assert!(!painted(&session, 150.0, 30.0));
}

#[test]
fn test_drawing_settles_pending_restore_first() {
    let mut session = session(30);
    session.set_mode(DrawMode::FreeBrush);
    dab(&mut session, 30.0, 30.0);
    let ticket = session.undo().unwrap();

    dab(&mut session, 100.0, 100.0);
    assert!(!session.restore_pending());
    assert_eq!(
        session.complete_restore(ticket.generation(), ticket.decode()),
        RestoreOutcome::Superseded
    );
    assert!(!painted(&session, 30.0, 30.0));
    assert!(painted(&session, 100.0, 100.0));
    assert_eq!(session.history_len(), 2);
}

#[test]
fn test_bad_image_leaves_strokes_and_history() {
    let mut session = session(30);
    session.set_mode(DrawMode::FreeBrush);
    dab(&mut session, 30.0, 30.0);
    let before = session.export_strokes().unwrap();

    let err = session
        .load_image_bytes(LayerId::Strokes, b"\x89PNG but not really")
        .unwrap_err();
    assert!(err.is_decode_error());
    assert_eq!(session.export_strokes().unwrap(), before);
    assert_eq!(session.history_len(), 2);
}

#[test]
fn test_loaded_background_is_composited_under_ink() {
    let mut session = session(30);
    let mut image = tiny_skia::Pixmap::new(24, 18).unwrap();
    image.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));
    session.load_background(&image);

    session.set_mode(DrawMode::FreeBrush);
    dab(&mut session, 120.0, 90.0);

    let png = session.export_composite().unwrap();
    let composite = tiny_skia::Pixmap::decode_png(&png).unwrap();
    let corner = composite.pixel(5, 5).unwrap();
    assert_eq!((corner.red(), corner.green(), corner.blue()), (0, 0, 255));
    let center = composite.pixel(120, 90).unwrap();
    assert_eq!((center.red(), center.green(), center.blue()), (255, 0, 0));
}

#[test]
fn test_zero_opacity_hides_ink() {
    let mut session = session(30);
    session.set_mode(DrawMode::FreeBrush);
    dab(&mut session, 50.0, 50.0);
    session.set_opacity(0);
    let mut display = session.new_display_surface().unwrap();
    session.compose_into(&mut display);
    assert_eq!(display.pixel_at(Point::new(50.0, 50.0)), Some(Rgba::WHITE));
}
