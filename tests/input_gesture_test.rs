//! Pointer gestures driving a live session.

use fusegrid::core::{CellState, GameSession};
use fusegrid::engine::{apply_command, Command, CommandError};
use fusegrid::input::{Gesture, PressTracker};
use fusegrid::types::Direction;

fn to_command(gesture: Gesture) -> Command {
    match gesture {
        Gesture::Tap(id) => Command::Click(id),
        Gesture::Swipe(id, direction) => Command::Swipe(id, direction),
    }
}

fn settled() -> GameSession {
    let mut session = GameSession::new("2024-1-1", 30);
    while !session.is_settled() {
        session.tick();
    }
    session
}

#[test]
fn test_press_and_release_taps_cell() {
    let mut session = settled();
    let (x, y, cell) = session
        .matrix()
        .find(|c| c.state == CellState::Idle)
        .map(|(x, y, c)| (x, y, *c))
        .unwrap();

    let mut tracker = PressTracker::new();
    tracker.start(cell.id, 40.0, 40.0);
    let gesture = tracker.end(42.0, 39.0).unwrap();
    assert_eq!(gesture, Gesture::Tap(cell.id));

    assert_eq!(apply_command(&mut session, &to_command(gesture)), Ok(()));
    assert_eq!(session.move_log()[0].x as usize, x);
    assert_eq!(session.move_log()[0].y as usize, y);
    assert!(session.move_log()[0].is_tap());
}

#[test]
fn test_drag_swipes_cell() {
    let mut session = settled();
    let id = session.matrix().get(2, 3).unwrap().id;

    let mut tracker = PressTracker::new();
    tracker.start(id, 100.0, 100.0);
    assert_eq!(tracker.moved(101.0, 102.0), None);
    let gesture = tracker.moved(100.0, 130.0).unwrap();
    assert_eq!(gesture, Gesture::Swipe(id, Direction::Down));

    assert_eq!(apply_command(&mut session, &to_command(gesture)), Ok(()));
    assert_eq!(session.encoded_moves(), "232");
    assert_eq!(session.matrix().get(2, 4).unwrap().id, id);
}

#[test]
fn test_swipe_off_board_is_rejected() {
    let mut session = settled();
    let id = session.matrix().get(0, 0).unwrap().id;

    let mut tracker = PressTracker::new();
    tracker.start(id, 10.0, 10.0);
    let gesture = tracker.end(-30.0, 12.0).unwrap();
    assert_eq!(gesture, Gesture::Swipe(id, Direction::Left));

    assert_eq!(
        apply_command(&mut session, &to_command(gesture)),
        Err(CommandError::OffEdge)
    );
    assert_eq!(session.moves_left(), 30);
}
