use snake_arcade_core::{
    ButtonAction, Command, DeathCause, Direction, Event, InputEvent, Key, Screen,
};
use snake_arcade_system_session::{Session, Transition};

fn click(action: ButtonAction) -> InputEvent {
    InputEvent::Click {
        button: Some(action),
    }
}

fn press(key: Key) -> InputEvent {
    InputEvent::KeyPressed(key)
}

fn run(session: &mut Session, events: &[Event], input: &[InputEvent]) -> Vec<Command> {
    let mut commands = Vec::new();
    let mut transitions = Vec::new();
    session.handle(events, input, &mut commands, &mut transitions);
    commands
}

fn playing() -> Session {
    let mut session = Session::new();
    let _ = run(&mut session, &[], &[click(ButtonAction::NewGame)]);
    session
}

#[test]
fn new_game_button_starts_a_round() {
    let mut session = Session::new();
    let mut commands = Vec::new();
    let mut transitions = Vec::new();

    session.handle(
        &[],
        &[click(ButtonAction::NewGame)],
        &mut commands,
        &mut transitions,
    );

    assert_eq!(commands, vec![Command::NewGame]);
    assert_eq!(
        transitions,
        vec![Transition {
            from: Screen::Menu,
            to: Screen::Playing,
        }]
    );
    assert_eq!(session.screen(), Screen::Playing);
}

#[test]
fn arrow_keys_steer_only_while_playing() {
    let mut menu = Session::new();
    assert!(run(&mut menu, &[], &[press(Key::Up)]).is_empty());

    let mut session = playing();
    assert_eq!(
        run(&mut session, &[], &[press(Key::Up), press(Key::Left)]),
        vec![
            Command::SteerSnake {
                direction: Direction::North,
            },
            Command::SteerSnake {
                direction: Direction::West,
            },
        ]
    );
}

#[test]
fn escape_toggles_pause() {
    let mut session = playing();
    let _ = run(&mut session, &[], &[press(Key::Escape)]);
    assert_eq!(session.screen(), Screen::Paused);

    assert!(run(&mut session, &[], &[press(Key::Down)]).is_empty());

    let mut commands = Vec::new();
    let mut transitions = Vec::new();
    session.handle(&[], &[press(Key::Escape)], &mut commands, &mut transitions);
    assert_eq!(session.screen(), Screen::Playing);
    assert!(transitions.iter().any(Transition::is_resume));
    assert!(commands.is_empty());
}

#[test]
fn resume_button_returns_to_play_without_reset() {
    let mut session = playing();
    let _ = run(&mut session, &[], &[press(Key::Escape)]);

    assert!(run(&mut session, &[], &[click(ButtonAction::Resume)]).is_empty());
    assert_eq!(session.screen(), Screen::Playing);
}

#[test]
fn resume_button_is_ignored_on_menu() {
    let mut session = Session::new();
    let _ = run(&mut session, &[], &[click(ButtonAction::Resume)]);
    assert_eq!(session.screen(), Screen::Menu);
}

#[test]
fn instructions_return_to_the_screen_they_were_opened_from() {
    let mut session = Session::new();
    let _ = run(&mut session, &[], &[click(ButtonAction::Instructions)]);
    assert_eq!(session.screen(), Screen::Instructions);
    let _ = run(&mut session, &[], &[press(Key::Other)]);
    assert_eq!(session.screen(), Screen::Menu);

    let mut session = playing();
    let _ = run(&mut session, &[], &[press(Key::Escape)]);
    let _ = run(&mut session, &[], &[click(ButtonAction::Instructions)]);
    assert_eq!(session.instructions_origin(), Screen::Paused);
    let _ = run(&mut session, &[], &[InputEvent::Click { button: None }]);
    assert_eq!(session.screen(), Screen::Paused);
}

#[test]
fn death_leads_to_game_over_and_enter_restarts() {
    let mut session = playing();
    let died = [Event::SnakeDied {
        cause: DeathCause::Wall,
    }];
    assert!(run(&mut session, &died, &[press(Key::Up)]).is_empty());
    assert_eq!(session.screen(), Screen::GameOver);

    assert_eq!(
        run(&mut session, &[], &[press(Key::Enter)]),
        vec![Command::NewGame]
    );
    assert_eq!(session.screen(), Screen::Playing);
}

#[test]
fn escape_from_game_over_shows_menu() {
    let mut session = playing();
    let _ = run(
        &mut session,
        &[Event::SnakeDied {
            cause: DeathCause::Rock,
        }],
        &[press(Key::Escape)],
    );
    assert_eq!(session.screen(), Screen::Menu);
}

#[test]
fn death_outside_play_is_ignored() {
    let mut session = Session::new();
    let _ = run(
        &mut session,
        &[Event::SnakeDied {
            cause: DeathCause::Bomb,
        }],
        &[],
    );
    assert_eq!(session.screen(), Screen::Menu);
}

#[test]
fn quit_stops_processing_further_input() {
    let mut session = Session::new();
    let commands = run(
        &mut session,
        &[],
        &[click(ButtonAction::Quit), click(ButtonAction::NewGame)],
    );
    assert!(session.quit_requested());
    assert!(commands.is_empty());
    assert_eq!(session.screen(), Screen::Menu);

    let mut paused = playing();
    let _ = run(&mut paused, &[], &[press(Key::Escape), click(ButtonAction::Quit)]);
    assert!(paused.quit_requested());
}

#[test]
fn window_close_quits_from_any_screen() {
    let mut session = playing();
    let _ = run(&mut session, &[], &[InputEvent::QuitRequested]);
    assert!(session.quit_requested());
}
