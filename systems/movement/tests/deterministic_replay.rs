use std::time::Duration;

use snake_arcade_core::{Command, Direction, Event, Ruleset};
use snake_arcade_system_movement::Movement;
use snake_arcade_world::{self as world, query, World};

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    body: Vec<(u32, u32)>,
    score: u32,
}

#[test]
fn identical_seed_and_input_replay_identically() {
    let first = replay(0xdead_beef, scripted_steering());
    let second = replay(0xdead_beef, scripted_steering());

    assert_eq!(first, second, "replay diverged between runs");
    assert!(first
        .events
        .iter()
        .any(|event| matches!(event, Event::ItemSpawned { .. })));
}

fn scripted_steering() -> Vec<(usize, Direction)> {
    vec![
        (12, Direction::North),
        (40, Direction::West),
        (75, Direction::South),
        (110, Direction::East),
        (150, Direction::North),
        (190, Direction::West),
    ]
}

fn replay(seed: u64, steering: Vec<(usize, Direction)>) -> ReplayOutcome {
    let mut world = World::new(Ruleset::deluxe(), seed).expect("valid rules");
    let mut movement = Movement::new();
    let mut log = Vec::new();

    pump(&mut world, &mut movement, Command::NewGame, &mut log);
    for frame in 0..240 {
        for (at, direction) in &steering {
            if *at == frame {
                pump(
                    &mut world,
                    &mut movement,
                    Command::SteerSnake {
                        direction: *direction,
                    },
                    &mut log,
                );
            }
        }
        pump(
            &mut world,
            &mut movement,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut log,
        );
    }

    ReplayOutcome {
        events: log,
        body: query::snake_view(&world)
            .body()
            .map(|cell| (cell.column(), cell.row()))
            .collect(),
        score: query::score(&world),
    }
}

fn pump(world: &mut World, movement: &mut Movement, command: Command, log: &mut Vec<Event>) {
    let mut pending = Vec::new();
    world::apply(world, command, &mut pending);
    while !pending.is_empty() {
        let mut commands = Vec::new();
        movement.handle(&pending, query::move_delay(world), &mut commands);
        log.append(&mut pending);
        for command in commands {
            world::apply(world, command, &mut pending);
        }
    }
}
