use std::time::Duration;

use snake_arcade_core::{CellCoord, Command, Event, ItemKind, Ruleset};
use snake_arcade_system_movement::Movement;
use snake_arcade_world::{self as world, query, scaffolding, World};

fn quiet_world() -> World {
    let rules = Ruleset {
        star_chance: 0.0,
        ..Ruleset::deluxe()
    };
    World::new(rules, 17).expect("valid rules")
}

fn frame(world: &mut World, movement: &mut Movement, dt: Duration) -> Vec<Event> {
    let mut log = Vec::new();
    let mut pending = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut pending);

    while !pending.is_empty() {
        let mut commands = Vec::new();
        movement.handle(&pending, query::move_delay(world), &mut commands);
        log.append(&mut pending);
        for command in commands {
            world::apply(world, command, &mut pending);
        }
    }
    log
}

fn start(world: &mut World, movement: &mut Movement) {
    let mut events = Vec::new();
    world::apply(world, Command::NewGame, &mut events);
    scaffolding::clear_items(world);
    let mut commands = Vec::new();
    movement.handle(&events, query::move_delay(world), &mut commands);
    assert!(commands.is_empty());
}

#[test]
fn snake_advances_once_per_move_delay() {
    let mut world = quiet_world();
    let mut movement = Movement::new();
    start(&mut world, &mut movement);

    let mut advances = 0;
    for _ in 0..60 {
        let events = frame(&mut world, &mut movement, Duration::from_micros(16_667));
        advances += events
            .iter()
            .filter(|event| matches!(event, Event::SnakeAdvanced { .. }))
            .count();
    }

    // Every tenth 60 Hz frame crosses the 160 ms threshold.
    assert_eq!(advances, 6);
    assert_eq!(
        query::snake_view(&world).head(),
        Some(CellCoord::new(19, 10))
    );
}

#[test]
fn eating_shortens_the_next_interval() {
    let mut world = quiet_world();
    let mut movement = Movement::new();
    start(&mut world, &mut movement);
    scaffolding::place_item(&mut world, ItemKind::Apple, CellCoord::new(14, 10));

    let events = frame(&mut world, &mut movement, Duration::from_millis(160));
    assert!(events.contains(&Event::ItemConsumed {
        kind: ItemKind::Apple,
        cell: CellCoord::new(14, 10),
    }));

    let events = frame(&mut world, &mut movement, Duration::from_micros(158_250));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::SnakeAdvanced { .. })));
}

#[test]
fn movement_stops_after_death() {
    let mut world = quiet_world();
    let mut movement = Movement::new();
    start(&mut world, &mut movement);
    scaffolding::place_item(&mut world, ItemKind::Bomb, CellCoord::new(14, 10));

    let events = frame(&mut world, &mut movement, Duration::from_millis(200));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::SnakeDied { .. })));

    let events = frame(&mut world, &mut movement, Duration::from_secs(1));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::SnakeAdvanced { .. })));
    assert_eq!(movement.elapsed(), Duration::ZERO);
}
