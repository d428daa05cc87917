//! Per-frame orchestration of the world, the systems and the audio sink.

use std::{mem, time::Duration};

use snake_arcade_core::{Command, Event, Screen, SoundCue};
use snake_arcade_rendering::{
    AudioSink, FrameInput, FrameOutcome, Hud, ItemPresentation, Scene, SnakeSegment,
};
use snake_arcade_system_movement::Movement;
use snake_arcade_system_session::{Session, Transition};
use snake_arcade_world::{self as world, query, World};
use tracing::info;

/// Application state driven once per rendered frame.
#[derive(Debug)]
pub(crate) struct Simulation<A> {
    world: World,
    movement: Movement,
    session: Session,
    audio: A,
    carried_events: Vec<Event>,
    commands: Vec<Command>,
    transitions: Vec<Transition>,
    cues: Vec<SoundCue>,
}

impl<A: AudioSink> Simulation<A> {
    pub(crate) fn new(world: World, audio: A) -> Self {
        Self {
            world,
            movement: Movement::new(),
            session: Session::new(),
            audio,
            carried_events: Vec::new(),
            commands: Vec::new(),
            transitions: Vec::new(),
            cues: Vec::new(),
        }
    }

    /// Runs one frame: input first, then gameplay time, then the advance
    /// cadence. Gameplay time only flows while the playing screen is shown.
    pub(crate) fn advance_frame(&mut self, dt: Duration, input: &FrameInput) -> FrameOutcome {
        self.transitions.clear();
        self.session
            .handle(&[], &input.events, &mut self.commands, &mut self.transitions);
        if self.session.quit_requested() {
            info!("quit requested");
            return FrameOutcome::Exit;
        }
        if self.transitions.iter().any(Transition::is_resume) {
            self.movement.reset_interval();
        }

        let mut events = mem::take(&mut self.carried_events);
        let fresh = events.len();
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }
        if self.session.screen() == Screen::Playing {
            world::apply(&mut self.world, Command::Tick { dt }, &mut events);
        }

        let move_delay = query::move_delay(&self.world);
        self.movement.handle(&events, move_delay, &mut self.commands);
        let observed = events.len();
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }

        self.session
            .handle(&events[fresh..], &[], &mut self.commands, &mut self.transitions);
        self.commands.clear();

        self.cues.clear();
        for event in &events[fresh..] {
            SoundCue::for_event(event, &mut self.cues);
        }
        for cue in self.cues.drain(..) {
            self.audio.play(cue);
        }

        self.carried_events = events.split_off(observed);
        FrameOutcome::Continue
    }

    /// Copies everything the renderer needs into `scene`.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        let screen = self.session.screen();
        let snake = query::snake_view(&self.world);
        let previous = snake.previous_body();

        scene.screen = screen;
        scene.snake.clear();
        scene.snake.extend(snake.body().enumerate().map(|(index, current)| SnakeSegment {
            previous: previous.get(index).copied().unwrap_or(current),
            current,
        }));
        scene.heading = snake.direction();
        scene.items.clear();
        scene.items.extend(
            query::items(&self.world)
                .into_iter()
                .map(|item| ItemPresentation {
                    kind: item.kind,
                    cell: item.cell,
                }),
        );
        scene.rocks.clear();
        scene.rocks.extend_from_slice(query::rocks(&self.world));
        scene.alpha = match screen {
            Screen::Playing => self.movement.alpha(query::move_delay(&self.world)),
            Screen::Paused => 0.0,
            Screen::Menu | Screen::Instructions | Screen::GameOver => 1.0,
        };
        scene.wrap_active = query::wrap_active(&self.world);
        scene.hud = Hud {
            score: query::score(&self.world),
            power_up_remaining: query::power_up_remaining(&self.world),
        };
    }

    #[cfg(test)]
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub(crate) fn screen(&self) -> Screen {
        self.session.screen()
    }

    #[cfg(test)]
    pub(crate) fn audio(&self) -> &A {
        &self.audio
    }
}
