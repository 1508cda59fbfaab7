//! Per-frame wiring between the session, the world and the rendered scene.

use glam::Vec2;
use sky_raid_core::{Command, Event, PilotInput, Scale, SessionState};
use sky_raid_rendering::{FrameDirective, FrameInput, Scene, SceneEntity, ScreenPresentation};
use sky_raid_system_session::{Config, Controls, Session};
use sky_raid_world::{self as world, query, World};

/// Owns the simulation state driven by the rendering loop.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    session: Session,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Simulation {
    /// Creates a simulation at the provided scale resting on the menu.
    pub(crate) fn new(scale: Scale, base_seed: u64) -> Self {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(&mut world, Command::Configure { scale }, &mut events);

        Self {
            world,
            session: Session::new(Config::new(base_seed)),
            commands: Vec::new(),
            events,
        }
    }

    /// Advances one frame and repopulates the scene from the resulting state.
    pub(crate) fn frame(&mut self, input: FrameInput, scene: &mut Scene) -> FrameDirective {
        let controls = Controls {
            pilot: PilotInput {
                steering: input.steering,
                fire: input.fire,
            },
            pause_toggle: input.pause_toggle,
            action: input.action,
        };

        self.commands.clear();
        self.session.handle(&controls, &mut self.commands);

        self.events.clear();
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
        self.session.observe(&self.events);

        self.populate_scene(scene);

        if self.session.exit_requested() {
            FrameDirective::Exit
        } else {
            FrameDirective::Continue
        }
    }

    fn populate_scene(&self, scene: &mut Scene) {
        let snapshot = self.session.snapshot();
        let screen = match snapshot.state {
            SessionState::Menu => ScreenPresentation::Menu,
            SessionState::Playing => ScreenPresentation::Playing,
            SessionState::Paused => ScreenPresentation::Paused,
            SessionState::Ended => ScreenPresentation::Ended {
                final_score: snapshot.final_score.unwrap_or_default(),
            },
        };
        scene.set_screen(screen);

        scene.entities.clear();
        scene
            .entities
            .extend(query::entity_view(&self.world).iter().map(|entity| {
                let bounds = entity.bounds;
                SceneEntity::new(
                    entity.kind,
                    Vec2::new(bounds.x as f32, bounds.y as f32),
                    Vec2::new(bounds.width as f32, bounds.height as f32),
                )
            }));

        scene.score = query::round_outcome(&self.world).score;
        scene.difficulty_label = match snapshot.state {
            SessionState::Menu => "",
            _ => snapshot.difficulty.label(),
        };

        if snapshot.state != SessionState::Ended {
            scene.background.advance(&scene.playfield);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_raid_core::{Difficulty, EntityKind, SessionAction};
    use sky_raid_rendering::PlayfieldPresentation;

    fn scene() -> Scene {
        Scene::new(PlayfieldPresentation::new(480.0, 640.0, Scale::UNIT).expect("valid playfield"))
    }

    fn action(action: SessionAction) -> FrameInput {
        FrameInput {
            action: Some(action),
            ..FrameInput::default()
        }
    }

    #[test]
    fn menu_scene_has_no_entities() {
        let mut simulation = Simulation::new(Scale::UNIT, 7);
        let mut scene = scene();

        let directive = simulation.frame(FrameInput::default(), &mut scene);

        assert_eq!(directive, FrameDirective::Continue);
        assert_eq!(scene.screen, ScreenPresentation::Menu);
        assert!(scene.entities.is_empty());
        assert_eq!(scene.difficulty_label, "");
    }

    #[test]
    fn selecting_a_tier_draws_the_player_first() {
        let mut simulation = Simulation::new(Scale::UNIT, 7);
        let mut scene = scene();

        let _ = simulation.frame(
            action(SessionAction::SelectDifficulty(Difficulty::Easy)),
            &mut scene,
        );
        let _ = simulation.frame(FrameInput::default(), &mut scene);

        assert_eq!(scene.screen, ScreenPresentation::Playing);
        assert_eq!(scene.difficulty_label, "Easy");
        let player = scene.entities.first().expect("player is drawn");
        assert_eq!(player.kind, EntityKind::Player);
        assert_eq!(player.position, Vec2::new(220.0, 580.0));
        assert_eq!(player.size, Vec2::splat(48.0));
        assert!(scene
            .entities
            .iter()
            .any(|entity| entity.kind == EntityKind::Enemy));
    }

    #[test]
    fn paused_scene_keeps_entities_frozen() {
        let mut simulation = Simulation::new(Scale::UNIT, 11);
        let mut scene = scene();
        let _ = simulation.frame(
            action(SessionAction::SelectDifficulty(Difficulty::Normal)),
            &mut scene,
        );
        let _ = simulation.frame(action(SessionAction::Pause), &mut scene);
        assert_eq!(scene.screen, ScreenPresentation::Paused);
        let frozen = scene.entities.clone();

        for _ in 0..5 {
            let _ = simulation.frame(FrameInput::default(), &mut scene);
        }

        assert_eq!(scene.entities, frozen);
    }

    #[test]
    fn background_scrolls_while_playing() {
        let mut simulation = Simulation::new(Scale::UNIT, 3);
        let mut scene = scene();

        let _ = simulation.frame(FrameInput::default(), &mut scene);
        let _ = simulation.frame(FrameInput::default(), &mut scene);

        assert_eq!(scene.background.image_offset, 4.0);
        assert_eq!(scene.background.grid_offset, 2.0);
    }

    #[test]
    fn returning_to_menu_clears_the_round() {
        let mut simulation = Simulation::new(Scale::UNIT, 5);
        let mut scene = scene();
        let _ = simulation.frame(
            action(SessionAction::SelectDifficulty(Difficulty::Hell)),
            &mut scene,
        );

        let _ = simulation.frame(action(SessionAction::ReturnToMenu), &mut scene);

        assert_eq!(scene.screen, ScreenPresentation::Menu);
        assert!(scene.entities.is_empty());
        assert_eq!(scene.score, 0);
    }
}
