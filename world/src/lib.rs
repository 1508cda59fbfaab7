#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative round state management for Sky Raid.
//!
//! The world owns every entity of the active round together with the score,
//! the loss flag and the round's pseudo-random source. It is mutated solely
//! through [`apply`] and observed through the [`query`] module.

mod entities;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sky_raid_core::{
    base, Command, DifficultyParameters, EntityKind, Event, PilotInput, Playfield, Scale,
    Steering, FIRE_COOLDOWN_TICKS, SCORE_PER_KILL,
};

use entities::{Entity, EntityIds, Liveness, MotionContext};

/// Represents the authoritative Sky Raid world state.
#[derive(Debug)]
pub struct World {
    scale: Scale,
    playfield: Playfield,
    round: Option<Round>,
}

impl World {
    /// Creates a world at unit scale with no active round.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scale: Scale::UNIT,
            playfield: Playfield::scaled(Scale::UNIT),
            round: None,
        }
    }

    fn clear_round(&mut self, out_events: &mut Vec<Event>) {
        if self.round.take().is_some() {
            debug!("round cleared");
            out_events.push(Event::RoundCleared);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Configure { scale } => {
            world.clear_round(out_events);
            world.scale = scale;
            world.playfield = Playfield::scaled(scale);
        }
        Command::StartRound { parameters, seed } => {
            world.round = Some(Round::new(parameters, seed, world.scale, world.playfield));
            debug!(
                "round started: spawn interval {} ticks, fire chance {}%, seed {seed:#x}",
                parameters.spawn_interval(),
                parameters.fire_chance()
            );
            out_events.push(Event::RoundStarted { parameters, seed });
        }
        Command::ClearRound => world.clear_round(out_events),
        Command::Tick { input } => {
            let scale = world.scale;
            let playfield = world.playfield;
            if let Some(round) = world.round.as_mut() {
                round.step(scale, playfield, input, out_events);
            }
        }
    }
}

#[derive(Debug)]
struct Round {
    parameters: DifficultyParameters,
    rng: ChaCha8Rng,
    ids: EntityIds,
    score: u64,
    lost: bool,
    tick: u64,
    fire_cooldown: u32,
    player: Entity,
    player_projectiles: Vec<Entity>,
    enemies: Vec<Entity>,
    enemy_projectiles: Vec<Entity>,
}

impl Round {
    fn new(parameters: DifficultyParameters, seed: u64, scale: Scale, playfield: Playfield) -> Self {
        let mut ids = EntityIds::new();
        let player = Entity::spawn(
            ids.allocate(),
            EntityKind::Player,
            f64::from(playfield.width()) / 2.0 - scale.length(base::PLAYER_SPAWN_CENTER_OFFSET),
            f64::from(playfield.height()) - scale.length(base::PLAYER_SPAWN_BOTTOM_OFFSET),
            scale,
        );
        Self {
            parameters,
            rng: ChaCha8Rng::seed_from_u64(seed),
            ids,
            score: 0,
            lost: false,
            tick: 0,
            fire_cooldown: 0,
            player,
            player_projectiles: Vec::new(),
            enemies: Vec::new(),
            enemy_projectiles: Vec::new(),
        }
    }

    fn step(
        &mut self,
        scale: Scale,
        playfield: Playfield,
        input: PilotInput,
        out_events: &mut Vec<Event>,
    ) {
        let steered = MotionContext {
            scale,
            playfield,
            steering: input.steering,
        };
        let _ = self.player.advance(&steered);

        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
        if input.fire && self.fire_cooldown == 0 {
            self.fire_volley(scale, out_events);
        }

        let motion = MotionContext {
            steering: Steering::IDLE,
            ..steered
        };

        self.spawn_enemy(scale, playfield, out_events);
        self.advance_player_projectiles(&motion);
        self.advance_enemy_projectiles(&motion, out_events);
        self.advance_enemies(&motion, out_events);

        self.tick = self.tick.saturating_add(1);
        out_events.push(Event::TimeAdvanced { tick: self.tick });

        if self.lost {
            out_events.push(Event::RoundLost { score: self.score });
        }
    }

    fn fire_volley(&mut self, scale: Scale, out_events: &mut Vec<Event>) {
        let bounds = self.player.bounds();
        let left = Entity::spawn(
            self.ids.allocate(),
            EntityKind::PlayerProjectile,
            bounds.x + scale.length(base::LEFT_CANNON_OFFSET),
            bounds.y,
            scale,
        );
        let right = Entity::spawn(
            self.ids.allocate(),
            EntityKind::PlayerProjectile,
            bounds.right() - scale.length(base::RIGHT_CANNON_INSET),
            bounds.y,
            scale,
        );
        out_events.push(Event::VolleyFired {
            left: left.id(),
            right: right.id(),
        });
        self.player_projectiles.push(left);
        self.player_projectiles.push(right);
        self.fire_cooldown = FIRE_COOLDOWN_TICKS;
    }

    fn spawn_enemy(&mut self, scale: Scale, playfield: Playfield, out_events: &mut Vec<Event>) {
        let interval = u64::from(self.parameters.spawn_interval().max(1));
        if self.tick % interval != 0 {
            return;
        }

        let (base_width, base_height) = EntityKind::Enemy.base_extent();
        let max_x = playfield.width().saturating_sub(scale.extent(base_width));
        let x = f64::from(self.rng.gen_range(0..=max_x));
        let enemy = Entity::spawn(
            self.ids.allocate(),
            EntityKind::Enemy,
            x,
            -f64::from(scale.extent(base_height)),
            scale,
        );
        out_events.push(Event::EnemySpawned {
            enemy: enemy.id(),
            x,
        });
        self.enemies.push(enemy);
    }

    fn advance_player_projectiles(&mut self, motion: &MotionContext) {
        for projectile in &mut self.player_projectiles {
            let _ = projectile.advance(motion);
        }
        self.player_projectiles.retain(Entity::is_alive);
    }

    fn advance_enemy_projectiles(&mut self, motion: &MotionContext, out_events: &mut Vec<Event>) {
        for projectile in &mut self.enemy_projectiles {
            let _ = projectile.advance(motion);
        }
        self.enemy_projectiles.retain(Entity::is_alive);

        let hit_box = self.player.hit_box();
        for projectile in &self.enemy_projectiles {
            if projectile.bounds().overlaps(&hit_box) {
                self.lost = true;
                out_events.push(Event::PlayerHit {
                    by: projectile.id(),
                    kind: projectile.kind(),
                });
            }
        }
    }

    fn advance_enemies(&mut self, motion: &MotionContext, out_events: &mut Vec<Event>) {
        let hit_box = self.player.hit_box();
        let fire_chance = u32::from(self.parameters.fire_chance());

        for enemy in &mut self.enemies {
            if enemy.advance(motion) == Liveness::Expired {
                out_events.push(Event::EnemyEscaped { enemy: enemy.id() });
                continue;
            }

            if self.rng.gen_range(0..100u32) < fire_chance {
                let bounds = enemy.bounds();
                let (projectile_width, _) = EntityKind::EnemyProjectile.base_extent();
                let projectile = Entity::spawn(
                    self.ids.allocate(),
                    EntityKind::EnemyProjectile,
                    bounds.center_x() - f64::from(motion.scale.extent(projectile_width)) / 2.0,
                    bounds.bottom(),
                    motion.scale,
                );
                out_events.push(Event::EnemyFired {
                    enemy: enemy.id(),
                    projectile: projectile.id(),
                });
                self.enemy_projectiles.push(projectile);
            }

            let bounds = enemy.hit_box();
            if bounds.overlaps(&hit_box) {
                self.lost = true;
                out_events.push(Event::PlayerHit {
                    by: enemy.id(),
                    kind: enemy.kind(),
                });
            }

            let struck = self
                .player_projectiles
                .iter_mut()
                .find(|projectile| projectile.is_alive() && projectile.hit_box().overlaps(&bounds));
            if let Some(projectile) = struck {
                projectile.destroy();
                enemy.destroy();
                self.score = self.score.saturating_add(SCORE_PER_KILL);
                debug!("enemy {} destroyed, score {}", enemy.id().get(), self.score);
                out_events.push(Event::EnemyDestroyed {
                    enemy: enemy.id(),
                    projectile: projectile.id(),
                    score: self.score,
                });
            }
        }

        self.enemies.retain(Entity::is_alive);
        self.player_projectiles.retain(Entity::is_alive);
    }

    fn entities(&self) -> impl Iterator<Item = &Entity> {
        std::iter::once(&self.player)
            .chain(self.player_projectiles.iter())
            .chain(self.enemies.iter())
            .chain(self.enemy_projectiles.iter())
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use sky_raid_core::{DifficultyParameters, EntityId, EntityKind, Playfield, Rect, Scale};

    /// Summary of the active round used by the session and the HUD.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct RoundOutcome {
        /// Whether a round is currently active.
        pub active: bool,
        /// Score accumulated during the round.
        pub score: u64,
        /// Whether the loss flag has been raised.
        pub lost: bool,
        /// Number of ticks simulated since the round started.
        pub tick: u64,
    }

    /// Captures the score, loss flag and clock of the active round.
    ///
    /// Returns the default outcome when no round is active.
    #[must_use]
    pub fn round_outcome(world: &World) -> RoundOutcome {
        world
            .round
            .as_ref()
            .map(|round| RoundOutcome {
                active: true,
                score: round.score,
                lost: round.lost,
                tick: round.tick,
            })
            .unwrap_or_default()
    }

    /// Scale applied to entities created from now on.
    #[must_use]
    pub fn scale(world: &World) -> Scale {
        world.scale
    }

    /// Dimensions of the playfield in playfield units.
    #[must_use]
    pub fn playfield(world: &World) -> Playfield {
        world.playfield
    }

    /// Parameters governing the active round, if any.
    #[must_use]
    pub fn difficulty(world: &World) -> Option<DifficultyParameters> {
        world.round.as_ref().map(|round| round.parameters)
    }

    /// Ticks remaining before the player may fire again.
    #[must_use]
    pub fn fire_cooldown(world: &World) -> u32 {
        world.round.as_ref().map_or(0, |round| round.fire_cooldown)
    }

    /// Snapshot of the player of the active round.
    #[must_use]
    pub fn player(world: &World) -> Option<EntitySnapshot> {
        world
            .round
            .as_ref()
            .map(|round| EntitySnapshot::capture(&round.player))
    }

    /// Number of live entities of the provided kind.
    #[must_use]
    pub fn entity_count(world: &World, kind: EntityKind) -> usize {
        let Some(round) = world.round.as_ref() else {
            return 0;
        };
        match kind {
            EntityKind::Player => 1,
            EntityKind::PlayerProjectile => round.player_projectiles.len(),
            EntityKind::Enemy => round.enemies.len(),
            EntityKind::EnemyProjectile => round.enemy_projectiles.len(),
        }
    }

    /// Captures every live entity in draw order.
    ///
    /// The player comes first, followed by player projectiles, enemies and
    /// enemy projectiles, each in insertion order.
    #[must_use]
    pub fn entity_view(world: &World) -> EntityView {
        let snapshots = world
            .round
            .as_ref()
            .map(|round| round.entities().map(EntitySnapshot::capture).collect())
            .unwrap_or_default();
        EntityView { snapshots }
    }

    /// Read-only snapshot describing all live entities of the round.
    #[derive(Clone, Debug, Default)]
    pub struct EntityView {
        snapshots: Vec<EntitySnapshot>,
    }

    impl EntityView {
        /// Iterator over the captured snapshots in draw order.
        pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<EntitySnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single entity used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EntitySnapshot {
        /// Identifier assigned when the entity was created.
        pub id: EntityId,
        /// Variant of the entity.
        pub kind: EntityKind,
        /// Drawable rectangle.
        pub bounds: Rect,
        /// Rectangle used for gameplay collision.
        pub hit_box: Rect,
    }

    impl EntitySnapshot {
        fn capture(entity: &super::Entity) -> Self {
            Self {
                id: entity.id(),
                kind: entity.kind(),
                bounds: entity.bounds(),
                hit_box: entity.hit_box(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_raid_core::{Difficulty, EntityId};

    const QUIET: DifficultyParameters = Difficulty::Easy.parameters();

    fn started_world(parameters: DifficultyParameters, seed: u64) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StartRound { parameters, seed },
            &mut events,
        );
        world
    }

    fn round_mut(world: &mut World) -> &mut Round {
        world.round.as_mut().expect("round active")
    }

    fn tick(world: &mut World, input: PilotInput) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::Tick { input }, &mut events);
        events
    }

    fn enemy_projectile_at(round: &mut Round, x: f64, y: f64) {
        let id = round.ids.allocate();
        round.enemy_projectiles.push(Entity::spawn(
            id,
            EntityKind::EnemyProjectile,
            x,
            y,
            Scale::UNIT,
        ));
    }

    fn silent_round(world: &mut World) {
        let round = round_mut(world);
        round.parameters = DifficultyParameters::new(1_000, 0);
        round.tick = 1;
    }

    #[test]
    fn tick_without_round_is_ignored() {
        let mut world = World::new();

        let events = tick(&mut world, PilotInput::IDLE);

        assert!(events.is_empty());
        assert!(!query::round_outcome(&world).active);
    }

    #[test]
    fn start_round_places_player_at_spawn_point() {
        let world = started_world(QUIET, 1);

        let player = query::player(&world).expect("player present");
        assert_eq!(player.bounds.x, 220.0);
        assert_eq!(player.bounds.y, 580.0);
        assert_eq!(query::entity_view(&world).iter().count(), 1);
        assert_eq!(query::round_outcome(&world).tick, 0);
    }

    #[test]
    fn volley_spawns_projectile_pair_and_arms_cooldown() {
        let mut world = started_world(QUIET, 1);
        silent_round(&mut world);
        let fire = PilotInput {
            fire: true,
            ..PilotInput::IDLE
        };

        let events = tick(&mut world, fire);

        assert!(events
            .iter()
            .any(|event| matches!(event, Event::VolleyFired { .. })));
        let projectiles: Vec<_> = query::entity_view(&world)
            .into_vec()
            .into_iter()
            .filter(|snapshot| snapshot.kind == EntityKind::PlayerProjectile)
            .collect();
        assert_eq!(projectiles.len(), 2);
        assert_eq!(projectiles[0].bounds.x, 226.0);
        assert_eq!(projectiles[1].bounds.x, 254.0);
        assert_eq!(projectiles[0].bounds.y, 568.0);
        assert_eq!(query::fire_cooldown(&world), FIRE_COOLDOWN_TICKS);
    }

    #[test]
    fn held_fire_respects_cooldown() {
        let mut world = started_world(QUIET, 1);
        silent_round(&mut world);
        let fire = PilotInput {
            fire: true,
            ..PilotInput::IDLE
        };

        let volleys: usize = (0..25)
            .map(|_| {
                tick(&mut world, fire)
                    .iter()
                    .filter(|event| matches!(event, Event::VolleyFired { .. }))
                    .count()
            })
            .sum();

        assert_eq!(volleys, 3);
    }

    #[test]
    fn projectile_touching_hit_box_edge_does_not_register_loss() {
        let mut world = started_world(QUIET, 1);
        silent_round(&mut world);
        enemy_projectile_at(round_mut(&mut world), 258.0, 588.0);

        let events = tick(&mut world, PilotInput::IDLE);

        assert!(!query::round_outcome(&world).lost);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::RoundLost { .. })));
    }

    #[test]
    fn projectile_inside_hit_box_registers_loss() {
        let mut world = started_world(QUIET, 1);
        silent_round(&mut world);
        enemy_projectile_at(round_mut(&mut world), 257.5, 588.0);

        let events = tick(&mut world, PilotInput::IDLE);

        assert!(query::round_outcome(&world).lost);
        assert!(events.contains(&Event::RoundLost { score: 0 }));
        assert_eq!(query::entity_count(&world, EntityKind::EnemyProjectile), 1);
    }

    #[test]
    fn overlapping_projectiles_consume_only_the_first() {
        let mut world = started_world(QUIET, 1);
        silent_round(&mut world);
        let round = round_mut(&mut world);
        let enemy_id = round.ids.allocate();
        round.enemies.push(Entity::spawn(
            enemy_id,
            EntityKind::Enemy,
            100.0,
            97.0,
            Scale::UNIT,
        ));
        let first = round.ids.allocate();
        let second = round.ids.allocate();
        round.player_projectiles.push(Entity::spawn(
            first,
            EntityKind::PlayerProjectile,
            110.0,
            142.0,
            Scale::UNIT,
        ));
        round.player_projectiles.push(Entity::spawn(
            second,
            EntityKind::PlayerProjectile,
            120.0,
            142.0,
            Scale::UNIT,
        ));

        let events = tick(&mut world, PilotInput::IDLE);

        assert!(events.contains(&Event::EnemyDestroyed {
            enemy: enemy_id,
            projectile: first,
            score: 10,
        }));
        assert_eq!(query::round_outcome(&world).score, 10);
        assert_eq!(query::entity_count(&world, EntityKind::Enemy), 0);
        let remaining: Vec<EntityId> = query::entity_view(&world)
            .iter()
            .filter(|snapshot| snapshot.kind == EntityKind::PlayerProjectile)
            .map(|snapshot| snapshot.id)
            .collect();
        assert_eq!(remaining, vec![second]);
    }

    #[test]
    fn collections_hold_only_live_entities_after_each_step() {
        let mut world = started_world(Difficulty::Hell.parameters(), 7);
        let input = PilotInput {
            steering: Steering {
                left: true,
                ..Steering::IDLE
            },
            fire: true,
        };

        for _ in 0..600 {
            let _ = tick(&mut world, input);
            let round = world.round.as_ref().expect("round active");
            assert!(round.player_projectiles.iter().all(Entity::is_alive));
            assert!(round.enemies.iter().all(Entity::is_alive));
            assert!(round.enemy_projectiles.iter().all(Entity::is_alive));
        }
    }

    #[test]
    fn configure_clears_active_round_and_rescales_playfield() {
        let mut world = started_world(QUIET, 1);
        let mut events = Vec::new();
        let scale = Scale::new(2.0).expect("valid scale");

        apply(&mut world, Command::Configure { scale }, &mut events);

        assert_eq!(events, vec![Event::RoundCleared]);
        assert!(query::player(&world).is_none());
        assert_eq!(query::playfield(&world), Playfield::new(960, 1280));

        apply(
            &mut world,
            Command::StartRound {
                parameters: QUIET,
                seed: 1,
            },
            &mut events,
        );
        let player = query::player(&world).expect("player present");
        assert_eq!(player.bounds.x, 440.0);
        assert_eq!(player.bounds.y, 1160.0);
        assert_eq!(player.bounds.width, 96.0);
    }

    #[test]
    fn clear_round_without_round_emits_nothing() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(&mut world, Command::ClearRound, &mut events);

        assert!(events.is_empty());
    }
}
