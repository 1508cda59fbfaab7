use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use sky_raid_core::{Command, Difficulty, EntityKind, Event, PilotInput, Steering};
use sky_raid_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_runs() {
    let first = replay(0x0bad_cafe);
    let second = replay(0x0bad_cafe);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(!first.entities.is_empty());
}

#[test]
fn distinct_seeds_produce_distinct_rounds() {
    let first = replay(1);
    let second = replay(2);

    assert_ne!(first.fingerprint(), second.fingerprint());
}

fn replay(seed: u64) -> ReplayOutcome {
    let mut world = World::new();
    let mut log = Vec::new();

    for command in scripted_commands(seed) {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        log.extend(events.iter().map(EventRecord::from));
    }

    let entities = query::entity_view(&world)
        .into_vec()
        .into_iter()
        .map(|snapshot| EntityState {
            id: snapshot.id.get(),
            kind: snapshot.kind,
            x: snapshot.bounds.x.to_bits(),
            y: snapshot.bounds.y.to_bits(),
        })
        .collect();
    let outcome = query::round_outcome(&world);

    ReplayOutcome {
        entities,
        events: log,
        score: outcome.score,
        lost: outcome.lost,
    }
}

fn scripted_commands(seed: u64) -> Vec<Command> {
    let mut commands = vec![Command::StartRound {
        parameters: Difficulty::Hell.parameters(),
        seed,
    }];
    for index in 0..240u32 {
        let phase = (index / 30) % 4;
        commands.push(Command::Tick {
            input: PilotInput {
                steering: Steering {
                    left: phase == 0,
                    right: phase == 2,
                    up: phase == 1,
                    down: phase == 3,
                },
                fire: index % 3 != 0,
            },
        });
    }
    commands
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    entities: Vec<EntityState>,
    events: Vec<EventRecord>,
    score: u64,
    lost: bool,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct EntityState {
    id: u32,
    kind: EntityKind,
    x: u64,
    y: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    RoundStarted { seed: u64 },
    RoundCleared,
    VolleyFired { left: u32, right: u32 },
    EnemySpawned { enemy: u32, x: u64 },
    EnemyFired { enemy: u32, projectile: u32 },
    EnemyEscaped { enemy: u32 },
    EnemyDestroyed { enemy: u32, projectile: u32, score: u64 },
    PlayerHit { by: u32, kind: EntityKind },
    TimeAdvanced { tick: u64 },
    RoundLost { score: u64 },
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        match event {
            Event::RoundStarted { seed, .. } => Self::RoundStarted { seed: *seed },
            Event::RoundCleared => Self::RoundCleared,
            Event::VolleyFired { left, right } => Self::VolleyFired {
                left: left.get(),
                right: right.get(),
            },
            Event::EnemySpawned { enemy, x } => Self::EnemySpawned {
                enemy: enemy.get(),
                x: x.to_bits(),
            },
            Event::EnemyFired { enemy, projectile } => Self::EnemyFired {
                enemy: enemy.get(),
                projectile: projectile.get(),
            },
            Event::EnemyEscaped { enemy } => Self::EnemyEscaped { enemy: enemy.get() },
            Event::EnemyDestroyed {
                enemy,
                projectile,
                score,
            } => Self::EnemyDestroyed {
                enemy: enemy.get(),
                projectile: projectile.get(),
                score: *score,
            },
            Event::PlayerHit { by, kind } => Self::PlayerHit {
                by: by.get(),
                kind: *kind,
            },
            Event::TimeAdvanced { tick } => Self::TimeAdvanced { tick: *tick },
            Event::RoundLost { score } => Self::RoundLost { score: *score },
        }
    }
}
