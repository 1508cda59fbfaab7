//! Entity state and per-kind movement rules.

use sky_raid_core::{base, EntityId, EntityKind, Playfield, Rect, Scale, Steering};

/// Outcome of advancing an entity by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Liveness {
    /// The entity remains in play.
    Alive,
    /// The entity left the playfield and must be retired.
    Expired,
}

/// Per-tick inputs shared by every movement rule.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MotionContext {
    pub(crate) scale: Scale,
    pub(crate) playfield: Playfield,
    pub(crate) steering: Steering,
}

/// Anything that occupies space, moves and has a lifetime.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Entity {
    id: EntityId,
    kind: EntityKind,
    x: f64,
    y: f64,
    width: u32,
    height: u32,
    hit_box_inset: f64,
    alive: bool,
}

impl Entity {
    /// Creates an entity of the provided kind with scaled extents.
    pub(crate) fn spawn(id: EntityId, kind: EntityKind, x: f64, y: f64, scale: Scale) -> Self {
        let (base_width, base_height) = kind.base_extent();
        let hit_box_inset = match kind {
            EntityKind::Player => scale.length(base::PLAYER_HIT_BOX_INSET),
            _ => 0.0,
        };
        Self {
            id,
            kind,
            x,
            y,
            width: scale.extent(base_width),
            height: scale.extent(base_height),
            hit_box_inset,
            alive: true,
        }
    }

    pub(crate) fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn kind(&self) -> EntityKind {
        self.kind
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive
    }

    /// Marks the entity as destroyed so the owning phase can compact it away.
    pub(crate) fn destroy(&mut self) {
        self.alive = false;
    }

    /// Drawable bounds of the entity.
    pub(crate) fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, f64::from(self.width), f64::from(self.height))
    }

    /// Bounds used for gameplay collision.
    ///
    /// Only the player carries a non-zero inset.
    pub(crate) fn hit_box(&self) -> Rect {
        if self.hit_box_inset > 0.0 {
            self.bounds().inset(self.hit_box_inset)
        } else {
            self.bounds()
        }
    }

    /// Applies the kind's movement rule for one tick.
    pub(crate) fn advance(&mut self, motion: &MotionContext) -> Liveness {
        let liveness = match self.kind {
            EntityKind::Player => {
                self.steer(motion);
                Liveness::Alive
            }
            EntityKind::PlayerProjectile => {
                self.y += motion.scale.length(self.kind.base_vertical_velocity());
                if self.y + f64::from(self.height) > 0.0 {
                    Liveness::Alive
                } else {
                    Liveness::Expired
                }
            }
            EntityKind::Enemy | EntityKind::EnemyProjectile => {
                self.y += motion.scale.length(self.kind.base_vertical_velocity());
                if self.y < f64::from(motion.playfield.height()) {
                    Liveness::Alive
                } else {
                    Liveness::Expired
                }
            }
        };

        if liveness == Liveness::Expired {
            self.alive = false;
        }
        liveness
    }

    fn steer(&mut self, motion: &MotionContext) {
        let step = motion.scale.length(base::PLAYER_STEP);
        let max_x = f64::from(motion.playfield.width().saturating_sub(self.width));
        let max_y = f64::from(motion.playfield.height().saturating_sub(self.height));
        let steering = motion.steering;

        if steering.left {
            self.x = (self.x - step).max(0.0);
        }
        if steering.right {
            self.x = (self.x + step).min(max_x);
        }
        if steering.up {
            self.y = (self.y - step).max(0.0);
        }
        if steering.down {
            self.y = (self.y + step).min(max_y);
        }
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }
}

/// Monotonic identifier source scoped to a single round.
#[derive(Debug)]
pub(crate) struct EntityIds {
    next: u32,
}

impl EntityIds {
    pub(crate) fn new() -> Self {
        Self { next: 0 }
    }

    pub(crate) fn allocate(&mut self) -> EntityId {
        let id = EntityId::new(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
