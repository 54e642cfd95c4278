//! Mutable state of the hero, enemies and bullets.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use brutal_maze_core::{
    BulletId, BulletSnapshot, BulletSource, CellCoord, EnemyId, EnemyKind, EnemySnapshot,
    HeroSnapshot, PixelPoint, Tuning, Viewport,
};

/// Number of sides of the hero's body; one slash turns it by a full side.
const HERO_SIDES: f32 = 3.0;

#[derive(Clone, Debug)]
pub(crate) struct Hero {
    angle: f32,
    wound: f32,
    spin_speed: f32,
    spin_queue: f32,
    next_strike: f32,
    slashing: bool,
    firing: bool,
    dead: bool,
}

impl Hero {
    pub(crate) fn new(frame_rate: f32, tuning: &Tuning) -> Self {
        Self {
            angle: -PI * 3.0 / 4.0,
            wound: 0.0,
            spin_speed: frame_rate / tuning.hero_hp,
            spin_queue: 0.0,
            next_strike: 0.0,
            slashing: false,
            firing: false,
            dead: false,
        }
    }

    pub(crate) fn control(&mut self, angle: f32, firing: bool, slashing: bool) {
        self.firing = firing;
        self.slashing = slashing;
        if !self.is_spinning() && angle.is_finite() {
            self.angle = angle;
        }
    }

    /// Advances healing, cooldown and slash animation by one frame.
    ///
    /// `clockwise` picks the direction of a slash started this frame.
    pub(crate) fn update(&mut self, frame_rate: f32, tuning: &Tuning, clockwise: bool) {
        if self.dead {
            self.spin_queue = 0.0;
            return;
        }
        let old_speed = self.spin_speed;
        self.spin_speed = frame_rate / (tuning.hero_hp - self.wound.sqrt()).max(f32::EPSILON);
        self.spin_queue *= self.spin_speed / old_speed;
        self.wound = (self.wound - tuning.heal_speed / self.spin_speed / tuning.hero_hp).max(0.0);
        self.next_strike -= 1000.0 / frame_rate;

        let full_spin = TAU / HERO_SIDES;
        if self.slashing && self.next_strike <= 0.0 {
            self.next_strike = tuning.attack_speed_ms;
            self.spin_queue = if clockwise { self.spin_speed } else { -self.spin_speed };
            self.angle -= self.spin_queue.signum() * full_spin;
        }
        if self.spin_queue.round() != 0.0 {
            let direction = self.spin_queue.signum();
            self.angle += direction * full_spin / self.spin_speed;
            self.spin_queue -= direction;
        } else {
            self.spin_queue = 0.0;
        }
    }

    /// Consumes the strike cooldown for a shot, if the hero may fire this frame.
    pub(crate) fn try_fire(&mut self, tuning: &Tuning) -> Option<f32> {
        if self.dead || !self.firing || self.slashing || self.next_strike > 0.0 {
            return None;
        }
        self.next_strike = tuning.attack_speed_ms;
        Some(self.angle)
    }

    pub(crate) fn wound(&mut self, amount: f32) {
        if amount > 0.0 {
            self.wound += amount;
        }
    }

    /// Marks the hero dead once the wound exceeds what it survives.
    pub(crate) fn check_death(&mut self, tuning: &Tuning) -> bool {
        if !self.dead && self.wound + 1.0 > tuning.hero_hp {
            self.dead = true;
            self.spin_queue = 0.0;
            return true;
        }
        false
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.dead
    }

    fn is_spinning(&self) -> bool {
        self.spin_queue.round() != 0.0
    }

    pub(crate) fn snapshot(&self, tuning: &Tuning) -> HeroSnapshot {
        HeroSnapshot {
            wound: self.wound,
            max_wound: tuning.hero_hp,
            angle: self.angle,
            spin_speed: self.spin_speed,
            spin_queue: self.spin_queue,
            slashing: self.slashing,
            firing: self.firing,
            dead: self.dead,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) cell: CellCoord,
    pub(crate) kind: EnemyKind,
    pub(crate) awake: bool,
    pub(crate) wound: f32,
    angle: f32,
    spin_speed: f32,
    spin_queue: f32,
    next_strike: f32,
    offset_x: i32,
    offset_y: i32,
    settling: bool,
}

impl Enemy {
    pub(crate) fn new(
        id: EnemyId,
        cell: CellCoord,
        kind: EnemyKind,
        frame_rate: f32,
        tuning: &Tuning,
    ) -> Self {
        Self {
            id,
            cell,
            kind,
            awake: false,
            wound: 0.0,
            angle: FRAC_PI_4,
            spin_speed: frame_rate / tuning.enemy_hp,
            spin_queue: 0.0,
            next_strike: 0.0,
            offset_x: 0,
            offset_y: 0,
            settling: false,
        }
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.awake && self.offset_x == 0 && self.offset_y == 0 && self.spin_queue == 0.0
    }

    /// Pixel position including the remaining slide toward the current cell.
    pub(crate) fn position(
        &self,
        viewport: &Viewport,
        frame_rate: f32,
        tuning: &Tuning,
    ) -> PixelPoint {
        let center = viewport.cell_center(self.cell);
        let step = viewport.distance() * tuning.enemy_speed / frame_rate;
        PixelPoint::new(
            center.x + self.offset_x as f32 * step,
            center.y + self.offset_y as f32 * step,
        )
    }

    /// Moves the enemy into a neighbouring cell, leaving it visually at the old one.
    pub(crate) fn step(&mut self, to: CellCoord, frame_rate: f32, tuning: &Tuning) {
        let move_speed = frame_rate / tuning.enemy_speed;
        let dx = (to.column() - self.cell.column()) as f32;
        let dy = (to.row() - self.cell.row()) as f32;
        self.offset_x = (dx * (1.0 - move_speed)).round() as i32;
        self.offset_y = (dy * (1.0 - move_speed)).round() as i32;
        self.settling = true;
        self.cell = to;
    }

    pub(crate) fn spin(&mut self, clockwise: bool) {
        self.spin_queue = if clockwise { self.spin_speed } else { -self.spin_speed };
    }

    pub(crate) fn can_strike(&self) -> bool {
        self.next_strike <= 0.0
    }

    pub(crate) fn strike(&mut self, tuning: &Tuning) {
        self.next_strike = tuning.attack_speed_ms;
    }

    /// Advances cooldown, sliding and spinning by one frame.
    pub(crate) fn update(&mut self, frame_rate: f32, tuning: &Tuning) {
        if !self.awake {
            return;
        }
        let old_speed = self.spin_speed;
        self.spin_speed = frame_rate / tuning.enemy_hp;
        self.spin_queue *= self.spin_speed / old_speed;
        self.next_strike -= 1000.0 / frame_rate;

        if self.settling {
            self.settling = false;
        } else if self.offset_x != 0 {
            self.offset_x -= self.offset_x.signum();
        } else if self.offset_y != 0 {
            self.offset_y -= self.offset_y.signum();
        }

        if self.spin_queue.round() != 0.0 {
            let direction = self.spin_queue.signum();
            self.angle += direction * FRAC_PI_2 / self.spin_speed;
            self.spin_queue -= direction;
        } else {
            self.angle = FRAC_PI_4;
            self.spin_queue = 0.0;
        }
    }

    pub(crate) fn snapshot(
        &self,
        viewport: &Viewport,
        frame_rate: f32,
        tuning: &Tuning,
    ) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            cell: self.cell,
            kind: self.kind,
            position: self.position(viewport, frame_rate, tuning),
            awake: self.awake,
            wound: self.wound,
            max_wound: tuning.enemy_hp,
            angle: self.angle,
            spin_speed: self.spin_speed,
            spin_queue: self.spin_queue,
            moving: self.offset_x != 0 || self.offset_y != 0,
            ready_to_strike: self.can_strike(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Bullet {
    pub(crate) id: BulletId,
    position: PixelPoint,
    angle: f32,
    source: BulletSource,
    remaining_ms: f32,
    pub(crate) spent: bool,
}

impl Bullet {
    pub(crate) fn new(
        id: BulletId,
        position: PixelPoint,
        angle: f32,
        source: BulletSource,
        tuning: &Tuning,
    ) -> Self {
        Self {
            id,
            position,
            angle,
            source,
            remaining_ms: tuning.bullet_lifetime_ms,
            spent: false,
        }
    }

    /// Flies one frame forward and ages the bullet.
    pub(crate) fn update(&mut self, frame_rate: f32, distance: f32, tuning: &Tuning) {
        let speed = distance * tuning.bullet_speed / frame_rate;
        self.position.x += speed * self.angle.cos();
        self.position.y += speed * self.angle.sin();
        self.remaining_ms -= 1000.0 / frame_rate;
    }

    /// Shifts the bullet along with the scrolling maze.
    pub(crate) fn place(&mut self, dx: f32, dy: f32) {
        self.position.x += dx;
        self.position.y += dy;
    }

    pub(crate) const fn position(&self) -> PixelPoint {
        self.position
    }

    pub(crate) fn is_expired(&self) -> bool {
        self.remaining_ms <= 0.0
    }

    pub(crate) fn snapshot(&self, tuning: &Tuning) -> BulletSnapshot {
        BulletSnapshot {
            id: self.id,
            position: self.position,
            angle: self.angle,
            source: self.source,
            remaining: self.remaining_ms / tuning.bullet_lifetime_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hero_heals_over_time() {
        let tuning = Tuning::default();
        let mut hero = Hero::new(30.0, &tuning);
        hero.wound(1.0);
        for _ in 0..30 {
            hero.update(30.0, &tuning, true);
        }
        let snapshot = hero.snapshot(&tuning);
        assert!(snapshot.wound < 1.0);
        assert!(snapshot.wound >= 0.0);
    }

    #[test]
    fn slash_spins_for_spin_speed_frames() {
        let tuning = Tuning::default();
        let mut hero = Hero::new(30.0, &tuning);
        hero.control(0.0, false, true);
        hero.update(30.0, &tuning, false);
        assert!(hero.snapshot(&tuning).spin_queue < 0.0);

        hero.control(0.0, false, false);
        for _ in 0..10 {
            hero.update(30.0, &tuning, false);
        }
        assert_eq!(hero.snapshot(&tuning).spin_queue, 0.0);
    }

    #[test]
    fn firing_respects_cooldown() {
        let tuning = Tuning::default();
        let mut hero = Hero::new(30.0, &tuning);
        hero.control(1.0, true, false);
        assert_eq!(hero.try_fire(&tuning), Some(1.0));
        assert_eq!(hero.try_fire(&tuning), None);
    }

    #[test]
    fn hero_dies_when_wound_exceeds_hp() {
        let tuning = Tuning::default();
        let mut hero = Hero::new(30.0, &tuning);
        hero.wound(tuning.hero_hp - 1.0);
        assert!(!hero.check_death(&tuning));
        hero.wound(0.01);
        assert!(hero.check_death(&tuning));
        assert!(hero.is_dead());
    }

    #[test]
    fn stepping_enemy_slides_into_place() {
        let tuning = Tuning::default();
        let viewport = Viewport::new(640, 480);
        let from = CellCoord::middle().offset(3, 0);
        let mut enemy = Enemy::new(EnemyId::new(0), from, EnemyKind::Plum, 30.0, &tuning);
        enemy.awake = true;
        let before = enemy.position(&viewport, 30.0, &tuning);

        enemy.step(from.offset(1, 0), 30.0, &tuning);
        assert!(!enemy.is_idle());
        assert!(enemy.position(&viewport, 30.0, &tuning).distance_to(before) < viewport.distance());

        for _ in 0..6 {
            enemy.update(30.0, &tuning);
        }
        assert!(enemy.is_idle());
        assert_eq!(
            enemy.position(&viewport, 30.0, &tuning),
            viewport.cell_center(from.offset(1, 0))
        );
    }

    #[test]
    fn bullets_expire_after_lifetime() {
        let tuning = Tuning::default();
        let mut bullet = Bullet::new(
            BulletId::new(0),
            PixelPoint::new(0.0, 0.0),
            0.0,
            BulletSource::Hero,
            &tuning,
        );
        for _ in 0..29 {
            bullet.update(30.0, 10.0, &tuning);
        }
        assert!(!bullet.is_expired());
        assert!(bullet.snapshot(&tuning).remaining > 0.0);
        bullet.update(30.0, 10.0, &tuning);
        bullet.update(30.0, 10.0, &tuning);
        assert!(bullet.is_expired());
        assert!(bullet.position.x > 0.0);
    }
}
