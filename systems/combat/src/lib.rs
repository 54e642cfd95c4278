#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Combat resolution: melee spins and bullet impacts.
//!
//! The system only decides who is hurt and by how much. The world applies the
//! resulting wounds and settles deaths when it receives
//! [`Command::ResolveCasualties`].

use std::{collections::HashMap, f32::consts::SQRT_2};

use brutal_maze_core::{
    BulletSource, BulletView, Command, EnemyId, EnemySnapshot, EnemyView, HeroSnapshot, MazeView,
    Viewport,
};

/// Pure system resolving melee and projectile damage once per frame.
#[derive(Debug, Default)]
pub struct Combat {
    inflicted: HashMap<EnemyId, f32>,
}

impl Combat {
    /// Creates a new combat system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits wound and bullet-destruction commands for the current frame.
    ///
    /// Enemy spins are resolved first, then the hero's slash, then every
    /// bullet. Damage dealt earlier in the frame counts toward later kill
    /// checks, so an enemy that already took a lethal wound absorbs no
    /// further bullets.
    pub fn handle(
        &mut self,
        viewport: &Viewport,
        maze: MazeView<'_>,
        hero: &HeroSnapshot,
        enemies: &EnemyView,
        bullets: &BulletView,
        out: &mut Vec<Command>,
    ) {
        if hero.dead {
            return;
        }
        self.inflicted.clear();

        let origin = viewport.hero();
        let slash_distance = viewport.slash_distance();
        let hero_radius = viewport.hero_radius();

        for enemy in enemies.iter().filter(|enemy| enemy.is_spinning()) {
            let reach = slash_distance - enemy.position.distance_to(origin);
            if reach >= 0.0 {
                out.push(Command::WoundHero {
                    amount: reach / hero_radius / enemy.spin_speed,
                });
            }
        }

        if hero.is_spinning() {
            let slash_unit = viewport.distance() / SQRT_2 * hero.spin_speed;
            for enemy in enemies.iter() {
                let reach = slash_distance - enemy.position.distance_to(origin);
                if reach >= 0.0 {
                    self.wound(enemy, reach / slash_unit, out);
                }
            }
        }

        let distance = viewport.distance();
        for bullet in bullets.iter() {
            let wound = bullet.remaining;
            if wound <= 0.0 {
                out.push(Command::DestroyBullet { bullet: bullet.id });
                continue;
            }

            match bullet.source {
                BulletSource::Hero => {
                    if maze.is_wall(viewport.cell_at(bullet.position)) {
                        out.push(Command::DestroyBullet { bullet: bullet.id });
                        continue;
                    }
                    let target = enemies.iter().find(|enemy| {
                        self.is_alive(enemy)
                            && enemy.position.distance_to(bullet.position) < distance
                    });
                    if let Some(enemy) = target {
                        self.wound(enemy, wound, out);
                        out.push(Command::DestroyBullet { bullet: bullet.id });
                    }
                }
                BulletSource::Enemy(_) => {
                    if bullet.position.distance_to(origin) < distance {
                        out.push(Command::WoundHero { amount: wound });
                        out.push(Command::DestroyBullet { bullet: bullet.id });
                    }
                }
            }
        }
    }

    fn is_alive(&self, enemy: &EnemySnapshot) -> bool {
        let pending = self.inflicted.get(&enemy.id).copied().unwrap_or(0.0);
        enemy.wound + pending < enemy.max_wound
    }

    fn wound(&mut self, enemy: &EnemySnapshot, amount: f32, out: &mut Vec<Command>) {
        *self.inflicted.entry(enemy.id).or_insert(0.0) += amount;
        out.push(Command::WoundEnemy {
            enemy: enemy.id,
            amount,
        });
    }
}
