use std::f32::consts::SQRT_2;

use brutal_maze_core::{Cell, CellCoord, Command, EnemyId, EnemyKind, Event, Tuning};
use brutal_maze_system_combat::Combat;
use brutal_maze_world::{self as world, query, MazeGrid, World};

fn world_over(walls: &[CellCoord]) -> World {
    let mut grid = MazeGrid::filled(Cell::Empty);
    for wall in walls {
        grid.set(*wall, Cell::Wall);
    }
    World::from_grid(Tuning::default(), grid, 640, 480, 11)
}

fn apply_all(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn spawn(world: &mut World, cell: CellCoord) -> EnemyId {
    let events = apply_all(
        world,
        vec![Command::SpawnEnemy {
            cell,
            kind: EnemyKind::Chocolate,
        }],
    );
    match events.as_slice() {
        [Event::EnemySpawned { enemy, .. }] => *enemy,
        other => panic!("unexpected events {other:?}"),
    }
}

fn control(firing: bool, slashing: bool) -> Command {
    Command::Control {
        right: 0,
        down: 0,
        angle: 0.0,
        firing,
        slashing,
    }
}

/// Advances characters, resolves combat and settles casualties for one frame.
fn frame(world: &mut World, combat: &mut Combat) -> (Vec<Command>, Vec<Event>) {
    let mut events = apply_all(world, vec![Command::AdvanceCharacters]);
    let mut commands = Vec::new();
    combat.handle(
        query::viewport(world),
        query::maze(world),
        &query::hero(world),
        &query::enemy_view(world),
        &query::bullet_view(world),
        &mut commands,
    );
    let mut settled = commands.clone();
    settled.push(Command::ResolveCasualties);
    events.extend(apply_all(world, settled));
    (commands, events)
}

#[test]
fn enemy_bullet_wounds_the_hero_by_its_remaining_lifetime() {
    let mut world = world_over(&[CellCoord::middle().offset(2, 0)]);
    let enemy = spawn(&mut world, CellCoord::middle().offset(2, 0));
    let _ = apply_all(
        &mut world,
        vec![Command::WakeEnemy { enemy }, Command::EnemyFire { enemy }],
    );

    let mut combat = Combat::new();
    let mut wound = None;
    for _ in 0..10 {
        let (commands, _) = frame(&mut world, &mut combat);
        wound = commands.iter().find_map(|command| match command {
            Command::WoundHero { amount } => Some(*amount),
            _ => None,
        });
        if wound.is_some() {
            break;
        }
    }

    let amount = wound.expect("hero was never hit");
    assert!(amount > 0.8 && amount < 1.0, "wound {amount}");
    assert!((query::hero(&world).wound - amount).abs() < 0.05);
    assert!(query::bullet_view(&world).is_empty());
}

#[test]
fn hero_bullet_breaks_on_walls() {
    let mut world = world_over(&[CellCoord::middle().offset(2, 0)]);
    let _ = apply_all(&mut world, vec![control(true, false)]);
    let mut combat = Combat::new();

    let (_, events) = frame(&mut world, &mut combat);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::BulletFired { .. })));
    let _ = apply_all(&mut world, vec![control(false, false)]);

    let mut removed = false;
    for _ in 0..4 {
        let (commands, events) = frame(&mut world, &mut combat);
        assert!(!commands
            .iter()
            .any(|command| matches!(command, Command::WoundEnemy { .. })));
        removed |= events
            .iter()
            .any(|event| matches!(event, Event::BulletRemoved { .. }));
    }
    assert!(removed);
    assert!(query::bullet_view(&world).is_empty());
}

#[test]
fn hero_bullet_finishes_a_wounded_enemy() {
    let enemy_cell = CellCoord::middle().offset(3, 0);
    let mut world = world_over(&[enemy_cell]);
    let enemy = spawn(&mut world, enemy_cell);
    let _ = apply_all(
        &mut world,
        vec![
            Command::WoundEnemy { enemy, amount: 2.5 },
            control(true, false),
        ],
    );
    let mut combat = Combat::new();
    let before = query::score(&world);

    let mut killed = None;
    for _ in 0..8 {
        let (_, events) = frame(&mut world, &mut combat);
        let _ = apply_all(&mut world, vec![control(false, false)]);
        killed = killed.or_else(|| {
            events.iter().find_map(|event| match event {
                Event::EnemyKilled { enemy, wound } => Some((*enemy, *wound)),
                _ => None,
            })
        });
    }

    let (dead, wound) = killed.expect("enemy survived");
    assert_eq!(dead, enemy);
    assert!(wound >= 3.0);
    assert!((query::score(&world) - before - f64::from(wound)).abs() < 1e-6);
    assert!(query::maze(&world).is_wall(enemy_cell));
}

#[test]
fn hero_slash_reaches_adjacent_enemies() {
    let near = CellCoord::middle().offset(1, 0);
    let far = CellCoord::middle().offset(4, 0);
    let mut world = world_over(&[near, far]);
    let near_enemy = spawn(&mut world, near);
    let _ = spawn(&mut world, far);
    let _ = apply_all(&mut world, vec![control(false, true)]);

    let (commands, _) = frame(&mut world, &mut Combat::new());
    let wounded: Vec<(EnemyId, f32)> = commands
        .iter()
        .filter_map(|command| match command {
            Command::WoundEnemy { enemy, amount } if *amount > 0.0 => Some((*enemy, *amount)),
            _ => None,
        })
        .collect();
    assert_eq!(wounded.len(), 1);
    let (enemy, amount) = wounded[0];
    assert_eq!(enemy, near_enemy);

    let viewport = query::viewport(&world);
    let reach = viewport.slash_distance() - viewport.distance();
    let unit = viewport.distance() / SQRT_2 * query::hero(&world).spin_speed;
    assert!((amount - reach / unit).abs() < 1e-5, "slash dealt {amount}");
    assert!((amount - 0.165).abs() < 0.002, "slash dealt {amount}");
    assert!(query::enemy_view(&world).iter().any(|enemy| enemy.id == near_enemy));
}

#[test]
fn spinning_enemy_wounds_the_hero() {
    let cell = CellCoord::middle().offset(0, 1);
    let mut world = world_over(&[cell]);
    let enemy = spawn(&mut world, cell);
    let _ = apply_all(
        &mut world,
        vec![
            Command::WakeEnemy { enemy },
            Command::SpinEnemy {
                enemy,
                clockwise: true,
            },
        ],
    );

    let (commands, events) = frame(&mut world, &mut Combat::new());
    assert!(commands
        .iter()
        .any(|command| matches!(command, Command::WoundHero { amount } if *amount > 0.0)));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::HeroWounded { .. })));
}
