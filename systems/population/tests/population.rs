use std::collections::HashSet;

use brutal_maze_core::{Cell, CellCoord, Command, Event, Tuning, GOLDEN_MEAN, INIT_SCORE};
use brutal_maze_system_population::{target_population, Config, Population};
use brutal_maze_world::{self as world, query, MazeGrid, World};

fn populate(world: &World, seed: u64) -> Vec<Command> {
    let mut population = Population::new(Config::new(seed));
    let mut commands = Vec::new();
    population.populate(
        query::score(world),
        query::enemy_view(world).len(),
        query::viewport(world),
        query::maze(world),
        &mut commands,
    );
    commands
}

fn spawn_cells(commands: &[Command]) -> Vec<CellCoord> {
    commands
        .iter()
        .map(|command| match command {
            Command::SpawnEnemy { cell, .. } => *cell,
            other => panic!("unexpected command {other:?}"),
        })
        .collect()
}

#[test]
fn fresh_world_is_populated_to_the_target() {
    let mut world = World::new(Tuning::default(), 640, 480, 21);
    let commands = populate(&world, 5);
    let expected = target_population(INIT_SCORE).ceil() as usize;
    assert_eq!(commands.len(), expected);

    let cells = spawn_cells(&commands);
    let unique: HashSet<CellCoord> = cells.iter().copied().collect();
    assert_eq!(unique.len(), cells.len(), "cells must be drawn without replacement");

    let viewport = query::viewport(&world).clone();
    let maze = query::maze(&world);
    for cell in &cells {
        assert!(viewport.contains(*cell));
        assert!(maze.is_wall(*cell));
    }

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }
    let spawned = events
        .iter()
        .filter(|event| matches!(event, Event::EnemySpawned { .. }))
        .count();
    assert_eq!(spawned, expected);
    assert!(populate(&world, 5).is_empty());
}

#[test]
fn cube_of_the_golden_mean_calls_for_three_enemies() {
    let tuning = Tuning {
        initial_score: GOLDEN_MEAN.powi(3),
        ..Tuning::default()
    };
    let world = World::new(tuning, 640, 480, 13);
    let cells = spawn_cells(&populate(&world, 6));
    assert_eq!(cells.len(), 3);
    let unique: HashSet<CellCoord> = cells.iter().copied().collect();
    assert_eq!(unique.len(), 3);
    assert!(cells.iter().all(|cell| query::maze(&world).is_wall(*cell)));
}

#[test]
fn same_seed_draws_same_cells() {
    let world = World::new(Tuning::default(), 800, 600, 4);
    assert_eq!(populate(&world, 77), populate(&world, 77));
}

#[test]
fn enclosed_walls_are_never_chosen() {
    let world = World::from_grid(Tuning::default(), MazeGrid::filled(Cell::Wall), 640, 480, 1);
    let cells: HashSet<CellCoord> = spawn_cells(&populate(&world, 9)).into_iter().collect();
    let around_hero: HashSet<CellCoord> = [(1, 0), (-1, 0), (0, 1), (0, -1)]
        .into_iter()
        .map(|(columns, rows)| CellCoord::middle().offset(columns, rows))
        .collect();
    assert_eq!(cells, around_hero);
}

#[test]
fn only_depletion_triggers_spawning() {
    let world = World::new(Tuning::default(), 640, 480, 8);
    let mut population = Population::new(Config::new(2));
    let mut commands = Vec::new();
    population.handle(
        &[Event::MazeMoved { dx: 1, dy: 0 }],
        query::score(&world),
        0,
        query::viewport(&world),
        query::maze(&world),
        &mut commands,
    );
    assert!(commands.is_empty());

    population.handle(
        &[Event::EnemyCulled {
            enemy: brutal_maze_core::EnemyId::new(0),
        }],
        query::score(&world),
        0,
        query::viewport(&world),
        query::maze(&world),
        &mut commands,
    );
    assert!(!commands.is_empty());
}
