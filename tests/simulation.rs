use std::path::PathBuf;

use plague::{
    agent::Body,
    config::LifeConfig,
    grid::{TileGrid, TilePos},
    leader::Leader,
    mapgen,
    population::Population,
    scenario::ScenarioLoader,
    viewport::Viewport,
    Outcome, Scenario, Vec2, World,
};

fn scenario_loader() -> ScenarioLoader {
    ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
}

fn scenario_path() -> PathBuf {
    PathBuf::from("scenarios/meadow.yaml")
}

fn meadow() -> Scenario {
    scenario_loader().load(scenario_path()).expect("scenario parses")
}

/// 6x6 grid, interior plain at `tile_life`, followers stacked on tile (2, 2).
fn small_world(tile_life: f64, followers: usize) -> World {
    let grid = TileGrid::uniform(6, 6, 100.0, tile_life).unwrap();
    let leader = Leader::new(Body::new(Vec2::new(450.0, 450.0), Vec2::ZERO));
    let mut population = Population::new();
    for _ in 0..followers {
        population.spawn(
            Body::new(Vec2::new(250.0, 250.0), Vec2::ZERO),
            &LifeConfig::default(),
        );
    }
    World::new(grid, leader, population, Viewport::default())
}

#[test]
fn scenario_loader_reads_fixture() {
    let scenario = meadow();
    assert_eq!(scenario.name, "meadow");
    assert_eq!((scenario.width, scenario.height), (20, 16));
    assert_eq!(scenario.initial_follower_count, 6);
    assert_eq!(scenario.ticks(None), 2_000);
}

#[test]
fn loader_reports_missing_file() {
    let err = scenario_loader().load("scenarios/missing.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read scenario file"));
}

#[test]
fn generation_is_deterministic_per_seed() {
    let a = mapgen::generate(30, 20, 9).unwrap();
    let b = mapgen::generate(30, 20, 9).unwrap();
    assert_eq!(a, b);

    let c = mapgen::generate(30, 20, 10).unwrap();
    assert_ne!(a, c);
}

#[test]
fn engine_runs_deterministically() {
    let scenario = meadow();
    let temp = tempfile::tempdir().unwrap();

    let mut world_a = scenario.build_world().unwrap();
    let mut engine_a = scenario.engine_builder(temp.path()).build();
    engine_a.run(&mut world_a, 300).unwrap();

    let mut world_b = scenario.build_world().unwrap();
    let mut engine_b = scenario.engine_builder(temp.path()).build();
    engine_b.run(&mut world_b, 300).unwrap();

    assert_eq!(world_a.tick_count(), world_b.tick_count());
    assert_eq!(world_a.grid(), world_b.grid());
    assert_eq!(world_a.population(), world_b.population());
    assert_eq!(world_a.leader(), world_b.leader());
}

#[test]
fn life_and_population_invariants_hold_every_tick() {
    let mut scenario = meadow();
    // harsh rates so tiles and followers actually die within the run
    scenario.life.tile_decay = 4.0;
    scenario.life.follower_decay = 4.0;
    let temp = tempfile::tempdir().unwrap();
    let mut world = scenario.build_world().unwrap();
    let mut engine = scenario.engine_builder(temp.path()).build();

    let mut previous_count = world.follower_count();
    let mut previous_dead = world.census().dead;
    let mut violations = Vec::new();
    engine
        .run_with_hook(&mut world, 1_500, |world| {
            for tile in world.grid().tiles() {
                if !(0.0..=100.0).contains(&tile.life()) {
                    violations.push(format!("tile {:?} life {}", tile.pos(), tile.life()));
                }
            }
            for follower in world.population().members() {
                if !(0.0..=100.0).contains(&follower.life()) || follower.is_dead() {
                    violations.push(format!("follower life {}", follower.life()));
                }
            }
            if world.follower_count() != world.population().members().len() {
                violations.push("count mismatch".to_string());
            }
            let newly_dead = world.census().dead.saturating_sub(previous_dead);
            if world.follower_count() > previous_count + 2 * newly_dead {
                violations.push(format!(
                    "tick {}: {} followers from {} with {} tile deaths",
                    world.tick_count(),
                    world.follower_count(),
                    previous_count,
                    newly_dead
                ));
            }
            previous_count = world.follower_count();
            previous_dead = world.census().dead;
        })
        .unwrap();

    assert!(violations.is_empty(), "{violations:?}");
}

#[test]
fn tile_death_spawns_at_most_two() {
    let scenario = Scenario::default();
    let temp = tempfile::tempdir().unwrap();
    let mut engine = scenario.engine_builder(temp.path()).build();
    let mut world = small_world(0.05, 1);

    let summary = engine.tick(&mut world).unwrap();

    assert_eq!(world.census().dead, 1);
    assert!((1..=3).contains(&summary.follower_count));
    for follower in world.population().members().iter().skip(1) {
        let offset = follower.body().position - world.leader().position();
        assert!(offset.x.abs() <= 200.0 && offset.y.abs() <= 200.0);
    }
}

#[test]
fn forcing_every_tile_dead_wins() {
    let mut world = small_world(50.0, 1);
    for y in 1..5 {
        for x in 1..5 {
            world.set_tile_life(TilePos::new(x, y), 0.0);
        }
    }
    assert_eq!(world.recompute_alive_ratio(), 0.0);
    assert!(world.is_won());
    assert_eq!(world.alive_tile_percent_floor(), 0);
}

#[test]
fn removing_every_follower_loses_on_next_tick() {
    let scenario = Scenario::default();
    let temp = tempfile::tempdir().unwrap();
    let mut engine = scenario.engine_builder(temp.path()).build();
    let mut world = small_world(50.0, 4);

    let everyone: Vec<usize> = (0..world.follower_count()).collect();
    world.population_mut().bury(&everyone);
    assert_eq!(world.follower_count(), 0);
    assert!(!world.is_lost());

    let summary = engine.tick(&mut world).unwrap();
    assert!(world.is_lost());
    assert_eq!(summary.outcome, Outcome::Lost);
}

#[test]
fn run_stops_at_outcome_but_tick_does_not() {
    let scenario = Scenario::default();
    let temp = tempfile::tempdir().unwrap();
    let mut engine = scenario.engine_builder(temp.path()).build();
    let mut world = small_world(50.0, 0);

    let summary = engine.run(&mut world, 100).unwrap();
    assert_eq!(summary.ticks_run, 1);
    assert_eq!(summary.outcome, Outcome::Lost);

    // the clock itself keeps going if asked
    engine.tick(&mut world).unwrap();
    assert_eq!(world.tick_count(), 2);
    assert!(world.is_lost());
}

#[test]
fn starving_follower_is_removed() {
    let scenario = Scenario::default();
    let temp = tempfile::tempdir().unwrap();
    let mut engine = scenario.engine_builder(temp.path()).build();
    let mut world = small_world(50.0, 2);
    // park everyone on the border mountain with almost no life left
    for index in 0..2 {
        let follower = world.population_mut().get_mut(index).unwrap();
        follower.body_mut().position = Vec2::new(50.0, 50.0);
        follower.set_life(0.05);
    }

    engine.tick(&mut world).unwrap();
    assert_eq!(world.follower_count(), 0);
    assert!(world.is_lost());
}

#[test]
fn leader_is_clamped_inside_the_world() {
    let scenario = Scenario::default();
    let temp = tempfile::tempdir().unwrap();
    let mut engine = scenario.engine_builder(temp.path()).build();
    let mut world = small_world(50.0, 1);
    let bounds = world.grid().world_size();

    // pointer far to the lower right of the screen
    world.steer_leader(Vec2::new(1e7, 1e7));
    engine.tick(&mut world).unwrap();
    assert_eq!(world.leader().position(), bounds);

    world.steer_leader(Vec2::new(-1e7, -1e7));
    engine.tick(&mut world).unwrap();
    assert_eq!(world.leader().position(), Vec2::ZERO);
}

#[test]
fn engine_emits_snapshots() {
    let mut scenario = meadow();
    scenario.snapshot_interval_ticks = 10;
    let temp = tempfile::tempdir().unwrap();
    let snapshot_dir = temp.path().join("snaps");

    let mut world = scenario.build_world().unwrap();
    let mut engine = scenario.engine_builder(&snapshot_dir).build();
    let mut paths = Vec::new();
    for _ in 0..30 {
        let summary = engine.tick(&mut world).unwrap();
        paths.extend(summary.snapshot_path);
    }

    let expected = snapshot_dir.join("meadow").join("tick_000010.json");
    assert!(
        expected.exists(),
        "expected snapshot {} to exist",
        expected.display()
    );
    assert_eq!(paths.len(), 3);

    let data = std::fs::read_to_string(expected).unwrap();
    assert!(
        data.contains("\"scenario\": \"meadow\""),
        "snapshot should contain scenario metadata"
    );
}

#[test]
fn tick_reports_every_system() {
    let scenario = meadow();
    let temp = tempfile::tempdir().unwrap();
    let mut world = scenario.build_world().unwrap();
    let mut engine = scenario.engine_builder(temp.path()).build();

    let summary = engine.tick(&mut world).unwrap();
    let names: Vec<_> = summary
        .system_reports
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, ["leader", "swarm", "tally"]);
    assert_eq!(summary.tick, 1);
}
