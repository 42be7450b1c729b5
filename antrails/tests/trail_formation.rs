use antrails::config::SimulationConfig;
use antrails::simulation::{
    Colony, Fidelity, PheromoneField, PopulationStepper, ReplaySource, Simulation, TurnKernel,
};
use shared::{Compass, Mode, ModeCounts};
use std::collections::HashSet;

fn params(side_length: i64, steps: u32, seed: u64) -> antrails::config::RunParameters {
    SimulationConfig {
        side_length,
        steps,
        seed: Some(seed),
        deposition: 8.0,
        decay_rate: 1.0,
        ..SimulationConfig::default()
    }
    .validate()
    .unwrap()
}

#[test]
fn test_scripted_explorers_lay_and_leave_a_trail() {
    // Every mode draw is 256 (explore), every turn draw stays straight.
    // Tick 1 and 2 spawn eastbound agents, tick 3 a westbound one.
    let rng = ReplaySource::new(0)
        .with_below([2, 256, 2, 256, 256, 6, 256, 256])
        .with_units([0.0; 5]);
    let mut sim = Simulation::with_source(params(4, 3, 0), Box::new(rng)).unwrap();

    let first = sim.step();
    assert_eq!((first.moved, first.retired), (1, 0));
    assert_eq!(sim.field().read(2, 2), 7.0);

    let second = sim.step();
    assert_eq!(second.retired, 1, "first agent walks off the east edge");
    assert_eq!(sim.field().read(2, 2), 14.0);
    assert_eq!(sim.field().read(3, 2), 7.0);

    let third = sim.step();
    assert_eq!(third.retired, 1);
    assert!(sim.is_finished());

    assert_eq!(sim.field().read(2, 2), 21.0);
    assert_eq!(sim.field().read(3, 2), 14.0);
    // The survivor has just arrived and not yet deposited.
    assert_eq!(sim.field().read(1, 2), 0.0);
    assert_eq!(sim.field().total(), 35.0);

    let survivors: Vec<_> = sim.colony().iter().map(|(_, a)| a.snapshot()).collect();
    assert_eq!(survivors.len(), 1);
    assert_eq!((survivors[0].x, survivors[0].y), (1, 2));
    assert_eq!(survivors[0].heading, 6);
    assert_eq!(survivors[0].mode, Mode::Exploring);

    let explorers_only = ModeCounts {
        exploring: 1,
        following: 0,
    };
    assert!(sim.history().iter().all(|r| r.counts == explorers_only));
}

#[test]
fn test_four_by_four_population_grows_then_shrinks() {
    // Fidelity 255 with every mode draw at 0: each agent tries to follow.
    // A heads west, B east, C west behind A's trail. Empty cells ahead make
    // A and B lose the trail and walk straight; C picks up A's deposit.
    let rng = ReplaySource::new(0)
        .with_below([6, 0, 2, 0, 0, 6, 0, 0, 0])
        .with_units([0.0; 5]);
    let mut sim = Simulation::with_source(params(4, 3, 0), Box::new(rng)).unwrap();
    assert_eq!(sim.params.fidelity.value(), 255);

    let mut sizes = Vec::new();
    let mut retired = Vec::new();
    for _ in 0..3 {
        let summary = sim.step();
        sizes.push(sim.colony().len());
        retired.push(summary.retired);
    }
    assert_eq!(sizes, vec![1, 2, 1]);
    assert_eq!(retired, vec![0, 0, 2]);

    let counts: Vec<_> = sim.history().iter().map(|r| r.counts).collect();
    assert_eq!(
        counts,
        vec![
            ModeCounts {
                exploring: 1,
                following: 0
            },
            ModeCounts {
                exploring: 2,
                following: 0
            },
            ModeCounts {
                exploring: 0,
                following: 1
            },
        ]
    );

    let (_, survivor) = sim.colony().iter().next().unwrap();
    assert_eq!(survivor.position(), (1, 2));
    assert_eq!(survivor.mode, Mode::Following);
    assert!(survivor.active);
    assert!(sim.field().read(1, 2) > 0.0);

    let expected = [((2, 2), 21.0), ((1, 2), 6.0), ((0, 2), 7.0), ((3, 2), 7.0)];
    for ((x, y), value) in expected {
        assert_eq!(sim.field().read(x, y), value, "cell ({x}, {y})");
    }
    let stood_on: HashSet<_> = expected.iter().map(|&(cell, _)| cell).collect();
    for y in 0..4 {
        for x in 0..4 {
            if !stood_on.contains(&(x, y)) {
                assert_eq!(sim.field().read(x, y), 0.0, "cell ({x}, {y}) was never visited");
            }
        }
    }
}

#[test]
fn test_seeded_four_by_four_runs_keep_the_halo_clean() {
    let mut saw_growth = false;
    for seed in 0..200 {
        let mut sim = Simulation::new(params(4, 3, seed)).unwrap();
        let origin = sim.field().origin_cell();
        let mut deposited = HashSet::from([(origin, origin)]);
        let mut sizes = Vec::new();

        for tick in 0..3 {
            sim.step();
            sizes.push(sim.colony().len());
            for (_, agent) in sim.colony().iter() {
                assert!(agent.active, "seed {seed}");
                assert!(sim.field().contains(agent.x, agent.y), "seed {seed}");
                if tick < 2 {
                    deposited.insert(agent.position());
                }
            }
        }

        saw_growth |= sizes[1] == 2;
        for y in 0..4 {
            for x in 0..4 {
                let value = sim.field().read(x, y);
                assert!(value >= 0.0, "seed {seed}");
                if !deposited.contains(&(x, y)) {
                    assert_eq!(value, 0.0, "seed {seed}: cell ({x}, {y})");
                }
            }
        }
    }
    assert!(saw_growth);
}

#[test]
fn test_followers_track_a_bending_trail() {
    let stepper = PopulationStepper::new(
        Compass::default(),
        TurnKernel::default(),
        Fidelity::new(256).unwrap(),
        8.0,
        1.0,
    );
    let mut field = PheromoneField::new(8).unwrap();
    field.write(5, 4, 10.0);
    field.write(6, 5, 10.0);
    let mut colony = Colony::new();
    // Spawn heading east and always draw the follow mode.
    let mut rng = ReplaySource::new(0).with_below([2, 0, 2, 0, 0]);

    let first = stepper.tick(&mut colony, &mut field, &mut rng);
    let leader = colony.get(first.spawned).unwrap();
    assert_eq!(leader.position(), (5, 4));
    assert_eq!(leader.mode, Mode::Following);

    let second = stepper.tick(&mut colony, &mut field, &mut rng);
    let leader = colony.get(first.spawned).unwrap();
    assert_eq!(leader.position(), (6, 5), "turned right onto the stronger cell");
    assert_eq!(leader.heading, 3);
    let trailing = colony.get(second.spawned).unwrap();
    assert_eq!(trailing.position(), (5, 4));
    assert_eq!(trailing.mode, Mode::Following);

    assert_eq!(stepper.fidelity().value(), 256);
    assert_eq!(rng.remaining(), 0);
    assert_eq!(
        PopulationStepper::count_by_mode(&colony),
        ModeCounts {
            exploring: 0,
            following: 2
        }
    );
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = |seed| {
        let mut sim = Simulation::new(params(32, 200, seed)).unwrap();
        sim.run();
        (sim.history().to_vec(), sim.snapshot())
    };
    let (history_a, snapshot_a) = run(42);
    let (history_b, snapshot_b) = run(42);
    assert_eq!(history_a, history_b);
    assert_eq!(snapshot_a, snapshot_b);
}

#[test]
fn test_high_fidelity_run_keeps_followers() {
    let mut sim = Simulation::new(params(64, 300, 7)).unwrap();
    let counts = sim.run();
    assert_eq!(counts.total(), sim.colony().len());
    assert!(sim.colony().iter().all(|(_, a)| a.active));
    assert!(
        sim.history().iter().any(|r| r.counts.following > 0),
        "fidelity 255 should produce followers once a trail exists"
    );
    for (_, agent) in sim.colony().iter() {
        assert!(sim.field().contains(agent.x, agent.y));
    }
}
