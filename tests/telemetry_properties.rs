//! End-to-end properties of the telemetry core, driven through the public API.

use plant_monitor::alerts::evaluate;
use plant_monitor::{
    Action, ActionQueue, Breach, HistoryBuffer, HistoryEntry, Metric, Monitor, Outcome,
    RandomSteps, ReadingSet, SensorSimulator, StepSource,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn in_range(readings: &ReadingSet) -> bool {
    readings.iter().all(|(metric, value)| {
        let (min, max) = metric.range();
        (min..=max).contains(&value)
    })
}

fn count_for(actions: &[Action], metric: Metric) -> usize {
    actions.iter().filter(|a| a.metric == metric).count()
}

#[test]
fn random_walk_never_leaves_bounds() {
    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut readings = ReadingSet::from_fn(|m| {
            let (min, max) = m.range();
            rng.gen_range(min..=max)
        });
        let mut sim = SensorSimulator::new(RandomSteps::seeded(seed));
        for _ in 0..2_000 {
            readings = sim.advance(&readings);
            assert!(in_range(&readings), "seed {seed} escaped: {readings:?}");
        }
    }
}

#[test]
fn extreme_steps_stay_clamped() {
    let mut flip = false;
    let mut sim = SensorSimulator::new(move || {
        flip = !flip;
        if flip {
            0.5
        } else {
            -0.5
        }
    });
    let mut readings = ReadingSet::from_fn(|m| m.range().0);
    for _ in 0..500 {
        readings = sim.advance(&readings);
        assert!(in_range(&readings));
    }
}

#[test]
fn history_keeps_the_last_thirty_in_order() {
    let mut history = HistoryBuffer::new();
    for ts in 0..75u64 {
        history.append(HistoryEntry::new(ReadingSet::initial(), ts));
        assert!(history.len() <= 30);
    }
    let stamps: Vec<u64> = history.snapshot().iter().map(|e| e.captured_at_ms).collect();
    assert_eq!(stamps, (45..75).collect::<Vec<u64>>());
}

#[test]
fn breach_is_strictly_greater_than_limit() {
    let at_limit = ReadingSet::initial().with(Metric::Temperature, 30.0);
    assert!(evaluate(&at_limit).is_empty());

    let over = ReadingSet::initial().with(Metric::Temperature, 30.01);
    let breaches = evaluate(&over);
    assert_eq!(breaches.len(), 1);
    assert_eq!(breaches[0].metric, Metric::Temperature);
}

#[test]
fn pending_metric_is_not_enqueued_twice() {
    let mut queue = ActionQueue::from(vec![Action::for_metric(Metric::Temperature)]);
    let added = queue.on_new_breaches(&[Breach { metric: Metric::Temperature, value: 35.0 }]);
    assert!(added.is_empty());
    assert_eq!(queue.snapshot(), vec![Action::for_metric(Metric::Temperature)]);
}

#[test]
fn enqueue_order_is_canonical() {
    let breaches = [
        Breach { metric: Metric::LightLevel, value: 95.0 },
        Breach { metric: Metric::Temperature, value: 31.0 },
    ];
    let mut forward = ActionQueue::new();
    forward.on_new_breaches(&breaches);
    let mut reversed = ActionQueue::new();
    reversed.on_new_breaches(&[breaches[1], breaches[0]]);

    let expected = vec![
        Action::for_metric(Metric::Temperature),
        Action::for_metric(Metric::LightLevel),
    ];
    assert_eq!(forward.snapshot(), expected);
    assert_eq!(reversed.snapshot(), expected);
}

#[test]
fn resolve_removes_exactly_the_indexed_action() {
    let a = Action::for_metric(Metric::Temperature);
    let b = Action::for_metric(Metric::Humidity);
    let c = Action::for_metric(Metric::SoilMoisture);

    for accepted in [true, false] {
        let mut queue = ActionQueue::from(vec![a.clone(), b.clone(), c.clone()]);
        let resolution = queue.resolve(1, accepted).unwrap();
        assert_eq!(resolution.action, b);
        let expected = if accepted { Outcome::Accepted } else { Outcome::Dismissed };
        assert_eq!(resolution.outcome, expected);
        assert_eq!(queue.snapshot(), vec![a.clone(), c.clone()]);
    }
}

#[test]
fn seeded_run_raises_one_temperature_advisory() {
    let mut monitor = Monitor::new(SensorSimulator::new(RandomSteps::seeded(2024)), 30);
    assert_eq!(monitor.state().readings.get(Metric::Temperature), 25.0);

    let mut ticks = 0u64;
    while monitor.state().readings.get(Metric::Temperature) <= 30.0 {
        assert_eq!(count_for(monitor.state().pending.pending(), Metric::Temperature), 0);
        monitor.tick_at(ticks * 2_000);
        ticks += 1;
        assert!(ticks < 100_000, "temperature never crossed its limit");
    }
    assert_eq!(count_for(monitor.state().pending.pending(), Metric::Temperature), 1);

    // keep ticking while the breach persists: still exactly one
    while monitor.state().readings.get(Metric::Temperature) > 30.0 {
        let report = monitor.tick_at(ticks * 2_000);
        ticks += 1;
        assert_eq!(count_for(monitor.state().pending.pending(), Metric::Temperature), 1);
        assert_eq!(count_for(&report.new_actions, Metric::Temperature), 0);
    }

    // cleared on its own: the advisory stays until answered
    assert_eq!(count_for(monitor.state().pending.pending(), Metric::Temperature), 1);
}

#[test]
fn scripted_run_crosses_on_the_fourth_tick() {
    struct Rising;
    impl StepSource for Rising {
        fn next_unit_step(&mut self) -> f64 {
            0.5
        }
    }

    let mut monitor = Monitor::new(SensorSimulator::new(Rising), 30);
    let reports: Vec<_> = (0..6).map(|t| monitor.tick_at(t)).collect();

    assert!(reports[..3].iter().all(|r| r.new_actions.is_empty()));
    assert_eq!(reports[3].new_actions, vec![Action::for_metric(Metric::Temperature)]);
    assert!(reports[4..].iter().all(|r| count_for(&r.new_actions, Metric::Temperature) == 0));
    assert_eq!(count_for(monitor.state().pending.pending(), Metric::Temperature), 1);
}
