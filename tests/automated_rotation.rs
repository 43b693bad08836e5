use intersection_control::control_system::scheduler::{start_automated, tick};
use intersection_control::storage::settings::DirectionTimingConfig;
use intersection_control::{
    Approach, Command, ControllerConfig, IntersectionState, MemoryStore, Mode, Status,
    TimingPlan, TrafficLightController,
};
use std::time::Duration;

fn started(plan: &TimingPlan) -> IntersectionState {
    let mut state = IntersectionState::new();
    start_automated(&mut state, plan);
    state
}

fn assert_single_green(state: &IntersectionState) {
    let green: Vec<Approach> = state
        .directions
        .iter()
        .filter(|(_, dir)| dir.go_status == Status::Go || dir.left_status == Status::Go)
        .map(|(approach, _)| approach)
        .collect();
    assert!(green.len() <= 1, "several approaches green: {:?}", green);
    if let Some(approach) = green.first() {
        assert_eq!(*approach, state.current_direction);
    }
}

fn assert_status_matches_countdowns(state: &IntersectionState) {
    for (approach, dir) in state.directions.iter() {
        for (status, countdown) in [
            (dir.go_status, dir.green_countdown),
            (dir.left_status, dir.left_turn_countdown),
        ] {
            if countdown <= 1 {
                assert_eq!(status, Status::Stop, "{} at {}", approach, countdown);
            }
            if status == Status::Caution {
                assert_eq!(countdown, 2, "{} caution at {}", approach, countdown);
            }
            if status == Status::Go {
                assert!(countdown > 2, "{} go at {}", approach, countdown);
            }
        }
    }
}

#[test]
fn priming_the_default_plan() {
    let state = started(&TimingPlan::default());
    let north = state.direction(Approach::North);
    assert_eq!((north.green_countdown, north.left_turn_countdown), (20, 30));
    let south = state.direction(Approach::South);
    // max(20, 15) + excess (30 - 20)
    assert_eq!((south.green_countdown, south.left_turn_countdown), (30, 40));
    assert_eq!(north.go_status, Status::Go);
    assert_eq!(south.go_status, Status::Stop);
}

#[test]
fn rotation_waits_for_the_later_countdown() {
    let mut state = started(&TimingPlan::default());
    for second in 1..=29 {
        assert!(tick(&mut state).is_none(), "rotated early at {}", second);
        assert_eq!(state.current_direction, Approach::North);
        if second >= 20 {
            assert_eq!(state.direction(Approach::North).green_countdown, 0);
        }
    }
    assert_eq!(state.direction(Approach::North).left_turn_countdown, 1);
    assert!(tick(&mut state).is_some());
    assert_eq!(state.current_direction, Approach::South);
}

#[test]
fn rotation_with_equal_allotments_happens_when_both_hit_zero() {
    let mut plan = TimingPlan::default();
    plan.set(
        Approach::North,
        DirectionTimingConfig {
            green_time: 6,
            left_turn_time: 6,
        },
    );
    let mut state = started(&plan);
    for _ in 0..5 {
        assert!(tick(&mut state).is_none());
    }
    assert!(tick(&mut state).is_some());
}

#[test]
fn countdowns_never_increase_during_an_occupancy() {
    let mut state = started(&TimingPlan::default());
    let mut last = *state.direction(state.current_direction);
    let mut current = state.current_direction;

    for _ in 0..500 {
        let rotated = tick(&mut state).is_some();
        let dir = *state.direction(current);
        if rotated {
            current = state.current_direction;
            last = *state.direction(current);
            continue;
        }
        assert!(dir.green_countdown <= last.green_countdown);
        assert!(dir.left_turn_countdown <= last.left_turn_countdown);
        last = dir;
    }
}

fn plan_with(timings: [(u32, u32); 4]) -> TimingPlan {
    let mut plan = TimingPlan::default();
    for (approach, (green_time, left_turn_time)) in Approach::ALL.into_iter().zip(timings) {
        plan.set(
            approach,
            DirectionTimingConfig {
                green_time,
                left_turn_time,
            },
        );
    }
    plan
}

#[test]
fn mutual_exclusion_and_status_invariant_hold_every_tick() {
    // Approach::ALL order: north, east, south, west
    let plans = [
        TimingPlan::default(),
        plan_with([(0, 0); 4]),
        plan_with([(0, 10), (1, 2), (2, 2), (3, 0)]),
        plan_with([(30, 5), (12, 3), (2, 1), (25, 4)]),
        plan_with([(1, 1), (2, 0), (0, 3), (4, 2)]),
    ];
    for plan in &plans {
        let mut state = started(plan);
        assert_single_green(&state);
        assert_status_matches_countdowns(&state);
        for _ in 0..600 {
            tick(&mut state);
            assert_single_green(&state);
            assert_status_matches_countdowns(&state);
        }
    }
}

#[test]
fn every_approach_leads_once_per_cycle() {
    let mut state = started(&TimingPlan::default());
    let mut leaders = vec![state.current_direction];
    while leaders.len() < 12 {
        if tick(&mut state).is_some() {
            leaders.push(state.current_direction);
        }
    }
    let cycle = [
        Approach::North,
        Approach::South,
        Approach::East,
        Approach::West,
    ];
    for (i, leader) in leaders.iter().enumerate() {
        assert_eq!(*leader, cycle[i % 4]);
    }
}

#[test]
fn zero_allotments_rotate_every_tick() {
    let mut plan = TimingPlan::default();
    for approach in Approach::ALL {
        plan.set(approach, DirectionTimingConfig::default());
    }
    let mut state = started(&plan);
    assert!(tick(&mut state).is_some());
    assert!(tick(&mut state).is_some());
    assert_eq!(state.current_direction, Approach::East);
}

#[tokio::test(start_paused = true)]
async fn spawned_controller_ticks_once_per_second() {
    let handle =
        TrafficLightController::new(MemoryStore::new(), ControllerConfig::default()).spawn();
    assert_eq!(
        handle.snapshot().direction(Approach::North).green_countdown,
        20
    );

    tokio::time::sleep(Duration::from_millis(5_500)).await;
    assert_eq!(
        handle.snapshot().direction(Approach::North).green_countdown,
        15
    );

    tokio::time::sleep(Duration::from_secs(25)).await;
    assert_eq!(handle.snapshot().current_direction, Approach::South);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn manual_mode_stops_the_tick() {
    let handle =
        TrafficLightController::new(MemoryStore::new(), ControllerConfig::default()).spawn();
    assert!(handle.send(Command::SetMode(Mode::Manual)).await);
    tokio::time::sleep(Duration::from_secs(10)).await;

    let state = handle.snapshot();
    assert_eq!(state.mode, Mode::Manual);
    for (_, dir) in state.directions.iter() {
        assert_eq!(dir.green_countdown, 0);
        assert_eq!(dir.left_turn_countdown, 0);
    }

    assert!(handle.send(Command::SetMode(Mode::Automated)).await);
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert_eq!(
        handle.snapshot().direction(Approach::North).green_countdown,
        18
    );
    handle.shutdown().await.unwrap();
}
