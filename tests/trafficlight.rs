use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use traffic_light::{Config, Delivery, Error, MessageQueue, Phase, TrafficLight};

const UNIT: Duration = Duration::from_millis(10);
const SLACK: Duration = Duration::from_millis(500);

fn fast_light() -> TrafficLight {
    TrafficLight::with_config(Config::default().with_time_unit(UNIT)).unwrap()
}

fn wait_for_transitions(light: &TrafficLight, count: u64) {
    while light.transitions() < count {
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn three_vehicles_all_get_a_green() {
    let light = Arc::new(fast_light());
    light.start().unwrap();

    let vehicles: Vec<_> = (0..3)
        .map(|_| {
            let light = Arc::clone(&light);
            thread::spawn(move || light.wait_for_green_timeout(Duration::from_secs(10)))
        })
        .collect();

    let mut sequences = HashSet::new();
    for vehicle in vehicles {
        let green = vehicle
            .join()
            .unwrap()
            .unwrap()
            .expect("every vehicle gets a green eventually");
        assert_eq!(green.phase, Phase::Green);
        sequences.insert(green.sequence);
    }

    // A published green is handed to one vehicle only.
    assert_eq!(sequences.len(), 3);
}

#[test]
fn three_blocking_waiters_all_get_a_green() {
    let light = Arc::new(fast_light());
    light.start().unwrap();

    let (greens_tx, greens_rx) = mpsc::channel();
    for _ in 0..3 {
        let light = Arc::clone(&light);
        let greens_tx = greens_tx.clone();
        thread::spawn(move || greens_tx.send(light.wait_for_green()));
    }

    let mut sequences = HashSet::new();
    for _ in 0..3 {
        let green = greens_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("every waiter gets a green eventually")
            .unwrap();
        assert_eq!(green.phase, Phase::Green);
        sequences.insert(green.sequence);
    }

    assert_eq!(sequences.len(), 3);
}

#[test]
fn toggles_respect_the_cycle_bounds() {
    const TOGGLES: u32 = 5;
    let light = fast_light();
    let config = *light.config();

    let started = Instant::now();
    light.start().unwrap();
    wait_for_transitions(&light, u64::from(TOGGLES));
    let elapsed = started.elapsed();

    let min = config.time_unit * config.min_units * TOGGLES;
    let max = config.time_unit * config.max_units * TOGGLES;
    assert!(elapsed >= min, "{TOGGLES} toggles took only {elapsed:?}");
    assert!(elapsed <= max + SLACK, "{TOGGLES} toggles took {elapsed:?}");
}

#[test]
fn fifo_waiter_sees_every_green_in_order() {
    let light = TrafficLight::with_config(
        Config::default()
            .with_time_unit(UNIT)
            .with_delivery(Delivery::Fifo),
    )
    .unwrap();
    light.start().unwrap();

    let mut last = 0;
    for _ in 0..3 {
        let green = light.wait_for_green().unwrap();
        // Red is the starting phase, so greens are the odd toggles.
        assert_eq!(green.sequence % 2, 1);
        assert!(green.sequence > last);
        last = green.sequence;
    }
}

#[test]
fn wait_for_green_returns_within_one_cycle() {
    let light = fast_light();
    let max_cycle = light.config().max_cycle();
    light.start().unwrap();

    // Land somewhere in the middle of the light's life.
    thread::sleep(max_cycle + Duration::from_millis(13));

    let called = Instant::now();
    let green = light
        .wait_for_green_timeout(max_cycle + SLACK)
        .unwrap()
        .expect("green within one cycle");
    assert_eq!(green.phase, Phase::Green);
    assert!(called.elapsed() <= max_cycle + SLACK);
}

#[test]
fn stopping_the_light_releases_waiters() {
    let light = Arc::new(fast_light());
    light.start().unwrap();
    let waiter = {
        let light = Arc::clone(&light);
        thread::spawn(move || -> Result<(), Error> {
            // Keeps waiting until the light is torn down.
            loop {
                light.wait_for_green()?;
            }
        })
    };

    thread::sleep(Duration::from_millis(100));
    light.stop();

    assert!(matches!(waiter.join().unwrap(), Err(Error::Closed)));
}

#[test]
fn hand_off_queue_is_last_in_first_out() {
    let queue = MessageQueue::default();
    for phase in [Phase::Red, Phase::Green, Phase::Red] {
        queue.send(phase);
    }

    assert_eq!(queue.receive().unwrap(), Phase::Red);
    assert_eq!(queue.receive().unwrap(), Phase::Green);
    assert_eq!(queue.receive().unwrap(), Phase::Red);
    assert!(queue.is_empty());
}
