//! Integration tests for pf-components driven through closure sinks.

use pf_components::{FlowDirection, Pipe, Point, Pump, Tank, Valve};
use std::sync::{Arc, Mutex};

fn collecting_sink() -> (impl Fn(&str) + Send + Sync, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let l = Arc::clone(&lines);
    (move |msg: &str| l.lock().unwrap().push(msg.to_owned()), lines)
}

#[test]
fn manual_transfer_between_tanks() {
    let mut a = Tank::new("A", 100.0, 20.0).unwrap().with_volume(30.0);
    let mut b = Tank::new("B", 50.0, 20.0).unwrap().with_volume(45.0);

    let removed = a.remove(20.0);
    let added = b.add(removed);
    a.add(removed - added);

    assert_eq!(removed, 20.0);
    assert_eq!(added, 5.0);
    assert_eq!(a.volume(), 25.0);
    assert!(b.is_full());
    assert_eq!(a.volume() + b.volume(), 75.0);
}

#[test]
fn pump_and_valves_report_every_change() {
    let (sink, lines) = collecting_sink();
    let mut pump = Pump::new("P12");
    let mut valve = Valve::new("T1 (T1-T2)", "pipe T1-T2");

    valve.set(true, &sink);
    pump.set_running(true, &sink);
    pump.set_speed(0.333, &sink);
    pump.stop(&sink);
    valve.set(false, &sink);

    assert_eq!(
        *lines.lock().unwrap(),
        vec![
            "Valve T1 (T1-T2) opened (pipe T1-T2)",
            "Pump P12 on",
            "Pump P12 speed: 33%",
            "Pump P12 off",
            "Pump P12 speed: 0%",
            "Valve T1 (T1-T2) closed (pipe T1-T2)",
        ]
    );
}

#[test]
fn pipe_flow_flag() {
    let mut pipe = Pipe::new(vec![
        Point::new(130.0, 400.0),
        Point::new(130.0, 460.0),
        Point::new(230.0, 460.0),
    ])
    .unwrap();
    assert!(!pipe.is_flowing());
    assert_eq!(pipe.length(), 160.0);

    pipe.set_flow(true, FlowDirection::Forward);
    assert!(pipe.is_flowing());
    assert_eq!(pipe.direction().sign(), 1);
}
