//! End-to-end door flows through `ControlService`.
//!
//! Events enter the way the firmware delivers them (reed levels, raw MQTT
//! messages, 100 ms ticks) and assertions are made on the port calls that
//! come out.

use garagedoor::app::events::AppEvent;
use garagedoor::app::ports::QoS;
use garagedoor::config::ControllerConfig;
use garagedoor::door::DoorState;
use garagedoor::events::{ControlEvent, SensorLevel};
use garagedoor::ControlService;

use super::mock_io::{IoCall, MockIo, RecordingSink};

const STATUS: &str = "garage_door/status";
const COMMAND: &str = "garage_door/buttonpress";

fn make_service() -> (ControlService, MockIo, RecordingSink) {
    (
        ControlService::new(ControllerConfig::default()),
        MockIo::new(),
        RecordingSink::default(),
    )
}

/// Tick until the default 15 s timeout has elapsed.
fn run_out_timer(svc: &mut ControlService, io: &mut MockIo, sink: &mut RecordingSink) {
    for _ in 0..150 {
        svc.tick(io, sink);
    }
}

fn reed(svc: &mut ControlService, io: &mut MockIo, sink: &mut RecordingSink, level: SensorLevel) {
    svc.handle(ControlEvent::Sensor(level), io, sink);
}

#[test]
fn bench_simulation_sequence() {
    let (mut svc, mut io, mut sink) = make_service();

    reed(&mut svc, &mut io, &mut sink, SensorLevel::Low);
    assert_eq!(svc.door_state(), DoorState::Closed, "initial door state");

    svc.handle_message(COMMAND, b"OPEN", &mut io, &mut sink);
    assert_eq!(svc.door_state(), DoorState::Opening, "after OPEN command");

    run_out_timer(&mut svc, &mut io, &mut sink);
    assert_eq!(svc.door_state(), DoorState::Open, "after opening timeout");

    svc.handle_message(COMMAND, b"CLOSE", &mut io, &mut sink);
    assert_eq!(svc.door_state(), DoorState::Closing, "after CLOSE command");

    reed(&mut svc, &mut io, &mut sink, SensorLevel::Low);
    assert_eq!(svc.door_state(), DoorState::Closed, "after door closed");

    reed(&mut svc, &mut io, &mut sink, SensorLevel::High);
    assert_eq!(svc.door_state(), DoorState::Opening, "opened from wall button");

    run_out_timer(&mut svc, &mut io, &mut sink);
    assert_eq!(svc.door_state(), DoorState::Open, "after opening timeout from sensor");

    svc.handle_message(COMMAND, b"CLOSE", &mut io, &mut sink);
    run_out_timer(&mut svc, &mut io, &mut sink);
    assert_eq!(svc.door_state(), DoorState::Unknown, "close never confirmed");

    reed(&mut svc, &mut io, &mut sink, SensorLevel::Low);
    assert_eq!(svc.door_state(), DoorState::Closed, "closed from unknown");

    assert_eq!(
        io.published_to(STATUS),
        [
            "closed", "opening", "open", "closing", "closed", "opening", "open", "closing",
            "unknown", "closed",
        ]
    );
    assert_eq!(io.pulses(), 3, "one relay pulse per command");
}

#[test]
fn status_is_published_qos0_retained() {
    let (mut svc, mut io, mut sink) = make_service();
    svc.handle(ControlEvent::Sensor(SensorLevel::Low), &mut io, &mut sink);
    assert_eq!(
        io.calls,
        vec![IoCall::Publish {
            topic: STATUS.into(),
            payload: "closed".into(),
            qos: QoS::AtMostOnce,
            retain: true,
        }]
    );
}

#[test]
fn command_pulses_relay_before_publishing() {
    let (mut svc, mut io, mut sink) = make_service();
    reed(&mut svc, &mut io, &mut sink, SensorLevel::Low);
    io.take_calls();

    svc.handle_message(COMMAND, b"OPEN", &mut io, &mut sink);
    assert_eq!(io.calls[0], IoCall::Pulse);
    assert!(matches!(&io.calls[1], IoCall::Publish { payload, .. } if payload == "opening"));
    assert_eq!(io.calls.len(), 2);
}

#[test]
fn redundant_commands_do_nothing() {
    let (mut svc, mut io, mut sink) = make_service();
    reed(&mut svc, &mut io, &mut sink, SensorLevel::Low);
    io.take_calls();
    sink.events.clear();

    let r = svc.handle_message(COMMAND, b"CLOSE", &mut io, &mut sink);
    assert!(!r.state_changed);
    assert!(io.calls.is_empty());
    assert!(sink.events.is_empty());
}

#[test]
fn reversal_while_opening_lands_closed_without_pulse() {
    let (mut svc, mut io, mut sink) = make_service();
    reed(&mut svc, &mut io, &mut sink, SensorLevel::Low);
    svc.handle_message(COMMAND, b"OPEN", &mut io, &mut sink);
    io.take_calls();

    for _ in 0..30 {
        svc.tick(&mut io, &mut sink);
    }
    reed(&mut svc, &mut io, &mut sink, SensorLevel::Low);

    assert_eq!(svc.door_state(), DoorState::Closed);
    assert!(!svc.door().is_timer_active());
    assert_eq!(io.pulses(), 0);
    assert_eq!(io.published_to(STATUS), ["closed"]);
}

#[test]
fn timer_fires_on_exact_boundary() {
    let (mut svc, mut io, mut sink) = make_service();
    svc.handle_message(COMMAND, b"OPEN", &mut io, &mut sink);

    for _ in 0..149 {
        assert!(!svc.tick(&mut io, &mut sink).state_changed);
    }
    let r = svc.tick(&mut io, &mut sink);
    assert!(r.state_changed);
    assert_eq!(r.new_state, DoorState::Open);
}

#[test]
fn ticks_while_settled_are_silent() {
    let (mut svc, mut io, mut sink) = make_service();
    reed(&mut svc, &mut io, &mut sink, SensorLevel::High);
    assert_eq!(svc.door_state(), DoorState::Open);
    io.take_calls();

    for _ in 0..500 {
        svc.tick(&mut io, &mut sink);
    }
    assert!(io.calls.is_empty());
}

#[test]
fn state_changes_reach_the_sink() {
    let (mut svc, mut io, mut sink) = make_service();
    reed(&mut svc, &mut io, &mut sink, SensorLevel::Low);
    svc.handle_message(COMMAND, b"OPEN", &mut io, &mut sink);

    assert_eq!(
        sink.events,
        vec![
            AppEvent::DoorStateChanged {
                from: DoorState::Unknown,
                to: DoorState::Closed,
            },
            AppEvent::DoorStateChanged {
                from: DoorState::Closed,
                to: DoorState::Opening,
            },
        ]
    );
}

#[test]
fn broker_outage_does_not_block_door_logic() {
    let (mut svc, mut io, mut sink) = make_service();
    io.broker_down = true;

    reed(&mut svc, &mut io, &mut sink, SensorLevel::Low);
    svc.handle_message(COMMAND, b"OPEN", &mut io, &mut sink);

    assert_eq!(svc.door_state(), DoorState::Opening);
    assert_eq!(io.pulses(), 1);
    assert!(io.published_to(STATUS).is_empty());
}

#[test]
fn test_mode_topics_isolate_the_bench_unit() {
    let mut config = ControllerConfig::default();
    config.topics = garagedoor::config::TopicConfig::test_mode();
    let mut svc = ControlService::new(config);
    let mut io = MockIo::new();
    let mut sink = RecordingSink::default();

    svc.handle_message(COMMAND, b"OPEN", &mut io, &mut sink);
    assert_eq!(svc.door_state(), DoorState::Unknown, "production topic ignored");

    svc.handle_message("garage_door/buttonpress_TEST", b"OPEN", &mut io, &mut sink);
    assert_eq!(svc.door_state(), DoorState::Opening);
    assert_eq!(io.published_to("garage_door/status_TEST"), ["opening"]);
}

#[test]
fn custom_timeout_is_honoured() {
    let config = ControllerConfig::from_json(r#"{ "door_timeout_ms": 2000 }"#).unwrap();
    let mut svc = ControlService::new(config);
    let mut io = MockIo::new();
    let mut sink = RecordingSink::default();

    svc.handle_message(COMMAND, b"CLOSE", &mut io, &mut sink);
    for _ in 0..20 {
        svc.tick(&mut io, &mut sink);
    }
    assert_eq!(svc.door_state(), DoorState::Unknown);
}
