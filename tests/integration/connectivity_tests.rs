//! WiFi and MQTT reconnection driven through `ControlService`.

use garagedoor::app::events::AppEvent;
use garagedoor::app::ports::QoS;
use garagedoor::config::ControllerConfig;
use garagedoor::door::DoorState;
use garagedoor::events::{ControlEvent, MqttSignal, SensorLevel, WifiSignal};
use garagedoor::ControlService;

use super::mock_io::{IoCall, MockIo, RecordingSink};

fn service_with(max_retries: u32, interval_ms: u32, auto_reconnect: bool) -> ControlService {
    let mut config = ControllerConfig::default();
    config.wifi_max_retries = max_retries;
    config.wifi_retry_interval_ms = interval_ms;
    config.broker.auto_reconnect = auto_reconnect;
    ControlService::new(config)
}

fn wifi(svc: &mut ControlService, io: &mut MockIo, sink: &mut RecordingSink, s: WifiSignal) {
    svc.handle(ControlEvent::Wifi(s), io, sink);
}

fn mqtt(svc: &mut ControlService, io: &mut MockIo, sink: &mut RecordingSink, s: MqttSignal) {
    svc.handle(ControlEvent::Mqtt(s), io, sink);
}

// ── WiFi ──────────────────────────────────────────────────────

#[test]
fn station_start_triggers_first_attempt() {
    let mut svc = service_with(10, 1_800_000, true);
    let (mut io, mut sink) = (MockIo::new(), RecordingSink::default());
    wifi(&mut svc, &mut io, &mut sink, WifiSignal::StaStarted);
    assert_eq!(io.calls, vec![IoCall::WifiConnect]);
    assert!(sink.events.is_empty());
}

#[test]
fn retries_then_backs_off_to_long_interval() {
    let mut svc = service_with(2, 60_000, true);
    let (mut io, mut sink) = (MockIo::new(), RecordingSink::default());

    for _ in 0..3 {
        wifi(&mut svc, &mut io, &mut sink, WifiSignal::Disconnected);
    }

    assert_eq!(
        io.calls,
        vec![
            IoCall::WifiConnect,
            IoCall::WifiConnect,
            IoCall::TimerStart { period_ms: 60_000 },
        ]
    );
    assert_eq!(
        sink.events,
        vec![
            AppEvent::WifiDisconnected { retry_count: 1 },
            AppEvent::WifiDisconnected { retry_count: 2 },
            AppEvent::WifiDisconnected { retry_count: 2 },
            AppEvent::WifiFailed { retry_count: 2 },
        ]
    );
    assert!(svc.wifi().timer_should_be_running());
}

#[test]
fn retry_timer_starts_a_fresh_cycle() {
    let mut svc = service_with(1, 60_000, true);
    let (mut io, mut sink) = (MockIo::new(), RecordingSink::default());
    wifi(&mut svc, &mut io, &mut sink, WifiSignal::Disconnected);
    wifi(&mut svc, &mut io, &mut sink, WifiSignal::Disconnected);
    io.take_calls();

    wifi(&mut svc, &mut io, &mut sink, WifiSignal::RetryTimerExpired);
    assert_eq!(io.calls, vec![IoCall::WifiConnect]);
    assert_eq!(svc.wifi().retry_count(), 0);

    // Still unreachable: one immediate retry, then back to failing.
    wifi(&mut svc, &mut io, &mut sink, WifiSignal::Disconnected);
    wifi(&mut svc, &mut io, &mut sink, WifiSignal::Disconnected);
    assert_eq!(
        io.take_calls(),
        vec![IoCall::WifiConnect, IoCall::WifiConnect, IoCall::TimerStart { period_ms: 60_000 }]
    );
}

#[test]
fn got_ip_stops_timer_and_starts_mqtt() {
    let mut svc = service_with(0, 60_000, true);
    let (mut io, mut sink) = (MockIo::new(), RecordingSink::default());
    wifi(&mut svc, &mut io, &mut sink, WifiSignal::Disconnected);
    io.take_calls();
    sink.events.clear();

    wifi(&mut svc, &mut io, &mut sink, WifiSignal::GotIp);
    assert_eq!(io.calls, vec![IoCall::TimerStop, IoCall::default_mqtt_start()]);
    assert_eq!(sink.events, vec![AppEvent::WifiConnected]);
    assert!(svc.wifi().is_connected());
    assert!(!svc.wifi().timer_should_be_running());
}

#[test]
fn got_ip_without_backoff_leaves_timer_alone() {
    let mut svc = service_with(10, 60_000, true);
    let (mut io, mut sink) = (MockIo::new(), RecordingSink::default());
    wifi(&mut svc, &mut io, &mut sink, WifiSignal::Disconnected);
    io.take_calls();

    wifi(&mut svc, &mut io, &mut sink, WifiSignal::GotIp);
    assert_eq!(io.calls, vec![IoCall::default_mqtt_start()]);
    assert_eq!(svc.wifi().retry_count(), 0);
}

// ── MQTT ──────────────────────────────────────────────────────

#[test]
fn broker_connect_announces_subscribes_and_resyncs() {
    let mut svc = service_with(10, 60_000, true);
    let mut io = MockIo::with_reed(SensorLevel::Low);
    let mut sink = RecordingSink::default();

    let r = svc.handle(ControlEvent::Mqtt(MqttSignal::Connected), &mut io, &mut sink);

    assert_eq!(r.new_state, DoorState::Closed);
    assert_eq!(
        io.calls,
        vec![
            IoCall::Publish {
                topic: "garage_door/availability".into(),
                payload: "available".into(),
                qos: QoS::AtMostOnce,
                retain: true,
            },
            IoCall::Subscribe {
                topic: "garage_door/buttonpress".into(),
            },
            IoCall::Subscribe {
                topic: "garage_door/status".into(),
            },
            IoCall::Publish {
                topic: "garage_door/status".into(),
                payload: "closed".into(),
                qos: QoS::AtMostOnce,
                retain: true,
            },
        ]
    );
    assert_eq!(sink.events[0], AppEvent::MqttConnected);
}

#[test]
fn resync_with_unchanged_door_publishes_nothing_new() {
    let mut svc = service_with(10, 60_000, true);
    let mut io = MockIo::with_reed(SensorLevel::Low);
    let mut sink = RecordingSink::default();
    svc.handle(ControlEvent::Sensor(SensorLevel::Low), &mut io, &mut sink);
    io.take_calls();

    mqtt(&mut svc, &mut io, &mut sink, MqttSignal::Connected);
    assert!(io.published_to("garage_door/status").is_empty());
}

#[test]
fn auto_reconnect_restarts_client() {
    let mut svc = service_with(10, 60_000, true);
    let (mut io, mut sink) = (MockIo::new(), RecordingSink::default());

    mqtt(&mut svc, &mut io, &mut sink, MqttSignal::Disconnected);
    mqtt(&mut svc, &mut io, &mut sink, MqttSignal::Disconnected);

    assert_eq!(io.count(&IoCall::default_mqtt_start()), 2);
    assert_eq!(
        sink.events,
        vec![
            AppEvent::MqttDisconnected { disconnect_count: 1 },
            AppEvent::MqttDisconnected { disconnect_count: 2 },
        ]
    );
}

#[test]
fn manual_reconnect_policy_only_reports() {
    let mut svc = service_with(10, 60_000, false);
    let (mut io, mut sink) = (MockIo::new(), RecordingSink::default());

    mqtt(&mut svc, &mut io, &mut sink, MqttSignal::Disconnected);
    assert!(io.calls.is_empty());
    assert_eq!(svc.mqtt().disconnect_count(), 1);
}

#[test]
fn disconnect_count_is_lifetime() {
    let mut svc = service_with(10, 60_000, true);
    let (mut io, mut sink) = (MockIo::new(), RecordingSink::default());
    for _ in 0..3 {
        mqtt(&mut svc, &mut io, &mut sink, MqttSignal::Disconnected);
        mqtt(&mut svc, &mut io, &mut sink, MqttSignal::Connected);
    }
    assert_eq!(svc.mqtt().disconnect_count(), 3);
    assert!(svc.mqtt().is_connected());
}

#[test]
fn connectivity_events_do_not_touch_the_door() {
    let mut svc = service_with(10, 60_000, true);
    let (mut io, mut sink) = (MockIo::new(), RecordingSink::default());
    svc.handle(ControlEvent::Sensor(SensorLevel::High), &mut io, &mut sink);

    for s in [WifiSignal::Disconnected, WifiSignal::GotIp, WifiSignal::RetryTimerExpired] {
        let r = svc.handle(ControlEvent::Wifi(s), &mut io, &mut sink);
        assert!(!r.state_changed);
    }
    let r = svc.handle(ControlEvent::Mqtt(MqttSignal::Disconnected), &mut io, &mut sink);
    assert!(!r.state_changed);
    assert_eq!(svc.door_state(), DoorState::Open);
}

#[test]
fn client_start_carries_broker_and_last_will() {
    let mut config = ControllerConfig::default();
    config.broker.host = "broker.local".try_into().unwrap();
    config.broker.port = 8883;
    config.topics.unavailable_payload = "gone".try_into().unwrap();
    let mut svc = ControlService::new(config);
    let (mut io, mut sink) = (MockIo::new(), RecordingSink::default());

    wifi(&mut svc, &mut io, &mut sink, WifiSignal::StaStarted);
    wifi(&mut svc, &mut io, &mut sink, WifiSignal::GotIp);
    mqtt(&mut svc, &mut io, &mut sink, MqttSignal::Connected);
    mqtt(&mut svc, &mut io, &mut sink, MqttSignal::Disconnected);

    let expected = IoCall::MqttStart {
        host: "broker.local".into(),
        port: 8883,
        will_topic: "garage_door/availability".into(),
        will_payload: "gone".into(),
        will_qos: QoS::AtMostOnce,
        will_retain: true,
    };
    assert_eq!(io.mqtt_starts(), 2);
    assert_eq!(io.count(&expected), 2);
}

#[test]
fn configured_qos_applies_to_every_broker_call() {
    let mut config = ControllerConfig::default();
    config.topics.qos = QoS::ExactlyOnce;
    let mut svc = ControlService::new(config);
    let mut io = MockIo::with_reed(SensorLevel::High);
    let mut sink = RecordingSink::default();

    mqtt(&mut svc, &mut io, &mut sink, MqttSignal::Disconnected);
    mqtt(&mut svc, &mut io, &mut sink, MqttSignal::Connected);

    for call in &io.calls {
        match call {
            IoCall::Publish { qos, .. } => assert_eq!(*qos, QoS::ExactlyOnce),
            IoCall::MqttStart { will_qos, .. } => assert_eq!(*will_qos, QoS::ExactlyOnce),
            _ => {}
        }
    }
    assert_eq!(io.published_to("garage_door/status"), vec!["open"]);
}

#[test]
fn failed_connect_attempts_still_follow_the_policy() {
    let mut svc = service_with(2, 60_000, true);
    let mut io = MockIo {
        wifi_down: true,
        ..MockIo::new()
    };
    let mut sink = RecordingSink::default();

    wifi(&mut svc, &mut io, &mut sink, WifiSignal::StaStarted);
    for _ in 0..3 {
        wifi(&mut svc, &mut io, &mut sink, WifiSignal::Disconnected);
    }

    assert_eq!(io.count(&IoCall::WifiConnect), 3);
    assert_eq!(io.count(&IoCall::TimerStart { period_ms: 60_000 }), 1);
    assert_eq!(sink.events.last(), Some(&AppEvent::WifiFailed { retry_count: 2 }));
}

#[test]
fn broken_retry_timer_does_not_block_recovery() {
    let mut svc = service_with(0, 60_000, true);
    let mut io = MockIo {
        timer_broken: true,
        ..MockIo::new()
    };
    let mut sink = RecordingSink::default();

    wifi(&mut svc, &mut io, &mut sink, WifiSignal::Disconnected);
    assert!(svc.wifi().timer_should_be_running());
    assert!(io.calls.is_empty());

    wifi(&mut svc, &mut io, &mut sink, WifiSignal::GotIp);
    assert!(svc.wifi().is_connected());
    assert!(!svc.wifi().timer_should_be_running());
    assert_eq!(io.calls, vec![IoCall::default_mqtt_start()]);
    assert_eq!(sink.events.last(), Some(&AppEvent::WifiConnected));
}
