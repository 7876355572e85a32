//! Control service: the hexagonal core.
//!
//! [`ControlService`] owns the door machine and both reconnection
//! policies.  It is the single consumer of [`ControlEvent`]s: each event
//! is applied to the relevant machine, and the actions the machine
//! declares are executed through port traits injected at the call site.
//!
//! ```text
//!  ControlEvent ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                   │      ControlService       │
//!  ControllerIo ◀──│  Door · WiFi · MQTT        │
//!                   └──────────────────────────┘
//! ```
//!
//! Port failures are logged and swallowed.  Nothing a collaborator does
//! can leave the machines in an inconsistent state, because they were
//! updated before any action ran.

use log::{debug, info, warn};

use crate::config::{BrokerConfig, ControllerConfig, TopicConfig};
use crate::door::{DoorEvent, DoorMachine, DoorState, DoorTransitionResult};
use crate::events::{ControlEvent, MqttSignal, WifiSignal};
use crate::retry::{MqttRetryAction, MqttRetryState, WifiRetryAction, WifiRetryState};

use super::commands::{InboundMessage, parse_message};
use super::events::AppEvent;
use super::ports::{ControllerIo, EventSink, LastWill, MqttSession};

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

pub struct ControlService {
    door: DoorMachine,
    wifi: WifiRetryState,
    mqtt: MqttRetryState,
    broker: BrokerConfig,
    topics: TopicConfig,
    tick_period_ms: u32,
    relay_pulse_ms: u32,
    events_handled: u64,
}

impl ControlService {
    /// Build all three machines from configuration.  The door starts in
    /// `Unknown` until the reed switch or a command resolves it.
    pub fn new(config: ControllerConfig) -> Self {
        let door = DoorMachine::new(DoorState::Unknown, config.door_config());
        let wifi = WifiRetryState::new(config.wifi_max_retries, config.wifi_retry_interval_ms);
        let mqtt = MqttRetryState::new(config.broker.auto_reconnect);

        info!(
            "ControlService ready: door timeout {} ms, tick {} ms, wifi {} retries / {} ms",
            door.timeout_ms(),
            config.tick_period_ms,
            wifi.max_retries(),
            wifi.retry_interval_ms(),
        );

        Self {
            door,
            wifi,
            mqtt,
            broker: config.broker,
            topics: config.topics,
            tick_period_ms: config.tick_period_ms,
            relay_pulse_ms: config.relay_pulse_ms,
            events_handled: 0,
        }
    }

    // ── Dispatch ──────────────────────────────────────────────

    /// Apply one event and execute the resulting actions.
    ///
    /// Returns the door result produced along the way.  Connectivity
    /// events return an inert result, except an MQTT connect, which
    /// returns the result of the sensor resync it triggers.
    pub fn handle(
        &mut self,
        event: ControlEvent,
        io: &mut impl ControllerIo,
        sink: &mut impl EventSink,
    ) -> DoorTransitionResult {
        self.events_handled += 1;

        if let Some(door_event) = event.door_event() {
            if let ControlEvent::Command(cmd) = event {
                info!("Command {} received", cmd.as_str());
            }
            return self.apply_door_event(door_event, io, sink);
        }

        match event {
            ControlEvent::Tick { delta_ms } => {
                let from = self.door.state();
                let result = self.door.update_timer(delta_ms);
                if result.state_changed {
                    info!("Door timer expired, now {}", result.new_state);
                }
                self.execute_door_actions(from, result, io, sink);
                result
            }
            ControlEvent::SensorResync => self.resync_sensor(io, sink),
            ControlEvent::Wifi(signal) => {
                self.on_wifi(signal, io, sink);
                DoorTransitionResult::inert()
            }
            ControlEvent::Mqtt(signal) => self.on_mqtt(signal, io, sink),
            // Carry a door event; applied above.
            ControlEvent::Sensor(_) | ControlEvent::Command(_) => {
                DoorTransitionResult::unchanged(self.door.state())
            }
        }
    }

    /// Route an inbound MQTT message.  Commands are applied immediately.
    /// Every message counts once towards [`events_handled`](Self::events_handled).
    pub fn handle_message(
        &mut self,
        topic: &str,
        payload: &[u8],
        io: &mut impl ControllerIo,
        sink: &mut impl EventSink,
    ) -> DoorTransitionResult {
        match parse_message(&self.topics, topic, payload) {
            InboundMessage::Command(cmd) => self.handle(ControlEvent::Command(cmd), io, sink),
            InboundMessage::StatusEcho(state) => {
                self.events_handled += 1;
                debug!("Status echo on {}: {:?}", topic, state);
                DoorTransitionResult::unchanged(self.door.state())
            }
            InboundMessage::Ignored => {
                self.events_handled += 1;
                debug!("Ignoring message on {} ({} bytes)", topic, payload.len());
                DoorTransitionResult::unchanged(self.door.state())
            }
        }
    }

    /// Advance the door timer by one configured tick period.
    pub fn tick(&mut self, io: &mut impl ControllerIo, sink: &mut impl EventSink) -> DoorTransitionResult {
        self.handle(
            ControlEvent::Tick {
                delta_ms: self.tick_period_ms,
            },
            io,
            sink,
        )
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn door_state(&self) -> DoorState {
        self.door.state()
    }

    pub fn door(&self) -> &DoorMachine {
        &self.door
    }

    pub fn wifi(&self) -> &WifiRetryState {
        &self.wifi
    }

    pub fn mqtt(&self) -> &MqttRetryState {
        &self.mqtt
    }

    pub fn topics(&self) -> &TopicConfig {
        &self.topics
    }

    pub fn broker(&self) -> &BrokerConfig {
        &self.broker
    }

    pub fn tick_period_ms(&self) -> u32 {
        self.tick_period_ms
    }

    /// Configured relay closure, for building the relay adapter.
    pub fn relay_pulse_ms(&self) -> u32 {
        self.relay_pulse_ms
    }

    /// Broker session with the availability topic as last will.
    pub fn mqtt_session(&self) -> MqttSession<'_> {
        MqttSession {
            host: self.broker.host.as_str(),
            port: self.broker.port,
            will: LastWill {
                topic: self.topics.availability.as_str(),
                payload: self.topics.unavailable_payload.as_str(),
                qos: self.topics.qos,
                retain: true,
            },
        }
    }

    /// Control events plus inbound MQTT messages handled since construction.
    pub fn events_handled(&self) -> u64 {
        self.events_handled
    }

    // ── Door ──────────────────────────────────────────────────

    fn apply_door_event(
        &mut self,
        event: DoorEvent,
        io: &mut impl ControllerIo,
        sink: &mut impl EventSink,
    ) -> DoorTransitionResult {
        let from = self.door.state();
        let result = self.door.process_event(event);
        if result.state_changed {
            info!("Door {} -> {} on {:?}", from, result.new_state, event);
        } else {
            debug!("{:?} ignored in {}", event, from);
        }
        self.execute_door_actions(from, result, io, sink);
        result
    }

    fn resync_sensor(&mut self, io: &mut impl ControllerIo, sink: &mut impl EventSink) -> DoorTransitionResult {
        match io.level() {
            Ok(level) => self.apply_door_event(level.to_door_event(), io, sink),
            Err(e) => {
                warn!("Reed switch unreadable ({}), door stays {}", e, self.door.state());
                DoorTransitionResult::unchanged(self.door.state())
            }
        }
    }

    /// Translate declared door actions into port calls.
    fn execute_door_actions(
        &self,
        from: DoorState,
        result: DoorTransitionResult,
        io: &mut impl ControllerIo,
        sink: &mut impl EventSink,
    ) {
        let actions = result.actions;

        if actions.trigger_button_press {
            info!("Triggering button press");
            if let Err(e) = io.pulse() {
                warn!("Relay pulse failed: {}", e);
                sink.emit(&AppEvent::RelayFault);
            }
        }

        if actions.publish_state {
            let payload = result.new_state.as_str();
            info!("Publishing state: {}", payload);
            if let Err(e) = io.publish(self.topics.status.as_str(), payload, self.topics.qos, true) {
                warn!("Status publish failed: {}", e);
            }
        }

        if result.state_changed {
            sink.emit(&AppEvent::DoorStateChanged {
                from,
                to: result.new_state,
            });
        }
    }

    // ── WiFi ──────────────────────────────────────────────────

    fn on_wifi(&mut self, signal: WifiSignal, io: &mut impl ControllerIo, sink: &mut impl EventSink) {
        match signal {
            WifiSignal::StaStarted => {
                info!("WiFi station started, connecting");
                connect_wifi(io);
            }
            WifiSignal::Disconnected => {
                let result = self.wifi.on_disconnect();
                if result.should_callback_disconnected {
                    sink.emit(&AppEvent::WifiDisconnected {
                        retry_count: result.callback_retry_count,
                    });
                }
                match result.action {
                    WifiRetryAction::Connect => {
                        info!(
                            "WiFi retry {}/{}",
                            result.callback_retry_count,
                            self.wifi.max_retries()
                        );
                        connect_wifi(io);
                    }
                    WifiRetryAction::Fail => {
                        warn!(
                            "WiFi retries exhausted, next attempt in {} ms",
                            self.wifi.retry_interval_ms()
                        );
                        if let Err(e) = io.start_timer(self.wifi.retry_interval_ms()) {
                            warn!("Retry timer start failed: {}", e);
                        }
                    }
                    WifiRetryAction::StopTimer | WifiRetryAction::None => {}
                }
                if result.should_callback_failed {
                    sink.emit(&AppEvent::WifiFailed {
                        retry_count: result.callback_retry_count,
                    });
                }
            }
            WifiSignal::GotIp => {
                let result = self.wifi.on_connected();
                if result.action == WifiRetryAction::StopTimer {
                    info!("WiFi back, stopping retry timer");
                    if let Err(e) = io.stop_timer() {
                        warn!("Retry timer stop failed: {}", e);
                    }
                }
                if result.should_callback_connected {
                    info!("WiFi connected");
                    sink.emit(&AppEvent::WifiConnected);
                    self.start_mqtt(io);
                }
            }
            WifiSignal::RetryTimerExpired => {
                let result = self.wifi.on_timer_expired();
                if result.action == WifiRetryAction::Connect {
                    info!("WiFi retry timer fired, starting a fresh attempt cycle");
                    connect_wifi(io);
                }
            }
        }
    }

    // ── MQTT ──────────────────────────────────────────────────

    fn on_mqtt(
        &mut self,
        signal: MqttSignal,
        io: &mut impl ControllerIo,
        sink: &mut impl EventSink,
    ) -> DoorTransitionResult {
        match signal {
            MqttSignal::Connected => {
                let result = self.mqtt.on_connected();
                if !result.should_callback_connected {
                    return DoorTransitionResult::inert();
                }
                info!("MQTT connected");
                self.announce_online(io);
                sink.emit(&AppEvent::MqttConnected);
                self.resync_sensor(io, sink)
            }
            MqttSignal::Disconnected => {
                let result = self.mqtt.on_disconnect();
                if result.should_callback_disconnected {
                    sink.emit(&AppEvent::MqttDisconnected {
                        disconnect_count: self.mqtt.disconnect_count(),
                    });
                }
                if result.action == MqttRetryAction::Reconnect {
                    info!(
                        "MQTT auto-reconnecting (disconnect #{})",
                        self.mqtt.disconnect_count()
                    );
                    self.start_mqtt(io);
                }
                DoorTransitionResult::inert()
            }
        }
    }

    fn start_mqtt(&self, io: &mut impl ControllerIo) {
        let session = self.mqtt_session();
        debug!("MQTT start {}:{}", session.host, session.port);
        if let Err(e) = io.start(&session) {
            warn!("MQTT start failed: {}", e);
        }
    }

    /// Mark the controller available and subscribe to its topics.
    fn announce_online(&self, io: &mut impl ControllerIo) {
        let t = &self.topics;
        if let Err(e) = io.publish(t.availability.as_str(), t.available_payload.as_str(), t.qos, true) {
            warn!("Availability publish failed: {}", e);
        }
        for topic in [t.command.as_str(), t.status.as_str()] {
            if let Err(e) = io.subscribe(topic, t.qos) {
                warn!("Subscribe to {} failed: {}", topic, e);
            }
        }
    }
}

fn connect_wifi(io: &mut impl ControllerIo) {
    if let Err(e) = io.connect() {
        warn!("WiFi connect failed: {}", e);
    }
}
