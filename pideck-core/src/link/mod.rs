//! Per-connection tick engine
//!
//! A [`Link`] owns the transport, the line framer and the handshake state of
//! one connection. Each [`Link::poll`] is one tick: read what the port has,
//! frame it, hand every frame to the handshake (while pending) or to the
//! decoder (once complete), acknowledge decoded UI commands and return the
//! events in arrival order.

mod error;

pub use error::LinkError;

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use pideck_hal::Serial;
use pideck_protocol::{
    decode, Command, DecodeError, Event, Frame, Incoming, LineFramer, Outgoing, LOADING_ONLINE,
    LOADING_WAITING,
};

use crate::config::LinkConfig;
use crate::state::{Handshake, HandshakeError, HandshakeState, Role};
use crate::traits::DispatchSink;

/// Buffer size for one port read
pub const RX_BUF_SIZE: usize = 256;

/// Upper bound on port reads within one tick
const MAX_READS_PER_TICK: usize = 64;

/// A line that named a known verb but failed to decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub line: String,
    pub error: DecodeError,
}

/// Everything one tick produced
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tick {
    /// Events in frame arrival order; a loading status comes first
    pub events: Vec<Event>,
    /// Lines dropped without acknowledgement
    pub rejected: Vec<Rejected>,
}

impl Tick {
    /// Returns true if the tick produced no events and no rejections
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.rejected.is_empty()
    }

    /// UI commands decoded during the tick
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.events.iter().filter_map(Event::command)
    }
}

/// One end of the serial link
pub struct Link<T> {
    transport: T,
    handshake: Handshake,
    framer: LineFramer,
    /// Frames that arrived with the handshake reply, processed on the next poll
    backlog: VecDeque<Frame>,
    acks_sent: usize,
}

impl<T: Serial> Link<T> {
    /// Create a link with a pending handshake
    pub fn new(transport: T, role: Role) -> Self {
        Self {
            transport,
            handshake: Handshake::new(role),
            framer: LineFramer::new(),
            backlog: VecDeque::new(),
            acks_sent: 0,
        }
    }

    /// Create a link using the role and line limit from `config`
    pub fn with_config(transport: T, config: &LinkConfig) -> Self {
        let mut link = Self::new(transport, config.role);
        link.framer = LineFramer::with_max_line_len(config.max_line_len);
        link
    }

    pub fn role(&self) -> Role {
        self.handshake.role()
    }

    pub fn state(&self) -> HandshakeState {
        self.handshake.state()
    }

    /// Returns true once the handshake has completed
    pub fn is_online(&self) -> bool {
        self.handshake.is_complete()
    }

    /// Number of `ok` lines sent so far
    pub fn acks_sent(&self) -> usize {
        self.acks_sent
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Close the link and give the transport back
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Run one tick
    ///
    /// Transport errors abort the tick and are returned as-is; decode
    /// failures are collected in [`Tick::rejected`] and processing continues
    /// with the next frame.
    pub fn poll(&mut self) -> Result<Tick, LinkError<T::Error>> {
        let was_pending = !self.is_online();

        let mut frames: Vec<Frame> = self.backlog.drain(..).collect();
        frames.extend(self.read_frames()?);

        let mut tick = Tick::default();
        for frame in &frames {
            if !self.is_online() {
                self.handshake_step(frame)?;
                continue;
            }

            match self.decode_frame(frame) {
                Ok(Some(event)) => tick.events.push(event),
                Ok(None) => {}
                Err(LinkError::Decode(error)) => {
                    warn!("rejected line: {}", error);
                    tick.rejected.push(Rejected {
                        line: String::from(frame.text()),
                        error,
                    });
                }
                Err(err) => return Err(err),
            }
        }

        if was_pending && self.role() == Role::Device {
            let text = if self.is_online() {
                LOADING_ONLINE
            } else {
                LOADING_WAITING
            };
            tick.events.insert(0, Event::loading(text));
        }

        Ok(tick)
    }

    /// Run one tick and hand the results to `sink`
    ///
    /// `on_events` is called once per tick, even when nothing happened.
    pub fn dispatch<S: DispatchSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<(), LinkError<T::Error>> {
        let tick = self.poll()?;
        for rejected in &tick.rejected {
            sink.on_rejected(&rejected.line, &rejected.error);
        }
        sink.on_events(&tick.events);
        Ok(())
    }

    /// Step the handshake with one frame, sending the reply if there is one
    ///
    /// Fails with [`HandshakeError::AlreadyComplete`] once the link is
    /// online; nothing is sent and the state is left as it was.
    pub fn handshake_step(&mut self, frame: &Frame) -> Result<HandshakeState, LinkError<T::Error>> {
        let step = self.handshake.next(frame)?;
        trace!("handshake step as {}: '{}'", self.role(), frame.text());

        if let Some(reply) = step.reply {
            self.send(reply)?;
        }
        self.handshake.advance(&step);

        if step.state == HandshakeState::Complete {
            info!("handshake complete as {}", self.role());
        }
        Ok(step.state)
    }

    /// Decode one frame, acknowledging it if it is a UI command
    ///
    /// Returns `Ok(None)` for blank lines and unknown verbs.
    pub fn decode_frame(&mut self, frame: &Frame) -> Result<Option<Event>, LinkError<T::Error>> {
        if !self.is_online() {
            return Err(LinkError::NotReady);
        }

        let Some(incoming) = decode(frame.text())? else {
            if !frame.is_empty() {
                trace!("ignoring line: '{}'", frame.text());
            }
            return Ok(None);
        };

        if let Incoming::Command(command) = &incoming {
            self.send(Outgoing::Ack)?;
            self.acks_sent += 1;
            debug!("acknowledged {}", command.verb());
        }

        Ok(Some(incoming.into()))
    }

    /// Tell every peer that a broadcasting button fired
    pub fn send_broadcast(&mut self, token: &str) -> Result<(), LinkError<T::Error>> {
        self.ensure_online()?;
        debug!("broadcasting '{}'", token);
        self.send(Outgoing::BroadcastReceive(token))
    }

    /// Re-emit a UI command to the downstream display
    pub fn send_command(&mut self, command: &Command) -> Result<(), LinkError<T::Error>> {
        if self.role() != Role::Host {
            return Err(LinkError::WrongRole {
                required: Role::Host,
            });
        }
        self.ensure_online()?;
        self.send(Outgoing::Command(command))
    }

    /// Block until the device asks for the handshake (host only)
    ///
    /// Each attempt polls the port once, steps the handshake with every
    /// frame read, and sleeps `delay_ms` if the handshake is still pending.
    /// `budget` caps the number of attempts; `None` waits forever.
    pub fn wait_for_handshake<D: DelayNs>(
        &mut self,
        budget: Option<u32>,
        delay_ms: u32,
        delay: &mut D,
    ) -> Result<(), LinkError<T::Error>> {
        if self.role() != Role::Host {
            return Err(LinkError::WrongRole {
                required: Role::Host,
            });
        }
        if self.is_online() {
            return Err(HandshakeError::AlreadyComplete.into());
        }

        let mut attempts: u32 = 0;
        loop {
            if budget.is_some_and(|budget| attempts >= budget) {
                warn!("no handshake after {} attempts", attempts);
                return Err(LinkError::Timeout);
            }
            attempts += 1;

            let mut frames = self.read_frames()?.into_iter();
            while let Some(frame) = frames.next() {
                if self.handshake_step(&frame)? == HandshakeState::Complete {
                    self.backlog.extend(frames.filter(|frame| !frame.is_empty()));
                    return Ok(());
                }
            }

            delay.delay_ms(delay_ms);
        }
    }

    /// [`Link::wait_for_handshake`] with the budget and delay from `config`
    pub fn wait_for_handshake_with<D: DelayNs>(
        &mut self,
        config: &LinkConfig,
        delay: &mut D,
    ) -> Result<(), LinkError<T::Error>> {
        self.wait_for_handshake(config.handshake_budget, config.handshake_delay_ms, delay)
    }

    /// Dispatch `ticks` ticks to `sink`, sleeping `config.poll_interval_ms` after each
    pub fn run<S: DispatchSink + ?Sized, D: DelayNs>(
        &mut self,
        sink: &mut S,
        config: &LinkConfig,
        delay: &mut D,
        ticks: u32,
    ) -> Result<(), LinkError<T::Error>> {
        for _ in 0..ticks {
            self.dispatch(sink)?;
            delay.delay_ms(config.poll_interval_ms);
        }
        Ok(())
    }

    /// Forget the handshake and any buffered input, as after reopening the port
    pub fn reset(&mut self) {
        self.handshake = Handshake::new(self.role());
        self.framer.reset();
        self.backlog.clear();
        info!("link reset as {}", self.role());
    }

    fn ensure_online(&self) -> Result<(), LinkError<T::Error>> {
        if self.is_online() {
            Ok(())
        } else {
            Err(LinkError::NotReady)
        }
    }

    fn send(&mut self, message: Outgoing<'_>) -> Result<(), LinkError<T::Error>> {
        let line = message.to_line();
        let result = self
            .transport
            .write_all(line.as_bytes())
            .and_then(|()| self.transport.flush());

        if let Err(err) = result {
            warn!("serial write failed");
            return Err(LinkError::Transport(err));
        }
        trace!("sent '{}'", line.trim_end());
        Ok(())
    }

    /// Read what the port has buffered and frame it
    fn read_frames(&mut self) -> Result<Vec<Frame>, LinkError<T::Error>> {
        let mut bytes = Vec::new();
        let mut buf = [0u8; RX_BUF_SIZE];

        for _ in 0..MAX_READS_PER_TICK {
            let n = match self.transport.read_available(&mut buf) {
                Ok(n) => n,
                Err(err) => {
                    warn!("serial read failed");
                    return Err(LinkError::Transport(err));
                }
            };
            bytes.extend_from_slice(&buf[..n]);
            if n < buf.len() {
                break;
            }
        }

        let dropped = self.framer.dropped_bytes();
        let frames = self.framer.push(&bytes);
        let overflow = self.framer.dropped_bytes() - dropped;
        if overflow > 0 {
            warn!("dropped {} bytes of an overlong line", overflow);
        }
        if !bytes.is_empty() {
            trace!("read {} bytes into {} frames", bytes.len(), frames.len());
        }

        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pideck_hal::mock::{MockError, MockSerial};
    use pideck_protocol::{ColorKind, Verb, HANDSHAKE_COMPLETE, HANDSHAKE_INIT};
    use proptest::prelude::*;

    /// Counts delays instead of sleeping
    #[derive(Default)]
    struct CountingDelay {
        calls: u32,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, _ms: u32) {
            self.calls += 1;
        }
    }

    fn online(role: Role) -> Link<MockSerial> {
        let mut link = Link::new(MockSerial::new(), role);
        let line = match role {
            Role::Host => HANDSHAKE_INIT,
            Role::Device => HANDSHAKE_COMPLETE,
        };
        link.transport_mut().push_line(line);
        link.poll().unwrap();
        assert!(link.is_online());
        link.transport_mut().take_sent();
        link
    }

    fn sent(link: &mut Link<MockSerial>) -> Vec<String> {
        link.transport_mut().take_sent()
    }

    #[test]
    fn test_device_sends_init_every_pending_tick() {
        let mut link = Link::new(MockSerial::new(), Role::Device);

        let tick = link.poll().unwrap();
        assert_eq!(sent(&mut link), vec![HANDSHAKE_INIT]);
        assert_eq!(tick.events, vec![Event::loading(LOADING_WAITING)]);

        link.transport_mut().push_line("some noise");
        let tick = link.poll().unwrap();
        assert_eq!(sent(&mut link), vec![HANDSHAKE_INIT]);
        assert_eq!(tick.events, vec![Event::loading(LOADING_WAITING)]);
        assert_eq!(link.state(), HandshakeState::Pending);

        link.transport_mut().push_line(HANDSHAKE_COMPLETE);
        let tick = link.poll().unwrap();
        assert_eq!(sent(&mut link), vec![HANDSHAKE_INIT]);
        assert_eq!(tick.events, vec![Event::loading(LOADING_ONLINE)]);
        assert_eq!(link.state(), HandshakeState::Complete);

        // Online: no more inits, no more loading status
        let tick = link.poll().unwrap();
        assert!(sent(&mut link).is_empty());
        assert!(tick.is_empty());
    }

    #[test]
    fn test_host_replies_once() {
        let mut link = Link::new(MockSerial::new(), Role::Host);

        let tick = link.poll().unwrap();
        assert!(tick.is_empty());
        assert!(sent(&mut link).is_empty());

        link.transport_mut()
            .push_line("xx handshake stage1 init yy");
        link.poll().unwrap();
        assert_eq!(sent(&mut link), vec![HANDSHAKE_COMPLETE]);
        assert!(link.is_online());

        let again = link.handshake_step(&Frame::new(HANDSHAKE_INIT));
        assert_eq!(
            again,
            Err(LinkError::Handshake(HandshakeError::AlreadyComplete))
        );
        assert!(sent(&mut link).is_empty());
        assert!(link.is_online());
    }

    #[test]
    fn test_button_decoded_and_acked_once() {
        let mut link = online(Role::Device);
        link.transport_mut()
            .push_line(r#"ui button 0 0 1 1 "Hello world! Howdy!" dispatch nop"#);

        let tick = link.poll().unwrap();
        assert_eq!(
            tick.events,
            vec![Event::Command(Command::Button {
                x: 0,
                y: 0,
                x_span: 1,
                y_span: 1,
                text: "Hello world! Howdy!".into(),
                broadcast: false,
                message: "nop".into(),
            })]
        );
        assert_eq!(sent(&mut link), vec!["ok"]);
        assert_eq!(link.acks_sent(), 1);
    }

    #[test]
    fn test_broadcast_button_then_send_broadcast() {
        let mut link = online(Role::Device);
        link.transport_mut().push_line(
            r#"ui button 3 0 1 1 "Different bg and text color!" broadcast uuid_here"#,
        );

        let tick = link.poll().unwrap();
        let command = tick.commands().next().unwrap();
        assert!(matches!(
            command,
            Command::Button { broadcast: true, message, .. } if message == "uuid_here"
        ));
        assert_eq!(sent(&mut link), vec!["ok"]);

        link.send_broadcast("uuid_here").unwrap();
        assert_eq!(link.transport().sent(), b"broadcast recieve uuid_here\n");
    }

    #[test]
    fn test_unknown_line_is_silent() {
        let mut link = online(Role::Device);
        link.transport_mut().push_line("foo bar");

        let tick = link.poll().unwrap();
        assert!(tick.is_empty());
        assert!(link.transport().sent().is_empty());
    }

    #[test]
    fn test_malformed_line_rejected_without_ack() {
        let mut link = online(Role::Device);
        link.transport_mut().push_line("ui bgcolor 3 0");
        link.transport_mut().push_line("ui clean 5 3 dark");

        // One chunk per read, short reads end the tick
        let tick = link.poll().unwrap();
        assert!(tick.events.is_empty());
        assert_eq!(
            tick.rejected,
            vec![Rejected {
                line: "ui bgcolor 3 0".into(),
                error: DecodeError::Arity {
                    verb: Verb::BgColor,
                    expected: 5,
                    found: 4
                },
            }]
        );

        assert_eq!(link.transport().pending_chunks(), 1);
        let tick = link.poll().unwrap();
        assert_eq!(
            tick.rejected[0].error,
            DecodeError::Unsupported { verb: Verb::Clean }
        );
        assert!(link.transport().sent().is_empty());
        assert_eq!(link.acks_sent(), 0);
    }

    #[test]
    fn test_command_split_across_polls() {
        let mut link = online(Role::Device);

        link.transport_mut().push_rx(b"ui clean 4");
        let tick = link.poll().unwrap();
        assert!(tick.is_empty());
        assert!(link.transport().sent().is_empty());

        link.transport_mut().push_rx(b" 3\nui bg");
        let tick = link.poll().unwrap();
        assert_eq!(
            tick.events,
            vec![Event::Command(Command::Clean {
                width: 4,
                height: 3
            })]
        );
        assert_eq!(sent(&mut link), vec!["ok"]);
    }

    #[test]
    fn test_events_keep_arrival_order() {
        let mut link = online(Role::Device);
        link.transport_mut()
            .push_rx(b"ui clean 2 2\nfoo\nui bgcolor 0 0 red\nui bgcolor x 0 red\n");

        let tick = link.poll().unwrap();
        let verbs: Vec<Verb> = tick.commands().map(Command::verb).collect();
        assert_eq!(verbs, vec![Verb::Clean, Verb::BgColor]);
        assert_eq!(tick.rejected.len(), 1);
        assert_eq!(sent(&mut link), vec!["ok", "ok"]);
    }

    #[test]
    fn test_commands_in_handshake_burst() {
        let mut link = Link::new(MockSerial::new(), Role::Device);
        link.transport_mut()
            .push_rx(b"handshake stage1 complete\nui clean 1 1\n");

        let tick = link.poll().unwrap();
        assert_eq!(
            tick.events,
            vec![
                Event::loading(LOADING_ONLINE),
                Event::Command(Command::Clean {
                    width: 1,
                    height: 1
                }),
            ]
        );
        assert_eq!(sent(&mut link), vec![HANDSHAKE_INIT, "ok"]);
    }

    #[test]
    fn test_contract_violations_before_handshake() {
        let mut link = Link::new(MockSerial::new(), Role::Device);

        assert_eq!(
            link.decode_frame(&Frame::new("ui clean 1 1")),
            Err(LinkError::NotReady)
        );
        assert_eq!(link.send_broadcast("token"), Err(LinkError::NotReady));
        assert_eq!(link.state(), HandshakeState::Pending);
        assert!(link.transport().sent().is_empty());
    }

    #[test]
    fn test_send_command_host_only() {
        let command = Command::Color {
            kind: ColorKind::Text,
            x: 1,
            y: 1,
            color: "#00FF00".into(),
        };

        let mut device = online(Role::Device);
        assert_eq!(
            device.send_command(&command),
            Err(LinkError::WrongRole {
                required: Role::Host
            })
        );

        let mut host = online(Role::Host);
        host.send_command(&command).unwrap();
        assert_eq!(sent(&mut host), vec!["ui textcolor 1 1 '#00FF00'"]);
    }

    #[test]
    fn test_host_receives_replies_without_acking() {
        let mut link = online(Role::Host);
        link.transport_mut()
            .push_rx(b"ok\nbroadcast recieve uuid_here\n");

        let tick = link.poll().unwrap();
        assert_eq!(
            tick.events,
            vec![
                Event::Ack,
                Event::Broadcast {
                    token: "uuid_here".into()
                }
            ]
        );
        assert!(link.transport().sent().is_empty());
    }

    #[test]
    fn test_wait_for_handshake_times_out() {
        let mut link = Link::new(MockSerial::new(), Role::Host);
        let mut delay = CountingDelay::default();

        let result = link.wait_for_handshake(Some(3), 500, &mut delay);
        assert_eq!(result, Err(LinkError::Timeout));
        assert_eq!(delay.calls, 3);
        assert_eq!(link.transport().reads(), 3);
        assert_eq!(link.state(), HandshakeState::Pending);
    }

    #[test]
    fn test_wait_for_handshake_completes() {
        let mut link = Link::new(MockSerial::new(), Role::Host);
        link.transport_mut().push_rx(b"");
        link.transport_mut()
            .push_rx(b"handshake stage1 init\nok\n");
        let mut delay = CountingDelay::default();

        link.wait_for_handshake(None, 500, &mut delay).unwrap();
        assert_eq!(delay.calls, 1);
        assert_eq!(sent(&mut link), vec![HANDSHAKE_COMPLETE]);

        // The line after the init is not lost
        let tick = link.poll().unwrap();
        assert_eq!(tick.events, vec![Event::Ack]);

        let again = link.wait_for_handshake(Some(1), 500, &mut delay);
        assert_eq!(
            again,
            Err(LinkError::Handshake(HandshakeError::AlreadyComplete))
        );
    }

    #[test]
    fn test_wait_for_handshake_host_only() {
        let mut link = Link::new(MockSerial::new(), Role::Device);
        let mut delay = CountingDelay::default();
        assert_eq!(
            link.wait_for_handshake(Some(1), 500, &mut delay),
            Err(LinkError::WrongRole {
                required: Role::Host
            })
        );
    }

    #[test]
    fn test_transport_failure_propagates() {
        let mut link = online(Role::Device);
        link.transport_mut().disconnect();
        assert_eq!(
            link.poll(),
            Err(LinkError::Transport(MockError::Disconnected))
        );
        assert!(link.is_online());
    }

    #[test]
    fn test_large_line_read_in_one_tick() {
        let mut link = online(Role::Device);
        let payload = "QUJD".repeat(200);
        link.transport_mut()
            .push_line(&format!("ui icon 0 0 {payload}"));

        let tick = link.poll().unwrap();
        assert_eq!(
            tick.events,
            vec![Event::Command(Command::Icon {
                x: 0,
                y: 0,
                payload_base64: payload,
            })]
        );
    }

    #[test]
    fn test_dispatch_to_sink() {
        #[derive(Default)]
        struct Recorder {
            events: Vec<Event>,
            ticks: usize,
            rejected: Vec<String>,
        }

        impl DispatchSink for Recorder {
            fn on_events(&mut self, events: &[Event]) {
                self.ticks += 1;
                self.events.extend_from_slice(events);
            }

            fn on_rejected(&mut self, line: &str, _error: &DecodeError) {
                self.rejected.push(line.into());
            }
        }

        let mut link = Link::new(MockSerial::new(), Role::Device);
        let mut sink = Recorder::default();

        link.transport_mut()
            .push_rx(b"handshake stage1 complete\nui clean 3\n");
        link.dispatch(&mut sink).unwrap();
        link.dispatch(&mut sink).unwrap();

        assert_eq!(sink.ticks, 2);
        assert_eq!(sink.events, vec![Event::loading(LOADING_ONLINE)]);
        assert_eq!(sink.rejected, vec!["ui clean 3"]);
    }

    #[test]
    fn test_with_config_limits_line_length() {
        let config = LinkConfig {
            max_line_len: 16,
            ..LinkConfig::default()
        };
        let mut link = Link::with_config(MockSerial::new(), &config);
        assert_eq!(link.role(), Role::Device);

        link.transport_mut()
            .push_rx(b"handshake stage1 complete\n");
        link.poll().unwrap();
        assert!(!link.is_online());
    }

    #[test]
    fn test_wait_for_handshake_with_config() {
        let config = LinkConfig::from_toml(
            r#"
            role = "host"
            handshake_budget = 2
            handshake_delay_ms = 100
            "#,
        )
        .unwrap();
        let mut link = Link::with_config(MockSerial::new(), &config);
        let mut delay = CountingDelay::default();

        assert_eq!(
            link.wait_for_handshake_with(&config, &mut delay),
            Err(LinkError::Timeout)
        );
        assert_eq!(delay.calls, 2);

        link.transport_mut().push_line(HANDSHAKE_INIT);
        link.wait_for_handshake_with(&config, &mut delay).unwrap();
        assert!(link.is_online());
    }

    #[test]
    fn test_run_sleeps_between_ticks() {
        let config = LinkConfig::default();
        let mut link = Link::with_config(MockSerial::new(), &config);
        let mut delay = CountingDelay::default();
        let mut events: Vec<Event> = Vec::new();

        link.transport_mut().push_line(HANDSHAKE_COMPLETE);
        link.transport_mut().push_line("ui clean 1 1");
        link.run(&mut events, &config, &mut delay, 3).unwrap();

        assert_eq!(delay.calls, 3);
        assert_eq!(
            events,
            vec![
                Event::loading(LOADING_ONLINE),
                Event::Command(Command::Clean {
                    width: 1,
                    height: 1
                }),
            ]
        );
    }

    #[test]
    fn test_reset_restarts_handshake() {
        let mut link = online(Role::Device);
        link.transport_mut().push_rx(b"ui clean 2");
        link.poll().unwrap();

        link.reset();
        assert_eq!(link.state(), HandshakeState::Pending);

        // The partial line is gone, the device announces itself again
        link.transport_mut().push_rx(b" 2\n");
        let tick = link.poll().unwrap();
        assert_eq!(tick.events, vec![Event::loading(LOADING_WAITING)]);
        assert_eq!(sent(&mut link), vec![HANDSHAKE_INIT]);
    }

    proptest! {
        #[test]
        fn prop_split_command_acked_once(width in 0u32..100, height in 0u32..100, cut in 0usize..32) {
            let line = format!("ui clean {width} {height}\n");
            let cut = cut.min(line.len());

            let mut link = online(Role::Device);
            link.transport_mut().push_rx(&line.as_bytes()[..cut]);
            let first = link.poll().unwrap();
            link.transport_mut().push_rx(&line.as_bytes()[cut..]);
            let second = link.poll().unwrap();

            let commands: Vec<Command> = first
                .commands()
                .chain(second.commands())
                .cloned()
                .collect();
            prop_assert_eq!(commands, vec![Command::Clean { width, height }]);
            prop_assert_eq!(link.acks_sent(), 1);
            prop_assert_eq!(sent(&mut link), vec!["ok"]);
        }
    }
}
