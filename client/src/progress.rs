//! Progress channel: a standing duplex connection that streams upload
//! progress while the server imports a spreadsheet.
//!
//! The channel moves `Closed -> Connecting -> Open -> Closed`. Frames are
//! JSON `{"progress": <number>}` objects; each valid one is broadcast to
//! every live [`Subscription`]. Anything else is logged and dropped without
//! touching the connection. A connection turns `Open` on the connector's
//! `Opened` event, or on its first valid frame if that comes first.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use common::jobs::ProgressFrame;
use log::{debug, info, warn};

use crate::ports::{SocketConnector, SocketHandle};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ChannelError {
    #[error("could not open progress channel: {0}")]
    Connect(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Closed,
    Connecting,
    Open,
}

/// What a [`SocketConnector`] reports about the connection it opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Opened,
    Frame(String),
    Error(String),
    Closed,
}

type Listener = Rc<dyn Fn(u8)>;

struct Inner {
    state: ChannelState,
    // Bumped on every connect; events from older connections are ignored.
    generation: u64,
    handle: Option<Box<dyn SocketHandle>>,
    listeners: Vec<(u64, Listener)>,
    next_listener: u64,
}

/// Sink handed to the connector for one connection.
#[derive(Clone)]
pub struct ChannelEvents {
    generation: u64,
    inner: Weak<RefCell<Inner>>,
}

impl ChannelEvents {
    pub fn emit(&self, event: ChannelEvent) {
        if let Some(inner) = self.inner.upgrade() {
            handle_event(&inner, self.generation, event);
        }
    }
}

/// Parses one text frame into a percentage.
pub fn parse_frame(raw: &str) -> Result<u8, serde_json::Error> {
    serde_json::from_str::<ProgressFrame>(raw).map(|frame| frame.percent())
}

fn handle_event(inner: &Rc<RefCell<Inner>>, generation: u64, event: ChannelEvent) {
    let (progress, listeners) = {
        let mut channel = inner.borrow_mut();
        if channel.generation != generation || channel.state == ChannelState::Closed {
            debug!("ignoring {:?} from a stale progress connection", event);
            return;
        }

        match event {
            ChannelEvent::Opened => {
                channel.state = ChannelState::Open;
                info!("progress channel connected");
                return;
            }
            ChannelEvent::Error(reason) => {
                warn!("progress channel error: {}", reason);
                return;
            }
            ChannelEvent::Closed => {
                channel.state = ChannelState::Closed;
                channel.handle = None;
                info!("progress channel disconnected by peer");
                return;
            }
            ChannelEvent::Frame(raw) => match parse_frame(&raw) {
                Ok(progress) => {
                    channel.state = ChannelState::Open;
                    let listeners: Vec<Listener> =
                        channel.listeners.iter().map(|(_, l)| l.clone()).collect();
                    (progress, listeners)
                }
                Err(e) => {
                    warn!("dropping malformed progress frame {:?}: {}", raw, e);
                    return;
                }
            },
        }
    };

    // Listeners run without the borrow held so they may call back into the
    // channel (e.g. disconnect on completion).
    for listener in listeners {
        listener(progress);
    }
}

/// Cloneable handle to one progress connection slot.
///
/// At most one connection exists per channel: `connect` while connecting or
/// open is a no-op.
#[derive(Clone)]
pub struct ProgressChannel {
    url: String,
    connector: Rc<dyn SocketConnector>,
    inner: Rc<RefCell<Inner>>,
}

impl ProgressChannel {
    pub fn new(url: impl Into<String>, connector: Rc<dyn SocketConnector>) -> Self {
        Self {
            url: url.into(),
            connector,
            inner: Rc::new(RefCell::new(Inner {
                state: ChannelState::Closed,
                generation: 0,
                handle: None,
                listeners: Vec::new(),
                next_listener: 0,
            })),
        }
    }

    pub fn state(&self) -> ChannelState {
        self.inner.borrow().state
    }

    pub fn is_open(&self) -> bool {
        self.state() == ChannelState::Open
    }

    pub fn connect(&self) -> Result<(), ChannelError> {
        let generation = {
            let mut channel = self.inner.borrow_mut();
            if channel.state != ChannelState::Closed {
                debug!("progress channel already {:?}; connect ignored", channel.state);
                return Ok(());
            }
            channel.generation += 1;
            channel.state = ChannelState::Connecting;
            channel.generation
        };

        let events = ChannelEvents {
            generation,
            inner: Rc::downgrade(&self.inner),
        };

        match self.connector.open(&self.url, events) {
            Ok(mut handle) => {
                let mut channel = self.inner.borrow_mut();
                if channel.generation == generation && channel.state != ChannelState::Closed {
                    channel.handle = Some(handle);
                } else {
                    // Closed (or superseded) before `open` even returned.
                    drop(channel);
                    handle.close();
                }
                Ok(())
            }
            Err(e) => {
                let mut channel = self.inner.borrow_mut();
                if channel.generation == generation {
                    channel.state = ChannelState::Closed;
                }
                warn!("{}", e);
                Err(e)
            }
        }
    }

    /// Closes the connection if there is one. Safe to call repeatedly.
    pub fn disconnect(&self) {
        let handle = {
            let mut channel = self.inner.borrow_mut();
            channel.state = ChannelState::Closed;
            channel.handle.take()
        };
        if let Some(mut handle) = handle {
            handle.close();
            info!("progress channel closed");
        }
    }

    /// Registers `listener` for every valid frame until the returned
    /// subscription is dropped.
    pub fn subscribe(&self, listener: impl Fn(u8) + 'static) -> Subscription {
        let mut channel = self.inner.borrow_mut();
        let id = channel.next_listener;
        channel.next_listener += 1;
        channel.listeners.push((id, Rc::new(listener)));
        Subscription {
            id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Live registration of a progress listener.
pub struct Subscription {
    id: u64,
    inner: Weak<RefCell<Inner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            // `try_borrow_mut` because a listener may drop its own
            // subscription while frames are being dispatched.
            if let Ok(mut channel) = inner.try_borrow_mut() {
                channel.listeners.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeConnector;
    use std::cell::Cell;

    fn channel() -> (Rc<FakeConnector>, ProgressChannel) {
        let connector = Rc::new(FakeConnector::default());
        let channel = ProgressChannel::new("ws://localhost:8000/excel/ws/progress", connector.clone());
        (connector, channel)
    }

    fn recorder(channel: &ProgressChannel) -> (Rc<Cell<Option<u8>>>, Subscription) {
        let seen = Rc::new(Cell::new(None));
        let sink = seen.clone();
        let sub = channel.subscribe(move |p| sink.set(Some(p)));
        (seen, sub)
    }

    #[test]
    fn walks_through_connect_open_close() {
        let (connector, channel) = channel();
        assert_eq!(channel.state(), ChannelState::Closed);

        channel.connect().unwrap();
        assert_eq!(channel.state(), ChannelState::Connecting);
        assert_eq!(connector.opened_urls(), vec!["ws://localhost:8000/excel/ws/progress"]);

        connector.emit(ChannelEvent::Opened);
        assert!(channel.is_open());

        channel.disconnect();
        assert_eq!(channel.state(), ChannelState::Closed);
        assert_eq!(connector.close_count(), 1);
    }

    #[test]
    fn connect_is_idempotent_while_open() {
        let (connector, channel) = channel();
        channel.connect().unwrap();
        connector.emit(ChannelEvent::Opened);

        channel.connect().unwrap();
        channel.connect().unwrap();

        assert_eq!(connector.opened_urls().len(), 1);
        assert!(channel.is_open());
    }

    #[test]
    fn disconnect_is_idempotent() {
        let (connector, channel) = channel();
        channel.disconnect();
        channel.connect().unwrap();
        channel.disconnect();
        channel.disconnect();
        assert_eq!(connector.close_count(), 1);
    }

    #[test]
    fn valid_frame_reaches_subscribers() {
        let (connector, channel) = channel();
        let (seen, _sub) = recorder(&channel);
        channel.connect().unwrap();
        connector.emit(ChannelEvent::Opened);

        connector.emit(ChannelEvent::Frame(r#"{"progress": 42}"#.to_string()));

        assert_eq!(seen.get(), Some(42));
    }

    #[test]
    fn opened_event_marks_a_quiet_connection_open() {
        let (connector, channel) = channel();
        channel.connect().unwrap();
        assert_eq!(channel.state(), ChannelState::Connecting);

        connector.emit(ChannelEvent::Opened);

        assert!(channel.is_open());
    }

    #[test]
    fn first_valid_frame_opens_a_connection_without_open_event() {
        let (connector, channel) = channel();
        channel.connect().unwrap();
        connector.emit(ChannelEvent::Frame("nope".to_string()));
        assert_eq!(channel.state(), ChannelState::Connecting);

        connector.emit(ChannelEvent::Frame(r#"{"progress": 5}"#.to_string()));

        assert!(channel.is_open());
    }

    #[test]
    fn malformed_frame_is_dropped_and_channel_stays_open() {
        let (connector, channel) = channel();
        let (seen, _sub) = recorder(&channel);
        channel.connect().unwrap();
        connector.emit(ChannelEvent::Opened);
        connector.emit(ChannelEvent::Frame(r#"{"progress": 10}"#.to_string()));

        connector.emit(ChannelEvent::Frame("not json".to_string()));
        connector.emit(ChannelEvent::Frame(r#"{"percent": 90}"#.to_string()));

        assert_eq!(seen.get(), Some(10));
        assert!(channel.is_open());
        assert_eq!(connector.close_count(), 0);
    }

    #[test]
    fn dropping_subscription_stops_delivery() {
        let (connector, channel) = channel();
        let (seen, sub) = recorder(&channel);
        channel.connect().unwrap();
        assert_eq!(channel.subscriber_count(), 1);

        drop(sub);
        connector.emit(ChannelEvent::Frame(r#"{"progress": 5}"#.to_string()));

        assert_eq!(channel.subscriber_count(), 0);
        assert_eq!(seen.get(), None);
    }

    #[test]
    fn late_close_from_previous_connection_is_ignored() {
        let (connector, channel) = channel();
        channel.connect().unwrap();
        let old = connector.events().unwrap();
        channel.disconnect();

        channel.connect().unwrap();
        connector.emit(ChannelEvent::Opened);
        old.emit(ChannelEvent::Closed);

        assert!(channel.is_open());
    }

    #[test]
    fn peer_close_allows_reconnect() {
        let (connector, channel) = channel();
        channel.connect().unwrap();
        connector.emit(ChannelEvent::Opened);
        connector.emit(ChannelEvent::Closed);
        assert_eq!(channel.state(), ChannelState::Closed);

        channel.connect().unwrap();
        assert_eq!(connector.opened_urls().len(), 2);
    }

    #[test]
    fn failed_open_leaves_channel_closed() {
        let (connector, channel) = channel();
        connector.fail_next_open("refused");

        let err = channel.connect().unwrap_err();

        assert_eq!(err, ChannelError::Connect("refused".to_string()));
        assert_eq!(channel.state(), ChannelState::Closed);
    }
}
