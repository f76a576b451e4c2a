use client::progress::{ChannelError, ChannelEvent, ChannelEvents};
use client::ports::SocketHandle;
use client::SocketConnector;
use std::pin::Pin;

use futures::channel::oneshot;
use futures::future::{poll_fn, select, Either};
use futures::{Sink, StreamExt};
use gloo_net::websocket::futures::WebSocket;
use gloo_net::websocket::{Message, State};
use log::debug;
use wasm_bindgen_futures::spawn_local;

/// Opens `gloo-net` WebSockets and pumps their messages into the channel.
pub struct GlooConnector;

struct GlooHandle {
    stop: Option<oneshot::Sender<()>>,
}

impl SocketHandle for GlooHandle {
    fn close(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

impl SocketConnector for GlooConnector {
    fn open(
        &self,
        url: &str,
        events: ChannelEvents,
    ) -> Result<Box<dyn SocketHandle>, ChannelError> {
        let mut socket =
            WebSocket::open(url).map_err(|e| ChannelError::Connect(e.to_string()))?;
        let (stop, mut stopped) = oneshot::channel::<()>();
        let url = url.to_string();

        // Dropping the socket at the end of the pump closes it. The pump also
        // ends when the handle is closed or dropped.
        spawn_local(async move {
            // The sink turns ready once the handshake is over.
            let handshake = poll_fn(|cx| Pin::new(&mut socket).poll_ready(cx));
            match select(handshake, &mut stopped).await {
                Either::Left((Ok(()), _)) => {}
                Either::Left((Err(e), _)) => events.emit(ChannelEvent::Error(e.to_string())),
                Either::Right(_) => {
                    debug!("socket for {} closed while connecting", url);
                    events.emit(ChannelEvent::Closed);
                    return;
                }
            }
            if matches!(socket.state(), State::Open) {
                events.emit(ChannelEvent::Opened);
            }

            let messages = socket.take_until(stopped);
            futures::pin_mut!(messages);
            while let Some(message) = messages.next().await {
                match message {
                    Ok(Message::Text(text)) => events.emit(ChannelEvent::Frame(text)),
                    Ok(Message::Bytes(bytes)) => match String::from_utf8(bytes) {
                        Ok(text) => events.emit(ChannelEvent::Frame(text)),
                        Err(_) => events.emit(ChannelEvent::Error("binary frame".to_string())),
                    },
                    Err(e) => events.emit(ChannelEvent::Error(e.to_string())),
                }
            }
            debug!("socket pump for {} finished", url);
            events.emit(ChannelEvent::Closed);
        });

        Ok(Box::new(GlooHandle { stop: Some(stop) }))
    }
}
