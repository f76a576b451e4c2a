//! In-memory fakes for the browser ports.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{ApiClient, HttpRequest, HttpResponse};
use crate::ports::{HttpTransport, SocketConnector, SocketHandle};
use crate::progress::{ChannelError, ChannelEvent, ChannelEvents};
use crate::session::{MemoryStore, SessionStore};

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub struct RecordingTransport {
    responses: RefCell<VecDeque<ClientResult<HttpResponse>>>,
    requests: RefCell<Vec<HttpRequest>>,
    on_send: RefCell<Option<Box<dyn Fn()>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.responses.borrow_mut().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn fail(&self, reason: &str) {
        self.responses
            .borrow_mut()
            .push_back(Err(ClientError::Transport(reason.to_string())));
    }

    /// Runs `hook` while a request is "in flight", before its response is
    /// returned.
    pub fn on_send(&self, hook: impl Fn() + 'static) {
        *self.on_send.borrow_mut() = Some(Box::new(hook));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .borrow()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait(?Send)]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        self.requests.borrow_mut().push(request);
        if let Some(hook) = self.on_send.borrow().as_ref() {
            hook();
        }
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("no response queued".to_string())))
    }
}

pub fn client_with(transport: Rc<RecordingTransport>) -> ApiClient {
    let session = SessionStore::new(Rc::new(MemoryStore::new()));
    ApiClient::new(ApiConfig::default(), session, transport)
}

pub fn fixture() -> (Rc<RecordingTransport>, ApiClient) {
    let transport = Rc::new(RecordingTransport::new());
    let client = client_with(transport.clone());
    (transport, client)
}

/// Connector that keeps the event sink of the latest connection so tests can
/// push events into it.
#[derive(Default)]
pub struct FakeConnector {
    opened: RefCell<Vec<String>>,
    events: RefCell<Option<ChannelEvents>>,
    closed: Rc<Cell<usize>>,
    fail_next: RefCell<Option<String>>,
}

impl FakeConnector {
    pub fn opened_urls(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }

    pub fn close_count(&self) -> usize {
        self.closed.get()
    }

    pub fn events(&self) -> Option<ChannelEvents> {
        self.events.borrow().clone()
    }

    pub fn emit(&self, event: ChannelEvent) {
        let events = self.events();
        if let Some(events) = events {
            events.emit(event);
        }
    }

    pub fn fail_next_open(&self, reason: &str) {
        *self.fail_next.borrow_mut() = Some(reason.to_string());
    }
}

impl SocketConnector for FakeConnector {
    fn open(
        &self,
        url: &str,
        events: ChannelEvents,
    ) -> Result<Box<dyn SocketHandle>, ChannelError> {
        if let Some(reason) = self.fail_next.borrow_mut().take() {
            return Err(ChannelError::Connect(reason));
        }
        self.opened.borrow_mut().push(url.to_string());
        *self.events.borrow_mut() = Some(events);
        Ok(Box::new(FakeHandle {
            closed: self.closed.clone(),
        }))
    }
}

struct FakeHandle {
    closed: Rc<Cell<usize>>,
}

impl SocketHandle for FakeHandle {
    fn close(&mut self) {
        self.closed.set(self.closed.get() + 1);
    }
}
