//! Scripted transport and recording page surface shared by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use crate::config::ClientConfig;
use crate::net::transport::{ApiRequest, HttpTransport, RawResponse};
use crate::net::{ApiClient, ApiError};
use crate::util::surface::{Navigator, NodeId, PageSurface};
use crate::session::SessionStore;

// =========================================================================
// MockTransport
// =========================================================================

/// Replays queued responses in order and records every request it sees.
/// An empty queue answers `200 {"success": true}`.
#[derive(Default)]
pub struct MockTransport {
    responses: RefCell<VecDeque<Result<RawResponse, ApiError>>>,
    pub requests: RefCell<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: serde_json::Value) {
        self.responses.borrow_mut().push_back(Ok(RawResponse { status, body: body.to_string() }));
    }

    pub fn respond_raw(&self, status: u16, body: &str) {
        self.responses.borrow_mut().push_back(Ok(RawResponse { status, body: body.to_owned() }));
    }

    pub fn fail(&self, message: &str) {
        self.responses.borrow_mut().push_back(Err(ApiError::Transport(message.to_owned())));
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests.borrow().last().cloned().expect("no request sent")
    }
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        self.requests.borrow_mut().push(request);
        self.responses.borrow_mut().pop_front().unwrap_or_else(|| {
            Ok(RawResponse { status: 200, body: r#"{"success":true}"#.to_owned() })
        })
    }
}

// =========================================================================
// RecordingSurface
// =========================================================================

/// In-memory page: a `.content` child list, a set of elements by id, and
/// logs of navigations and confirm prompts.
#[derive(Default)]
pub struct RecordingSurface {
    next_id: Cell<u64>,
    /// `(node, class, text)` in document order.
    pub alerts: RefCell<Vec<(NodeId, String, String)>>,
    pub elements: RefCell<BTreeMap<String, String>>,
    pub navigations: RefCell<Vec<String>>,
    pub prompts: RefCell<Vec<String>>,
    pub confirm_answer: Cell<bool>,
}

impl RecordingSurface {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// A page that has the given element ids, all empty.
    pub fn with_elements(ids: &[&str]) -> Rc<Self> {
        let surface = Self::default();
        for id in ids {
            surface.elements.borrow_mut().insert((*id).to_owned(), String::new());
        }
        Rc::new(surface)
    }

    pub fn element(&self, id: &str) -> Option<String> {
        self.elements.borrow().get(id).cloned()
    }
}

impl Navigator for RecordingSurface {
    fn navigate(&self, path: &str) {
        self.navigations.borrow_mut().push(path.to_owned());
    }
}

impl PageSurface for RecordingSurface {
    fn insert_alert(&self, class_name: &str, text: &str) -> Option<NodeId> {
        let id = NodeId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.alerts.borrow_mut().insert(0, (id, class_name.to_owned(), text.to_owned()));
        Some(id)
    }

    fn remove_node(&self, node: NodeId) {
        self.alerts.borrow_mut().retain(|(id, _, _)| *id != node);
    }

    fn set_inner_html(&self, element_id: &str, html: &str) -> bool {
        match self.elements.borrow_mut().get_mut(element_id) {
            Some(slot) => {
                *slot = html.to_owned();
                true
            }
            None => false,
        }
    }

    fn set_text_content(&self, element_id: &str, text: &str) -> bool {
        self.set_inner_html(element_id, text)
    }

    fn confirm(&self, message: &str) -> bool {
        self.prompts.borrow_mut().push(message.to_owned());
        self.confirm_answer.get()
    }
}

/// An API client over a fresh in-memory session.
pub fn test_client(transport: &Rc<MockTransport>, surface: &Rc<RecordingSurface>) -> ApiClient {
    ApiClient::new(&ClientConfig::default(), SessionStore::in_memory(), transport.clone(), surface.clone())
}
