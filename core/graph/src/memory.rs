//! Scripted in-memory transport for testing.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Mutex, MutexGuard};

use cirrus_common::{Error, Result};

use crate::transport::{Header, Method, Transport};

/// A request seen by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: Vec<Header>,
    pub body: Option<Vec<u8>>,
}

impl RecordedRequest {
    /// Value of the first header called `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Body decoded as JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

type Handler = Box<dyn FnMut(&RecordedRequest) -> Result<Bytes> + Send>;

struct Route {
    method: Method,
    path: String,
    handler: Handler,
}

/// Transport that answers from scripted handlers and records every request.
///
/// Routes match on method and exact path. The first matching route wins;
/// requests with no route fail with [`Error::NotFound`]. Useful for testing
/// and development. Nothing touches the network.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedTransport {
    /// Create a transport with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `handler`.
    pub fn on<F>(self, method: Method, path: impl Into<String>, handler: F) -> Self
    where
        F: FnMut(&RecordedRequest) -> Result<Bytes> + Send + 'static,
    {
        lock(&self.routes).push(Route {
            method,
            path: path.into(),
            handler: Box::new(handler),
        });
        self
    }

    /// Answer `method path` with the same body every time.
    pub fn on_body(self, method: Method, path: impl Into<String>, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        self.on(method, path, move |_| Ok(body.clone()))
    }

    /// Answer `method path` with a JSON value every time.
    pub fn on_json(self, method: Method, path: impl Into<String>, value: serde_json::Value) -> Self {
        self.on_body(method, path, value.to_string())
    }

    /// All requests received so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Requests received for one method and path.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<RecordedRequest> {
        lock(&self.requests)
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    fn dispatch(&self, request: RecordedRequest) -> Result<Bytes> {
        lock(&self.requests).push(request.clone());

        let mut routes = lock(&self.routes);
        match routes
            .iter_mut()
            .find(|r| r.method == request.method && r.path == request.path)
        {
            Some(route) => (route.handler)(&request),
            None => Err(Error::NotFound(format!(
                "No route for {} {}",
                request.method, request.path
            ))),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, path: &str, headers: &[Header]) -> Result<Bytes> {
        self.dispatch(RecordedRequest {
            method: Method::Get,
            path: path.to_string(),
            headers: headers.to_vec(),
            body: None,
        })
    }

    async fn post(&self, path: &str, body: Vec<u8>) -> Result<Bytes> {
        self.dispatch(RecordedRequest {
            method: Method::Post,
            path: path.to_string(),
            headers: Vec::new(),
            body: Some(body),
        })
    }

    async fn patch(&self, path: &str, body: Vec<u8>) -> Result<Bytes> {
        self.dispatch(RecordedRequest {
            method: Method::Patch,
            path: path.to_string(),
            headers: Vec::new(),
            body: Some(body),
        })
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.dispatch(RecordedRequest {
            method: Method::Delete,
            path: path.to_string(),
            headers: Vec::new(),
            body: None,
        })
        .map(|_| ())
    }
}
