//! In-memory fakes for the auth seams, shared by unit tests.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use serde_json::Value;

use crate::auth::attestation::{AttestationAction, AttestationProvider};
use crate::auth::error::AttestationError;
use crate::auth::password::{PasswordStrength, StrengthEstimator};
use crate::net::http::{HttpClient, HttpRequest, HttpResponse, TransportError};
use crate::util::navigation::Navigator;

/// Returns `Pending` once (waking itself) so concurrent futures interleave.
#[derive(Default)]
pub(crate) struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

type Handler = dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError>;

/// Transport answering from a closure and recording every request.
#[derive(Clone)]
pub(crate) struct FakeHttp {
    handler: Rc<Handler>,
    log: Rc<RefCell<Vec<HttpRequest>>>,
    yields: bool,
}

impl FakeHttp {
    pub(crate) fn new(handler: impl Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + 'static) -> Self {
        Self { handler: Rc::new(handler), log: Rc::default(), yields: false }
    }

    /// Yield to the executor once before answering each request.
    pub(crate) fn yielding(mut self) -> Self {
        self.yields = true;
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.log.borrow().clone()
    }

    pub(crate) fn count(&self, path: &str) -> usize {
        self.log.borrow().iter().filter(|r| r.path == path).count()
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FakeHttp {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.log.borrow_mut().push(request.clone());
        if self.yields {
            YieldNow::default().await;
        }
        (self.handler)(&request)
    }
}

pub(crate) fn respond(status: u16, body: Value) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::new(status, body))
}

/// Navigator remembering where it was sent.
#[derive(Clone, Default)]
pub(crate) struct RecordingNavigator {
    visits: Rc<RefCell<Vec<String>>>,
    reloads: Rc<Cell<u32>>,
}

impl RecordingNavigator {
    pub(crate) fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }

    pub(crate) fn reloads(&self) -> u32 {
        self.reloads.get()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits.borrow_mut().push(path.to_owned());
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }
}

/// Attestation provider with a canned answer.
#[derive(Clone)]
pub(crate) struct FakeAttestation {
    answer: Result<String, AttestationError>,
    actions: Rc<RefCell<Vec<AttestationAction>>>,
}

impl FakeAttestation {
    pub(crate) fn token(token: &str) -> Self {
        Self { answer: Ok(token.to_owned()), actions: Rc::default() }
    }

    pub(crate) fn failing(err: AttestationError) -> Self {
        Self { answer: Err(err), actions: Rc::default() }
    }

    pub(crate) fn actions(&self) -> Vec<AttestationAction> {
        self.actions.borrow().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl AttestationProvider for FakeAttestation {
    async fn attest(&self, action: AttestationAction) -> Result<String, AttestationError> {
        self.actions.borrow_mut().push(action);
        self.answer.clone()
    }
}

/// Estimator returning the same score for every password.
#[derive(Clone, Copy)]
pub(crate) struct FixedEstimator(pub u8);

impl StrengthEstimator for FixedEstimator {
    fn estimate(&self, _password: &str, _user_inputs: &[&str]) -> PasswordStrength {
        PasswordStrength { score: self.0, warning: None, suggestions: vec!["Add another word".to_owned()] }
    }
}
