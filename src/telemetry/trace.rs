//! W3C Trace Context propagation and per-request span factory.
//!
//! The [`Tracer`] is built once at startup and stored in handler state. It owns
//! the trace-context propagator and the span provider, so nothing is
//! registered globally. Each inbound request gets a [`RequestContext`] holding
//! its OpenTelemetry context and deadline; pipeline stages derive child
//! contexts and `tracing` spans from it.

use crate::error::ServiceError;
use opentelemetry::propagation::{Extractor, Injector, TextMapPropagator};
use opentelemetry::trace::{TraceContextExt, Tracer as _, TracerProvider as _};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::{Duration, Instant};
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// W3C Trace Context header name
pub const TRACEPARENT: &str = "traceparent";

/// Instrumentation scope for every span this crate starts
pub const TRACER_NAME: &str = env!("CARGO_PKG_NAME");

/// Field widths of a `traceparent` value: version, trace id, span id, flags
const TRACEPARENT_WIDTHS: [usize; 4] = [2, 32, 16, 2];

fn is_lower_hex(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Fixed-width lowercase hex fields only; the propagator does the rest
fn well_formed(traceparent: &str) -> bool {
    let parts: Vec<&str> = traceparent.trim().split('-').collect();
    parts.len() >= TRACEPARENT_WIDTHS.len()
        && parts
            .iter()
            .zip(TRACEPARENT_WIDTHS)
            .all(|(part, width)| is_lower_hex(part, width))
}

/// Adapter for extracting trace context from inbound actix headers
struct InboundHeaders<'a>(&'a actix_web::http::header::HeaderMap);

impl Extractor for InboundHeaders<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        let value = self.0.get(key).and_then(|v| v.to_str().ok())?;
        (key != TRACEPARENT || well_formed(value)).then_some(value)
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Adapter for a bare `traceparent` value
struct TraceparentValue<'a>(Option<&'a str>);

impl Extractor for TraceparentValue<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.filter(|v| key == TRACEPARENT && well_formed(v))
    }

    fn keys(&self) -> Vec<&str> {
        self.0.map(|_| vec![TRACEPARENT]).unwrap_or_default()
    }
}

/// Adapter for injecting trace context into outbound reqwest headers
struct OutboundHeaders<'a>(&'a mut HeaderMap);

impl Injector for OutboundHeaders<'_> {
    fn set(&mut self, key: &str, value: String) {
        if let Ok(name) = HeaderName::from_bytes(key.as_bytes()) {
            if let Ok(val) = HeaderValue::from_str(&value) {
                self.0.insert(name, val);
            }
        }
    }
}

/// Per-request trace position plus the deadline every outbound call honors
#[derive(Debug, Clone)]
pub struct RequestContext {
    cx: Context,
    tracer: Tracer,
    deadline: Instant,
}

impl RequestContext {
    /// Trace id as 32 lowercase hex characters
    pub fn trace_id(&self) -> String {
        self.cx.span().span_context().trace_id().to_string()
    }

    /// Id of the span this context represents, as 16 lowercase hex characters
    pub fn span_id(&self) -> String {
        self.cx.span().span_context().span_id().to_string()
    }

    /// Open a span for a pipeline stage and return it with the stage's context
    ///
    /// The span must be attached with `tracing::Instrument` so it closes when
    /// the stage future completes.
    pub fn stage(&self, name: &'static str) -> (tracing::Span, RequestContext) {
        let stage = RequestContext {
            cx: self.tracer.child_of(&self.cx, name),
            tracer: self.tracer.clone(),
            deadline: self.deadline,
        };

        let span = tracing::info_span!(
            "stage",
            stage = name,
            trace_id = %stage.trace_id(),
            span_id = %stage.span_id(),
            parent_span_id = %self.span_id(),
        );
        let _ = span.set_parent(stage.cx.clone());

        (span, stage)
    }

    /// Time left before the inbound request's deadline
    ///
    /// # Errors
    /// Returns [`ServiceError::DeadlineExceeded`] once the deadline has passed.
    pub fn remaining(&self) -> Result<Duration, ServiceError> {
        let left = self.deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            Err(ServiceError::DeadlineExceeded)
        } else {
            Ok(left)
        }
    }

    /// Attach the trace headers and the remaining deadline to an outbound request
    pub fn decorate(
        &self,
        request: reqwest::RequestBuilder,
        cap: Option<Duration>,
    ) -> Result<reqwest::RequestBuilder, ServiceError> {
        let mut timeout = self.remaining()?;
        if let Some(cap) = cap {
            timeout = timeout.min(cap);
        }

        let mut headers = HeaderMap::new();
        self.tracer
            .propagator
            .inject_context(&self.cx, &mut OutboundHeaders(&mut headers));

        Ok(request.headers(headers).timeout(timeout))
    }
}

/// Span factory handed to every handler at startup
#[derive(Debug, Clone)]
pub struct Tracer {
    service: String,
    request_timeout: Duration,
    propagator: TraceContextPropagator,
    provider: SdkTracerProvider,
}

impl Tracer {
    pub fn new(service: impl Into<String>, request_timeout: Duration) -> Self {
        let service = service.into();
        let resource = Resource::builder_empty()
            .with_attributes(vec![KeyValue::new("service.name", service.clone())])
            .build();

        Self {
            service,
            request_timeout,
            propagator: TraceContextPropagator::new(),
            provider: SdkTracerProvider::builder().with_resource(resource).build(),
        }
    }

    /// Provider backing every span this tracer starts
    pub fn provider(&self) -> &SdkTracerProvider {
        &self.provider
    }

    /// Start a span named `name` under `parent` and return the context holding it
    fn child_of(&self, parent: &Context, name: &'static str) -> Context {
        let span = self
            .provider
            .tracer(TRACER_NAME)
            .start_with_context(name, parent);
        parent.with_span(span)
    }

    fn begin(&self, carrier: &dyn Extractor) -> RequestContext {
        let parent = self.propagator.extract_with_context(&Context::new(), carrier);
        let continued = parent.span().span_context().is_valid();

        let ctx = RequestContext {
            cx: self.child_of(&parent, "request"),
            tracer: self.clone(),
            deadline: Instant::now() + self.request_timeout,
        };
        tracing::debug!(
            service = %self.service,
            trace_id = %ctx.trace_id(),
            continued,
            "Request context started"
        );
        ctx
    }

    /// Create the context for an inbound request
    ///
    /// Continues the caller's trace when a valid `traceparent` is supplied,
    /// otherwise starts a new one.
    pub fn start(&self, traceparent: Option<&str>) -> RequestContext {
        self.begin(&TraceparentValue(traceparent))
    }

    /// Create the context for an actix request
    pub fn start_from(&self, req: &actix_web::HttpRequest) -> RequestContext {
        self.begin(&InboundHeaders(req.headers()))
    }
}
