//! Request tracing middleware.
//!
//! Every request gets a fresh [`TraceId`] installed in task-local scope for
//! the lifetime of the handler, an `info` line summarising the request, and a
//! `trace-id` response header echoing the identifier.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, info};

use crate::domain::TraceId;

/// Response header carrying the trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

const REDACTED: &str = "[redacted]";

const SENSITIVE_HEADERS: [&str; 4] = ["authorization", "proxy-authorization", "cookie", "set-cookie"];

/// Render headers as `name: value` pairs sorted by name, masking credentials.
pub(crate) fn sanitize_headers(headers: &HeaderMap) -> String {
    let mut pairs: Vec<(&str, &str)> = headers
        .iter()
        .map(|(name, value)| {
            let shown = if SENSITIVE_HEADERS.contains(&name.as_str()) {
                REDACTED
            } else {
                value.to_str().unwrap_or("<non-ascii>")
            };
            (name.as_str(), shown)
        })
        .collect();
    pairs.sort_unstable();
    pairs
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Middleware factory; wrap the whole `App` with it.
///
/// ```
/// use actix_web::App;
/// use users_service::Trace;
///
/// let _app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::generate();
        {
            let connection = req.connection_info();
            info!(
                method = %req.method(),
                path = %req.path(),
                peer = connection.realip_remote_addr().unwrap_or("unknown"),
                headers = %sanitize_headers(req.headers()),
                %trace_id,
                "incoming request"
            );
        }

        let fut = self.service.call(req);
        Box::pin(TraceId::scope(trace_id, async move {
            let mut res = fut.await?;
            match HeaderValue::from_str(&trace_id.to_string()) {
                Ok(value) => {
                    res.response_mut()
                        .headers_mut()
                        .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
                Err(error) => {
                    error!(%error, %trace_id, "failed to encode trace-id header");
                }
            }
            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, web};
    use rstest::rstest;

    #[actix_web::test]
    async fn adds_trace_id_header() {
        let app = actix_web::test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let res = actix_web::test::call_service(&app, actix_web::test::TestRequest::get().uri("/").to_request()).await;
        let value = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("ascii header");
        assert!(value.parse::<TraceId>().is_ok());
    }

    #[actix_web::test]
    async fn handler_sees_same_trace_id_as_header() {
        let app = actix_web::test::init_service(App::new().wrap(Trace).route(
            "/",
            web::get().to(|| async {
                let id = TraceId::current().expect("trace id in scope");
                HttpResponse::Ok().body(id.to_string())
            }),
        ))
        .await;
        let res = actix_web::test::call_service(&app, actix_web::test::TestRequest::get().uri("/").to_request()).await;
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("ascii header")
            .to_owned();
        let body = actix_web::test::read_body(res).await;
        assert_eq!(std::str::from_utf8(&body).expect("utf8 body"), header);
    }

    #[rstest]
    #[case(header::AUTHORIZATION)]
    #[case(header::PROXY_AUTHORIZATION)]
    #[case(header::COOKIE)]
    #[case(header::SET_COOKIE)]
    fn credentials_are_redacted(#[case] name: HeaderName) {
        let mut headers = HeaderMap::new();
        headers.insert(name.clone(), HeaderValue::from_static("secret-value"));
        let rendered = sanitize_headers(&headers);
        assert_eq!(rendered, format!("{}: [redacted]", name.as_str()));
    }

    #[rstest]
    fn plain_headers_are_sorted_and_kept() {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        assert_eq!(sanitize_headers(&headers), "accept: */*, user-agent: curl/8");
    }
}
