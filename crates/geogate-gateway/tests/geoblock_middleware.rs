#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderValue, Request, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use geogate_core::{CountryCode, Policy};
use geogate_gateway::{app_state::AppState, config, router};

const RU_BY: &str = r#"
version: 1
geoblock:
  enabled: true
  allowed_countries: [RU, BY]
"#;

struct Harness {
    state: AppState,
    app: Router,
    upstream_hits: Arc<AtomicUsize>,
}

impl Harness {
    fn new(yaml: &str) -> Self {
        let cfg = config::load_from_str(yaml).expect("config");
        let state = AppState::new(&cfg).expect("state");

        let upstream_hits = Arc::new(AtomicUsize::new(0));
        let hits = Arc::clone(&upstream_hits);
        let upstream = Router::new().route(
            "/api",
            get(move || {
                let hits = Arc::clone(&hits);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    "upstream"
                }
            }),
        );

        let app = router::build_router(state.clone(), upstream);
        Self { state, app, upstream_hits }
    }

    async fn send(&self, req: Request<Body>) -> Response {
        self.app.clone().oneshot(req).await.expect("request failed")
    }

    fn hits(&self) -> usize {
        self.upstream_hits.load(Ordering::SeqCst)
    }
}

fn request(headers: &[(&str, &str)], peer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/api");
    for (k, v) in headers {
        builder = builder.header(*k, *v);
    }
    let mut req = builder.body(Body::empty()).unwrap();
    if let Some(peer) = peer {
        let addr: SocketAddr = peer.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
    }
    req
}

async fn json_body(resp: Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn disabled_geoblock_passes_everything() {
    let h = Harness::new("version: 1\ngeoblock:\n  enabled: false\n");

    let resp = h.send(request(&[("cf-ipcountry", "US")], None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(h.hits(), 1);
}

#[tokio::test]
async fn allowed_countries_reach_upstream() {
    let h = Harness::new(RU_BY);

    for c in ["RU", "BY"] {
        let resp = h.send(request(&[("cf-ipcountry", c)], Some("1.2.3.4:5000"))).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
    assert_eq!(h.hits(), 2);
}

#[tokio::test]
async fn disallowed_country_gets_403_json() {
    let h = Harness::new(RU_BY);

    let resp = h.send(request(&[("cf-ipcountry", "US")], Some("1.2.3.4:5000"))).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/json"
    );
    let body = json_body(resp).await;
    assert_eq!(body["country_code"], "US");
    assert!(body["error"].as_str().unwrap().starts_with("Access denied"));
    assert_eq!(h.hits(), 0);
}

#[tokio::test]
async fn tor_marker_is_denied_unless_listed() {
    let h = Harness::new(RU_BY);
    let resp = h.send(request(&[("cf-ipcountry", "T1")], None)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(resp).await["country_code"], "T1");
}

#[tokio::test]
async fn missing_header_fails_open() {
    let h = Harness::new(RU_BY);

    let resp = h.send(request(&[], Some("1.2.3.4:5000"))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = h.send(request(&[], None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(h.hits(), 2);

    let m = h.state.metrics();
    assert_eq!(
        m.decisions.get(&[("outcome", "allow"), ("reason", "no_country_signal")]),
        2
    );
}

#[tokio::test]
async fn forwarded_local_caller_is_exempt() {
    let h = Harness::new(
        r#"
version: 1
gateway:
  trust_proxy: true
geoblock:
  enabled: true
"#,
    );

    let resp = h
        .send(request(&[("x-forwarded-for", "127.0.0.1")], Some("10.0.0.9:443")))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        h.state
            .metrics()
            .decisions
            .get(&[("outcome", "allow"), ("reason", "local_caller")]),
        1
    );
}

#[tokio::test]
async fn default_allow_list_is_ru_only() {
    let h = Harness::new("version: 1\ngeoblock:\n  enabled: true\n");

    let resp = h.send(request(&[("cf-ipcountry", "RU")], None)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = h.send(request(&[("cf-ipcountry", "US")], None)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(resp).await["country_code"], "US");

    let resp = h.send(request(&[("cf-ipcountry", "BY")], None)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn repeated_country_headers_are_denied() {
    let h = Harness::new(RU_BY);

    let resp = h
        .send(request(&[("cf-ipcountry", "RU"), ("cf-ipcountry", "US")], None))
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(resp).await["country_code"], "RU, US");
    assert_eq!(h.hits(), 0);
}

#[tokio::test]
async fn non_utf8_country_header_is_denied() {
    let h = Harness::new(RU_BY);

    let mut req = request(&[], None);
    req.headers_mut()
        .insert("cf-ipcountry", HeaderValue::from_bytes(b"\xffRU").unwrap());

    let resp = h.send(req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(resp).await["country_code"], "\u{fffd}RU");
    assert_eq!(h.hits(), 0);
}

#[tokio::test]
async fn garbage_country_headers_keep_metrics_bounded() {
    let h = Harness::new(RU_BY);

    for i in 0..200 {
        let value = format!("zz-{i}-{}", "q".repeat(200));
        let mut req = request(&[], None);
        req.headers_mut()
            .insert("cf-ipcountry", HeaderValue::from_str(&value).unwrap());
        assert_eq!(h.send(req).await.status(), StatusCode::FORBIDDEN);
    }
    let _ = h.send(request(&[("cf-ipcountry", "US")], None)).await;

    let m = h.state.metrics();
    assert_eq!(m.denied_countries.series(), 2);
    assert_eq!(m.denied_countries.get(&[("country", "invalid")]), 200);
    assert_eq!(m.denied_countries.get(&[("country", "US")]), 1);
}

#[tokio::test]
async fn untrusted_peer_header_is_stripped() {
    let h = Harness::new(
        r#"
version: 1
geoblock:
  enabled: true
  strip_untrusted_country_header: true
  trusted_edges: ["10.0.0.1"]
"#,
    );

    // Spoofed from an arbitrary peer: header ignored, request fails open.
    let resp = h.send(request(&[("cf-ipcountry", "US")], Some("8.8.8.8:1234"))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Same header from the trusted edge is enforced.
    let resp = h.send(request(&[("cf-ipcountry", "US")], Some("10.0.0.1:1234"))).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(h.hits(), 1);
}

#[tokio::test]
async fn replaced_policy_applies_to_next_request() {
    let h = Harness::new(RU_BY);

    let resp = h.send(request(&[("cf-ipcountry", "US")], None)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    h.state
        .replace_policy(Policy::new(true, vec![CountryCode::parse("US").unwrap()]));

    let resp = h.send(request(&[("cf-ipcountry", "US")], None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = h.send(request(&[("cf-ipcountry", "RU")], None)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn ops_routes_bypass_geoblock() {
    let h = Harness::new(RU_BY);

    let req = Request::builder()
        .uri("/healthz")
        .header("cf-ipcountry", "US")
        .body(Body::empty())
        .unwrap();
    assert_eq!(h.send(req).await.status(), StatusCode::OK);

    let _ = h.send(request(&[("cf-ipcountry", "US")], None)).await;
    let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let resp = h.send(req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("geogate_denied_countries_total{country=\"US\"} 1"));
}

#[tokio::test]
async fn readyz_reports_draining() {
    let h = Harness::new(RU_BY);
    let ready = || Request::builder().uri("/readyz").body(Body::empty()).unwrap();

    assert_eq!(h.send(ready()).await.status(), StatusCode::OK);
    h.state.set_draining();
    assert_eq!(h.send(ready()).await.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn unconfigured_upstream_answers_502() {
    let cfg = config::load_from_str("version: 1\n").unwrap();
    let state = AppState::new(&cfg).unwrap();
    let app = router::build_router(state, router::unconfigured_upstream());

    let resp = app.oneshot(request(&[], None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(json_body(resp).await["code"], "UPSTREAM_UNAVAILABLE");
}
