/// End-to-end tests: the engine driving the HTTP matcher against a local
/// stand-in for the matching service, plus link and config plumbing.
use std::sync::Arc;
use std::time::Duration;

use regplay_config::EngineConfig;
use regplay_core::{permalink, Engine, EngineEvent, Flags, RunInput, Segment};
use regplay_matcher::{HttpMatcher, Matcher, MockMatcher};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use url::Url;

/// Serve every connection on a loopback port, answering each
/// `POST /api/regex/match` with `reply(request_body)`.
async fn fake_service(reply: fn(&Value) -> (u16, Value)) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let (read_half, mut write_half) = stream.into_split();
                let mut reader = BufReader::new(read_half);

                let mut request_line = String::new();
                reader.read_line(&mut request_line).await.unwrap();
                let mut content_length = 0usize;
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).await.unwrap();
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        break;
                    }
                    if let Some((k, v)) = trimmed.split_once(": ") {
                        if k.eq_ignore_ascii_case("content-length") {
                            content_length = v.parse().unwrap_or(0);
                        }
                    }
                }
                let mut body = vec![0u8; content_length];
                reader.read_exact(&mut body).await.unwrap();
                let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

                let (status, resp) = reply(&body);
                let resp = resp.to_string();
                let http = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{resp}",
                    resp.len(),
                );
                let _ = write_half.write_all(http.as_bytes()).await;
            });
        }
    });

    format!("http://127.0.0.1:{port}")
}

fn http_engine(base_url: &str) -> Engine {
    let matcher: Arc<dyn Matcher> =
        Arc::new(HttpMatcher::new(base_url, Duration::from_secs(5)).unwrap());
    Engine::new(matcher, EngineConfig::default(), 5000)
}

#[tokio::test]
async fn email_run_over_http_highlights_both_addresses() {
    let url = fake_service(|body| {
        assert_eq!(body["pattern"], r"\w+@\w+\.\w+");
        assert_eq!(body["max_matches"], 5000);
        assert_eq!(body["flags"]["IGNORECASE"], false);
        (
            200,
            json!({
                "ok": true,
                "count": 2,
                "matches": [
                    {"match": "a@b.com", "start": 0, "end": 7, "groups": [], "group_spans": []},
                    {"match": "x@y.org", "start": 8, "end": 15, "groups": [], "group_spans": []}
                ],
                "group_meta": {"count": 0, "named": []},
                "elapsed_ms": 1
            }),
        )
    })
    .await;

    let input = RunInput::new("a@b.com x@y.org", r"\w+@\w+\.\w+", Flags::default());
    let (engine, _events) = http_engine(&url).spawn(input);
    engine.run_now().unwrap();
    let state = engine.wait_for(|s| s.is_settled()).await.unwrap();
    engine.shutdown().await;

    let (text, segments) = state.highlight();
    assert_eq!(text, "a@b.com x@y.org");
    assert_eq!(
        segments,
        vec![Segment::hit(0, 7, 0), Segment::plain(7, 8), Segment::hit(8, 15, 1)]
    );
    assert_eq!(state.outcome.error(), None);
}

#[tokio::test]
async fn syntax_error_detail_reaches_the_view() {
    let url = fake_service(|_| {
        (
            422,
            json!({"detail": {"message": "missing ), unterminated subpattern at position 0"}}),
        )
    })
    .await;

    let input = RunInput::new("abc", "(", Flags::default());
    let (engine, _events) = http_engine(&url).spawn(input);
    engine.run_now().unwrap();
    let state = engine.wait_for(|s| s.is_settled()).await.unwrap();
    engine.shutdown().await;

    assert_eq!(
        state.outcome.error(),
        Some("missing ), unterminated subpattern at position 0")
    );
    assert!(state.outcome.rows().is_empty());
}

#[tokio::test]
async fn unreachable_service_is_an_error_outcome() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let input = RunInput::new("abc", "b", Flags::default());
    let (engine, _events) = http_engine(&format!("http://127.0.0.1:{port}")).spawn(input);
    engine.run_now().unwrap();
    let state = engine.wait_for(|s| s.is_settled()).await.unwrap();
    engine.shutdown().await;

    let msg = state.outcome.error().expect("error outcome");
    assert!(msg.starts_with("matcher unreachable"), "{msg}");
}

#[tokio::test(start_paused = true)]
async fn settled_input_reproduces_the_shared_link() {
    let base = Url::parse("http://localhost:5173/").unwrap();
    let shared = RunInput::new(
        "Call 555-1234 or 555-9876",
        r"(\d{3})-(\d{4})",
        Flags { ignore_case: false, multiline: true, dot_all: false },
    );
    let link = permalink::encode(&base, &shared);

    let restored = permalink::decode_str(link.as_str(), RunInput::default()).unwrap();
    assert_eq!(restored, shared);

    let (engine, mut events) =
        Engine::new(Arc::new(MockMatcher::new()), EngineConfig::default(), 5000)
            .spawn(RunInput::default());
    engine.edit(restored).unwrap();
    let settled = loop {
        match events.recv().await {
            Some(EngineEvent::Settled(input)) => break input,
            Some(_) => continue,
            None => panic!("engine stopped"),
        }
    };
    engine.shutdown().await;

    assert_eq!(permalink::encode(&base, &settled), link);
}

#[test]
fn config_file_feeds_engine_and_matcher_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regplay.toml");
    std::fs::write(
        &path,
        "[matcher]\nprovider = \"mock\"\nmax_matches = 10\n\n[engine]\ndebounce_ms = 50\n",
    )
    .unwrap();

    let config = regplay_config::load(Some(path.as_path())).unwrap();
    assert_eq!(config.matcher.max_matches, 10);
    assert_eq!(config.engine.debounce(), Duration::from_millis(50));
    assert_eq!(config.engine.min_pending(), Duration::from_millis(160));

    let matcher = regplay_matcher::from_config(&config.matcher).unwrap();
    assert_eq!(matcher.name(), "mock");
}
