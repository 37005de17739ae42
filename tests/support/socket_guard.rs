//! Skips wiremock-backed tests in sandboxes that cannot bind localhost.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

/// Set `IMGCRAWL_REQUIRE_SOCKET_TESTS=1` in CI so a missing socket fails loudly.
fn socket_tests_required() -> bool {
    std::env::var("IMGCRAWL_REQUIRE_SOCKET_TESTS")
        .ok()
        .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

#[track_caller]
fn cannot_bind_localhost() -> bool {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return false;
    }

    let location = Location::caller();
    let message = format!(
        "[socket-bound-test] no localhost socket available at {}:{}",
        location.file(),
        location.line()
    );
    assert!(
        !socket_tests_required(),
        "{message}. Unset IMGCRAWL_REQUIRE_SOCKET_TESTS to allow skipping."
    );
    eprintln!("{message}. Skipping test.");
    true
}

/// Starts a mock server, or returns `None` when sockets are unavailable.
#[track_caller]
pub fn start_mock_server_or_skip() -> impl std::future::Future<Output = Option<MockServer>> {
    let skip = cannot_bind_localhost();
    async move {
        if skip {
            None
        } else {
            Some(MockServer::start().await)
        }
    }
}

/// Binds a raw localhost listener, or returns `None` when sockets are unavailable.
#[allow(dead_code)]
#[track_caller]
pub fn bind_local_listener_or_skip() -> impl std::future::Future<Output = Option<tokio::net::TcpListener>> {
    let skip = cannot_bind_localhost();
    async move {
        if skip {
            None
        } else {
            tokio::net::TcpListener::bind("127.0.0.1:0").await.ok()
        }
    }
}

/// Returns a localhost URL on which nothing is listening.
#[allow(dead_code)]
pub fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}
