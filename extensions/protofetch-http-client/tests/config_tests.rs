use protofetch::constants::DEFAULT_MAX_FRAME_SIZE;
use protofetch_http_client::{RpcHttpClientConfig, TraceDebug};

#[test]
fn debug_query_values_force_tracing() {
    for url in [
        "https://app.example.com/?debug=1",
        "https://app.example.com/?debug=true",
        "https://app.example.com/invocation/abc?foo=bar&debug=True",
    ] {
        assert_eq!(TraceDebug::from_page_url(url), TraceDebug::Force, "{}", url);
    }
}

#[test]
fn other_debug_values_leave_tracing_off() {
    for url in [
        "https://app.example.com/",
        "https://app.example.com/?debug=0",
        "https://app.example.com/?debug=TRUE",
        "https://app.example.com/?debugging=1",
        "not a url",
    ] {
        assert_eq!(TraceDebug::from_page_url(url), TraceDebug::Off, "{}", url);
    }
}

#[test]
fn defaults_are_buffered_and_untraced() {
    let config = RpcHttpClientConfig::default();

    assert!(!config.streaming_http_enabled);
    assert!(!config.trace_debug.is_forced());
    assert_eq!(config.max_frame_size, DEFAULT_MAX_FRAME_SIZE);
    assert!(config.cookie_jar.is_none());
}

#[test]
fn only_listed_prefixes_are_regions() {
    let config = RpcHttpClientConfig::default()
        .with_server_prefix("https://app.example.com")
        .with_region_prefixes(["https://us.example.com", "https://eu.example.com"]);

    assert!(config.is_region_prefix("https://eu.example.com"));
    assert!(!config.is_region_prefix("https://app.example.com"));
}

#[test]
fn region_matching_ignores_trailing_slashes() {
    let config = RpcHttpClientConfig::default()
        .with_region_prefixes(["https://us.example.com/", "https://eu.example.com"]);

    assert!(config.is_region_prefix("https://us.example.com"));
    assert!(config.is_region_prefix("https://us.example.com/"));
    assert!(config.is_region_prefix("https://eu.example.com/"));
    assert!(!config.is_region_prefix("https://us.example.com/api"));
}
