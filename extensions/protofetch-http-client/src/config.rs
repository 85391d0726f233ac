use protofetch::constants::DEFAULT_MAX_FRAME_SIZE;
use protofetch_rpc_service::constants::DEBUG_QUERY_PARAM;
use reqwest::cookie::Jar;
use std::sync::Arc;

/// Whether outgoing requests ask the server to force a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceDebug {
    #[default]
    Off,
    Force,
}

impl TraceDebug {
    /// Reads the `debug` query parameter of the page the client runs in.
    ///
    /// `debug=1`, `debug=true` and `debug=True` force tracing. Anything else,
    /// including an unparseable URL, leaves it off.
    pub fn from_page_url(page_url: &str) -> Self {
        let Ok(url) = reqwest::Url::parse(page_url) else {
            return TraceDebug::Off;
        };

        let forced = url.query_pairs().any(|(key, value)| {
            key == DEBUG_QUERY_PARAM && matches!(value.as_ref(), "1" | "true" | "True")
        });

        if forced {
            TraceDebug::Force
        } else {
            TraceDebug::Off
        }
    }

    pub fn is_forced(self) -> bool {
        self == TraceDebug::Force
    }
}

/// Settings for an [`RpcHttpClient`](crate::RpcHttpClient).
///
/// Built with `Default` and the chained `with_*` setters.
#[derive(Debug, Clone)]
pub struct RpcHttpClientConfig {
    /// Base URL calls are sent to, without the `/rpc` segment.
    pub server_prefix: String,

    /// Region endpoints. Calls sent to one of these include credentials.
    pub region_prefixes: Vec<String>,

    /// Use length-prefixed streaming bodies. When off, every call is
    /// buffered and server-streaming methods are rejected.
    pub streaming_http_enabled: bool,

    pub trace_debug: TraceDebug,

    /// Largest streamed message accepted, in bytes.
    pub max_frame_size: usize,

    /// Cookies attached to credentialed (regional) calls.
    pub cookie_jar: Option<Arc<Jar>>,
}

impl Default for RpcHttpClientConfig {
    fn default() -> Self {
        Self {
            server_prefix: String::new(),
            region_prefixes: Vec::new(),
            streaming_http_enabled: false,
            trace_debug: TraceDebug::Off,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            cookie_jar: None,
        }
    }
}

impl RpcHttpClientConfig {
    pub fn with_server_prefix(mut self, server_prefix: impl Into<String>) -> Self {
        self.server_prefix = server_prefix.into();
        self
    }

    pub fn with_region_prefixes<I, S>(mut self, region_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.region_prefixes = region_prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_streaming_http_enabled(mut self, enabled: bool) -> Self {
        self.streaming_http_enabled = enabled;
        self
    }

    pub fn with_trace_debug(mut self, trace_debug: TraceDebug) -> Self {
        self.trace_debug = trace_debug;
        self
    }

    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }

    pub fn with_cookie_jar(mut self, cookie_jar: Arc<Jar>) -> Self {
        self.cookie_jar = Some(cookie_jar);
        self
    }

    /// Whether calls sent to `prefix` include credentials.
    ///
    /// Trailing slashes are ignored on both sides.
    pub fn is_region_prefix(&self, prefix: &str) -> bool {
        let prefix = normalize_prefix(prefix);
        self.region_prefixes
            .iter()
            .any(|region| normalize_prefix(region) == prefix)
    }
}

/// A server prefix without trailing slashes, ready to have a path appended.
pub(crate) fn normalize_prefix(prefix: &str) -> &str {
    prefix.trim_end_matches('/')
}
