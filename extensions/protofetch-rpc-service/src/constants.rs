/// Path segment placed between the server prefix and `<Service>/<Method>`.
pub const RPC_PATH_SEGMENT: &str = "rpc";

/// Content type for calls whose request and response bodies are single raw
/// messages.
pub const CONTENT_TYPE_BUFFERED: &str = "application/proto";

/// Content type for calls whose bodies are sequences of length-prefixed
/// frames.
pub const CONTENT_TYPE_PREFIXED: &str = "application/proto+prefixed";

/// Header asking the server to force-sample a trace for this request.
pub const TRACE_HEADER: &str = "x-buildbuddy-trace";

/// The only value ever sent with [`TRACE_HEADER`].
pub const TRACE_HEADER_FORCE: &str = "force";

/// Query parameter on the hosting page that turns on [`TRACE_HEADER`].
pub const DEBUG_QUERY_PARAM: &str = "debug";
