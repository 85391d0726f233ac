use bitcode::{Decode, Encode};
use chrono::Local;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Timezone reported when the host does not name one.
const DEFAULT_TIMEZONE: &str = "UTC";

static PROCESS_REQUEST_CONTEXT: Lazy<RequestContext> = Lazy::new(RequestContext::current);

/// Per-process context attached to every outgoing request.
///
/// The context is built once and treated as read-only afterwards. Requests
/// that already carry a context keep their own.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestContext {
    /// Minutes to add to local time to reach UTC (positive west of UTC).
    pub timezone_offset_minutes: i32,
    /// IANA timezone name, e.g. `"Europe/Berlin"`.
    pub timezone: String,
    /// Additional server-required fields.
    pub fields: BTreeMap<String, String>,
}

impl RequestContext {
    pub fn new(timezone_offset_minutes: i32, timezone: impl Into<String>) -> Self {
        Self {
            timezone_offset_minutes,
            timezone: timezone.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builds a context from the host clock and the host's configured zone.
    ///
    /// The name and the offset both come from the host zone database, so they
    /// describe the same zone even when `TZ` is unset.
    pub fn current() -> Self {
        let local_minus_utc = Local::now().offset().local_minus_utc();
        let timezone = iana_time_zone::get_timezone()
            .ok()
            .filter(|tz| !tz.is_empty())
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());

        Self::new(-local_minus_utc / 60, timezone)
    }

    /// The context computed the first time it is requested in this process.
    pub fn process() -> &'static RequestContext {
        &PROCESS_REQUEST_CONTEXT
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Request messages that carry an optional [`RequestContext`].
pub trait WithRequestContext {
    fn request_context(&self) -> Option<&RequestContext>;

    fn set_request_context(&mut self, context: RequestContext);

    /// Attaches `context` unless the request already has one. Returns whether
    /// the request was changed.
    fn merge_request_context(&mut self, context: &RequestContext) -> bool {
        if self.request_context().is_some() {
            return false;
        }

        self.set_request_context(context.clone());
        true
    }
}
