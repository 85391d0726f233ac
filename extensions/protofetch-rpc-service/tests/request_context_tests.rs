use chrono::Local;
use protofetch_rpc_service::RequestContext;

// Own test binary: it mutates the process environment.
#[test]
fn timezone_name_matches_host_zone_without_tz_variable() {
    // SAFETY: the only test in this binary, so no other thread reads the environment.
    unsafe { std::env::remove_var("TZ") };

    let context = RequestContext::current();

    let expected_name = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());
    assert_eq!(context.timezone, expected_name);

    let expected_offset = -Local::now().offset().local_minus_utc() / 60;
    assert_eq!(context.timezone_offset_minutes, expected_offset);

    if context.timezone == "UTC" || context.timezone == "Etc/UTC" {
        assert_eq!(context.timezone_offset_minutes, 0);
    }
}
