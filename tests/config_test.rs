use std::{fs, path::Path};

use poll_button::{
    config::{load_config_with_path, parse_config, resolve_config_path, LocationSource},
    domain::{estimate::HttpMethod, session::ControlState},
};
use tempfile::tempdir;

#[test]
fn empty_config_uses_defaults() {
    let cfg = parse_config("").expect("empty config should parse");

    assert_eq!(
        cfg.endpoint.base_url,
        "https://api.example-ride-service.com/v1/estimates/time"
    );
    assert_eq!(cfg.endpoint.method, HttpMethod::Get);
    assert!(cfg.gps.high_accuracy);
    assert_eq!(cfg.gps.timeout_ms, 20_000);
    assert_eq!(cfg.gps.max_cached_age_ms, 60_000);
    assert_eq!(cfg.location.source, LocationSource::Fixed);
    assert_eq!(cfg.button.transition_duration_ms, 200);
    assert_eq!(cfg.button.idle.label, "Poll");
    assert_eq!(cfg.button.idle.color, "#1155DD");
    assert!(!cfg.button.idle.spinner);
    assert_eq!(
        cfg.button.polling.label,
        "Polling... (press to cancel)"
    );
    assert_eq!(cfg.button.polling.color, "#002299");
    assert!(cfg.button.polling.spinner);
}

#[test]
fn example_config_parses() {
    let src = include_str!("../config.example.toml");
    let cfg = parse_config(src).expect("example config should parse");

    assert_eq!(cfg.endpoint.server_token, "my_token");
    assert_eq!(cfg.location.latitude, 37.0);
    assert_eq!(cfg.location.longitude, -122.0);
}

#[test]
fn button_states_can_be_customised() {
    let src = r##"
[endpoint]
method = "post"

[button]
transition_duration_ms = 350

[button.idle]
label = "Go"
color = "#00AA00"

[button.polling]
label = "Wait"
color = "#AA0000"
spinner = false
"##;

    let cfg = parse_config(src).expect("config should parse");
    assert_eq!(cfg.endpoint.method, HttpMethod::Post);
    assert_eq!(cfg.button.transition_duration_ms, 350);
    let states = cfg.button.states();
    assert_eq!(states.appearance(ControlState::Idle).label, "Go");
    let polling = states.appearance(ControlState::Polling);
    assert_eq!(polling.label, "Wait");
    assert!(!polling.spinner);
}

#[test]
fn poller_settings_carry_endpoint_and_gps() {
    let src = r#"
[endpoint]
base_url = "http://127.0.0.1:9000/v1/estimates/time"
server_token = "abc"

[gps]
timeout_ms = 5000
"#;
    let cfg = parse_config(src).expect("config should parse");
    let settings = cfg.poller_settings();

    assert_eq!(settings.endpoint.server_token, "abc");
    assert_eq!(
        settings.endpoint.base_url,
        "http://127.0.0.1:9000/v1/estimates/time"
    );
    assert_eq!(settings.gps.timeout_ms, 5000);
    assert_eq!(settings.gps.max_cached_age_ms, 60_000);
}

#[test]
fn rejects_non_http_base_url() {
    let err = parse_config("[endpoint]\nbase_url = \"ftp://example.com\"\n")
        .expect_err("ftp url should fail");
    assert!(err.to_string().contains("http:// or https://"));
}

#[test]
fn rejects_unparseable_base_url() {
    let err = parse_config("[endpoint]\nbase_url = \"http://\"\n")
        .expect_err("url without host should fail");
    assert!(err.to_string().contains("is not a valid URL"));
}

#[test]
fn rejects_zero_gps_timeout() {
    let err = parse_config("[gps]\ntimeout_ms = 0\n").expect_err("zero timeout should fail");
    assert!(err.to_string().contains("gps.timeout_ms"));
}

#[test]
fn rejects_unknown_method() {
    assert!(parse_config("[endpoint]\nmethod = \"put\"\n").is_err());
}

#[test]
fn rejects_out_of_range_fixed_latitude() {
    let err = parse_config("[location]\nlatitude = 91.0\n").expect_err("latitude should fail");
    assert!(err.to_string().contains("location.latitude"));
}

#[test]
fn ip_source_skips_coordinate_checks() {
    let cfg = parse_config("[location]\nsource = \"ip\"\nlatitude = 500.0\n")
        .expect("ip source should parse");
    assert_eq!(cfg.location.source, LocationSource::Ip);
}

#[test]
fn rejects_bad_color() {
    let err = parse_config("[button.idle]\nlabel = \"Poll\"\ncolor = \"blue\"\n")
        .expect_err("bad color should fail");
    assert!(err.to_string().contains("#RRGGBB"));
}

#[test]
fn explicit_path_wins() {
    let path = Path::new("/tmp/somewhere/config.toml");
    assert_eq!(resolve_config_path(Some(path)).unwrap(), path);
}

#[test]
fn missing_explicit_config_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.toml");

    let err = load_config_with_path(Some(&path)).expect_err("missing file should fail");
    assert!(err.to_string().contains("config does not exist"));
}

#[test]
fn explicit_config_file_is_loaded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[gps]\ntimeout_ms = 1234\n").unwrap();

    let loaded = load_config_with_path(Some(&path)).expect("config should load");
    assert!(loaded.file_found);
    assert_eq!(loaded.config.gps.timeout_ms, 1234);
}
