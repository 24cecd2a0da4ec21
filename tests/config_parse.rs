use call_audit::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../call-audit.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.upload.max_upload_bytes, 100 * 1024 * 1024);
    assert_eq!(cfg.service.analyze_path, "/api/analyze");
    assert_eq!(cfg.service.health_path, "/api/health");
    assert!(!cfg.output.out_dir.is_empty());
}

#[test]
fn defaults_match_example() {
    let raw = include_str!("../call-audit.example.toml");
    let from_file: Config = toml::from_str(raw).expect("parse TOML");
    let defaults = Config::default();
    assert_eq!(from_file.upload.audio_field, defaults.upload.audio_field);
    assert_eq!(
        from_file.upload.max_upload_bytes,
        defaults.upload.max_upload_bytes
    );
    assert_eq!(from_file.service.base_url, defaults.service.base_url);
    assert_eq!(
        from_file.export.cleanup_delay_ms,
        defaults.export.cleanup_delay_ms
    );
}
