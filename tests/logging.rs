use tbed::{logging, ByteOrder, HostConfig};

#[test]
fn logs_land_in_the_configured_file() {
    let td = tempfile::tempdir().unwrap();
    let mut cfg = HostConfig::new(ByteOrder::detect().unwrap());
    cfg.log_file = td.path().join("nested").join("tbed.log");
    cfg.debug = true;

    logging::init(&cfg).unwrap();
    tracing::info!(page = 1, "hello from the host");

    let raw = std::fs::read_to_string(&cfg.log_file).unwrap();
    assert!(raw.contains("hello from the host"), "log file was: {raw}");

    // A second subscriber cannot be installed.
    assert!(logging::init(&cfg).is_err());
}
