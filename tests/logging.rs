#![forbid(unsafe_code)]
#![cfg(feature = "logging")]

#[test]
fn second_init_reports_existing_subscriber() {
    assert!(horaire::logging::init().is_ok());
    assert!(horaire::logging::init().is_err());
}
