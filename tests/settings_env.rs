// Kept in its own test binary: the environment is process wide.
use std::fs;

use itinerary_tools::settings::Settings;

#[test]
fn environment_wins_over_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tools.json");
    fs::write(
        &path,
        r#"{ "diagnostics": { "quote_id": "DVI2025125", "group_type": 3, "database": "/srv/dvi.db" } }"#,
    )
    .unwrap();
    unsafe {
        std::env::set_var("ITINERARY_TOOLS__DIAGNOSTICS__GROUP_TYPE", "2");
        std::env::set_var("ITINERARY_TOOLS__DIAGNOSTICS__QUOTE_ID", "DVI2025126");
    }
    let loaded = Settings::load(Some(&path));
    unsafe {
        std::env::remove_var("ITINERARY_TOOLS__DIAGNOSTICS__GROUP_TYPE");
        std::env::remove_var("ITINERARY_TOOLS__DIAGNOSTICS__QUOTE_ID");
    }
    let settings = loaded.expect("settings");
    assert_eq!(settings.diagnostics.group_type, 2);
    assert_eq!(settings.diagnostics.quote_id, "DVI2025126");
    // untouched by the environment
    assert_eq!(settings.diagnostics.database.to_str(), Some("/srv/dvi.db"));
}
