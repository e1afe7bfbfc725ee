//! File persistence configuration

pub struct PersistenceConfig {
    /// Path for saving/loading window + UI state (eframe persistence)
    pub app_state_path: &'static str,
    /// Directory where `make_demo_fixture` writes its output
    pub fixture_dir: &'static str,
    /// Bars fixture filename
    pub bars_filename: &'static str,
    /// Events fixture filename
    pub events_filename: &'static str,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    app_state_path: ".chart_state.json",
    fixture_dir: "demo_data",
    bars_filename: "demo_bars.json",
    events_filename: "demo_events.json",
};
