//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet. Every use site is additionally gated by
//! `cfg(debug_assertions)`.

pub struct DebugFlags {
    /// Emit fetch lifecycle logs (spawn, stale discard, completion).
    pub print_fetch_lifecycle: bool,
    /// Emit counts of malformed / duplicate records dropped by the normalizer.
    pub print_normalizer_drops: bool,
    /// Emit viewport state transitions.
    pub print_viewport_transitions: bool,
    /// Emit volume-profile recompute summaries (bins, POC).
    pub print_volume_profile: bool,
    /// Emit drawing-surface create / destroy events.
    pub print_surface_lifecycle: bool,
    /// Emit UI interaction logs (range clicks, toggles, marker clicks).
    pub print_ui_interactions: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_fetch_lifecycle: true,
    print_normalizer_drops: false,
    print_viewport_transitions: false,
    print_volume_profile: false,
    print_surface_lifecycle: false,
    print_ui_interactions: true,
};
