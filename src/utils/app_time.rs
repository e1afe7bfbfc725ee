// src/utils/app_time.rs

// web_time re-exports std::time on native targets
pub type AppInstant = web_time::Instant;

pub fn now() -> AppInstant {
    web_time::Instant::now()
}
