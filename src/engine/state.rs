use eframe::egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::domain::Subscription;
use crate::engine::error::ChartError;
use crate::engine::mapper::CoordinateMapper;
use crate::engine::markers::BoundMarker;
use crate::models::ProfileLayout;
use crate::utils::app_time::{AppInstant, now};

/// Where the chart is in its load cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(ChartError),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&ChartError> {
        match self {
            LoadState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// How the primary series is painted. Has no effect on any analytics.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize, strum_macros::EnumIter,
    clap::ValueEnum,
)]
pub enum ChartStyle {
    Line,
    #[default]
    Area,
    Candle,
}

impl ChartStyle {
    pub fn label(&self) -> &'static str {
        match self {
            ChartStyle::Line => "Line",
            ChartStyle::Area => "Area",
            ChartStyle::Candle => "Candles",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OverlayToggles {
    pub volume: bool,
    pub volume_profile: bool,
}

/// The drawing surface for one subscription at one container size.
///
/// Holds every pixel-space cache (scale, profile rectangles, marker
/// points). It is created for a subscription and dropped whole on
/// teardown, refetch, or any change of symbol, exchange or theme; a resize
/// or a layout change rebuilds it.
#[derive(Debug)]
pub struct Surface {
    subscription: Subscription,
    container: Rect,
    generation: u64,
    created_at: AppInstant,
    pub mapper: Option<CoordinateMapper>,
    pub profile_layout: ProfileLayout,
    pub marker_points: Vec<(BoundMarker, Pos2)>,
}

impl Surface {
    /// Fails for an empty or non-finite container.
    pub fn create(subscription: &Subscription, container: Rect, generation: u64) -> Result<Self, ChartError> {
        if !container.is_finite() || container.width() <= 0.0 || container.height() <= 0.0 {
            return Err(ChartError::RenderSurface(format!(
                "container is {:.0}x{:.0}",
                container.width(),
                container.height()
            )));
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_surface_lifecycle {
            log::debug!(
                "Surface created for {} at {:.0}x{:.0}",
                subscription,
                container.width(),
                container.height()
            );
        }

        Ok(Self {
            subscription: subscription.clone(),
            container,
            generation,
            created_at: now(),
            mapper: None,
            profile_layout: ProfileLayout::default(),
            marker_points: Vec::new(),
        })
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    pub fn container(&self) -> Rect {
        self.container
    }

    pub fn created_at(&self) -> AppInstant {
        self.created_at
    }

    /// Needs rebuilding for this container, layout generation or subscription.
    pub fn is_stale(&self, subscription: &Subscription, container: Rect, generation: u64) -> bool {
        self.subscription != *subscription || self.container != container || self.generation != generation
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_surface_lifecycle {
            log::debug!("Surface destroyed for {}", self.subscription);
        }
    }
}
