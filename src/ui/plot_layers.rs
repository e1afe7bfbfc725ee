use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, StrokeKind, pos2, vec2};

use crate::config::CHART;
use crate::config::PLOT_COLORS;
use crate::config::plot::ThemeColors;
use crate::domain::{Bar, BarType};
use crate::engine::{BoundMarker, ChartStyle, CoordinateMapper, OverlayToggles};
use crate::models::{MovingAverageOverlay, ProfileLayout, Series};
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::utils::marker_color;
use crate::utils::format_inr;
use crate::utils::time_utils::TimeUtils;

/// Context passed to every layer during rendering.
/// This prevents argument explosion.
pub struct LayerContext<'a> {
    pub series: &'a Series,
    pub mapper: &'a CoordinateMapper,
    pub colors: &'a ThemeColors,
    pub is_dark: bool,
    pub style: ChartStyle,
    pub overlays: OverlayToggles,
    pub sma_fast: &'a MovingAverageOverlay,
    pub sma_slow: &'a MovingAverageOverlay,
    pub profile_layout: &'a ProfileLayout,
    pub marker_points: &'a [(BoundMarker, Pos2)],
}

impl LayerContext<'_> {
    /// Visible bars with their series index.
    fn visible_bars(&self) -> impl Iterator<Item = (usize, &Bar)> + '_ {
        self.mapper
            .visible_indices()
            .filter_map(move |i| self.series.get(i).map(|bar| (i, bar)))
    }
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, painter: &Painter, ctx: &LayerContext);
}

/// Back-to-front paint order.
pub fn default_stack() -> [&'static dyn PlotLayer; 7] {
    [
        &GridLayer,
        &VolumeProfileLayer,
        &VolumeLayer,
        &SeriesLayer,
        &MovingAverageLayer,
        &LastPriceLayer,
        &EventMarkerLayer,
    ]
}

// ============================================================================
// 1. GRID + AXIS LABELS
// ============================================================================
pub struct GridLayer;

impl PlotLayer for GridLayer {
    fn render(&self, painter: &Painter, ctx: &LayerContext) {
        let plot = ctx.mapper.plot_rect();
        let grid = Stroke::new(1.0, ctx.colors.grid);
        let font = FontId::monospace(UI_CONFIG.axis_font_size);

        let (low, high) = ctx.mapper.price_bounds();
        let steps = UI_CONFIG.price_ticks.max(2) - 1;
        for i in 0..=steps {
            let price = low + (high - low) * i as f64 / steps as f64;
            let Some(y) = ctx.mapper.price_to_y(price) else {
                continue;
            };
            painter.line_segment([pos2(plot.left(), y), pos2(plot.right(), y)], grid);
            painter.text(
                pos2(plot.right() - 4.0, y - 2.0),
                Align2::RIGHT_BOTTOM,
                format_inr(price),
                font.clone(),
                ctx.colors.text,
            );
        }

        let visible = ctx.mapper.visible_indices();
        let step = (visible.len() / UI_CONFIG.time_ticks.max(1)).max(1);
        for index in visible.step_by(step) {
            let (Some(x), Some(bar)) = (ctx.mapper.index_to_x(index), ctx.series.get(index)) else {
                continue;
            };
            painter.line_segment([pos2(x, plot.top()), pos2(x, plot.bottom())], grid);
            painter.text(
                pos2(x, plot.bottom() - 2.0),
                Align2::CENTER_BOTTOM,
                bar.time.format(TimeUtils::POPUP_DATE_FORMAT).to_string(),
                font.clone(),
                ctx.colors.text,
            );
        }
    }
}

// ============================================================================
// 2. VOLUME PROFILE (volume by price, right-aligned)
// ============================================================================
pub struct VolumeProfileLayer;

impl PlotLayer for VolumeProfileLayer {
    fn render(&self, painter: &Painter, ctx: &LayerContext) {
        if !ctx.overlays.volume_profile {
            return;
        }
        let (bin_fill, poc_fill) = if ctx.is_dark {
            (PLOT_COLORS.profile_bin_dark, PLOT_COLORS.profile_poc_dark)
        } else {
            (PLOT_COLORS.profile_bin_light, PLOT_COLORS.profile_poc_light)
        };

        for bin in &ctx.profile_layout.bins {
            painter.rect_filled(bin.rect, 0.0, if bin.is_poc { poc_fill } else { bin_fill });
        }

        if let Some(poc) = ctx.profile_layout.poc() {
            painter.rect_stroke(
                poc.rect,
                0.0,
                Stroke::new(1.0, PLOT_COLORS.profile_poc_stroke),
                StrokeKind::Inside,
            );
            painter.text(
                pos2(poc.rect.left() - 28.0, poc.rect.center().y),
                Align2::LEFT_CENTER,
                UI_TEXT.label_poc,
                FontId::monospace(UI_CONFIG.axis_font_size),
                PLOT_COLORS.profile_poc_label,
            );
        }
    }
}

// ============================================================================
// 3. VOLUME HISTOGRAM (bottom band)
// ============================================================================
pub struct VolumeLayer;

impl PlotLayer for VolumeLayer {
    fn render(&self, painter: &Painter, ctx: &LayerContext) {
        if !ctx.overlays.volume {
            return;
        }
        let bottom = ctx.mapper.plot_rect().bottom();
        let half = (ctx.mapper.bar_spacing() * 0.35).max(0.5);

        for (index, bar) in ctx.visible_bars() {
            let (Some(x), Some(top)) = (ctx.mapper.index_to_x(index), ctx.mapper.volume_to_y(bar.volume)) else {
                continue;
            };
            let color = match bar.get_type() {
                BarType::Bullish => PLOT_COLORS.volume_up,
                BarType::Bearish => PLOT_COLORS.volume_down,
            };
            painter.rect_filled(
                Rect::from_min_max(pos2(x - half, top), pos2(x + half, bottom)),
                0.0,
                color,
            );
        }
    }
}

// ============================================================================
// 4. PRIMARY SERIES (line / area / candles)
// ============================================================================
pub struct SeriesLayer;

impl SeriesLayer {
    fn close_points(ctx: &LayerContext) -> Vec<Pos2> {
        ctx.visible_bars()
            .filter_map(|(i, bar)| Some(pos2(ctx.mapper.index_to_x(i)?, ctx.mapper.price_to_y(bar.close)?)))
            .collect()
    }

    fn render_candles(painter: &Painter, ctx: &LayerContext) {
        let half = (ctx.mapper.bar_spacing() * 0.35).max(0.5);
        for (index, bar) in ctx.visible_bars() {
            let Some(x) = ctx.mapper.index_to_x(index) else {
                continue;
            };
            let (body_low, body_high) = bar.body_range();
            let (Some(high), Some(low), Some(body_top), Some(body_bottom)) = (
                ctx.mapper.price_to_y(bar.high),
                ctx.mapper.price_to_y(bar.low),
                ctx.mapper.price_to_y(body_high),
                ctx.mapper.price_to_y(body_low),
            ) else {
                continue;
            };
            let color = match bar.get_type() {
                BarType::Bullish => PLOT_COLORS.candle_up,
                BarType::Bearish => PLOT_COLORS.candle_down,
            };
            painter.line_segment([pos2(x, high), pos2(x, low)], Stroke::new(1.0, color));

            // Screen y grows downward, so the body's high is its top edge
            let height = (body_bottom - body_top).max(1.0);
            painter.rect_filled(
                Rect::from_min_size(pos2(x - half, body_top), vec2(half * 2.0, height)),
                0.0,
                color,
            );
        }
    }
}

impl PlotLayer for SeriesLayer {
    fn render(&self, painter: &Painter, ctx: &LayerContext) {
        let stroke = Stroke::new(1.5, PLOT_COLORS.series_line);
        match ctx.style {
            ChartStyle::Candle => Self::render_candles(painter, ctx),
            ChartStyle::Line => {
                painter.add(Shape::line(Self::close_points(ctx), stroke));
            }
            ChartStyle::Area => {
                let points = Self::close_points(ctx);
                let bottom = ctx.mapper.plot_rect().bottom();
                // One convex quad per segment; the whole area is not convex
                for pair in points.windows(2) {
                    let quad = vec![pair[0], pair[1], pos2(pair[1].x, bottom), pos2(pair[0].x, bottom)];
                    painter.add(Shape::convex_polygon(quad, PLOT_COLORS.series_area_top, Stroke::NONE));
                }
                painter.add(Shape::line(points, stroke));
            }
        }
    }
}

// ============================================================================
// 5. MOVING AVERAGES
// ============================================================================
pub struct MovingAverageLayer;

impl PlotLayer for MovingAverageLayer {
    fn render(&self, painter: &Painter, ctx: &LayerContext) {
        for (overlay, color) in [
            (ctx.sma_fast, PLOT_COLORS.sma_fast),
            (ctx.sma_slow, PLOT_COLORS.sma_slow),
        ] {
            if !overlay.is_drawable() {
                continue;
            }
            let points: Vec<Pos2> = overlay
                .points()
                .iter()
                .filter_map(|p| ctx.mapper.to_screen(p.time, p.value))
                .collect();
            if points.len() >= 2 {
                painter.add(Shape::line(points, Stroke::new(1.2, color)));
            }
        }
    }
}

// ============================================================================
// 6. LAST PRICE ("CURRENT")
// ============================================================================
pub struct LastPriceLayer;

impl PlotLayer for LastPriceLayer {
    fn render(&self, painter: &Painter, ctx: &LayerContext) {
        let Some(price) = ctx.series.last_close() else {
            return;
        };
        let Some(y) = ctx.mapper.price_to_y(price) else {
            return;
        };
        let plot = ctx.mapper.plot_rect();
        painter.extend(Shape::dashed_line(
            &[pos2(plot.left(), y), pos2(plot.right(), y)],
            Stroke::new(1.0, PLOT_COLORS.last_price_line),
            6.0,
            4.0,
        ));

        let label = format!("{} {}", UI_TEXT.label_current, format_inr(price));
        let galley = painter.layout_no_wrap(
            label,
            FontId::monospace(UI_CONFIG.axis_font_size),
            Color32::BLACK,
        );
        let rect = Align2::RIGHT_CENTER
            .anchor_size(pos2(plot.right() - 2.0, y), galley.size())
            .expand(2.0);
        painter.rect_filled(rect, 2.0, PLOT_COLORS.last_price_line);
        painter.galley(rect.shrink(2.0).min, galley, Color32::BLACK);
    }
}

// ============================================================================
// 7. EVENT MARKERS
// ============================================================================
pub struct EventMarkerLayer;

impl PlotLayer for EventMarkerLayer {
    fn render(&self, painter: &Painter, ctx: &LayerContext) {
        let radius = CHART.marker_radius_px;
        for (marker, pos) in ctx.marker_points {
            let color = marker_color(marker.style);
            painter.circle_filled(*pos, radius, color);
            if marker.is_target() {
                painter.circle_stroke(*pos, radius + 2.0, Stroke::new(1.5, color));
            }
            painter.text(
                *pos,
                Align2::CENTER_CENTER,
                marker.style.glyph,
                FontId::proportional(radius * 1.4),
                Color32::WHITE,
            );
        }
    }
}
