use eframe::egui::{
    Align, Align2, Area, CentralPanel, Color32, Context, FontId, Frame, Id, Layout, Margin, Order, Painter,
    Rect, RichText, ScrollArea, Sense, Stroke, StrokeKind, TopBottomPanel, Ui, UiBuilder, pos2, vec2,
};

use crate::config::plot::ThemeColors;
use crate::config::{CHART, PLOT_COLORS};
use crate::domain::Theme;
use crate::engine::{CoordinateMapper, LoadState, Tooltip, ViewportState};
use crate::ui::app::ChartApp;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::plot_layers::{LayerContext, default_stack};
use crate::ui::styles::UiStyleExt;
use crate::ui::ui_panels::{ControlsPanel, Panel, SmaToggle};
use crate::ui::utils::{marker_color, theme_colors};
use crate::utils::TimeUtils;

impl ChartApp {
    pub(super) fn render_controls_panel(&mut self, ctx: &Context) {
        let controller = &self.controller;
        let mut panel = ControlsPanel {
            symbol: controller.subscription().qualified_name(),
            active_range: controller.active_range(),
            style: controller.style,
            overlays: controller.overlays(),
            sma_fast: SmaToggle {
                period: controller.sma_fast().period(),
                visible: controller.sma_fast().visible,
            },
            sma_slow: SmaToggle {
                period: controller.sma_slow().period(),
                visible: controller.sma_slow().visible,
            },
            theme: controller.subscription().theme,
            fullscreen: controller.fullscreen,
            last_price: controller.cached_last_price(),
            can_refresh: *controller.load_state() == LoadState::Ready,
            refreshing: controller.is_refreshing(),
        };

        let events = TopBottomPanel::top("controls_panel")
            .exact_height(UI_CONFIG.controls_height)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                panel.render(ui)
            })
            .inner;

        for event in events {
            self.handle_control_event(event);
        }
    }

    pub(super) fn render_footer_panel(&self, ctx: &Context) {
        TopBottomPanel::bottom("footer_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some((first, last)) = self.controller.series().year_span() {
                    ui.label_subdued(format!("{} - {}", first, last));
                }
                ui.label_subdued(UI_TEXT.footer_currency_note);

                if let ViewportState::Focused { target, .. } = self.controller.viewport_state() {
                    ui.metric(
                        UI_TEXT.focused_on,
                        &target.format(TimeUtils::TOOLTIP_DATE_FORMAT).to_string(),
                        UI_CONFIG.colors.accent,
                    );
                }

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if let Some(source) = self.controller.last_source() {
                        ui.metric(UI_TEXT.label_source, source, UI_CONFIG.colors.label);
                    }
                });
            });
        });
    }

    pub(super) fn render_central_panel(&mut self, ctx: &Context) {
        let theme = self.controller.subscription().theme;
        let colors = theme_colors(theme);

        CentralPanel::default()
            .frame(Frame::new().fill(colors.background).inner_margin(Margin::same(4)))
            .show(ctx, |ui| {
                let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());

                if *self.controller.load_state() == LoadState::Ready {
                    self.controller.prepare_surface(rect);

                    match response.hover_pos() {
                        Some(pointer) => self.controller.pointer_move(pointer),
                        None => self.controller.pointer_leave(),
                    }
                    if response.clicked()
                        && let Some(pointer) = response.interact_pointer_pos()
                    {
                        self.controller.click(pointer);
                    }

                    let painter = ui.painter_at(rect);
                    self.paint_chart(&painter, theme);
                }

                self.render_status_overlay(ui, rect);
            });

        self.render_popup(ctx);
    }

    fn paint_chart(&self, painter: &Painter, theme: Theme) {
        let Some(surface) = self.controller.surface() else {
            return;
        };
        let Some(mapper) = surface.mapper.as_ref() else {
            return;
        };
        let colors = theme_colors(theme);

        let layer_ctx = LayerContext {
            series: self.controller.series().as_ref(),
            mapper,
            colors,
            is_dark: theme == Theme::Dark,
            style: self.controller.style,
            overlays: self.controller.overlays(),
            sma_fast: self.controller.sma_fast(),
            sma_slow: self.controller.sma_slow(),
            profile_layout: &surface.profile_layout,
            marker_points: &surface.marker_points,
        };
        for layer in default_stack() {
            layer.render(painter, &layer_ctx);
        }

        paint_tooltip(painter, self.controller.tooltip(), mapper, colors);
    }

    /// Spinner while loading, the error message with its affordance after a
    /// failed load, or the inline note when no surface could be built.
    fn render_status_overlay(&mut self, ui: &mut Ui, rect: Rect) {
        let load_state = self.controller.load_state().clone();
        let surface_error = self.controller.surface_error().cloned();
        if !load_state.is_loading() && load_state.error().is_none() && surface_error.is_none() {
            return;
        }

        if load_state != LoadState::Ready {
            ui.painter().rect_filled(rect, 0.0, PLOT_COLORS.overlay_fill);
        }

        let builder = UiBuilder::new()
            .max_rect(rect)
            .layout(Layout::top_down(Align::Center));
        ui.scope_builder(builder, |ui| {
            ui.add_space(rect.height() * 0.4);
            match &load_state {
                LoadState::Loading => {
                    ui.spinner();
                    ui.label_subdued(UI_TEXT.loading);
                }
                LoadState::Failed(error) => {
                    ui.label_error(error.user_message());
                    if error.is_retryable() {
                        if ui.button(UI_TEXT.button_retry).clicked() {
                            self.controller.retry();
                        }
                    } else if let Some(url) = error.external_viewer_url(self.controller.subscription()) {
                        ui.hyperlink_to(UI_TEXT.link_external_viewer, url);
                    }
                }
                LoadState::Ready | LoadState::Idle => {
                    if let Some(error) = &surface_error {
                        ui.label_warning(error.user_message());
                    }
                }
            }
        });
    }

    fn render_popup(&mut self, ctx: &Context) {
        let Some((event, rect)) = self.controller.popup().map(|(e, r)| (e.clone(), r)) else {
            return;
        };
        let mut close = false;

        Area::new(Id::new("event_popup"))
            .order(Order::Foreground)
            .fixed_pos(rect.min)
            .show(ctx, |ui| {
                Frame::popup(ui.style())
                    .fill(PLOT_COLORS.popup_fill)
                    .corner_radius(UI_CONFIG.popup_corner_radius)
                    .show(ui, |ui| {
                        ui.set_width(rect.width() - 16.0);
                        ui.set_max_height(rect.height() - 16.0);

                        ui.horizontal(|ui| {
                            let style = event.style();
                            ui.label(
                                RichText::new(format!("{}  {}", style.glyph, event.display_category()))
                                    .small()
                                    .strong()
                                    .color(marker_color(style)),
                            );
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                if ui.small_button("✕").clicked() {
                                    close = true;
                                }
                            });
                        });

                        ui.label(RichText::new(&event.headline).strong());
                        ui.label_subdued(format!(
                            "{} · {}",
                            event.time.format(TimeUtils::POPUP_DATE_FORMAT),
                            event.time.format(TimeUtils::POPUP_TIME_FORMAT)
                        ));

                        ScrollArea::vertical().max_height(70.0).show(ui, |ui| {
                            ui.label(RichText::new(event.body()).small());
                        });

                        if let Some(url) = &event.pdf_url {
                            ui.hyperlink_to(UI_TEXT.link_pdf, url);
                        }
                    });
            });

        if close {
            self.controller.close_popup();
        }
    }
}

fn paint_tooltip(painter: &Painter, tooltip: &Tooltip, mapper: &CoordinateMapper, colors: &ThemeColors) {
    let cfg = CHART.tooltip;
    let font = FontId::proportional(UI_CONFIG.tooltip_font_size);
    let plot = mapper.plot_rect();

    let (origin, width, lines) = match tooltip {
        Tooltip::Hidden => return,
        Tooltip::Bar(bar) => {
            if let Some(x) = mapper.index_to_x(bar.bar_index) {
                painter.line_segment(
                    [pos2(x, plot.top()), pos2(x, plot.bottom())],
                    Stroke::new(1.0, colors.crosshair),
                );
            }
            let mut lines = vec![bar.date_label(), bar.price_label()];
            lines.extend(bar.volume_label());
            (bar.position, cfg.width_px, lines)
        }
        Tooltip::Profile(profile) => (
            profile.position,
            cfg.width_px + 20.0,
            vec![profile.range_label(), profile.volume_label()],
        ),
    };

    let rect = Rect::from_min_size(origin, vec2(width, cfg.height_px));
    painter.rect_filled(rect, 4.0, PLOT_COLORS.tooltip_fill);
    painter.rect_stroke(rect, 4.0, Stroke::new(1.0, colors.border), StrokeKind::Inside);

    let line_height = cfg.height_px / (lines.len() as f32 + 1.0);
    for (i, line) in lines.into_iter().enumerate() {
        let color = if i == 1 {
            Color32::WHITE
        } else {
            colors.text
        };
        painter.text(
            pos2(rect.left() + 8.0, rect.top() + line_height * (i as f32 + 1.0)),
            Align2::LEFT_CENTER,
            line,
            font.clone(),
            color,
        );
    }
}
