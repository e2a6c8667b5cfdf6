//! Native wheel window using egui
//!
//! Draws the pie, the pointer, the current title and the spin button, and
//! turns selection changes into clicks and camera shake.

use egui::emath::Rot2;
use egui::epaint::TextShape;
use egui::text::{Galley, LayoutJob, TextFormat};
use egui::{Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2};
use noise::OpenSimplex;
use std::sync::Arc;
use tracing::{info, warn};

use crate::anime::AnimeEntry;
use crate::audio::{ClickPlayer, ClickSound};
use crate::color::{darken, parse_hex_color};
use crate::config::Config;
use crate::wheel::items::{normalize_angle, select_item, WeightedItem};
use crate::wheel::session::WheelSession;
use crate::wheel::shake::{open_simplex, ShakeState};
use crate::wheel::text_fit::fit_text;

/// Largest arc drawn as a single convex polygon
const MAX_FAN_DEGREES: f32 = 90.0;

/// Arc resolution
const DEGREES_PER_SEGMENT: f32 = 4.0;

/// Screen angle of the pointer (straight up, y grows downward)
const POINTER_ANGLE: f32 = -90.0;

const SPIN_BUTTON_RADIUS: f32 = 80.0;
const SPIN_RING_WIDTH: f32 = 20.0;
const POINTER_SIZE: f32 = 50.0;

/// Off-white for the pointer and the button
const RAY_WHITE: Color32 = Color32::from_rgb(245, 245, 245);

/// Feature switches from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewOptions {
    /// Static wheel: no idle rotation, pointer, banner or spin button
    pub no_spin: bool,
    pub no_shake: bool,
    pub no_sound: bool,
}

/// Run the wheel window until it is closed
pub fn run_spinner(
    entries: Vec<AnimeEntry>,
    items: Vec<WeightedItem>,
    config: Config,
    options: ViewOptions,
) -> anyhow::Result<()> {
    let seed = config
        .shake
        .seed
        .unwrap_or_else(|| chrono::Utc::now().timestamp() as u32);
    info!("Shake noise seed: {}", seed);

    let shake = ShakeState::new(config.shake.amplitude, config.shake.frequency, config.shake.duration)?;

    let mut params = config.rotation_params();
    if options.no_spin {
        params.idle_speed = 0.0;
    }

    let session = WheelSession::new(items, params, config.wheel.spin_turns, shake, open_simplex(seed))?;
    let player = if options.no_sound { None } else { open_player(&config) };

    let size = config.window_size;
    let native = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([size, size])
            .with_title("AniList Spinner"),
        multisampling: 4,
        ..Default::default()
    };

    eframe::run_native(
        "AniList Spinner",
        native,
        Box::new(move |cc| Ok(Box::new(SpinnerApp::new(cc, entries, session, config, options, player)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))
}

/// Audio is optional: a missing device only costs the clicks
fn open_player(config: &Config) -> Option<ClickPlayer> {
    let sound = match &config.audio.click_sound {
        Some(path) => match ClickSound::from_wav(path) {
            Ok(sound) => sound,
            Err(e) => {
                warn!("Failed to load click sound {:?}: {}, using built-in click", path, e);
                ClickSound::synthesized()
            }
        },
        None => ClickSound::synthesized(),
    };

    match ClickPlayer::new(sound, config.audio.volume, config.audio.pitch_range) {
        Ok(player) => Some(player),
        Err(e) => {
            warn!("No audio output, clicks disabled: {}", e);
            None
        }
    }
}

/// Angular extent of one item on screen, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
struct SectorSpan {
    start: f32,
    end: f32,
}

impl SectorSpan {
    fn mid(&self) -> f32 {
        self.start + (self.end - self.start) * 0.5
    }
}

/// Screen spans of every item with the wheel turned by `angle_degrees`
///
/// Items are laid out clockwise from the pointer and the whole pie turns
/// backwards, so the pointer reads the item at `angle_degrees`.
fn pie_layout(items: &[WeightedItem], angle_degrees: f64) -> Vec<SectorSpan> {
    let rotation = 360.0 - normalize_angle(angle_degrees) as f32;
    let mut last = POINTER_ANGLE + rotation;

    items
        .iter()
        .map(|item| {
            let start = last;
            let end = start + 360.0 * item.weight as f32;
            last = end;
            SectorSpan { start, end }
        })
        .collect()
}

/// Convex polygons covering an arc sector
fn sector_fans(center: Pos2, radius: f32, start_deg: f32, end_deg: f32) -> Vec<Vec<Pos2>> {
    let span = end_deg - start_deg;
    if span <= 0.0 {
        return Vec::new();
    }

    let pieces = (span / MAX_FAN_DEGREES).ceil().max(1.0) as usize;
    let piece = span / pieces as f32;

    (0..pieces)
        .map(|p| {
            let a0 = start_deg + piece * p as f32;
            let segments = (piece / DEGREES_PER_SEGMENT).ceil().max(1.0) as usize;

            let mut points = Vec::with_capacity(segments + 2);
            points.push(center);
            for k in 0..=segments {
                let a = a0 + piece * k as f32 / segments as f32;
                points.push(center + radius * Vec2::angled(a.to_radians()));
            }
            points
        })
        .collect()
}

fn draw_sector(painter: &Painter, center: Pos2, radius: f32, span: SectorSpan, color: Color32) {
    for fan in sector_fans(center, radius, span.start, span.end) {
        painter.add(Shape::convex_polygon(fan, color, Stroke::NONE));
    }
}

/// Lay out `text` on a single line with extra letter spacing
fn text_galley(ctx: &egui::Context, text: &str, font_size: f32, spacing: f32, color: Color32) -> Arc<Galley> {
    let mut job = LayoutJob::default();
    job.append(
        text,
        0.0,
        TextFormat {
            font_id: FontId::proportional(font_size),
            extra_letter_spacing: spacing,
            color,
            ..Default::default()
        },
    );
    ctx.fonts(|f| f.layout_job(job))
}

/// Top-left corner for a label centered at half radius along `angle`
fn label_position(center: Pos2, radius: f32, text_size: Vec2, angle: f32) -> Pos2 {
    let local = Vec2::new(radius * 0.5 - text_size.x * 0.5, -text_size.y * 0.5);
    center + Rot2::from_angle(angle) * local
}

struct SpinnerApp {
    entries: Vec<AnimeEntry>,
    /// Cover color and its darker stripe color per entry
    colors: Vec<(Color32, Color32)>,
    session: WheelSession<OpenSimplex>,
    config: Config,
    options: ViewOptions,
    player: Option<ClickPlayer>,
}

impl SpinnerApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        entries: Vec<AnimeEntry>,
        session: WheelSession<OpenSimplex>,
        config: Config,
        options: ViewOptions,
        player: Option<ClickPlayer>,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let colors = entries
            .iter()
            .map(|e| {
                let color = parse_hex_color(&e.color);
                (color, darken(color, 0.05))
            })
            .collect();

        info!("Wheel ready with {} entries", entries.len());

        Self {
            entries,
            colors,
            session,
            config,
            options,
            player,
        }
    }

    /// Pointer moved onto another item
    fn on_crossing(&mut self, now: f64) {
        if let Some(player) = &self.player {
            player.click();
        }
        if !self.options.no_shake {
            self.session.trigger_shake(now);
        }
    }

    fn draw_pie(&self, ctx: &egui::Context, painter: &Painter, rect: Rect, offset: Vec2) {
        let radius = (rect.width() - 50.0) * 0.5;
        let center = rect.center() + offset;

        // Shadow
        painter.circle_filled(
            center,
            rect.width() * 0.5,
            Color32::from_rgba_unmultiplied(245, 245, 245, 32),
        );

        let spans = pie_layout(self.session.items(), self.session.angle());

        // One stripe per episode left
        for ((span, entry), &(color, alt_color)) in spans.iter().zip(&self.entries).zip(&self.colors) {
            let stripes = entry.episodes_left.max(1);
            let stripe_width = (span.end - span.start) / stripes as f32;

            for i in 0..stripes {
                let start = span.start + stripe_width * i as f32;
                let stripe = SectorSpan {
                    start,
                    end: start + stripe_width,
                };
                let color = if i % 2 == 1 { alt_color } else { color };
                draw_sector(painter, center, radius, stripe, color);
            }
        }

        let labels = &self.config.labels;
        for (span, item) in spans.iter().zip(self.session.items()) {
            let fitted = fit_text(
                &item.label,
                labels.font_size,
                labels.spacing,
                radius - labels.margin,
                |t: &str, size: f32, spacing: f32| {
                    text_galley(ctx, t, size, spacing, Color32::WHITE).size().into()
                },
            );

            let galley = text_galley(ctx, &item.label, fitted.font_size, fitted.spacing, Color32::WHITE);
            let angle = span.mid().to_radians();
            let pos = label_position(center, radius, galley.size(), angle);
            painter.add(TextShape::new(pos, galley, Color32::WHITE).with_angle(angle));
        }
    }

    fn draw_pointer(&self, painter: &Painter, rect: Rect) {
        let top = rect.center_top();
        let half = POINTER_SIZE * 0.5;
        painter.add(Shape::convex_polygon(
            vec![
                top + Vec2::new(half, 0.0),
                top + Vec2::new(0.0, POINTER_SIZE),
                top + Vec2::new(-half, 0.0),
            ],
            RAY_WHITE,
            Stroke::NONE,
        ));
    }

    /// Current title on a translucent strip along the bottom
    fn draw_banner(&self, ctx: &egui::Context, painter: &Painter, rect: Rect) {
        let banner = &self.config.banner;
        let Ok(item) = select_item(self.session.items(), self.session.angle()) else {
            return;
        };

        let fitted = fit_text(
            &item.label,
            banner.font_size,
            banner.spacing,
            rect.width() - banner.margin,
            |t: &str, size: f32, spacing: f32| text_galley(ctx, t, size, spacing, RAY_WHITE).size().into(),
        );
        let galley = text_galley(ctx, &item.label, fitted.font_size, fitted.spacing, RAY_WHITE);

        let strip = Rect::from_min_max(
            Pos2::new(rect.left(), rect.bottom() - banner.padding * 2.0 - fitted.height()),
            rect.right_bottom(),
        );
        painter.rect_filled(strip, 0.0, Color32::from_black_alpha(128));

        let pos = Pos2::new(
            rect.center().x - fitted.width() * 0.5,
            rect.bottom() - banner.padding - fitted.height(),
        );
        painter.galley(pos, galley, RAY_WHITE);
    }

    /// Dim overlay with a round "spin" button; returns true when pressed
    fn spin_button(&self, ctx: &egui::Context, painter: &Painter, rect: Rect) -> bool {
        let center = rect.center();

        painter.rect_filled(rect, 0.0, Color32::from_black_alpha(128));
        painter.circle_filled(
            center,
            SPIN_BUTTON_RADIUS + SPIN_RING_WIDTH,
            Color32::from_rgba_unmultiplied(245, 245, 245, 96),
        );
        painter.circle_filled(center, SPIN_BUTTON_RADIUS, RAY_WHITE);

        let galley = text_galley(ctx, "spin", 64.0, 4.0, Color32::BLACK);
        let pos = center - galley.size() * 0.5;
        painter.galley(pos, galley, Color32::BLACK);

        let (hovered, clicked, space) = ctx.input(|i| {
            let inside = |p: Option<Pos2>| p.is_some_and(|p| p.distance(center) < SPIN_BUTTON_RADIUS);
            (
                inside(i.pointer.hover_pos()),
                i.pointer.primary_clicked() && inside(i.pointer.interact_pos()),
                i.key_pressed(egui::Key::Space),
            )
        });

        if hovered {
            ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        clicked || space
    }
}

impl eframe::App for SpinnerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Continuous animation
        ctx.request_repaint();

        let (now, dt) = ctx.input(|i| (i.time, i.stable_dt as f64));

        match self.session.advance(dt, now) {
            Ok(update) => {
                if update.changed && !self.options.no_spin {
                    self.on_crossing(now);
                }
            }
            Err(e) => {
                crate::log_error!(e);
            }
        }

        let (dx, dy) = self.session.shake_offset(now);
        let offset = Vec2::new(dx as f32, dy as f32);

        let mut spin_requested = false;

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let painter = ui.painter();

                self.draw_pie(ctx, painter, rect, offset);

                if self.options.no_spin {
                    return;
                }

                self.draw_pointer(painter, rect);
                self.draw_banner(ctx, painter, rect);

                if !self.session.is_spinning() {
                    spin_requested = self.spin_button(ctx, painter, rect);
                }
            });

        if spin_requested {
            self.session.spin(&mut rand::thread_rng());
        }
    }
}
