//! Desktop preview app for myrtio-pulse-composer patterns
//!
//! Shows every channel of a board preset as a lamp whose brightness follows
//! the active pattern over synthetic time, so periods and dead zones can be
//! tuned without flashing a badge.

use std::time::Instant as StdInstant;

use eframe::egui::{self};
use myrtio_pulse_composer::{
    CIE_MAX, Instant, PatternId, PatternSlot,
    preset::{AUTONOMOUS_BADGE, BUTTON_BADGE, BoardPreset},
};

/// Widest frame the preview draws
const MAX_CHANNELS: usize = myrtio_pulse_composer::MAX_CHANNELS;

/// Diameter of each lamp in pixels
const LAMP_SIZE: f32 = 48.0;

/// Gap between lamps
const LAMP_GAP: f32 = 16.0;

/// Width of the duty history plot, in samples
const HISTORY_LEN: usize = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Board {
    Button,
    Autonomous,
}

impl Board {
    const fn preset(self) -> BoardPreset {
        match self {
            Self::Button => BUTTON_BADGE,
            Self::Autonomous => AUTONOMOUS_BADGE,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Button => "button badge",
            Self::Autonomous => "autonomous badge",
        }
    }
}

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 420.0])
            .with_title("Pulse Composer Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "myrtio-pulse-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new()))),
    )
}

struct PreviewApp {
    /// Selected board preset
    board: Board,
    /// Selected pattern
    pattern_id: PatternId,
    /// Pattern instance built from the preset
    pattern: PatternSlot,
    /// Synthetic time in microseconds
    t_us: u64,
    /// Wall-clock reference for delta time
    last_frame: StdInstant,
    /// Whether animation is playing
    playing: bool,
    /// Time scale multiplier (1.0 = realtime)
    time_scale: f32,
    /// Recent duty values per channel, oldest first
    history: Vec<[u16; MAX_CHANNELS]>,
}

impl PreviewApp {
    fn new() -> Self {
        let board = Board::Button;
        let pattern_id = PatternId::Beat;
        Self {
            board,
            pattern_id,
            pattern: pattern_id.to_slot(&board.preset().patterns),
            t_us: 0,
            last_frame: StdInstant::now(),
            playing: true,
            time_scale: 1.0,
            history: Vec::with_capacity(HISTORY_LEN),
        }
    }

    /// Rebuild the pattern after a board or pattern change and restart time
    fn rebuild(&mut self) {
        self.pattern = self.pattern_id.to_slot(&self.board.preset().patterns);
        self.reset_time();
    }

    /// Reset time to zero
    fn reset_time(&mut self) {
        self.t_us = 0;
        self.history.clear();
        self.last_frame = StdInstant::now();
    }

    /// Update synthetic time based on wall clock and time scale
    fn update_time(&mut self) {
        let now = StdInstant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        if self.playing {
            let delta_us = delta.as_secs_f64() * 1_000_000.0 * f64::from(self.time_scale);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let delta_us = if delta_us.is_finite() {
                delta_us.max(0.0) as u64
            } else {
                0
            };
            self.t_us = self.t_us.wrapping_add(delta_us);
        }
    }

    fn channel_count(&self) -> usize {
        self.board.preset().channel_count().min(MAX_CHANNELS)
    }
}

/// Map a duty value onto an 8-bit lamp intensity
#[allow(clippy::cast_possible_truncation)]
fn intensity(duty: u16) -> u8 {
    (u32::from(duty.min(CIE_MAX)) * 255 / u32::from(CIE_MAX)) as u8
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_time();

        let mut frame = [0u16; MAX_CHANNELS];
        let channels = self.channel_count();
        self.pattern
            .compute(Instant::from_micros(self.t_us), &mut frame[..channels]);
        if self.playing {
            if self.history.len() == HISTORY_LEN {
                self.history.remove(0);
            }
            self.history.push(frame);
        }

        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("⏮ Reset").clicked() {
                    self.reset_time();
                }
                if ui
                    .button(if self.playing { "⏸ Pause" } else { "▶ Play" })
                    .clicked()
                {
                    self.playing = !self.playing;
                }

                ui.add_space(8.0);
                let secs = self.t_us / 1_000_000;
                let ms = (self.t_us / 1_000) % 1_000;
                ui.label(format!("Time: {secs}.{ms:03}s"));

                ui.add_space(8.0);
                ui.label("Speed:");
                ui.add(egui::Slider::new(&mut self.time_scale, 0.05..=5.0).logarithmic(true));
            });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.label("Board:");
                let mut selected_board = self.board;
                egui::ComboBox::from_id_salt("board_selector")
                    .selected_text(self.board.as_str())
                    .show_ui(ui, |ui| {
                        for board in [Board::Button, Board::Autonomous] {
                            ui.selectable_value(&mut selected_board, board, board.as_str());
                        }
                    });

                ui.add_space(8.0);
                ui.label("Pattern:");
                let mut selected_pattern = self.pattern_id;
                egui::ComboBox::from_id_salt("pattern_selector")
                    .selected_text(self.pattern_id.as_str())
                    .show_ui(ui, |ui| {
                        for id in [PatternId::Beat, PatternId::Breathe] {
                            ui.selectable_value(&mut selected_pattern, id, id.as_str());
                        }
                    });

                if selected_board != self.board || selected_pattern != self.pattern_id {
                    self.board = selected_board;
                    self.pattern_id = selected_pattern;
                    self.rebuild();
                }
            });

            ui.add_space(16.0);

            // === Lamps ===
            #[allow(clippy::cast_precision_loss)]
            let width = channels as f32 * (LAMP_SIZE + LAMP_GAP);
            let (response, painter) = ui.allocate_painter(
                egui::vec2(width.max(LAMP_SIZE), LAMP_SIZE),
                egui::Sense::hover(),
            );
            let origin = response.rect.min;
            #[allow(clippy::cast_precision_loss)]
            for (index, duty) in frame[..channels].iter().enumerate() {
                let center = egui::pos2(
                    origin.x + index as f32 * (LAMP_SIZE + LAMP_GAP) + LAMP_SIZE / 2.0,
                    origin.y + LAMP_SIZE / 2.0,
                );
                let level = intensity(*duty);
                let color = egui::Color32::from_rgb(level, level / 3, level / 8);
                painter.circle_filled(center, LAMP_SIZE / 2.0, color);
                painter.circle_stroke(
                    center,
                    LAMP_SIZE / 2.0,
                    egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
                );
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                for (index, duty) in frame[..channels].iter().enumerate() {
                    ui.label(format!("ch{index}: {duty:4}"));
                }
            });

            ui.add_space(16.0);

            // === Duty history ===
            let plot_height = 160.0;
            let available_width = ui.available_width();
            let (response, painter) = ui.allocate_painter(
                egui::vec2(available_width, plot_height),
                egui::Sense::hover(),
            );
            let rect = response.rect;
            painter.rect_filled(rect, 2.0, egui::Color32::from_gray(20));

            let palette = [
                egui::Color32::from_rgb(255, 120, 80),
                egui::Color32::from_rgb(120, 220, 120),
                egui::Color32::from_rgb(120, 160, 255),
                egui::Color32::from_rgb(230, 200, 80),
            ];
            #[allow(clippy::cast_precision_loss)]
            let step = rect.width() / HISTORY_LEN as f32;
            for channel in 0..channels {
                #[allow(clippy::cast_precision_loss)]
                let points: Vec<egui::Pos2> = self
                    .history
                    .iter()
                    .enumerate()
                    .map(|(i, sample)| {
                        let y = f32::from(sample[channel]) / f32::from(CIE_MAX);
                        egui::pos2(rect.min.x + i as f32 * step, rect.max.y - y * rect.height())
                    })
                    .collect();
                painter.add(egui::Shape::line(
                    points,
                    egui::Stroke::new(1.5, palette[channel % palette.len()]),
                ));
            }
        });
    }
}
