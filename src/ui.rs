//! Control panel: the host surface inside the native window.
//!
//! Numeric fields are free text. An entry that doesn't parse is drawn in red
//! and the viewer keeps using the last valid value.

use crate::host::{parse_count, parse_real, HostInputs, PRESETS};

/// Read-only values shown under the controls.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Status {
    pub tracers: usize,
    pub points: usize,
    pub fps: f32,
}

const INVALID: egui::Color32 = egui::Color32::from_rgb(230, 80, 80);

fn text_field(ui: &mut egui::Ui, label: &str, value: &mut String, valid: fn(&str) -> bool) {
    ui.label(label);
    let is_valid = valid(value);
    let mut edit = egui::TextEdit::singleline(value).desired_width(90.0);
    if !is_valid {
        edit = edit.text_color(INVALID);
    }
    ui.add(edit);
    ui.end_row();
}

/// Draw the panel and write edits back into `host`.
pub fn control_panel(ctx: &egui::Context, host: &mut HostInputs, status: &Status) {
    egui::Window::new("Lorenz")
        .default_pos([12.0, 12.0])
        .resizable(false)
        .show(ctx, |ui| {
            egui::Grid::new("parameters")
                .num_columns(2)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    text_field(ui, "σ (sigma)", &mut host.sigma, |s| parse_real(s).is_some());
                    text_field(ui, "ρ (rho)", &mut host.rho, |s| parse_real(s).is_some());
                    text_field(ui, "β (beta)", &mut host.beta, |s| parse_real(s).is_some());
                    text_field(ui, "Trail length", &mut host.max_trail_length, |s| {
                        parse_count(s).is_some()
                    });
                    text_field(ui, "Tracers", &mut host.tracer_count, |s| parse_count(s).is_some());
                });

            ui.separator();
            ui.horizontal_wrapped(|ui| {
                for preset in PRESETS {
                    if ui.button(preset.name).clicked() {
                        host.apply_preset(preset);
                    }
                }
            });

            ui.separator();
            let toggles = &mut host.toggles;
            ui.checkbox(&mut toggles.axes, "Axes");
            ui.horizontal(|ui| {
                ui.checkbox(&mut toggles.x_plane, "X plane");
                ui.checkbox(&mut toggles.y_plane, "Y plane");
                ui.checkbox(&mut toggles.z_plane, "Z plane");
            });

            ui.separator();
            ui.label(format!("{} tracers, {} points", status.tracers, status.points));
            ui.label(format!("{:.0} fps", status.fps));
            ui.small("Left drag: orbit · Right drag: pan · Wheel: zoom");
        });
}
