//! Error dialog for displaying critical startup errors.

use eframe::egui;

use crate::gui::utils::create_icon;

struct ErrorDialog {
    error_msg: String,
}

impl eframe::App for ErrorDialog {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(super::KeywheelGui::create_dark_visuals());

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(18.0);

            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new("Startup Error")
                        .size(22.0)
                        .color(egui::Color32::from_rgb(255, 110, 120))
                        .strong(),
                );
            });

            ui.add_space(16.0);

            egui::Frame::new()
                .fill(ui.visuals().extreme_bg_color)
                .corner_radius(egui::CornerRadius::same(10))
                .inner_margin(egui::Margin::same(14))
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(&self.error_msg).size(14.0));
                });

            ui.add_space(16.0);

            ui.vertical_centered(|ui| {
                if ui
                    .add_sized([110.0, 32.0], egui::Button::new("Close"))
                    .clicked()
                {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
        });
    }
}

/// Displays an error dialog in a separate window.
///
/// # Errors
///
/// Returns an error if the GUI framework fails to initialize.
pub fn show_error(error_msg: &str) -> anyhow::Result<()> {
    let icon = create_icon();
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([420.0, 240.0])
        .with_resizable(false)
        .with_title("Keywheel - Error")
        .with_icon(icon)
        .with_always_on_top();

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Keywheel Error",
        options,
        Box::new(|_cc| {
            Ok(Box::new(ErrorDialog {
                error_msg: error_msg.to_string(),
            }))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to show error dialog: {}", e))
}
