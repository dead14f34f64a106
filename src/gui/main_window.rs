// Main window implementation

use std::collections::HashSet;

use eframe::egui;

use crate::gui::{KeywheelGui, utils};
use crate::keyboard;
use crate::keys::{self, VK_ESCAPE, VK_RETURN};
use crate::state::{ComboSide, MAX_SCROLL_SPEED, MIN_SCROLL_SPEED, NotificationEvent};

impl eframe::App for KeywheelGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.app_state.should_exit() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        let visuals = if self.dark_mode {
            self.cached_dark_visuals.clone()
        } else {
            self.cached_light_visuals.clone()
        };
        ctx.set_visuals(visuals);

        // Keep polling while a recording is active or the hook is running so
        // captured keys and status stay live.
        ctx.request_repaint_after(std::time::Duration::from_millis(50));

        // Handle window visibility requests from the tray
        if self.app_state.check_and_clear_show_window_request() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
            ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(false));
            ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
        }

        self.handle_close_dialog(ctx);
        self.handle_recording_input(ctx);
        self.render_main_content(ctx);

        if self.app_state.should_exit() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.app_state.exit();
    }
}

impl KeywheelGui {
    // Handle close dialog logic
    fn handle_close_dialog(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.viewport().close_requested())
            && !self.allow_close
            && !self.app_state.should_exit()
        {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_close_dialog = true;
        }

        if self.show_close_dialog {
            self.render_close_dialog(ctx);
        }
    }

    fn render_close_dialog(&mut self, ctx: &egui::Context) {
        egui::Window::new("close_dialog")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .fixed_size([320.0, 170.0])
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(14.0);
                    ui.label(egui::RichText::new("Close Window").size(18.0).strong());
                    ui.add_space(6.0);
                    ui.label(
                        egui::RichText::new("What would you like to do?")
                            .size(13.0)
                            .color(egui::Color32::GRAY),
                    );
                    ui.add_space(16.0);

                    let button_size = [260.0, 30.0];

                    if self.app_state.show_tray_icon() {
                        let minimize_btn = egui::Button::new("Minimize to Tray");
                        if ui.add_sized(button_size, minimize_btn).clicked() {
                            self.show_close_dialog = false;
                            ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(true));
                            ctx.send_viewport_cmd(egui::ViewportCommand::Visible(false));
                        }
                        ui.add_space(8.0);
                    }

                    let exit_btn = egui::Button::new("Exit Program");
                    if ui.add_sized(button_size, exit_btn).clicked() {
                        self.show_close_dialog = false;
                        self.allow_close = true;
                        self.app_state.exit();
                    }

                    ui.add_space(8.0);
                    let cancel_btn = egui::Button::new("Cancel");
                    if ui.add_sized(button_size, cancel_btn).clicked() {
                        self.show_close_dialog = false;
                    }
                });
            });
    }

    /// Feeds physically held keys into the active recording.
    ///
    /// Polling `GetAsyncKeyState` instead of egui's key events keeps
    /// left/right modifier identity, and the keys stay local to the
    /// recording: nothing here forwards them to widgets or shortcuts.
    fn handle_recording_input(&mut self, ctx: &egui::Context) {
        if !self.recorder.is_recording() {
            self.capture_prev_pressed.clear();
            return;
        }

        // Poll tightly while recording so near-simultaneous presses land in
        // separate frames and keep their press order.
        ctx.request_repaint_after(std::time::Duration::from_millis(10));

        // Swallow every keyboard event before widgets see it: a recorded
        // Space or arrow must not click the focused button or fire a
        // shortcut.
        ctx.input_mut(|i| i.events.retain(|e| !is_keyboard_event(e)));

        let pressed = utils::poll_pressed_vks();

        // Enter commits, Escape cancels; neither is recordable.
        if pressed.contains(&VK_RETURN) && !self.capture_prev_pressed.contains(&VK_RETURN) {
            self.commit_recording();
            self.capture_prev_pressed = pressed.into_iter().collect();
            return;
        }
        if pressed.contains(&VK_ESCAPE) && !self.capture_prev_pressed.contains(&VK_ESCAPE) {
            self.recorder.cancel();
            self.status_message = Some("Recording cancelled".to_string());
            self.capture_prev_pressed = pressed.into_iter().collect();
            return;
        }

        for vk in recordable_new_downs(&pressed, &self.capture_prev_pressed) {
            self.recorder.observe_key_down(vk);
        }

        self.capture_prev_pressed = pressed.into_iter().collect();
    }

    fn commit_recording(&mut self) {
        if let Some((side, combo)) = self.recorder.commit() {
            self.status_message = Some(if combo.is_empty() {
                format!("{} disabled (empty combo)", side.label())
            } else {
                format!("{} set to {}", side.label(), keys::join_display_names(&combo))
            });
            self.app_state.set_combo(side, combo);
        }
    }

    fn start_recording(&mut self, side: ComboSide) {
        // The target side is cleared as soon as recording starts
        self.app_state.clear_combo(side);
        self.recorder.start(side);
        self.capture_prev_pressed.clear();
        self.status_message = Some(format!(
            "Recording {}: hold keys, Enter to confirm, Esc to cancel",
            side.label()
        ));
    }

    fn render_main_content(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                ui.heading("Keywheel");
                ui.label(
                    egui::RichText::new("Scroll with your keyboard")
                        .size(13.0)
                        .color(egui::Color32::GRAY),
                );
            });
            ui.add_space(10.0);

            self.render_presets(ui);
            ui.add_space(10.0);
            ui.separator();
            ui.add_space(6.0);

            self.render_combo_row(ui, ComboSide::Up);
            ui.add_space(4.0);
            self.render_combo_row(ui, ComboSide::Down);

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(6.0);

            self.render_speed_slider(ui);
            ui.add_space(10.0);
            self.render_start_stop(ui);

            ui.add_space(8.0);
            if let Some(msg) = &self.status_message {
                ui.label(egui::RichText::new(msg).size(12.0).color(egui::Color32::GRAY));
            }
        });
    }

    fn render_presets(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Presets").strong());
        ui.horizontal(|ui| {
            // (label, up key, down key)
            let presets: [(&str, u32, u32); 3] = [
                ("ScrollLock / Pause", keys::VK_SCROLL, keys::VK_PAUSE),
                ("CapsLock / Insert", keys::VK_CAPITAL, keys::VK_INSERT),
                ("[ / ]", keys::VK_OEM_4, keys::VK_OEM_6),
            ];

            for (label, up, down) in presets {
                if ui.button(label).clicked() {
                    self.recorder.cancel();
                    self.app_state.apply_preset(vec![up], vec![down]);
                    self.status_message = Some(format!("Preset applied: {label}"));
                }
            }
        });
    }

    fn render_combo_row(&mut self, ui: &mut egui::Ui, side: ComboSide) {
        let recording_this_side = self.recorder.recording_side() == Some(side);

        ui.horizontal(|ui| {
            let title = match side {
                ComboSide::Up => "Scroll up:",
                ComboSide::Down => "Scroll down:",
            };
            ui.label(egui::RichText::new(title).strong());

            let text = if recording_this_side {
                let feedback = self.recorder.feedback();
                if feedback.is_empty() {
                    "(press keys...)".to_string()
                } else {
                    feedback
                }
            } else {
                let combo = self.app_state.combo_keys(side);
                if combo.is_empty() {
                    "(disabled)".to_string()
                } else {
                    keys::join_display_names(&combo)
                }
            };

            ui.label(text);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if recording_this_side {
                    if ui.button("Confirm").clicked() {
                        self.commit_recording();
                    }
                    if ui.button("Cancel").clicked() {
                        self.recorder.cancel();
                        self.status_message = Some("Recording cancelled".to_string());
                    }
                } else {
                    if ui.button("Clear").clicked() {
                        self.app_state.clear_combo(side);
                        self.status_message = Some(format!("{} disabled", side.label()));
                    }
                    if ui.button("Record").clicked() {
                        self.start_recording(side);
                    }
                }
            });
        });
    }

    fn render_speed_slider(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Scroll speed:").strong());
            let mut speed = self.app_state.scroll_speed();
            let slider = egui::Slider::new(&mut speed, MIN_SCROLL_SPEED..=MAX_SCROLL_SPEED);
            if ui.add(slider).changed() {
                // The slider is bounded to the valid range, so this cannot fail
                if let Err(e) = self.app_state.set_scroll_speed(speed) {
                    self.status_message = Some(e.to_string());
                }
            }
        });
    }

    fn render_start_stop(&mut self, ui: &mut egui::Ui) {
        let active = self.app_state.is_active();
        let hook_pending = self.app_state.hook_is_installed() && !active;

        ui.vertical_centered(|ui| {
            let label = if active { "Stop" } else { "Start" };
            let button = egui::Button::new(egui::RichText::new(label).size(16.0).strong());

            if ui.add_sized([180.0, 34.0], button).clicked() {
                if active {
                    self.stop_emulation();
                } else if !hook_pending {
                    self.start_emulation();
                }
            }

            ui.add_space(4.0);
            let (status, color) = if active {
                ("Emulation active", egui::Color32::from_rgb(110, 200, 120))
            } else {
                ("Emulation stopped", egui::Color32::GRAY)
            };
            ui.label(egui::RichText::new(status).size(12.0).color(color));
        });
    }

    fn start_emulation(&mut self) {
        if let Err(e) = self.app_state.validate_activation() {
            self.status_message = Some(e.to_string());
            self.app_state
                .notify(NotificationEvent::Warning(e.to_string()));
            return;
        }

        self.status_message = None;
        keyboard::spawn_hook_thread(self.app_state.clone());
    }

    fn stop_emulation(&mut self) {
        self.app_state.set_active(false);
        self.app_state.request_hook_stop();
        self.app_state
            .notify(NotificationEvent::Info("Scroll emulation stopped".to_string()));
        self.status_message = None;
    }
}

/// Filters one poll result down to the keys newly pressed this frame,
/// preserving poll order. Enter and Escape are the recording controls and
/// are never recordable.
fn recordable_new_downs(pressed: &[u32], prev: &HashSet<u32>) -> Vec<u32> {
    pressed
        .iter()
        .copied()
        .filter(|vk| *vk != VK_RETURN && *vk != VK_ESCAPE && !prev.contains(vk))
        .collect()
}

fn is_keyboard_event(event: &egui::Event) -> bool {
    matches!(event, egui::Event::Key { .. } | egui::Event::Text(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recordable_new_downs_preserves_poll_order() {
        let prev: HashSet<u32> = [0x41].into_iter().collect();
        let pressed = vec![0x5A, 0x41, 0xA2, 0x20];
        assert_eq!(recordable_new_downs(&pressed, &prev), vec![0x5A, 0xA2, 0x20]);
    }

    #[test]
    fn test_recordable_new_downs_excludes_recording_controls() {
        let prev = HashSet::new();
        let pressed = vec![VK_RETURN, 0x41, VK_ESCAPE];
        assert_eq!(recordable_new_downs(&pressed, &prev), vec![0x41]);
    }

    #[test]
    fn test_keyboard_events_are_swallowed_while_recording() {
        let space = egui::Event::Key {
            key: egui::Key::Space,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        };
        assert!(is_keyboard_event(&space));
        assert!(is_keyboard_event(&egui::Event::Text("a".to_string())));
        assert!(!is_keyboard_event(&egui::Event::PointerGone));
    }
}
