use super::state::{Notice, UploadPhase};
use super::VideoCdnUploader;
use crate::utils::file_size::format_size;
use eframe::egui::{self, Align, Color32, RichText};
use rfd::FileDialog;

const GREEN: Color32 = Color32::from_rgb(0, 180, 0);
const RED: Color32 = Color32::from_rgb(220, 50, 50);
const GRAY: Color32 = Color32::from_rgb(150, 150, 150);
const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);

fn notice_label(ui: &mut egui::Ui, notice: &Notice) {
    let color = if notice.success { GREEN } else { RED };
    ui.colored_label(color, &notice.text);
}

impl VideoCdnUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let footer_height = 30.0;
            let content_height = ui.available_height() - footer_height;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .show(ui, |ui| {
                    ui.add_space(16.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("Video CDN Uploader");
                        ui.add_space(4.0);
                        ui.label(
                            RichText::new(
                                "Upload videos to the hosting demo and manage its CDN decoys",
                            )
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });
                    ui.add_space(16.0);

                    self.render_server_bar(ui);
                    ui.add_space(12.0);
                    self.render_upload_form(ui);
                    ui.add_space(12.0);
                    self.render_video_list(ui);
                    ui.add_space(12.0);
                    self.render_cdn_panel(ui);
                    ui.add_space(16.0);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(8.0);
                self.render_footer(ui);
            });
        });
    }

    fn render_server_bar(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label("Server");
                let width = ui.available_width() - 8.0;
                ui.add_enabled(
                    !self.state.busy(),
                    egui::TextEdit::singleline(&mut self.server_url).desired_width(width),
                );
            });
        });
    }

    fn render_upload_form(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("🎬 Upload Video").strong());
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button("📁 Select Video File").clicked() {
                    if let Some(path) = FileDialog::new()
                        .add_filter("Video", &["mp4", "avi", "mov", "mkv", "webm"])
                        .pick_file()
                    {
                        self.selected_file_size = std::fs::metadata(&path).map(|m| m.len()).ok();
                        self.selected_file = Some(path);
                    }
                }
                match &self.selected_file {
                    Some(path) => {
                        let name = path
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_else(|| path.display().to_string());
                        let label = match self.selected_file_size {
                            Some(size) => format!("{} • {}", name, format_size(size)),
                            None => name,
                        };
                        ui.label(label);
                    }
                    None => {
                        ui.colored_label(GRAY, "Supports MP4, AVI, MOV, MKV, WebM");
                    }
                }
            });

            ui.add_space(6.0);
            ui.add(egui::Slider::new(&mut self.injection_ratio, 0.0..=1.0).text("injection ratio"));
            ui.add_space(8.0);

            let can_upload = self.selected_file.is_some()
                && !self.state.is_uploading
                && !self.state.is_deleting;

            ui.vertical_centered(|ui| {
                ui.add_enabled_ui(can_upload, |ui| {
                    let label = if self.state.is_uploading {
                        "⏳ Uploading..."
                    } else {
                        "📤 Upload Video"
                    };
                    let button = egui::Button::new(label).min_size(egui::vec2(200.0, 36.0));
                    if ui.add(button).clicked() {
                        self.start_upload();
                    }
                });
            });

            if matches!(self.state.phase, UploadPhase::InProgress { .. }) {
                ui.add_space(8.0);
                let progress_bar = egui::ProgressBar::new(self.state.progress_fraction())
                    .show_percentage()
                    .fill(ACCENT);
                ui.add(progress_bar);
            }

            if let Some(notice) = &self.state.upload_notice {
                ui.add_space(6.0);
                notice_label(ui, notice);
            }
        });
    }

    fn render_video_list(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("📼 Videos").strong());
                if ui
                    .add_enabled(!self.state.videos_loading, egui::Button::new("🔄 Refresh"))
                    .clicked()
                {
                    self.refresh_videos();
                }
                if self.state.videos_loading {
                    ui.colored_label(GRAY, "Loading...");
                }
            });
            ui.add_space(6.0);

            if let Some(notice) = &self.state.videos_notice {
                notice_label(ui, notice);
                ui.add_space(4.0);
            }

            if let Some(error) = &self.state.videos_error {
                ui.colored_label(RED, error);
                return;
            }
            if self.state.videos.is_empty() {
                ui.colored_label(GRAY, "No videos uploaded yet");
                return;
            }

            let videos = self.state.videos.clone();
            for video in &videos {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(video.video_id.as_str()).monospace());
                    ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                        let armed =
                            self.state.pending_delete.as_deref() == Some(video.video_id.as_str());
                        let delete_button = if armed {
                            egui::Button::new(RichText::new("Delete?").color(RED))
                        } else {
                            egui::Button::new("🗑 Delete")
                        };
                        if ui
                            .add_enabled(!self.state.is_deleting, delete_button)
                            .clicked()
                        {
                            if armed {
                                self.delete_video(video.video_id.clone());
                            } else {
                                self.state.pending_delete = Some(video.video_id.clone());
                            }
                        }
                        if ui.button("📋 Copy URL").clicked() {
                            let url = self.absolute_url(&video.playlist_url);
                            ui.ctx().output_mut(|o| o.copied_text = url);
                            self.state.videos_notice =
                                Some(Notice::ok("Playlist URL copied to clipboard"));
                        }
                        if ui.button("▶ Play").clicked() {
                            self.play_video(&video.playlist_url);
                        }
                    });
                });
                ui.add_space(2.0);
            }
        });
    }

    fn render_cdn_panel(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("🖼 CDN Tools").strong());
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                ui.label("Fake images");
                ui.add(egui::DragValue::new(&mut self.fake_image_count).clamp_range(1..=100));
                ui.add_enabled_ui(!self.state.is_cdn_uploading, |ui| {
                    let label = if self.state.is_cdn_uploading {
                        "⏳ Uploading..."
                    } else {
                        "📤 Upload Fake Images"
                    };
                    if ui.button(label).clicked() {
                        self.upload_fake_images();
                    }
                });
            });
            if let Some(notice) = &self.state.cdn_notice {
                notice_label(ui, notice);
            }

            ui.add_space(8.0);
            ui.label("CDN session cookies");
            ui.add(
                egui::TextEdit::multiline(&mut self.cookie_text)
                    .desired_rows(3)
                    .desired_width(ui.available_width())
                    .font(egui::TextStyle::Monospace)
                    .hint_text("sessionid=...; csrftoken=..."),
            );
            if ui.button("💾 Save Cookies").clicked() {
                self.save_cookies();
            }
            if let Some(notice) = &self.state.cookie_notice {
                notice_label(ui, notice);
            }

            ui.add_space(6.0);
            match &self.state.cdn_status {
                Some(Ok(status)) if status.cdn_configured => {
                    ui.colored_label(
                        GREEN,
                        format!(
                            "✅ CDN configured ({} cookie chars, {})",
                            status.cookies_length, status.cookies_source
                        ),
                    );
                }
                Some(Ok(_)) => {
                    ui.colored_label(GRAY, "⚠ CDN not configured");
                }
                Some(Err(_)) => {
                    ui.colored_label(RED, "CDN status unavailable");
                }
                None => {}
            }
        });
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.label(
            RichText::new(format!(
                "video_cdn_uploader v{} • {}",
                env!("CARGO_PKG_VERSION"),
                self.server_url
            ))
            .color(GRAY)
            .small(),
        );
    }
}
