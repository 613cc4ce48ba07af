use crate::core::{ConfigStore, GalleryError, GalleryListing, Session};
use crate::gui::thumbnails::ThumbnailCache;
use crate::host::RfdHost;
use crate::video::{CropRect, FrameGrabber};
use eframe::egui;

const THUMBNAIL_CACHE_SIZE: usize = 256;

pub struct FrameGalleryApp {
    pub session: Session<RfdHost>,
    pub video_duration: Option<f64>,
    /// Seconds into the loaded video where the next frame is grabbed.
    pub position: f64,
    pub notes: String,
    pub crop: CropRect,
    pub crop_enabled: bool,
    pub gallery: Option<GalleryListing>,
    pub thumbnails: ThumbnailCache,
    pub status_message: String,
}

impl FrameGalleryApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let session = Session::new(RfdHost, ConfigStore::default_location());
        let saved_crop = session
            .load_crop_area()
            .and_then(|value| CropRect::from_value(&value));
        if let Some(crop) = saved_crop {
            log::info!("Restored crop area {:?}", crop);
        }

        Ok(Self {
            session,
            video_duration: None,
            position: 0.0,
            notes: String::new(),
            crop: saved_crop.unwrap_or(CropRect { x: 0.0, y: 0.0, width: 1280.0, height: 720.0 }),
            crop_enabled: saved_crop.is_some(),
            gallery: None,
            thumbnails: ThumbnailCache::new(THUMBNAIL_CACHE_SIZE),
            status_message: String::new(),
        })
    }

    pub fn load_video(&mut self) {
        match self.session.load_video() {
            Ok(Some(video)) => {
                self.position = 0.0;
                self.video_duration = match FrameGrabber::probe_duration(&video.path) {
                    Ok(duration) => Some(duration),
                    Err(e) => {
                        log::warn!("Could not read duration of {}: {}", video.path.display(), e);
                        None
                    }
                };
                self.status_message = format!("Loaded {} ({} bytes)", video.name, video.buffer.len());

                if let Some(highest) = self.session.existing_frames_today() {
                    self.status_message = format!(
                        "Loaded {}. Today's folder already has frames up to {}.jpg; quick save starts at 1 unless you resume numbering",
                        video.name, highest
                    );
                    log::warn!("{}", self.status_message);
                }
            }
            Ok(None) => {}
            Err(e) => {
                log::error!("Failed to load video: {}", e);
                self.status_message = format!("Failed to load video: {}", e);
            }
        }
    }

    pub fn capture_frame(&self) -> anyhow::Result<Vec<u8>> {
        let video_path = self
            .session
            .state()
            .current_video_file_path
            .clone()
            .ok_or(GalleryError::NoVideoLoaded)?;
        let frame = FrameGrabber::grab_jpeg(&video_path, self.position)?;
        if self.crop_enabled {
            self.crop.apply(&frame)
        } else {
            Ok(frame)
        }
    }

    pub fn quick_save(&mut self) {
        if !self.session.state().has_video() {
            self.status_message = GalleryError::NoVideoLoaded.to_string();
            return;
        }
        match self.capture_frame() {
            Ok(frame) => self.store_frame(&frame),
            Err(e) => self.status_message = format!("Capture failed: {}", e),
        }
    }

    /// Quick-saves an already captured frame and refreshes an open gallery.
    pub fn store_frame(&mut self, frame: &[u8]) {
        match self.session.quick_save(frame, &self.notes) {
            Ok(outcome) => {
                if self.gallery.is_some() {
                    self.open_gallery();
                }
                self.status_message = format!("Saved frame #{} in {}", outcome.number, outcome.folder);
            }
            Err(e) => {
                log::error!("Error in quick save: {}", e);
                self.status_message = format!("Quick save failed: {}", e);
            }
        }
    }

    pub fn save_frame_as(&mut self) {
        let frame = match self.capture_frame() {
            Ok(frame) => frame,
            Err(e) => {
                self.status_message = format!("Capture failed: {}", e);
                return;
            }
        };
        let default_name = self
            .session
            .state()
            .current_video_file_path
            .as_deref()
            .map(|path| FrameGrabber::frame_file_name(path, self.position))
            .unwrap_or_else(|| "frame.jpg".to_string());

        if let Some(path) = self.session.save_file_dialog(&default_name) {
            self.status_message = if self.session.save_file(&path, &frame) {
                format!("Saved {}", path.display())
            } else {
                format!("Could not save {}", path.display())
            };
        }
    }

    pub fn delete_video(&mut self) {
        match self.session.delete_original_video() {
            Ok(()) => {
                self.video_duration = None;
                self.position = 0.0;
                self.status_message = "Original video deleted".to_string();
            }
            Err(e) if e.is_cancelled() => {
                self.status_message = "Deletion cancelled".to_string();
            }
            Err(e) => {
                self.status_message = format!("Failed to delete video: {}", e);
            }
        }
    }

    pub fn select_gallery_directory(&mut self) {
        if let Some(path) = self.session.select_gallery_directory() {
            self.status_message = format!("Gallery folder: {}", path.display());
            self.open_gallery();
        }
    }

    pub fn open_gallery(&mut self) {
        self.thumbnails.clear();
        match self.session.list_gallery(None) {
            Ok(listing) => {
                self.status_message = format!("{} days in gallery", listing.data.len());
                self.gallery = Some(listing);
            }
            Err(e) => {
                log::error!("Error opening gallery: {}", e);
                self.status_message = e.to_string();
                self.gallery = None;
            }
        }
    }

    pub fn resume_numbering(&mut self) {
        match self.session.reconcile_frame_counter() {
            Ok(next) => self.status_message = format!("Next quick save will be #{}", next),
            Err(e) => self.status_message = e.to_string(),
        }
    }

    pub fn persist_crop(&mut self) {
        if let Err(e) = self.session.save_crop_area(&self.crop.to_value()) {
            self.status_message = format!("Could not save crop area: {}", e);
        }
    }
}

impl eframe::App for FrameGalleryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::S)) {
            self.quick_save();
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("📂 Load video").clicked() {
                    self.load_video();
                }
                if ui.button("🗑 Delete original video").clicked() {
                    self.delete_video();
                }
                ui.separator();
                if ui.button("📁 Gallery folder").clicked() {
                    self.select_gallery_directory();
                }
                if ui.button("🖼 Open gallery").clicked() {
                    self.open_gallery();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match &self.session.state().gallery_path {
                        Some(dir) => ui.label(format!("📁 {}", dir.display())),
                        None => ui.label("❌ No gallery folder"),
                    };
                });
            });
        });

        egui::SidePanel::right("gallery")
            .default_width(360.0)
            .min_width(240.0)
            .show(ctx, |ui| {
                self.show_gallery(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_capture_controls(ui);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Status:");
                if self.status_message.is_empty() {
                    ui.label("Ready");
                } else {
                    ui.label(&self.status_message);
                }
            });
        });
    }
}

impl FrameGalleryApp {
    fn show_capture_controls(&mut self, ui: &mut egui::Ui) {
        let Some(video_path) = self.session.state().current_video_file_path.clone() else {
            ui.centered_and_justified(|ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("No video loaded");
                    ui.label("Load a video to capture frames into today's folder.");
                    ui.add_space(20.0);
                    if ui.button("📂 Load video").clicked() {
                        self.load_video();
                    }
                });
            });
            return;
        };

        ui.heading(
            video_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        ui.small(video_path.display().to_string());
        ui.separator();

        match self.video_duration {
            Some(duration) => {
                ui.add(egui::Slider::new(&mut self.position, 0.0..=duration).text("seconds"));
            }
            None => {
                ui.horizontal(|ui| {
                    ui.label("Position:");
                    ui.add(egui::DragValue::new(&mut self.position).speed(0.1).suffix(" s"));
                });
                self.position = self.position.max(0.0);
            }
        }

        ui.add_space(8.0);
        ui.label("Notes for today's folder");
        ui.add(
            egui::TextEdit::multiline(&mut self.notes)
                .desired_rows(3)
                .hint_text("Saved to notas.txt with the next quick save"),
        );

        ui.add_space(8.0);
        let mut crop_changed = ui.checkbox(&mut self.crop_enabled, "Crop frames").changed();
        ui.add_enabled_ui(self.crop_enabled, |ui| {
            ui.horizontal(|ui| {
                crop_changed |= ui.add(egui::DragValue::new(&mut self.crop.x).prefix("x: ")).changed();
                crop_changed |= ui.add(egui::DragValue::new(&mut self.crop.y).prefix("y: ")).changed();
                crop_changed |= ui.add(egui::DragValue::new(&mut self.crop.width).prefix("w: ")).changed();
                crop_changed |= ui.add(egui::DragValue::new(&mut self.crop.height).prefix("h: ")).changed();
            });
        });
        if crop_changed && self.crop_enabled {
            self.persist_crop();
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let key = self.session.today_key();
            let label = match self.session.counter().peek_next(&key) {
                Some(next) => format!("⚡ Quick save #{} (Ctrl+S)", next),
                None => "⚡ Quick save (numbers used up)".to_string(),
            };
            if ui.button(label).clicked() {
                self.quick_save();
            }
            if ui.button("💾 Save frame as…").clicked() {
                self.save_frame_as();
            }
            if ui.button("↻ Resume numbering").clicked() {
                self.resume_numbering();
            }
        });
    }

    fn show_gallery(&mut self, ui: &mut egui::Ui) {
        ui.heading("Gallery");

        let Some(listing) = &self.gallery else {
            ui.label("Open the gallery to browse saved frames");
            return;
        };

        ui.small(format!("📁 {}", listing.base_path.display()));
        ui.separator();

        if listing.data.is_empty() {
            ui.label("No dated folders with frames yet");
            return;
        }

        let thumbnails = &mut self.thumbnails;
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for entry in &listing.data {
                    egui::CollapsingHeader::new(format!("{} ({} frames)", entry.folder, entry.count))
                        .id_source(&entry.folder)
                        .default_open(true)
                        .show(ui, |ui| {
                            if !entry.notes.is_empty() {
                                ui.label(egui::RichText::new(&entry.notes).italics());
                            }
                            ui.horizontal_wrapped(|ui| {
                                for image in &entry.images {
                                    let name = image
                                        .file_name()
                                        .map(|n| n.to_string_lossy().into_owned())
                                        .unwrap_or_default();
                                    match thumbnails.get(ui.ctx(), image) {
                                        Some(texture) => {
                                            let sized = egui::load::SizedTexture::new(texture.id(), texture.size_vec2());
                                            ui.add(egui::Image::from_texture(sized)).on_hover_text(name);
                                        }
                                        None => {
                                            ui.label(name);
                                        }
                                    }
                                }
                            });
                        });
                }
            });
    }
}
