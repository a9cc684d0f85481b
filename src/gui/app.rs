use crate::core::{AppConfig, JobController, JobOutcome, JobRequest, JobState};
use crate::video::{open_with_default_app, AnalysisPipeline};
use eframe::egui;
use std::path::PathBuf;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov"];

pub struct AnalysisApp {
    pub config: AppConfig,
    pub input_path: String,
    pub output_path: String,
    pub controller: JobController,
    pub status_message: String,
    pub error_message: Option<String>,
    pub show_success_popup: bool,
}

impl AnalysisApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        let mut visuals = egui::Visuals::dark();
        visuals.override_text_color = Some(egui::Color32::WHITE);
        cc.egui_ctx.set_visuals(visuals);

        let config = AppConfig::load()?;
        let output_path = config.default_output_path().display().to_string();

        Ok(Self {
            config,
            input_path: String::new(),
            output_path,
            controller: JobController::new(),
            status_message: "Ready".to_string(),
            error_message: None,
            show_success_popup: false,
        })
    }

    pub fn can_start(&self) -> bool {
        !self.controller.is_running()
    }

    pub fn can_open_output(&self) -> bool {
        self.controller.state() == JobState::Succeeded
    }

    fn browse_input(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .add_filter("Video Files", VIDEO_EXTENSIONS)
            .add_filter("All files", &["*"]);
        if let Some(ref dir) = self.config.last_input_directory {
            dialog = dialog.set_directory(dir);
        }

        if let Some(path) = dialog.pick_file() {
            if let Some(parent) = path.parent() {
                self.config.last_input_directory = Some(parent.to_path_buf());
                if let Err(e) = self.config.save() {
                    log::warn!("Failed to save config: {}", e);
                }
            }
            self.input_path = path.display().to_string();
            // A new input invalidates the previous result.
            self.controller.reset();
        }
    }

    fn browse_output(&mut self) {
        let current = PathBuf::from(&self.output_path);
        let mut dialog = rfd::FileDialog::new().add_filter("AVI files", &["avi"]);
        if let Some(name) = current.file_name().and_then(|n| n.to_str()) {
            dialog = dialog.set_file_name(name);
        }
        if let Some(parent) = current.parent() {
            if parent.exists() {
                dialog = dialog.set_directory(parent);
            }
        }

        if let Some(path) = dialog.save_file() {
            self.output_path = path.display().to_string();
        }
    }

    fn start_processing(&mut self) {
        let request = JobRequest::new(self.input_path.trim(), self.output_path.trim());
        let pipeline = AnalysisPipeline::new(self.config.pipeline_command.clone());

        match self.controller.start(request, move |input, output| {
            pipeline.process_video(input, output)
        }) {
            Ok(()) => {
                self.status_message = "Processing...".to_string();
            }
            Err(e) => {
                log::warn!("Start request rejected: {}", e);
                self.error_message = Some(e.to_string());
            }
        }
    }

    fn open_output(&mut self) {
        let path = PathBuf::from(self.output_path.trim());
        match JobController::check_result(&path) {
            Ok(()) => {
                if let Err(e) = open_with_default_app(&path) {
                    log::error!("Failed to open output file: {}", e);
                    self.error_message = Some(e.to_string());
                }
            }
            Err(e) => {
                self.error_message = Some(e.to_string());
            }
        }
    }

    pub fn process_job_events(&mut self) {
        if let Some(outcome) = self.controller.poll() {
            match outcome {
                JobOutcome::Completed => {
                    self.status_message = match self.controller.finished_at() {
                        Some(finished) => {
                            format!("Processing Complete at {}", finished.format("%H:%M:%S"))
                        }
                        None => "Processing Complete".to_string(),
                    };
                    self.show_success_popup = true;
                }
                JobOutcome::Failed(msg) => {
                    self.status_message = "Ready".to_string();
                    self.error_message = Some(msg);
                }
            }
        }
    }

    /// Status line shown while a job is in flight, e.g.
    /// `Processing match.mp4... (12s)`.
    pub fn running_status(&self) -> String {
        let elapsed = self
            .controller
            .started_at()
            .map(|t| (chrono::Local::now() - t).num_seconds())
            .unwrap_or(0);
        match self
            .controller
            .current_request()
            .and_then(|r| r.input_path.file_name())
        {
            Some(name) => format!("Processing {}... ({}s)", name.to_string_lossy(), elapsed),
            None => format!("{} ({}s)", self.status_message, elapsed),
        }
    }

    fn show_path_section(
        ui: &mut egui::Ui,
        heading: &str,
        label: &str,
        path: &mut String,
        button: &str,
    ) -> bool {
        let mut clicked = false;
        ui.group(|ui| {
            ui.label(egui::RichText::new(heading).strong());
            ui.horizontal(|ui| {
                ui.label(label);
                ui.add(
                    egui::TextEdit::singleline(path).desired_width(ui.available_width() - 80.0),
                );
                if ui.button(button).clicked() {
                    clicked = true;
                }
            });
        });
        clicked
    }
}

impl eframe::App for AnalysisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_job_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(4.0);

            if Self::show_path_section(ui, "Input Video", "Source File:", &mut self.input_path, "Browse") {
                self.browse_input();
            }

            ui.add_space(8.0);

            if Self::show_path_section(ui, "Output Video", "Output Path:", &mut self.output_path, "Change") {
                self.browse_output();
            }

            ui.add_space(16.0);

            ui.horizontal(|ui| {
                let start = ui.add_enabled(self.can_start(), egui::Button::new("Start Processing"));
                if start.clicked() {
                    self.start_processing();
                }

                let open = ui.add_enabled(self.can_open_output(), egui::Button::new("View Output"));
                if open.clicked() {
                    self.open_output();
                }
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.controller.is_running() {
                    ui.spinner();
                    ui.label(self.running_status());
                } else {
                    ui.label(&self.status_message);
                }
            });
        });

        if self.show_success_popup {
            egui::Window::new("Success")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label("Video processing completed successfully!");
                    if ui.button("OK").clicked() {
                        self.show_success_popup = false;
                    }
                });
        }

        if let Some(message) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(&message);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        // Keep polling for the outcome while a job is in flight.
        if self.controller.is_running() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
