use crate::controller::WorkbenchController;
use crate::event::AppEvent;
use crate::state::catalog;
use crate::state::notify::NotificationKind;
use crate::state::phases::PhaseStatus;
use crate::state::{FactoryForm, Tab, WorkbenchState};
use crate::theme::Theme;
use crate::view;
use crate::view::{FileTreeRow, FileTreeView};
use eframe::egui::{self, ProgressBar, RichText, ScrollArea};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

pub struct WorkbenchApp {
    rx: Receiver<AppEvent>,
    controller: WorkbenchController,
    state: WorkbenchState,
    theme: Theme,
}

impl WorkbenchApp {
    pub fn new(rx: Receiver<AppEvent>, controller: WorkbenchController) -> Self {
        controller.refresh_projects();
        Self {
            rx,
            controller,
            state: WorkbenchState::default(),
            theme: Theme::default(),
        }
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    self.state.apply(event, Instant::now());
                    ctx.request_repaint();
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::error!("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn any_in_flight(&self) -> bool {
        self.state.build_in_flight
            || self.state.generate_in_flight
            || self.state.deploy_in_flight
            || self.state.chat_in_flight
            || self.state.factory_in_flight
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("MITO Engine");
                ui.separator();

                let mut clicked_tab = None;
                for tab in Tab::ALL {
                    if ui
                        .selectable_label(self.state.active_tab == tab, tab.label())
                        .clicked()
                    {
                        clicked_tab = Some(tab);
                    }
                }
                if let Some(tab) = clicked_tab {
                    self.state.switch_tab(tab);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::ComboBox::from_id_salt("provider_select")
                        .selected_text(self.state.provider.clone())
                        .show_ui(ui, |ui| {
                            for provider in catalog::PROVIDERS {
                                ui.selectable_value(
                                    &mut self.state.provider,
                                    (*provider).to_string(),
                                    *provider,
                                );
                            }
                        });
                    ui.label(RichText::new("Provider").color(self.theme.text_muted));
                });
            });
        });
    }

    fn render_side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("activity_panel")
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("Activity");
                if self.state.activity.entries().is_empty() {
                    ui.label(RichText::new("No activity yet").color(self.theme.text_muted));
                }
                for entry in self.state.activity.entries() {
                    ui.label(
                        RichText::new(format!("[{}] {}", entry.timestamp, entry.message))
                            .color(self.theme.text_muted)
                            .size(12.0),
                    );
                }

                ui.separator();
                ui.strong("Recent Projects");
                if self.state.recent_projects.is_empty() {
                    ui.label(RichText::new("Nothing built yet").color(self.theme.text_muted));
                }
                let cards: Vec<_> = self
                    .state
                    .recent_projects
                    .iter()
                    .map(view::project_card)
                    .collect();
                for card in cards {
                    self.theme.card_frame().show(ui, |ui| {
                        ui.label(RichText::new(&card.title).color(self.theme.text_primary));
                        ui.label(
                            RichText::new(&card.subtitle)
                                .color(self.theme.text_muted)
                                .size(12.0),
                        );
                    });
                    ui.add_space(self.theme.spacing_4);
                }
            });
    }

    fn render_center(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| match self.state.active_tab {
            Tab::Builder => self.render_builder(ui),
            Tab::Generator => self.render_generator(ui),
            Tab::Deploy => self.render_deploy(ui),
            Tab::Chat => self.render_chat(ui),
            Tab::Factory => self.render_factory(ui),
            Tab::Phases => self.render_phases(ui),
        });
    }

    fn render_builder(&mut self, ui: &mut egui::Ui) {
        ui.heading("Project Builder");
        ui.add_space(self.theme.spacing_8);

        ui.label(RichText::new("Name").color(self.theme.text_muted));
        ui.add(
            egui::TextEdit::singleline(&mut self.state.builder.name)
                .desired_width(f32::INFINITY)
                .hint_text("Project name"),
        );
        ui.add_space(self.theme.spacing_4);
        ui.label(RichText::new("Description").color(self.theme.text_muted));
        ui.add(
            egui::TextEdit::multiline(&mut self.state.builder.description)
                .desired_width(f32::INFINITY)
                .desired_rows(3)
                .hint_text("What should this project do?"),
        );
        ui.add_space(self.theme.spacing_8);

        let mut selected_type: Option<&'static str> = None;
        ui.horizontal(|ui| {
            ui.label(RichText::new("Type").color(self.theme.text_muted));
            let current_label = catalog::PROJECT_TYPES
                .iter()
                .find(|(key, _)| *key == self.state.builder.project_type)
                .map(|(_, label)| *label)
                .unwrap_or("Web Application");
            egui::ComboBox::from_id_salt("project_type_select")
                .selected_text(current_label)
                .show_ui(ui, |ui| {
                    for (key, label) in catalog::PROJECT_TYPES {
                        if ui
                            .selectable_label(self.state.builder.project_type == *key, *label)
                            .clicked()
                        {
                            selected_type = Some(*key);
                        }
                    }
                });

            ui.label(RichText::new("Stack").color(self.theme.text_muted));
            egui::ComboBox::from_id_salt("tech_stack_select")
                .selected_text(self.state.builder.tech_stack.clone())
                .show_ui(ui, |ui| {
                    for option in self.state.builder.stack_options {
                        ui.selectable_value(
                            &mut self.state.builder.tech_stack,
                            (*option).to_string(),
                            *option,
                        );
                    }
                });
        });
        if let Some(project_type) = selected_type {
            self.state.select_project_type(project_type);
        }

        if let Some(error) = &self.state.builder.error {
            ui.add_space(self.theme.spacing_4);
            ui.label(RichText::new(error).color(self.theme.danger));
        }

        ui.add_space(self.theme.spacing_8);
        let submit = ui.add_enabled(
            !self.state.build_in_flight,
            egui::Button::new("Create Project").min_size(egui::vec2(0.0, self.theme.button_height)),
        );
        if submit.clicked() {
            match self.controller.build_project(
                &self.state.builder.name,
                &self.state.builder.description,
                &self.state.builder.project_type,
                &self.state.builder.tech_stack,
            ) {
                Ok(()) => self.state.begin_build(),
                Err(err) => self.state.builder.error = Some(err.to_string()),
            }
        }

        if let Some(percent) = self.state.build_progress {
            let progress = view::build_progress(percent);
            ui.add_space(self.theme.spacing_8);
            ui.add(
                ProgressBar::new(f32::from(progress.percent) / 100.0).text(progress.caption),
            );
        }
    }

    fn render_generator(&mut self, ui: &mut egui::Ui) {
        ui.heading("Code Generator");
        ui.add_space(self.theme.spacing_8);

        ui.add(
            egui::TextEdit::multiline(&mut self.state.generator.prompt)
                .desired_width(f32::INFINITY)
                .desired_rows(3)
                .hint_text("Describe the code to generate"),
        );
        ui.horizontal(|ui| {
            ui.label(RichText::new("Language").color(self.theme.text_muted));
            egui::ComboBox::from_id_salt("language_select")
                .selected_text(self.state.generator.language.clone())
                .show_ui(ui, |ui| {
                    for language in catalog::LANGUAGES {
                        ui.selectable_value(
                            &mut self.state.generator.language,
                            (*language).to_string(),
                            *language,
                        );
                    }
                });
        });

        ui.add_space(self.theme.spacing_8);
        let generate = ui.add_enabled(
            !self.state.generate_in_flight,
            egui::Button::new("Generate").min_size(egui::vec2(0.0, self.theme.button_height)),
        );
        if generate.clicked() {
            match self
                .controller
                .generate_code(&self.state.generator.prompt, &self.state.generator.language)
            {
                Ok(()) => self.state.begin_generate(),
                Err(err) => self.state.notifications.push(
                    NotificationKind::Error,
                    err.to_string(),
                    Instant::now(),
                ),
            }
        }
        if self.state.generate_in_flight {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Generating...").color(self.theme.text_muted));
            });
        }

        let Some(generated) = self.state.generated.clone() else {
            return;
        };

        ui.add_space(self.theme.spacing_12);
        self.theme.card_frame().show(ui, |ui| {
            ui.label(RichText::new("Generated code").color(self.theme.text_muted).size(12.0));
            ScrollArea::vertical()
                .id_salt("generated_code")
                .max_height(240.0)
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(generated.code.as_str())
                            .color(self.theme.text_primary)
                            .size(13.0)
                            .monospace(),
                    );
                });
        });

        ui.add_space(self.theme.spacing_8);
        self.theme.card_frame().show(ui, |ui| {
            ui.label(RichText::new("Files").color(self.theme.text_muted).size(12.0));
            match view::file_tree(generated.file_structure.as_ref()) {
                FileTreeView::Placeholder => {
                    ui.label(
                        RichText::new(FileTreeView::PLACEHOLDER_TEXT)
                            .color(self.theme.text_muted),
                    );
                }
                FileTreeView::Rows(rows) => {
                    for row in rows {
                        match row {
                            FileTreeRow::Folder { name } => {
                                ui.label(
                                    RichText::new(format!("📁 {name}"))
                                        .color(self.theme.text_primary)
                                        .monospace(),
                                );
                            }
                            FileTreeRow::File { name, depth } => {
                                let indent = "    ".repeat(usize::from(depth));
                                ui.label(
                                    RichText::new(format!("{indent}{name}"))
                                        .color(self.theme.text_primary)
                                        .monospace(),
                                );
                            }
                        }
                    }
                }
            }
        });
    }

    fn render_deploy(&mut self, ui: &mut egui::Ui) {
        ui.heading("Deploy");
        ui.add_space(self.theme.spacing_8);

        ui.horizontal(|ui| {
            let projects = self.state.projects.clone();
            let selected_label = self
                .state
                .deploy_selection
                .as_ref()
                .and_then(|id| {
                    projects
                        .iter()
                        .find(|project| project.id_string() == *id)
                        .map(|project| project.name.clone())
                })
                .unwrap_or_else(|| "Select a project".to_string());

            egui::ComboBox::from_id_salt("deploy_select")
                .selected_text(selected_label)
                .show_ui(ui, |ui| {
                    for project in &projects {
                        let id = project.id_string();
                        let selected = self.state.deploy_selection.as_deref() == Some(id.as_str());
                        if ui.selectable_label(selected, &project.name).clicked() {
                            self.state.deploy_selection = Some(id.clone());
                        }
                    }
                });

            if ui.button("Refresh").clicked() {
                self.controller.refresh_projects();
            }
        });

        ui.add_space(self.theme.spacing_8);
        let can_deploy = self.state.deploy_selection.is_some() && !self.state.deploy_in_flight;
        let deploy = ui.add_enabled(
            can_deploy,
            egui::Button::new("Deploy").min_size(egui::vec2(0.0, self.theme.button_height)),
        );
        if deploy.clicked() {
            match self
                .controller
                .deploy_project(self.state.deploy_selection.as_deref())
            {
                Ok(()) => self.state.begin_deploy(),
                Err(err) => self.state.notifications.push(
                    NotificationKind::Error,
                    err.to_string(),
                    Instant::now(),
                ),
            }
        }
        if self.state.deploy_in_flight {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Deploying...").color(self.theme.text_muted));
            });
        }

        if let Some(url) = &self.state.last_deployment_url {
            ui.add_space(self.theme.spacing_8);
            self.theme.card_frame().show(ui, |ui| {
                ui.label(RichText::new("Live at").color(self.theme.text_muted).size(12.0));
                ui.label(RichText::new(url).color(self.theme.success).monospace());
            });
        }
    }

    fn render_chat(&mut self, ui: &mut egui::Ui) {
        ui.heading("Chat");
        ui.add_space(self.theme.spacing_4);

        let transcript_height = (ui.available_height() - 80.0).max(120.0);
        ScrollArea::vertical()
            .id_salt("chat_transcript")
            .max_height(transcript_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                let bubbles: Vec<_> = self.state.transcript.iter().map(view::chat_bubble).collect();
                for bubble in bubbles {
                    self.theme.bubble_frame(bubble.from_user).show(ui, |ui| {
                        ui.label(
                            RichText::new(bubble.label)
                                .color(self.theme.text_muted)
                                .size(11.0),
                        );
                        if bubble.typing {
                            ui.label(
                                RichText::new(bubble.text.as_str())
                                    .color(self.theme.text_muted)
                                    .italics(),
                            );
                        } else {
                            ui.label(
                                RichText::new(bubble.text.as_str()).color(self.theme.text_primary),
                            );
                        }
                    });
                    ui.add_space(self.theme.spacing_4);
                }
            });

        ui.separator();
        let mut send_now = false;
        ui.horizontal(|ui| {
            let response = ui.add_enabled(
                !self.state.chat_in_flight,
                egui::TextEdit::singleline(&mut self.state.chat_input)
                    .desired_width(f32::INFINITY)
                    .hint_text("Ask MITO anything..."),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                send_now = true;
            }

            let clicked = ui
                .add_enabled(
                    !self.state.chat_in_flight && !self.state.chat_input.trim().is_empty(),
                    egui::Button::new("Send"),
                )
                .clicked();
            send_now |= clicked;
        });

        if send_now && !self.state.chat_in_flight {
            if let Some(text) = self.state.begin_chat() {
                self.controller
                    .send_message(text, self.state.provider.clone());
            }
        }
    }

    fn render_factory(&mut self, ui: &mut egui::Ui) {
        ui.heading("AI Factory");
        ui.add_space(self.theme.spacing_8);

        ui.columns(3, |columns| {
            columns[0].strong("Functions");
            for name in catalog::FACTORY_FUNCTIONS {
                let mut checked = self.state.factory.functions.contains(*name);
                if columns[0].checkbox(&mut checked, *name).changed() {
                    FactoryForm::toggle(&mut self.state.factory.functions, *name);
                }
            }

            columns[1].strong("Interfaces");
            for name in catalog::FACTORY_INTERFACES {
                let mut checked = self.state.factory.interfaces.contains(*name);
                if columns[1].checkbox(&mut checked, *name).changed() {
                    FactoryForm::toggle(&mut self.state.factory.interfaces, *name);
                }
            }

            columns[2].strong("Features");
            for name in catalog::FACTORY_FEATURES {
                let mut checked = self.state.factory.features.contains(*name);
                if columns[2].checkbox(&mut checked, *name).changed() {
                    FactoryForm::toggle(&mut self.state.factory.features, *name);
                }
            }
        });

        ui.add_space(self.theme.spacing_8);
        ui.horizontal(|ui| {
            ui.label(RichText::new("Deployment").color(self.theme.text_muted));
            ui.selectable_value(
                &mut self.state.factory.deployment,
                crate::api::types::DeploymentTarget::Script,
                "Script",
            );
            ui.selectable_value(
                &mut self.state.factory.deployment,
                crate::api::types::DeploymentTarget::Server,
                "Server",
            );

            ui.label(RichText::new("Database").color(self.theme.text_muted));
            egui::ComboBox::from_id_salt("database_select")
                .selected_text(self.state.factory.database_type.clone())
                .show_ui(ui, |ui| {
                    for database in catalog::DATABASE_TYPES {
                        ui.selectable_value(
                            &mut self.state.factory.database_type,
                            (*database).to_string(),
                            *database,
                        );
                    }
                });

            ui.label(RichText::new("Performance").color(self.theme.text_muted));
            egui::ComboBox::from_id_salt("performance_select")
                .selected_text(self.state.factory.performance_level.clone())
                .show_ui(ui, |ui| {
                    for level in catalog::PERFORMANCE_LEVELS {
                        ui.selectable_value(
                            &mut self.state.factory.performance_level,
                            (*level).to_string(),
                            *level,
                        );
                    }
                });
        });

        ui.add_space(self.theme.spacing_8);
        let run = ui.add_enabled(
            !self.state.factory_in_flight,
            egui::Button::new("Run Factory").min_size(egui::vec2(0.0, self.theme.button_height)),
        );
        if run.clicked() {
            self.state.begin_factory();
            self.controller
                .run_factory(self.state.factory.to_config(), self.state.provider.clone());
        }
        if self.state.factory_in_flight {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Running...").color(self.theme.text_muted));
            });
        }

        if let Some(output) = self.state.factory_output.clone() {
            ui.add_space(self.theme.spacing_12);
            self.theme.card_frame().show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("factory_output")
                    .max_height(240.0)
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new(output.as_str())
                                .color(self.theme.text_primary)
                                .size(13.0)
                                .monospace(),
                        );
                    });
            });
        }
    }

    fn render_phases(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.state.phases.name.clone());
        ui.add_space(self.theme.spacing_4);

        let overall = self.state.phases.overall_progress();
        ui.add(
            ProgressBar::new(f32::from(overall) / 100.0).text(format!("{overall}% complete")),
        );

        ui.add_space(self.theme.spacing_8);
        ui.horizontal(|ui| {
            let current = self.state.phases.current_phase;
            if ui.add_enabled(current > 1, egui::Button::new("Previous Phase")).clicked() {
                self.state.phases.set_current_phase(current - 1);
            }
            let total = self.state.phases.total_phases;
            if ui
                .add_enabled(current < total, egui::Button::new("Advance Phase"))
                .clicked()
            {
                self.state.phases.set_current_phase(current + 1);
            }
        });

        ui.add_space(self.theme.spacing_8);
        let phases = self.state.phases.phases.clone();
        ScrollArea::vertical().id_salt("phase_list").show(ui, |ui| {
            for phase in &phases {
                let (status_label, status_color) = match phase.status {
                    PhaseStatus::Completed => ("completed", self.theme.success),
                    PhaseStatus::Active => ("active", self.theme.accent),
                    PhaseStatus::Pending => ("pending", self.theme.text_muted),
                };
                self.theme.card_frame().show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(format!("{}. {}", phase.id, phase.name))
                                .color(self.theme.text_primary),
                        );
                        ui.label(RichText::new(status_label).color(status_color).size(12.0));
                    });
                    for task in &phase.tasks {
                        let marker = if task.completed { "v" } else { "-" };
                        let color = if task.completed {
                            self.theme.success
                        } else {
                            self.theme.text_muted
                        };
                        ui.label(
                            RichText::new(format!("  {marker} {}", task.name))
                                .color(color)
                                .size(12.0),
                        );
                    }
                });
                ui.add_space(self.theme.spacing_4);
            }
        });
    }

    fn render_notifications(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.state.notifications.prune(now);
        if self.state.notifications.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("notification_stack"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 48.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for notification in self.state.notifications.entries() {
                    let opacity = notification.opacity(now);
                    let accent = self
                        .theme
                        .notification_color(notification.kind)
                        .gamma_multiply(opacity);
                    let text = self.theme.text_primary.gamma_multiply(opacity);
                    ui.push_id(notification.id, |ui| {
                        egui::Frame::new()
                            .fill(self.theme.surface_2.gamma_multiply(opacity))
                            .stroke(egui::Stroke::new(1.0, accent))
                            .corner_radius(egui::CornerRadius::same(self.theme.radius_6))
                            .inner_margin(egui::Margin::symmetric(
                                self.theme.spacing_12 as i8,
                                self.theme.spacing_8 as i8,
                            ))
                            .show(ui, |ui| {
                                ui.label(RichText::new(&notification.message).color(text));
                            });
                    });
                    ui.add_space(self.theme.spacing_4);
                }
            });

        // Keep repainting so fades and expirations land on time.
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

impl eframe::App for WorkbenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);
        self.render_top_bar(ctx);
        self.render_side_panel(ctx);
        self.render_center(ctx);
        self.render_notifications(ctx);

        if self.any_in_flight() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
