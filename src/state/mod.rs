//! UI state: every mutable thing the workbench tracks between frames.
//!
//! All transitions funnel through [`WorkbenchState::apply`] for events
//! coming back from spawned tasks, and through the explicit methods below
//! for user-initiated changes. Bounded collections are truncated on every
//! append.

use crate::api::types::{BuildConfig, DeploymentTarget, GenerateCodeResponse, Project};
use crate::event::AppEvent;
use crate::state::notify::{ActivityLog, NotificationCenter, NotificationKind};
use crate::state::phases::PhaseProject;
use std::collections::BTreeSet;
use std::time::Instant;

pub mod catalog;
pub mod notify;
pub mod phases;

pub const MAX_RECENT_PROJECTS: usize = 5;
pub const MAX_TRANSCRIPT_MESSAGES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Builder,
    Generator,
    Deploy,
    Chat,
    Factory,
    Phases,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Builder,
        Tab::Generator,
        Tab::Deploy,
        Tab::Chat,
        Tab::Factory,
        Tab::Phases,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Builder => "Builder",
            Tab::Generator => "Code Generator",
            Tab::Deploy => "Deploy",
            Tab::Chat => "Chat",
            Tab::Factory => "AI Factory",
            Tab::Phases => "Phases",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSender {
    You,
    Mito,
}

impl ChatSender {
    pub fn label(self) -> &'static str {
        match self {
            ChatSender::You => "You",
            ChatSender::Mito => "MITO",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub sender: ChatSender,
    pub text: String,
    pub is_typing: bool,
}

#[derive(Debug, Clone)]
pub struct BuilderForm {
    pub name: String,
    pub description: String,
    pub project_type: String,
    pub tech_stack: String,
    pub stack_options: &'static [&'static str],
    pub error: Option<String>,
}

impl Default for BuilderForm {
    fn default() -> Self {
        let stacks = catalog::stacks_for("webapp").unwrap_or(&[]);
        Self {
            name: String::new(),
            description: String::new(),
            project_type: "webapp".to_string(),
            tech_stack: stacks.first().copied().unwrap_or("").to_string(),
            stack_options: stacks,
            error: None,
        }
    }
}

impl BuilderForm {
    /// Repopulates the tech-stack options from the static catalog.
    /// Unknown types leave everything untouched.
    pub fn select_project_type(&mut self, project_type: &str) -> bool {
        let Some(stacks) = catalog::stacks_for(project_type) else {
            return false;
        };
        self.project_type = project_type.to_string();
        self.stack_options = stacks;
        self.tech_stack = stacks.first().copied().unwrap_or("").to_string();
        true
    }

    fn clear_after_submit(&mut self) {
        self.name.clear();
        self.description.clear();
        self.error = None;
    }
}

#[derive(Debug, Clone, Default)]
pub struct GeneratorForm {
    pub prompt: String,
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct FactoryForm {
    pub functions: BTreeSet<String>,
    pub interfaces: BTreeSet<String>,
    pub deployment: DeploymentTarget,
    pub database_type: String,
    pub performance_level: String,
    pub features: BTreeSet<String>,
}

impl Default for FactoryForm {
    fn default() -> Self {
        Self {
            functions: BTreeSet::new(),
            interfaces: BTreeSet::new(),
            deployment: DeploymentTarget::Script,
            database_type: "sqlite".to_string(),
            performance_level: "standard".to_string(),
            features: BTreeSet::new(),
        }
    }
}

impl FactoryForm {
    pub fn toggle(set: &mut BTreeSet<String>, value: &str) {
        if !set.remove(value) {
            set.insert(value.to_string());
        }
    }

    /// Snapshot of the form as an immutable request payload.
    pub fn to_config(&self) -> BuildConfig {
        BuildConfig {
            functions: self.functions.clone(),
            interfaces: self.interfaces.clone(),
            deployment: self.deployment,
            database_type: self.database_type.clone(),
            performance_level: self.performance_level.clone(),
            features: self.features.clone(),
        }
    }
}

pub struct WorkbenchState {
    pub active_tab: Tab,
    pub builder: BuilderForm,
    pub build_in_flight: bool,
    pub build_progress: Option<u8>,
    pub generator: GeneratorForm,
    pub generate_in_flight: bool,
    pub generated: Option<GenerateCodeResponse>,
    pub deploy_selection: Option<String>,
    pub deploy_in_flight: bool,
    pub last_deployment_url: Option<String>,
    pub chat_input: String,
    pub transcript: Vec<ChatMessage>,
    pub chat_in_flight: bool,
    pub factory: FactoryForm,
    pub factory_in_flight: bool,
    pub factory_output: Option<String>,
    pub provider: String,
    pub projects: Vec<Project>,
    pub recent_projects: Vec<Project>,
    pub notifications: NotificationCenter,
    pub activity: ActivityLog,
    pub phases: PhaseProject,
}

impl Default for WorkbenchState {
    fn default() -> Self {
        Self {
            active_tab: Tab::Builder,
            builder: BuilderForm::default(),
            build_in_flight: false,
            build_progress: None,
            generator: GeneratorForm {
                prompt: String::new(),
                language: "python".to_string(),
            },
            generate_in_flight: false,
            generated: None,
            deploy_selection: None,
            deploy_in_flight: false,
            last_deployment_url: None,
            chat_input: String::new(),
            transcript: Vec::new(),
            chat_in_flight: false,
            factory: FactoryForm::default(),
            factory_in_flight: false,
            factory_output: None,
            provider: "auto".to_string(),
            projects: Vec::new(),
            recent_projects: Vec::new(),
            notifications: NotificationCenter::default(),
            activity: ActivityLog::default(),
            phases: PhaseProject::demo(),
        }
    }
}

impl WorkbenchState {
    pub fn switch_tab(&mut self, tab: Tab) {
        if self.active_tab == tab {
            return;
        }
        self.active_tab = tab;
        self.activity.log(format!("Switched to {} tab", tab.label()));
        log::debug!("tab switched: {}", tab.label());
    }

    pub fn select_project_type(&mut self, project_type: &str) {
        if self.builder.select_project_type(project_type) {
            self.activity
                .log(format!("Selected project type {project_type}"));
        }
    }

    pub fn begin_build(&mut self) {
        self.builder.error = None;
        self.build_in_flight = true;
        self.build_progress = Some(0);
    }

    pub fn begin_generate(&mut self) {
        self.generate_in_flight = true;
    }

    pub fn begin_deploy(&mut self) {
        self.deploy_in_flight = true;
    }

    pub fn begin_factory(&mut self) {
        self.factory_in_flight = true;
    }

    /// Chat protocol: the user message lands synchronously, followed by
    /// exactly one "thinking" placeholder. Whitespace-only input is
    /// ignored. Returns the trimmed text when a send should happen.
    pub fn begin_chat(&mut self) -> Option<String> {
        let text = self.chat_input.trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.chat_input.clear();
        self.push_chat(ChatMessage {
            sender: ChatSender::You,
            text: text.clone(),
            is_typing: false,
        });
        self.push_chat(ChatMessage {
            sender: ChatSender::Mito,
            text: "Thinking...".to_string(),
            is_typing: true,
        });
        self.chat_in_flight = true;
        Some(text)
    }

    fn push_chat(&mut self, message: ChatMessage) {
        self.transcript.push(message);
        if self.transcript.len() > MAX_TRANSCRIPT_MESSAGES {
            let excess = self.transcript.len() - MAX_TRANSCRIPT_MESSAGES;
            self.transcript.drain(..excess);
        }
    }

    /// Removes the thinking placeholder (and only it), then appends the
    /// reply in its place.
    fn resolve_chat(&mut self, reply: String) {
        if let Some(index) = self.transcript.iter().position(|message| message.is_typing) {
            self.transcript.remove(index);
        }
        self.push_chat(ChatMessage {
            sender: ChatSender::Mito,
            text: reply,
            is_typing: false,
        });
    }

    fn record_project(&mut self, project: Project) {
        let id = project.id_string();
        self.projects.retain(|existing| existing.id_string() != id);
        self.projects.insert(0, project.clone());
        self.recent_projects.insert(0, project);
        self.recent_projects.truncate(MAX_RECENT_PROJECTS);
    }

    pub fn apply(&mut self, event: AppEvent, now: Instant) {
        match event {
            AppEvent::BuildProgress(percent) => {
                if self.build_in_flight {
                    self.build_progress = Some(percent);
                }
            }
            AppEvent::BuildFinished(result) => {
                // Settle discipline: the submit control is re-enabled on
                // every path out of a build, success or failure.
                self.build_in_flight = false;
                self.build_progress = None;
                match result {
                    Ok(project) => {
                        self.notifications.push(
                            NotificationKind::Success,
                            format!("Project \"{}\" created", project.name),
                            now,
                        );
                        self.activity.log(format!("Created project {}", project.name));
                        self.record_project(project);
                        self.builder.clear_after_submit();
                    }
                    Err(err) => {
                        self.notifications
                            .push(NotificationKind::Error, err.to_string(), now);
                        self.activity.log(format!("Project build failed: {err}"));
                    }
                }
            }
            AppEvent::CodeGenerated(result) => {
                self.generate_in_flight = false;
                match result {
                    Ok(response) => {
                        self.notifications
                            .push(NotificationKind::Success, "Code generated", now);
                        self.activity.log("Generated code");
                        self.generated = Some(response);
                    }
                    Err(err) => {
                        self.notifications
                            .push(NotificationKind::Error, err.to_string(), now);
                        self.activity.log(format!("Code generation failed: {err}"));
                    }
                }
            }
            AppEvent::DeployFinished(result) => {
                self.deploy_in_flight = false;
                match result {
                    // Some backends acknowledge without reporting a URL.
                    Ok(url) if url.is_empty() => {
                        self.notifications.push(
                            NotificationKind::Success,
                            "Deployed (no URL reported)",
                            now,
                        );
                        self.activity.log("Deployment complete (no URL reported)");
                    }
                    Ok(url) => {
                        self.notifications.push(
                            NotificationKind::Success,
                            format!("Deployed to {url}"),
                            now,
                        );
                        self.activity.log(format!("Deployment live at {url}"));
                        self.last_deployment_url = Some(url);
                    }
                    Err(err) => {
                        self.notifications
                            .push(NotificationKind::Error, err.to_string(), now);
                        self.activity.log(format!("Deployment failed: {err}"));
                    }
                }
            }
            AppEvent::ChatReply(result) => {
                self.chat_in_flight = false;
                match result {
                    Ok(reply) => self.resolve_chat(reply),
                    Err(err) => {
                        self.resolve_chat(err.to_string());
                        self.notifications
                            .push(NotificationKind::Error, err.to_string(), now);
                        self.activity.log(format!("Chat request failed: {err}"));
                    }
                }
            }
            AppEvent::FactoryFinished(result) => {
                self.factory_in_flight = false;
                match result {
                    Ok(output) => {
                        self.notifications
                            .push(NotificationKind::Success, "Factory run complete", now);
                        self.activity.log("Factory run complete");
                        self.factory_output = Some(output);
                    }
                    Err(err) => {
                        self.notifications
                            .push(NotificationKind::Error, err.to_string(), now);
                        self.activity.log(format!("Factory run failed: {err}"));
                    }
                }
            }
            AppEvent::ProjectsLoaded(result) => match result {
                Ok(projects) => {
                    self.activity
                        .log(format!("Loaded {} projects", projects.len()));
                    self.recent_projects = projects
                        .iter()
                        .take(MAX_RECENT_PROJECTS)
                        .cloned()
                        .collect();
                    self.projects = projects;
                }
                Err(err) => {
                    self.notifications
                        .push(NotificationKind::Error, err.to_string(), now);
                    self.activity.log(format!("Project list failed: {err}"));
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use serde_json::json;

    fn project(id: u64, name: &str) -> Project {
        Project {
            id: json!(id),
            name: name.to_string(),
            tech_stack: "react".to_string(),
            created_at: "2025-01-01".to_string(),
        }
    }

    fn now() -> Instant {
        Instant::now()
    }

    #[test]
    fn recent_projects_cap_at_five_with_oldest_evicted() {
        let mut state = WorkbenchState::default();
        for index in 1..=7 {
            state.apply(
                AppEvent::BuildFinished(Ok(project(index, &format!("p{index}")))),
                now(),
            );
        }
        assert_eq!(state.recent_projects.len(), MAX_RECENT_PROJECTS);
        assert_eq!(state.recent_projects[0].name, "p7");
        assert_eq!(state.recent_projects[4].name, "p3");
    }

    #[test]
    fn build_failure_reenables_submit_and_logs() {
        let mut state = WorkbenchState::default();
        state.begin_build();
        assert!(state.build_in_flight);

        state.apply(AppEvent::BuildFinished(Err(ApiError::Timeout)), now());
        assert!(!state.build_in_flight);
        assert!(state.build_progress.is_none());
        assert_eq!(state.notifications.entries().len(), 1);
        assert!(state.activity.entries()[0].message.contains("timed out"));
    }

    #[test]
    fn build_success_clears_form_and_records_project() {
        let mut state = WorkbenchState::default();
        state.builder.name = "Demo".to_string();
        state.builder.description = "test app".to_string();
        state.begin_build();

        state.apply(AppEvent::BuildFinished(Ok(project(1, "Demo"))), now());
        assert!(!state.build_in_flight);
        assert!(state.builder.name.is_empty());
        assert!(state.builder.description.is_empty());
        assert_eq!(state.recent_projects.len(), 1);
        assert_eq!(state.projects.len(), 1);
    }

    #[test]
    fn chat_appends_exactly_one_placeholder_and_removes_it() {
        let mut state = WorkbenchState::default();
        state.chat_input = "hello".to_string();
        let sent = state.begin_chat().expect("non-empty input should send");
        assert_eq!(sent, "hello");

        let placeholders = state
            .transcript
            .iter()
            .filter(|message| message.is_typing)
            .count();
        assert_eq!(placeholders, 1);
        assert_eq!(state.transcript.len(), 2);

        state.apply(AppEvent::ChatReply(Ok("hi there".to_string())), now());
        assert!(state.transcript.iter().all(|message| !message.is_typing));
        assert_eq!(state.transcript.len(), 2);
        let last = state.transcript.last().expect("reply should be appended");
        assert_eq!(last.sender, ChatSender::Mito);
        assert_eq!(last.text, "hi there");
    }

    #[test]
    fn chat_error_replaces_placeholder_with_error_reply() {
        let mut state = WorkbenchState::default();
        state.chat_input = "hello".to_string();
        state.begin_chat();

        state.apply(
            AppEvent::ChatReply(Err(ApiError::Transport("refused".to_string()))),
            now(),
        );
        assert!(state.transcript.iter().all(|message| !message.is_typing));
        assert!(state.transcript.last().expect("error reply").text.contains("Network error"));
        assert_eq!(state.notifications.entries().len(), 1);
    }

    #[test]
    fn deploy_without_reported_url_gets_a_distinct_message() {
        let mut state = WorkbenchState::default();
        state.begin_deploy();
        state.apply(AppEvent::DeployFinished(Ok(String::new())), now());

        assert!(!state.deploy_in_flight);
        assert!(state.last_deployment_url.is_none());
        assert_eq!(
            state.notifications.entries()[0].message,
            "Deployed (no URL reported)"
        );
    }

    #[test]
    fn whitespace_only_chat_input_is_ignored() {
        let mut state = WorkbenchState::default();
        state.chat_input = "   \n".to_string();
        assert!(state.begin_chat().is_none());
        assert!(state.transcript.is_empty());
        assert!(!state.chat_in_flight);
    }

    #[test]
    fn transcript_is_truncated_from_the_oldest_end() {
        let mut state = WorkbenchState::default();
        for index in 0..(MAX_TRANSCRIPT_MESSAGES + 10) {
            state.push_chat(ChatMessage {
                sender: ChatSender::You,
                text: format!("m{index}"),
                is_typing: false,
            });
        }
        assert_eq!(state.transcript.len(), MAX_TRANSCRIPT_MESSAGES);
        assert_eq!(state.transcript[0].text, "m10");
    }

    #[test]
    fn unknown_project_type_leaves_stack_options_unchanged() {
        let mut state = WorkbenchState::default();
        let before_options = state.builder.stack_options;
        let before_stack = state.builder.tech_stack.clone();

        state.select_project_type("blockchain");
        assert_eq!(state.builder.project_type, "webapp");
        assert_eq!(state.builder.stack_options, before_options);
        assert_eq!(state.builder.tech_stack, before_stack);
    }

    #[test]
    fn selecting_known_project_type_repopulates_stacks() {
        let mut state = WorkbenchState::default();
        state.select_project_type("game");
        assert_eq!(state.builder.project_type, "game");
        assert!(state.builder.stack_options.contains(&"godot"));
        assert_eq!(state.builder.tech_stack, "unity");
    }

    #[test]
    fn tab_switch_is_logged_and_mutually_exclusive() {
        let mut state = WorkbenchState::default();
        state.switch_tab(Tab::Chat);
        assert_eq!(state.active_tab, Tab::Chat);
        assert!(state.activity.entries()[0].message.contains("Chat"));

        let logged = state.activity.entries().len();
        state.switch_tab(Tab::Chat);
        assert_eq!(state.activity.entries().len(), logged);
    }

    #[test]
    fn progress_events_are_ignored_once_settled() {
        let mut state = WorkbenchState::default();
        state.begin_build();
        state.apply(AppEvent::BuildProgress(30), now());
        assert_eq!(state.build_progress, Some(30));

        state.apply(AppEvent::BuildFinished(Err(ApiError::Timeout)), now());
        state.apply(AppEvent::BuildProgress(80), now());
        assert!(state.build_progress.is_none());
    }

    #[test]
    fn project_list_populates_recent_and_selector() {
        let mut state = WorkbenchState::default();
        let projects: Vec<Project> = (1..=8).map(|i| project(i, &format!("p{i}"))).collect();
        state.apply(AppEvent::ProjectsLoaded(Ok(projects)), now());
        assert_eq!(state.projects.len(), 8);
        assert_eq!(state.recent_projects.len(), MAX_RECENT_PROJECTS);
    }

    #[test]
    fn factory_toggle_adds_then_removes() {
        let mut form = FactoryForm::default();
        FactoryForm::toggle(&mut form.features, "logging");
        assert!(form.features.contains("logging"));
        FactoryForm::toggle(&mut form.features, "logging");
        assert!(form.features.is_empty());
    }
}
