mod api;
mod app;
mod config;
mod controller;
mod event;
mod state;
mod theme;
mod view;

use api::ApiClient;
use app::WorkbenchApp;
use config::Config;
use controller::WorkbenchController;
use eframe::egui;
use std::sync::mpsc;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    log::info!("workbench starting against {}", config.base_url);

    let (tx, rx) = mpsc::channel();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("mito-runtime")
        .build()?;

    let api = Arc::new(ApiClient::new(config));
    let controller = WorkbenchController::new(api, tx, runtime.handle().clone());
    let app = WorkbenchApp::new(rx, controller);
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([1024.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "MITO Workbench",
        native_options,
        Box::new(move |_creation_context| Ok(Box::new(app))),
    )?;

    Ok(())
}
