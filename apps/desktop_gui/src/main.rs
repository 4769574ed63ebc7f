mod backend_bridge;
mod controller;
mod settings;
mod ui;

use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::BlogdeskApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = settings::load_settings();
    tracing::info!(api_base_url = %settings.api_base_url, "starting blogdesk");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Blogdesk")
            .with_inner_size([960.0, 760.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Blogdesk",
        options,
        Box::new(move |_cc| Ok(Box::new(BlogdeskApp::new(cmd_tx, ui_rx)))),
    )
}
