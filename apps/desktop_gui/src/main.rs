use clap::Parser;
use client_core::DEFAULT_SERVER_URL;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::{
    commands::BackendCommand,
    runtime::{self, PageViews},
};
use controller::events::UiEvent;
use ui::NotesApp;

#[derive(Parser, Debug)]
#[command(about = "Desktop page for the notes service")]
struct Args {
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    server_url: String,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(16);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Notes and Todos")
            .with_inner_size([900.0, 600.0])
            .with_min_inner_size([560.0, 360.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Notes and Todos",
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            let views = PageViews::new(move || ctx.request_repaint());
            runtime::launch(args.server_url, views.clone(), cmd_rx, ui_tx);
            Ok(Box::new(NotesApp::new(cmd_tx, ui_rx, views)))
        }),
    )
}
