use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{domain::EntityKind, protocol::Entity};

use client_core::EntryForm;

use crate::backend_bridge::{commands::BackendCommand, runtime::PageViews};
use crate::controller::{events::UiEvent, orchestration::dispatch_backend_command};

pub struct NotesApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    views: PageViews,
    status: String,
}

impl NotesApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, views: PageViews) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            views,
            status: "Backend worker starting...".to_string(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.status = event.status_line();
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn show_collection(&mut self, ui: &mut egui::Ui, kind: EntityKind, heading: &str) {
        let mut pending = Vec::new();

        ui.heading(heading);
        ui.horizontal(|ui| {
            let input = self.views.input(kind);
            let mut draft = input.value();
            let response = ui.add(
                egui::TextEdit::singleline(&mut draft)
                    .hint_text(format!("New {}", kind.label()))
                    .desired_width(ui.available_width() - 60.0),
            );
            if response.changed() {
                input.set(draft);
            }
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Add").clicked() || submitted {
                pending.push(BackendCommand::Create { kind });
            }
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt(kind.collection())
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for entity in self.views.list(kind).snapshot() {
                    if entity_row(ui, &entity) {
                        pending.push(BackendCommand::Delete {
                            kind,
                            id: entity.id,
                        });
                    }
                }
            });

        for cmd in pending {
            self.dispatch(cmd);
        }
    }
}

/// One rendered entity. Returns true when its Delete button was clicked.
fn entity_row(ui: &mut egui::Ui, entity: &Entity) -> bool {
    ui.push_id(entity.id.as_str(), |ui| {
        ui.horizontal(|ui| {
            ui.label(entity.text.as_str());
            ui.button("Delete").clicked()
        })
        .inner
    })
    .inner
}

impl eframe::App for NotesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status.as_str());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Refresh").clicked() {
                        self.dispatch(BackendCommand::Refresh);
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                self.show_collection(&mut columns[0], EntityKind::Note, "Notes");
                self.show_collection(&mut columns[1], EntityKind::Todo, "Todos");
            });
        });

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
