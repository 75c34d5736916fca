//! Main application state and update loop

use eframe::egui;

use rusty_send_core::{FlowStatus, TransferRequest, TransferState};

use crate::bridge::{Operation, OperationOutcome, TransferBridge};
use crate::ui;

pub struct App {
    bridge: TransferBridge,
    /// Latest controller snapshot.
    view: TransferState,
    /// Form being edited; handed to the controller on send.
    form: TransferRequest,
    /// Failure that happened outside the controller (worker crash, poisoned lock).
    shell_error: Option<String>,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, bridge: TransferBridge) -> Self {
        bridge.schedule_auto_connect(&cc.egui_ctx);
        Self {
            bridge,
            view: TransferState::default(),
            form: TransferRequest::default(),
            shell_error: None,
        }
    }

    fn apply_outcomes(&mut self) {
        for OperationOutcome {
            operation,
            state,
            error,
        } in self.bridge.drain_outcomes()
        {
            match state {
                Some(state) => {
                    let typed = std::mem::take(&mut self.form);
                    self.form = form_after_outcome(typed, operation, &state);
                    self.view = state;
                    self.shell_error = None;
                }
                None => self.shell_error = error,
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());
        self.apply_outcomes();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading(
                    egui::RichText::new("⚛ Rusty-Send")
                        .size(22.0)
                        .color(ui::ACCENT),
                );
                ui.add_space(20.0);
                ui.separator();
                ui.label(
                    egui::RichText::new(&self.bridge.chain().chain_id)
                        .monospace()
                        .weak(),
                );
                if self.bridge.is_busy() {
                    ui.spinner();
                }
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(10.0);
                if self.view.session.connected {
                    self.render_connected(ui, ctx);
                } else {
                    self.render_disconnected(ui, ctx);
                }
                self.render_banners(ui);
                ui.add_space(20.0);
            });
        });
    }
}

impl App {
    fn render_disconnected(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui::styled_heading(ui, "Connect Wallet");
        ui.label(format!(
            "Connect Keplr to send {} on {}.",
            self.bridge.chain().display_denom,
            self.bridge.chain().chain_id
        ));
        ui.add_space(15.0);

        let button = egui::Button::new(egui::RichText::new("🔗 Connect Keplr").size(16.0));
        if ui
            .add_enabled(!self.bridge.is_busy(), button)
            .clicked()
        {
            self.bridge.connect(ctx);
        }
    }

    fn render_connected(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let chain = self.bridge.chain().clone();
        let busy = self.bridge.is_busy();

        ui::styled_heading(ui, &format!("Send {}", chain.display_denom));
        ui.add_space(5.0);

        ui::section_header(ui, "Account");
        if let Some(address) = self.view.session.address.clone() {
            if ui::labeled_field_with_copy(ui, "Address", &address) {
                ui::copy_to_clipboard(&address);
            }
        }
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Balance:").strong());
            ui.label(
                egui::RichText::new(format!("{} {}", self.view.balance, chain.display_denom))
                    .monospace(),
            );
            if ui
                .add_enabled(!busy, egui::Button::new("🔄").small())
                .on_hover_text("Refresh balance")
                .clicked()
            {
                self.bridge.refresh_balance(ctx);
            }
        });
        if self.view.balance.is_zero() {
            ui.label(
                egui::RichText::new(format!(
                    "No {} available yet. Fund this address before sending.",
                    chain.display_denom
                ))
                .weak(),
            );
        }

        ui::section_header(ui, "Transfer");
        // Locked while in flight so nothing typed is lost when the outcome lands.
        ui.add_enabled_ui(!busy, |ui| {
            egui::Grid::new("transfer_form")
                .num_columns(2)
                .spacing([10.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Recipient:");
                    ui::text_input(
                        ui,
                        &mut self.form.recipient,
                        &format!("{}...", chain.address_prefix()),
                        true,
                    );
                    ui.end_row();

                    ui.label(format!("Amount ({}):", chain.display_denom));
                    ui::text_input(ui, &mut self.form.amount, "0.000000", true);
                    ui.end_row();

                    ui.label("Memo:");
                    ui::text_input(ui, &mut self.form.memo, &chain.default_memo, false);
                    ui.end_row();
                });
        });
        ui.add_space(10.0);

        let label = if busy { "⏳ Working..." } else { "🚀 Send" };
        let send = egui::Button::new(egui::RichText::new(label).size(16.0));
        if ui.add_enabled(!busy, send).clicked() {
            self.bridge.submit(ctx, self.form.clone());
        }
    }

    fn render_banners(&self, ui: &mut egui::Ui) {
        let error = self.shell_error.as_ref().or(self.view.error.as_ref());
        if let Some(error) = error {
            ui.add_space(10.0);
            ui::banner(ui, ui::ERROR, |ui| {
                ui.colored_label(ui::ERROR, format!("❌ {error}"));
            });
        }

        if let (FlowStatus::Success, Some(result)) = (self.view.status, &self.view.result) {
            ui.add_space(10.0);
            ui::banner(ui, ui::SUCCESS, |ui| {
                ui.colored_label(ui::SUCCESS, "✅ Transfer broadcast");
                if ui::labeled_field_with_copy(ui, "Tx hash", &result.transaction_hash) {
                    ui::copy_to_clipboard(&result.transaction_hash);
                }
                ui.hyperlink_to("View on explorer", &result.explorer_url);
            });
        }
    }
}

/// Form to keep once an operation lands: cleared after a successful send,
/// otherwise left as the user typed it.
fn form_after_outcome(
    current: TransferRequest,
    operation: Operation,
    state: &TransferState,
) -> TransferRequest {
    if operation == Operation::Submit && state.status == FlowStatus::Success {
        state.form.clone()
    } else {
        current
    }
}
