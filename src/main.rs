use anyhow::Result;
use eframe::egui;
use egui_tour::{TourEvent, TourManager, TourSequence, TourStep};
use std::sync::mpsc::Receiver;

/// Small walkthrough host: two work buttons and a tour over both of them,
/// the second step with a message bubble and an action button.
#[derive(Default)]
struct DemoApp {
    greeted: u32,
    saved: u32,
    tour_running: bool,
    events: Option<Receiver<TourEvent>>,
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let Ok(mut tour) = TourManager::instance().lock() else {
            return;
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("egui_tour demo");
            ui.separator();

            let greet = ui.button("Greet");
            if tour.track(&greet) {
                self.greeted += 1;
                tracing::info!(count = self.greeted, "greet pressed");
            }
            ui.label(format!("Greeted {} times", self.greeted));

            let save = ui.button("Save");
            if tour.track(&save) {
                self.saved += 1;
                tracing::info!(count = self.saved, "save pressed");
            }
            ui.label(format!("Saved {} times", self.saved));

            ui.separator();
            let start = ui.add_enabled(!self.tour_running, egui::Button::new("Start tour"));
            tour.register_target(start.id, start.rect);
            if start.clicked() {
                let mut sequence = TourSequence::new();
                sequence.add_step(TourStep::new(greet.id));
                sequence.add_step(
                    TourStep::new(save.id)
                        .with_message("Save your work from here whenever you are done.")
                        .with_action("Got it")
                        .with_delegate_click(false),
                );
                self.events = Some(tour.subscribe());
                tour.set_mask_enabled(true);
                tour.run(sequence, true);
                self.tour_running = true;
            }
        });

        tour.ui(ctx);
        drop(tour);

        if let Some(rx) = &self.events {
            while let Ok(event) = rx.try_recv() {
                tracing::debug!(?event, "tour event");
                if event == TourEvent::TourFinished {
                    self.tour_running = false;
                }
            }
        }
    }
}

fn main() -> Result<()> {
    egui_tour::logging::init(cfg!(debug_assertions));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 320.0])
            .with_min_inner_size([360.0, 240.0]),
        ..Default::default()
    };

    eframe::run_native(
        "egui_tour demo",
        native_options,
        Box::new(|_cc| Box::new(DemoApp::default())),
    )
    .map_err(|e| anyhow::anyhow!("eframe failed: {e}"))?;
    Ok(())
}
