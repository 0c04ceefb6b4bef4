use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use std::sync::Mutex;

use eframe::egui::{self, Color32, Order, Rect, Sense};
use once_cell::sync::Lazy;

use crate::coachmark::{parse_coach_color, Coachmark, DEFAULT_COACH_COLOR};
use crate::events::{TourEvent, TourEvents};
use crate::gate::InputGate;
use crate::geometry;
use crate::mask::OverlayMask;
use crate::step::{TourSequence, TourStep};

static MANAGER: Lazy<Mutex<TourManager>> = Lazy::new(|| Mutex::new(TourManager::new()));

/// Orchestrates a tour run: owns the sequence, the active coachmark, the
/// input gate and the dimming mask, and drives activation and advancement.
///
/// Hosts integrate in three touch points per frame: feed widget bounds with
/// [`TourManager::track`] (or `register_target`) while laying out, call
/// [`TourManager::ui`] last so the overlay draws on top, and poll the
/// receiver from [`TourManager::subscribe`] for lifecycle events.
pub struct TourManager {
    started: bool,
    finish_on_complete: bool,
    sequence: Option<TourSequence>,
    step_index: usize,
    current: Option<TourStep>,
    mark: Option<Coachmark>,
    gate: InputGate,
    mask: OverlayMask,
    mask_enabled: bool,
    coach_color: Color32,
    targets: HashMap<egui::Id, Rect>,
    delegated: Vec<egui::Id>,
    events: TourEvents,
    pending_activation: bool,
}

impl Default for TourManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TourManager {
    /// A standalone manager. Prefer this over [`TourManager::instance`] when
    /// the composition root can pass the manager around (and in tests).
    pub fn new() -> Self {
        Self {
            started: false,
            finish_on_complete: true,
            sequence: None,
            step_index: 0,
            current: None,
            mark: None,
            gate: InputGate::new(),
            mask: OverlayMask::new(),
            mask_enabled: false,
            coach_color: DEFAULT_COACH_COLOR,
            targets: HashMap::new(),
            delegated: Vec::new(),
            events: TourEvents::new(),
            pending_activation: false,
        }
    }

    /// The process-wide instance, created once on first access.
    pub fn instance() -> &'static Mutex<TourManager> {
        &MANAGER
    }

    /// Receive lifecycle events; drop the receiver to unsubscribe.
    pub fn subscribe(&mut self) -> Receiver<TourEvent> {
        self.events.subscribe()
    }

    /// Highlight color for subsequently activated steps. The coachmark
    /// already on screen keeps its color.
    pub fn set_coach_color(&mut self, color: Color32) {
        self.coach_color = color;
    }

    /// Same as [`set_coach_color`](Self::set_coach_color) but by name
    /// (`"darkred"`, `"#336699"`, ...). Unknown names keep the current color.
    pub fn set_coach_color_name(&mut self, name: &str) {
        match parse_coach_color(name) {
            Some(color) => self.coach_color = color,
            None => tracing::warn!(name, "unknown coach color"),
        }
    }

    /// Dim everything outside the active highlight while a step is shown.
    pub fn set_mask_enabled(&mut self, enabled: bool) {
        self.mask_enabled = enabled;
    }

    pub fn set_mask_color(&mut self, color: Color32) {
        self.mask.set_color(color);
    }

    pub fn is_running(&self) -> bool {
        self.started
    }

    /// Index of the active step; only meaningful while a tour is running.
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn current_step(&self) -> Option<&TourStep> {
        self.current.as_ref()
    }

    /// On-screen bounds of the active coachmark, if a step is spotlighted.
    pub fn coachmark_bounds(&self) -> Option<Rect> {
        self.mark.as_ref().map(|m| m.bounds())
    }

    pub fn cancel_prompt_open(&self) -> bool {
        self.mark.as_ref().is_some_and(|m| m.confirm_pending())
    }

    /// Start a tour over `sequence`. With `finish_on_complete` the tour ends
    /// itself after the last step; without it the manager stays running so
    /// the caller can extend the sequence via [`TourManager::push_step`].
    ///
    /// Calling this while a tour is already running restarts in place: the
    /// sequence and index are replaced, the gate stays installed, and no
    /// second `TourStarted` is emitted.
    pub fn run(&mut self, sequence: TourSequence, finish_on_complete: bool) {
        if self.started {
            tracing::warn!("tour already running; restarting with a new sequence");
            self.mark = None;
            self.gate.clear_active();
        } else {
            self.started = true;
            self.gate.install();
            self.events.emit(TourEvent::TourStarted);
        }
        self.finish_on_complete = finish_on_complete;
        self.step_index = 0;
        self.current = None;
        self.pending_activation = false;
        self.delegated.clear();
        let empty = sequence.is_empty();
        self.sequence = Some(sequence);
        if empty {
            // recognized no-op: running, gate installed, nothing spotlighted
            tracing::debug!("tour sequence is empty; nothing to activate");
            return;
        }
        self.activate_current();
    }

    /// End the tour: uninstall the gate, drop coachmark and mask, emit
    /// `TourFinished`. No-op when already idle.
    pub fn finish(&mut self) {
        if !self.started {
            return;
        }
        self.gate.uninstall();
        self.mark = None;
        self.mask.reset();
        self.sequence = None;
        self.current = None;
        self.pending_activation = false;
        self.started = false;
        self.events.emit(TourEvent::TourFinished);
    }

    /// Append a step to the running sequence. When the previous last step
    /// already completed (a `finish_on_complete = false` run), activation
    /// resumes at the appended step.
    pub fn push_step(&mut self, step: TourStep) {
        let Some(seq) = self.sequence.as_mut() else {
            tracing::warn!("push_step ignored: no tour is running");
            return;
        };
        seq.add_step(step);
        if self.started && self.current.is_none() && !self.pending_activation {
            self.activate_current();
        }
    }

    /// Confirm the current step and move on, exactly as a press on the
    /// coachmark would.
    pub fn advance(&mut self) {
        let Some(step) = self.current.take() else {
            return;
        };
        if step.delegates_click() {
            self.delegated.push(step.target());
        }
        self.events.emit(TourEvent::StepFinished {
            step_index: self.step_index,
        });
        self.step_index += 1;
        let len = self.sequence.as_ref().map(|s| s.len()).unwrap_or(0);
        if self.step_index >= len {
            if self.finish_on_complete {
                self.finish();
            } else {
                // stay running without a spotlight; push_step resumes here
                self.mark = None;
                self.gate.clear_active();
            }
        } else {
            self.activate_current();
        }
    }

    /// Answer the end-tour confirmation prompt programmatically.
    pub fn resolve_cancel_prompt(&mut self, end_tour: bool) {
        let ended = self
            .mark
            .as_mut()
            .is_some_and(|m| m.resolve_confirm(end_tour));
        if ended {
            self.finish();
        }
    }

    /// Record a widget's on-screen bounds under its id. Hosts call this every
    /// frame for each widget a step may target.
    pub fn register_target(&mut self, id: egui::Id, rect: Rect) {
        self.targets.insert(id, rect);
        if self.pending_activation && self.current.as_ref().is_some_and(|s| s.target() == id) {
            self.activate_current();
        }
    }

    /// Take the synthesized press queued for `id` when a delegating step was
    /// advanced. Yields `true` at most once per advance.
    pub fn take_delegated_click(&mut self, id: egui::Id) -> bool {
        if let Some(at) = self.delegated.iter().position(|d| *d == id) {
            self.delegated.remove(at);
            true
        } else {
            false
        }
    }

    /// Register the widget behind `response` and report whether it should be
    /// treated as clicked this frame (a real click or a delegated press).
    pub fn track(&mut self, response: &egui::Response) -> bool {
        self.register_target(response.id, response.rect);
        response.clicked() || self.take_delegated_click(response.id)
    }

    /// Draw the overlay for this frame and pump advancement. Call after the
    /// host has laid out its widgets so the overlay sits on top.
    pub fn ui(&mut self, ctx: &egui::Context) {
        if !self.started || self.mark.is_none() {
            // fail open: without an active coachmark nothing is blocked
            return;
        }
        let screen = ctx.screen_rect();
        if self.mask_enabled {
            self.mask.ui(ctx, screen);
        }
        let response = match self.mark.as_mut() {
            Some(mark) => {
                let response = mark.ui(ctx);
                // the bubble may have been re-clamped to the real screen;
                // the gate must see the final bounds before blockers go out
                self.gate.set_mark(mark.bounds());
                response
            }
            None => return,
        };
        for (index, region) in self.gate.blocked_regions(screen).into_iter().enumerate() {
            egui::Area::new(egui::Id::new("tour_gate_blocker").with(index))
                .order(Order::Foreground)
                .fixed_pos(region.min)
                .show(ctx, |ui| {
                    let (_, resp) = ui.allocate_exact_size(region.size(), Sense::click());
                    if resp.clicked() {
                        tracing::trace!("press suppressed outside the active target");
                    }
                });
        }
        if response.activated {
            self.advance();
        } else if response.cancel_requested {
            self.finish();
        }
    }

    fn activate_current(&mut self) {
        let Some(step) = self
            .sequence
            .as_ref()
            .and_then(|s| s.steps().get(self.step_index))
            .cloned()
        else {
            return;
        };
        self.current = Some(step.clone());
        let Some(rect) = self.targets.get(&step.target()).copied() else {
            tracing::warn!(
                step = self.step_index,
                "target bounds not registered yet; activation deferred"
            );
            self.mark = None;
            self.gate.clear_active();
            self.pending_activation = true;
            return;
        };
        self.pending_activation = false;
        let mark = Coachmark::new(
            rect,
            self.coach_color,
            step.message().map(str::to_owned),
            step.action().map(str::to_owned),
        );
        self.gate.set_target(rect);
        self.gate.set_mark(mark.bounds());
        self.mask.set_cutout(geometry::highlight_rect(rect));
        self.mark = Some(mark);
        tracing::debug!(step = self.step_index, "tour step activated");
    }
}
