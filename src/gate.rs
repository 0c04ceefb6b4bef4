use eframe::egui::{Pos2, Rect};

use crate::geometry;

/// Outcome of the gate for a single pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Suppress,
}

/// Process-wide press filter for an active tour: while a step is spotlighted
/// only presses on the target widget or on the coachmark itself get through.
///
/// The decision function is pure; the egui side realizes a `Suppress` by
/// covering `blocked_regions` with press-claiming foreground areas.
#[derive(Debug, Clone, Default)]
pub struct InputGate {
    target: Option<Rect>,
    mark: Option<Rect>,
    installed: bool,
}

impl InputGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the gate for a tour run. Install/uninstall must bracket each
    /// run exactly once; a duplicate install is logged and ignored.
    pub fn install(&mut self) {
        if self.installed {
            tracing::warn!("input gate installed twice");
            return;
        }
        self.installed = true;
        tracing::debug!("input gate installed");
    }

    pub fn uninstall(&mut self) {
        if !self.installed {
            tracing::warn!("input gate uninstalled while not installed");
            return;
        }
        self.installed = false;
        self.clear_active();
        tracing::debug!("input gate uninstalled");
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Bounds of the currently spotlighted widget.
    pub fn set_target(&mut self, rect: Rect) {
        self.target = Some(rect);
    }

    /// Bounds of the active coachmark; its own UI must stay interactive.
    pub fn set_mark(&mut self, rect: Rect) {
        self.mark = Some(rect);
    }

    pub fn clear_active(&mut self) {
        self.target = None;
        self.mark = None;
    }

    /// Decide whether a press at `pos` may go through. Evaluated in order:
    /// fail open while no target or no coachmark is registered, allow inside
    /// the coachmark, allow inside the target, suppress everything else.
    pub fn decide(&self, pos: Pos2) -> GateDecision {
        let (Some(target), Some(mark)) = (self.target, self.mark) else {
            return GateDecision::Allow;
        };
        if mark.contains(pos) {
            return GateDecision::Allow;
        }
        if target.contains(pos) {
            return GateDecision::Allow;
        }
        GateDecision::Suppress
    }

    /// The part of the screen where presses are suppressed this frame: the
    /// screen minus the target and coachmark rects. Empty while failing open.
    pub fn blocked_regions(&self, screen: Rect) -> Vec<Rect> {
        match (self.target, self.mark) {
            (Some(target), Some(mark)) => geometry::subtract(screen, &[target, mark]),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    fn gate_with(target: Rect, mark: Rect) -> InputGate {
        let mut gate = InputGate::new();
        gate.install();
        gate.set_target(target);
        gate.set_mark(mark);
        gate
    }

    fn target() -> Rect {
        Rect::from_min_size(pos2(100.0, 100.0), vec2(80.0, 24.0))
    }

    fn mark() -> Rect {
        Rect::from_min_size(pos2(90.0, 90.0), vec2(100.0, 44.0))
    }

    #[test]
    fn fails_open_without_target_or_mark() {
        let mut gate = InputGate::new();
        gate.install();
        assert_eq!(gate.decide(pos2(5.0, 5.0)), GateDecision::Allow);
        gate.set_target(target());
        // still no mark registered
        assert_eq!(gate.decide(pos2(5.0, 5.0)), GateDecision::Allow);
        assert!(gate
            .blocked_regions(Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0)))
            .is_empty());
    }

    #[test]
    fn allows_presses_on_mark_and_target() {
        let gate = gate_with(target(), mark());
        assert_eq!(gate.decide(target().center()), GateDecision::Allow);
        assert_eq!(gate.decide(mark().min), GateDecision::Allow);
    }

    #[test]
    fn suppresses_presses_everywhere_else() {
        let gate = gate_with(target(), mark());
        assert_eq!(gate.decide(pos2(5.0, 5.0)), GateDecision::Suppress);
        assert_eq!(gate.decide(pos2(500.0, 400.0)), GateDecision::Suppress);
    }

    #[test]
    fn blocked_regions_agree_with_the_decision_rule() {
        let gate = gate_with(target(), mark());
        let screen = Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0));
        let blocked = gate.blocked_regions(screen);
        let samples = [
            pos2(5.0, 5.0),
            pos2(500.0, 400.0),
            pos2(95.0, 95.0),
            target().center(),
            pos2(799.0, 599.0),
        ];
        for pos in samples {
            let in_blocked = blocked.iter().any(|r| r.contains(pos));
            match gate.decide(pos) {
                GateDecision::Suppress => assert!(in_blocked, "{pos:?} should be blocked"),
                GateDecision::Allow => assert!(!in_blocked, "{pos:?} should be free"),
            }
        }
    }

    #[test]
    fn uninstall_clears_active_rects() {
        let mut gate = gate_with(target(), mark());
        gate.uninstall();
        assert!(!gate.is_installed());
        assert_eq!(gate.decide(pos2(5.0, 5.0)), GateDecision::Allow);
    }
}
