use eframe::egui::{self, Color32, Rect, Rounding};

use crate::coachmark::overlay_layer;
use crate::geometry;

/// Full-window dimming layer with a rectangular cutout revealing the active
/// target. Owned by the manager and reused across steps; only the cutout
/// changes per step.
pub struct OverlayMask {
    cutout: Option<Rect>,
    color: Color32,
}

impl Default for OverlayMask {
    fn default() -> Self {
        Self {
            cutout: None,
            color: Color32::from_black_alpha(110),
        }
    }
}

impl OverlayMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_cutout(&mut self, rect: Rect) {
        self.cutout = Some(rect);
    }

    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    /// Tear the mask down at tour end.
    pub fn reset(&mut self) {
        self.cutout = None;
    }

    pub fn is_active(&self) -> bool {
        self.cutout.is_some()
    }

    pub fn ui(&self, ctx: &egui::Context, screen: Rect) {
        let Some(cutout) = self.cutout else {
            return;
        };
        let painter = ctx.layer_painter(overlay_layer());
        for rect in geometry::subtract(screen, &[cutout]) {
            painter.rect_filled(rect, Rounding::ZERO, self.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    #[test]
    fn cutout_set_and_reset_track_activity() {
        let mut mask = OverlayMask::new();
        assert!(!mask.is_active());
        mask.set_cutout(Rect::from_min_size(pos2(10.0, 10.0), vec2(50.0, 20.0)));
        assert!(mask.is_active());
        mask.reset();
        assert!(!mask.is_active());
    }
}
