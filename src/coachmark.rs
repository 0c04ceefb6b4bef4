use eframe::egui::{
    self, Align2, Color32, FontId, Id, Key, LayerId, Order, Rect, Sense, Shape, Stroke,
};

use crate::geometry;

/// Default highlight color, matching the CSS/Qt `darkblue`.
pub const DEFAULT_COACH_COLOR: Color32 = Color32::from_rgb(0x00, 0x00, 0x8b);

const BORDER_WIDTH: f32 = 3.0;
const DASH_LEN: f32 = 8.0;
const GAP_LEN: f32 = 5.0;
const GLOW_RINGS: u32 = 3;
const GLOW_PERIOD_SECS: f64 = 0.6;

/// Shared layer for mask and coachmark painting so their shapes stack in
/// call order within the frame.
pub(crate) fn overlay_layer() -> LayerId {
    LayerId::new(Order::Foreground, Id::new("tour_overlay"))
}

/// Look up a named color or parse `#RRGGBB`.
pub fn parse_coach_color(name: &str) -> Option<Color32> {
    let name = name.trim().to_ascii_lowercase();
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() == 6 {
            let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
            let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
            let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
            return Some(Color32::from_rgb(r, g, b));
        }
        return None;
    }
    match name.as_str() {
        "darkblue" => Some(DEFAULT_COACH_COLOR),
        "blue" => Some(Color32::from_rgb(0x00, 0x00, 0xff)),
        "darkred" => Some(Color32::from_rgb(0x8b, 0x00, 0x00)),
        "red" => Some(Color32::from_rgb(0xff, 0x00, 0x00)),
        "darkgreen" => Some(Color32::from_rgb(0x00, 0x64, 0x00)),
        "green" => Some(Color32::from_rgb(0x00, 0x80, 0x00)),
        "orange" => Some(Color32::from_rgb(0xff, 0xa5, 0x00)),
        "purple" => Some(Color32::from_rgb(0x80, 0x00, 0x80)),
        "magenta" => Some(Color32::from_rgb(0xff, 0x00, 0xff)),
        "teal" => Some(Color32::from_rgb(0x00, 0x80, 0x80)),
        "gold" => Some(Color32::from_rgb(0xff, 0xd7, 0x00)),
        "black" => Some(Color32::BLACK),
        "white" => Some(Color32::WHITE),
        "gray" | "grey" => Some(Color32::GRAY),
        _ => None,
    }
}

/// What the coachmark reported for this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoachmarkResponse {
    /// The user confirmed the step (press on the highlight or action button).
    pub activated: bool,
    /// The user asked to end the tour and confirmed the prompt.
    pub cancel_requested: bool,
}

/// Per-step visual: dashed border with a looping glow around the target,
/// plus either a message bubble (optional action button, connecting arrow)
/// or a small pointer glyph.
///
/// Geometry is snapshotted from the target bounds at construction and is not
/// re-derived if the target later moves or resizes.
pub struct Coachmark {
    highlight: Rect,
    bubble: Option<Rect>,
    color: Color32,
    message: Option<String>,
    action: Option<String>,
    shown_at: Option<f64>,
    confirm_exit: bool,
}

impl Coachmark {
    pub fn new(
        target: Rect,
        color: Color32,
        message: Option<String>,
        action: Option<String>,
    ) -> Self {
        let highlight = geometry::highlight_rect(target);
        let bubble = message
            .is_some()
            .then(|| geometry::bubble_rect(highlight, geometry::BUBBLE_SIZE, Rect::EVERYTHING));
        Self {
            highlight,
            bubble,
            color,
            message,
            action,
            shown_at: None,
            confirm_exit: false,
        }
    }

    pub fn highlight(&self) -> Rect {
        self.highlight
    }

    /// Everything the coachmark occupies on screen; presses here must pass
    /// the input gate.
    pub fn bounds(&self) -> Rect {
        match self.bubble {
            Some(bubble) => self.highlight.union(bubble),
            None => self.highlight,
        }
    }

    /// Ask the user whether to end the tour. The prompt stays up until
    /// resolved; coachmark interaction is ignored meanwhile.
    pub fn open_cancel_prompt(&mut self) {
        self.confirm_exit = true;
    }

    pub fn confirm_pending(&self) -> bool {
        self.confirm_exit
    }

    /// Answer the end-tour prompt. Returns true when the prompt was open and
    /// the answer ends the tour.
    pub fn resolve_confirm(&mut self, end_tour: bool) -> bool {
        if !self.confirm_exit {
            return false;
        }
        self.confirm_exit = false;
        end_tour
    }

    pub fn ui(&mut self, ctx: &egui::Context) -> CoachmarkResponse {
        let mut response = CoachmarkResponse::default();
        let now = ctx.input(|i| i.time);
        let shown_at = *self.shown_at.get_or_insert(now);
        let painter = ctx.layer_painter(overlay_layer());

        // looping glow behind the border
        let pulse = (((now - shown_at) * std::f64::consts::TAU / GLOW_PERIOD_SECS).sin() * 0.5
            + 0.5) as f32;
        for ring in 1..=GLOW_RINGS {
            let expand = ring as f32 * 3.0;
            let alpha = (pulse * 90.0 / ring as f32) as u8;
            painter.rect_stroke(
                self.highlight.expand(expand),
                5.0 + expand,
                Stroke::new(BORDER_WIDTH, with_alpha(self.color, alpha)),
            );
        }
        ctx.request_repaint();

        // dashed border framing the target
        let hl = self.highlight;
        let outline = [
            hl.left_top(),
            hl.right_top(),
            hl.right_bottom(),
            hl.left_bottom(),
            hl.left_top(),
        ];
        painter.extend(Shape::dashed_line(
            &outline,
            Stroke::new(BORDER_WIDTH, self.color),
            DASH_LEN,
            GAP_LEN,
        ));

        // press region over the highlight
        let clicked = egui::Area::new(Id::new("tour_coachmark"))
            .order(Order::Foreground)
            .fixed_pos(hl.min)
            .show(ctx, |ui| {
                let (_, resp) = ui.allocate_exact_size(hl.size(), Sense::click());
                resp.clicked()
            })
            .inner;

        let mut action_clicked = false;
        if let Some(message) = self.message.clone() {
            let bubble = geometry::bubble_rect(hl, geometry::BUBBLE_SIZE, ctx.screen_rect());
            self.bubble = Some(bubble);
            painter.add(Shape::convex_polygon(
                geometry::arrow_points(bubble, hl).to_vec(),
                self.color,
                Stroke::NONE,
            ));
            let action = self.action.clone();
            egui::Area::new(Id::new("tour_coachmark_bubble"))
                .order(Order::Foreground)
                .fixed_pos(bubble.min)
                .show(ctx, |ui| {
                    ui.set_max_width(bubble.width());
                    egui::Frame::popup(ui.style())
                        .stroke(Stroke::new(2.0, self.color))
                        .show(ui, |ui| {
                            ui.set_min_width(bubble.width() - 24.0);
                            ui.label(message);
                            if let Some(action) = action {
                                if ui.button(action).clicked() {
                                    action_clicked = true;
                                }
                            }
                        });
                });
        } else {
            painter.text(
                geometry::glyph_pos(hl),
                Align2::CENTER_CENTER,
                "👆",
                FontId::proportional(22.0),
                self.color,
            );
        }

        if self.confirm_exit {
            if let Some(end_tour) = self.confirm_ui(ctx) {
                response.cancel_requested = self.resolve_confirm(end_tour);
            }
            return response;
        }

        if clicked || action_clicked {
            response.activated = true;
        } else if ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.open_cancel_prompt();
        }
        response
    }

    fn confirm_ui(&mut self, ctx: &egui::Context) -> Option<bool> {
        let mut decision = None;
        let center = ctx.screen_rect().center();
        egui::Area::new(Id::new("tour_cancel_prompt"))
            .order(Order::Tooltip)
            .fixed_pos(center - egui::vec2(110.0, 40.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label("End the tour?");
                    ui.horizontal(|ui| {
                        if ui.button("End tour").clicked() {
                            decision = Some(true);
                        }
                        if ui.button("Keep going").clicked() {
                            decision = Some(false);
                        }
                    });
                });
            });
        decision
    }
}

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    fn target() -> Rect {
        Rect::from_min_size(pos2(100.0, 100.0), vec2(80.0, 24.0))
    }

    #[test]
    fn parses_named_and_hex_colors() {
        assert_eq!(parse_coach_color("darkBlue"), Some(DEFAULT_COACH_COLOR));
        assert_eq!(
            parse_coach_color("#8b0000"),
            Some(Color32::from_rgb(0x8b, 0x00, 0x00))
        );
        assert_eq!(parse_coach_color("chartreuse"), None);
        assert_eq!(parse_coach_color("#123"), None);
        // six bytes but not six hex digits; must not slice mid-character
        assert_eq!(parse_coach_color("#€€"), None);
        assert_eq!(parse_coach_color("#zz0000"), None);
    }

    #[test]
    fn bounds_without_message_is_the_padded_highlight() {
        let mark = Coachmark::new(target(), DEFAULT_COACH_COLOR, None, None);
        assert_eq!(mark.bounds(), target().expand(geometry::HIGHLIGHT_PADDING));
    }

    #[test]
    fn bounds_with_message_includes_the_bubble() {
        let mark = Coachmark::new(
            target(),
            DEFAULT_COACH_COLOR,
            Some("hello".into()),
            None,
        );
        assert!(mark.bounds().width() > mark.highlight().width());
        assert!(mark.bounds().contains_rect(mark.highlight()));
    }

    #[test]
    fn confirm_prompt_must_be_open_to_end_the_tour() {
        let mut mark = Coachmark::new(target(), DEFAULT_COACH_COLOR, None, None);
        assert!(!mark.confirm_pending());
        assert!(!mark.resolve_confirm(true));

        mark.open_cancel_prompt();
        assert!(mark.confirm_pending());
        assert!(!mark.resolve_confirm(false));
        assert!(!mark.confirm_pending());

        mark.open_cancel_prompt();
        assert!(mark.resolve_confirm(true));
        assert!(!mark.confirm_pending());
    }
}
