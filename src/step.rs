use eframe::egui;

/// One stop of a guided tour. Immutable once built; the target is referenced
/// by its `egui::Id`, the widget itself stays owned by the host application.
#[derive(Debug, Clone, PartialEq)]
pub struct TourStep {
    target: egui::Id,
    message: Option<String>,
    action: Option<String>,
    delegate_click: bool,
}

impl TourStep {
    pub fn new(target: egui::Id) -> Self {
        Self {
            target,
            message: None,
            action: None,
            delegate_click: true,
        }
    }

    /// Text shown in the message bubble. Without a message the coachmark
    /// shows a small pointer glyph instead.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Label for the action button inside the message bubble.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Whether advancing past this step forwards a press to the target so the
    /// host's own click handler still runs. Defaults to `true`.
    pub fn with_delegate_click(mut self, delegate: bool) -> Self {
        self.delegate_click = delegate;
        self
    }

    pub fn target(&self) -> egui::Id {
        self.target
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn delegates_click(&self) -> bool {
        self.delegate_click
    }
}

/// Ordered list of steps; insertion order is activation order. The same
/// target may appear in any number of steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TourSequence {
    steps: Vec<TourStep>,
}

impl TourSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, step: TourStep) {
        self.steps.push(step);
    }

    pub fn add_steps(&mut self, steps: impl IntoIterator<Item = TourStep>) {
        self.steps.extend(steps);
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn steps(&self) -> &[TourStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
