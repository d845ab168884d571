use std::fmt::Write;

/// Hidden elements sit this far below their natural position.
pub const HIDDEN_OFFSET_PX: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    Linear,
    OutQuad,
    #[default]
    OutCubic,
    InOutCubic,
}

impl Ease {
    /// CSS timing function matching the curve.
    pub fn css(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::OutQuad => "cubic-bezier(0.5, 1, 0.89, 1)",
            Self::OutCubic => "cubic-bezier(0.33, 1, 0.68, 1)",
            Self::InOutCubic => "cubic-bezier(0.65, 0, 0.35, 1)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub duration_ms: u32,
    pub ease: Ease,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            duration_ms: 700,
            ease: Ease::OutCubic,
        }
    }
}

impl Transition {
    pub fn css(&self) -> String {
        let timing = format!("{}ms {}", self.duration_ms, self.ease.css());
        format!("opacity {timing}, transform {timing}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevealStyle {
    pub opacity: f32,
    pub translate_y_px: f32,
    pub transition: Option<Transition>,
}

impl RevealStyle {
    pub fn hidden() -> Self {
        Self {
            opacity: 0.0,
            translate_y_px: HIDDEN_OFFSET_PX,
            transition: None,
        }
    }

    pub fn visible(transition: Transition) -> Self {
        Self {
            opacity: 1.0,
            translate_y_px: 0.0,
            transition: Some(transition),
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.opacity >= 1.0 && self.translate_y_px == 0.0
    }

    pub fn opacity_css(&self) -> String {
        self.opacity.to_string()
    }

    pub fn transform_css(&self) -> String {
        format!("translateY({}px)", self.translate_y_px)
    }

    /// Inline `style` attribute value, used for the initial server render.
    pub fn to_css(&self) -> String {
        let mut css = format!(
            "opacity: {}; transform: {};",
            self.opacity_css(),
            self.transform_css()
        );
        if let Some(transition) = &self.transition {
            let _ = write!(css, " transition: {};", transition.css());
        }
        css
    }
}

/// Something a reveal style can be applied to.
pub trait RevealTarget {
    fn apply(&self, style: &RevealStyle);
}
