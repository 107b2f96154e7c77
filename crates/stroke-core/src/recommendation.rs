//! Score thresholding and the static advice shown for each outcome.
use std::fmt;

use serde::Serialize;

/// Scores at or above this value classify as [`Outcome::Stroke`].
pub const RISK_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    NoStroke,
    Stroke,
}

impl Outcome {
    /// `NaN` is not below the threshold and therefore counts as high risk.
    pub fn from_score(score: f32) -> Self {
        if score < RISK_THRESHOLD { Outcome::NoStroke } else { Outcome::Stroke }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::NoStroke => "No Stroke",
            Outcome::Stroke => "Stroke",
        }
    }

    pub fn advice(&self) -> &'static Advice {
        match self {
            Outcome::NoStroke => &LOW_RISK_ADVICE,
            Outcome::Stroke => &HIGH_RISK_ADVICE,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct AdviceItem {
    pub title: &'static str,
    pub detail: &'static str,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Advice {
    pub heading: &'static str,
    /// Render the heading in the alert color.
    pub alert: bool,
    pub items: &'static [AdviceItem],
}

impl Advice {
    /// HTML fragment: an `<h4>` heading followed by one `<li>` per item.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        if self.alert {
            out.push_str(&format!("<h4 style=\"color: red;\">{}</h4>\n", self.heading));
        } else {
            out.push_str(&format!("<h4>{}</h4>\n", self.heading));
        }
        out.push_str("<ul>\n");
        for item in self.items {
            out.push_str(&format!("    <li><strong>{}:</strong> {}</li>\n", item.title, item.detail));
        }
        out.push_str("</ul>");
        out
    }
}

pub static LOW_RISK_ADVICE: Advice = Advice {
    heading: "Diet Plan - For Low-Risk / No Stroke Patients:",
    alert: false,
    items: &[
        AdviceItem {
            title: "Balanced Diet",
            detail: "Eat more fruits, vegetables, whole grains, and less oily or salty foods.",
        },
        AdviceItem { title: "Regular Exercise", detail: "At least 30 mins/day of walking, yoga, or cardio." },
        AdviceItem { title: "Avoid Risky Habits", detail: "No smoking, limit alcohol." },
        AdviceItem { title: "Manage Stress", detail: "Practice meditation, breathing exercises." },
        AdviceItem { title: "Routine Checkups", detail: "Monitor blood pressure, cholesterol, and BMI regularly." },
    ],
};

pub static HIGH_RISK_ADVICE: Advice = Advice {
    heading: "Diet Plan - For High-Risk / Stroke Patients:",
    alert: true,
    items: &[
        AdviceItem { title: "Medication Adherence", detail: "Take your medicines every day without missing." },
        AdviceItem { title: "Low Sodium Diet", detail: "Strict salt reduction and fluid intake control." },
        AdviceItem { title: "Supervised Physical Therapy", detail: "Gentle, guided recovery exercises." },
        AdviceItem {
            title: "Cognitive Health Support",
            detail: "Do brain games or memory exercises to keep your mind sharp.",
        },
        AdviceItem { title: "Frequent Monitoring", detail: "Regular visits to neurologist/cardiologist." },
        AdviceItem {
            title: "Family Education",
            detail: "Involve caregivers for emergency response training and support.",
        },
    ],
};

/// The outcome for a score together with its advice document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub outcome: Outcome,
    pub advice: &'static Advice,
}

impl Recommendation {
    pub fn select(score: f32) -> Self {
        let outcome = Outcome::from_score(score);
        Self { outcome, advice: outcome.advice() }
    }

    pub fn label(&self) -> &'static str { self.outcome.label() }

    pub fn markup(&self) -> String { self.advice.to_markup() }
}
