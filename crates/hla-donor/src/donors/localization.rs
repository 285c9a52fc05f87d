//! Spanish/English wording and risk colors for everything the evaluator returns.
//!
//! Scoring never depends on anything here; reports and the HTTP layer pick a
//! `PresentationConfig` and render the enum values through it.

use serde::{Deserialize, Serialize};

use super::domain::{
    AboCompatibility, DsaStatus, PriorityTier, RecommendationKind, RiskLevel,
};
use super::evaluation::EvaluationThresholds;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    #[serde(alias = "spanish", alias = "español", alias = "espanol")]
    Es,
    #[serde(alias = "english")]
    En,
}

impl Locale {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "es" | "spanish" | "español" | "espanol" => Some(Self::Es),
            "en" | "english" => Some(Self::En),
            _ => None,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }

    /// Pick between a Spanish and an English string.
    pub const fn pick(self, es: &'static str, en: &'static str) -> &'static str {
        match self {
            Self::Es => es,
            Self::En => en,
        }
    }
}

impl RiskLevel {
    pub const fn label(self, locale: Locale) -> &'static str {
        match self {
            Self::Low => locale.pick("Bajo", "Low"),
            Self::Intermediate => locale.pick("Intermedio", "Intermediate"),
            Self::High => locale.pick("Alto", "High"),
        }
    }
}

impl DsaStatus {
    /// Positive labels name the MFI threshold the result was classified against.
    pub fn label(self, locale: Locale, positive_mfi: u32) -> String {
        match self {
            Self::Negative => locale.pick("Negativo", "Negative").to_string(),
            Self::Positive => format!(
                "{} (>{positive_mfi} MFI)",
                locale.pick("Positivo", "Positive")
            ),
        }
    }
}

impl AboCompatibility {
    pub const fn label(self, _locale: Locale) -> &'static str {
        match self {
            Self::Compatible => "Compatible",
            Self::Incompatible => "Incompatible",
        }
    }
}

impl PriorityTier {
    pub const fn label(self, locale: Locale) -> &'static str {
        match self {
            Self::Optimal => locale.pick("Prioridad 1: Donante ideal", "Priority 1: Optimal donor"),
            Self::Acceptable => locale.pick(
                "Prioridad 2: Donante aceptable",
                "Priority 2: Acceptable donor",
            ),
            Self::Suboptimal => locale.pick(
                "Prioridad 3: Donante subóptimo",
                "Priority 3: Suboptimal donor",
            ),
        }
    }
}

impl RecommendationKind {
    pub const fn text(self, locale: Locale) -> &'static str {
        match self {
            Self::AvoidDonor => locale.pick(
                "Se recomienda evitar este donante debido al alto riesgo de fallo de prendimiento asociado a anticuerpos anti-HLA elevados (>5000 MFI). Si se considera imprescindible, debe evaluarse desensibilización pre-trasplante.",
                "Avoid this donor due to high graft failure risk associated with elevated anti-HLA antibodies (>5000 MFI). If this donor must be used, consider pre-transplant desensitization strategies.",
            ),
            Self::SeekAlternatives => locale.pick(
                "Buscar alternativas si es posible; alto riesgo por incompatibilidades HLA.",
                "Seek alternatives if possible; high risk due to HLA incompatibilities.",
            ),
            Self::CommitteeReview => locale.pick(
                "Evaluar en comité; riesgo intermedio.",
                "Evaluate in committee; intermediate risk.",
            ),
            Self::Proceed => locale.pick(
                "Proceder si no existen otras contraindicaciones.",
                "Proceed if no other contraindications exist.",
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Text color per risk level used by printed and exported reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskPalette {
    pub low: Rgb,
    pub intermediate: Rgb,
    pub high: Rgb,
}

impl RiskPalette {
    pub const fn color(&self, level: RiskLevel) -> Rgb {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Intermediate => self.intermediate,
            RiskLevel::High => self.high,
        }
    }
}

impl Default for RiskPalette {
    fn default() -> Self {
        Self {
            low: Rgb(0, 128, 0),
            intermediate: Rgb(255, 165, 0),
            high: Rgb(220, 20, 60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationConfig {
    pub locale: Locale,
    pub palette: RiskPalette,
    /// DSA positivity threshold quoted in status labels.
    pub dsa_positive_mfi: u32,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            palette: RiskPalette::default(),
            dsa_positive_mfi: EvaluationThresholds::default().dsa_positive_mfi,
        }
    }
}

impl PresentationConfig {
    pub fn for_locale(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }
}
