//! Request types shared across the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages the brochure can be written in.
pub const LANGUAGES: [&str; 8] = [
    "English",
    "Spanish",
    "French",
    "German",
    "Italian",
    "Portuguese",
    "Chinese",
    "Japanese",
];

/// A sub-page chosen by the model as brochure-relevant.
///
/// On the wire the label field is called `type`, matching the JSON shape
/// the selector prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCandidate {
    /// Human-readable label, e.g. "about page"
    #[serde(rename = "type")]
    pub label: String,

    /// Absolute URL of the sub-page
    pub url: String,
}

impl LinkCandidate {
    /// Create a new link candidate.
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// One brochure generation request, immutable for its duration.
#[derive(Debug, Clone)]
pub struct BrochureRequest {
    /// Company name embedded in the synthesis prompt
    pub company_name: String,

    /// Seed URL of the company website
    pub seed_url: String,

    /// Output language; English omits the language clause
    pub language: String,

    /// Writing tone
    pub tone: Tone,
}

impl BrochureRequest {
    /// Create a request with the default language and tone.
    pub fn new(company_name: impl Into<String>, seed_url: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            seed_url: seed_url.into(),
            language: "English".to_string(),
            tone: Tone::default(),
        }
    }

    /// Set the output language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the writing tone.
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }
}

/// Style directive for the generated brochure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Technical,
    Creative,
    Minimalist,
    Enthusiastic,
    Humorous,
}

impl Tone {
    /// All tones, in presentation order.
    pub const ALL: [Tone; 7] = [
        Tone::Professional,
        Tone::Friendly,
        Tone::Technical,
        Tone::Creative,
        Tone::Minimalist,
        Tone::Enthusiastic,
        Tone::Humorous,
    ];

    /// The descriptive phrase embedded in the synthesis prompt.
    pub fn phrase(&self) -> &'static str {
        match self {
            Tone::Professional => "professional and formal",
            Tone::Friendly => "friendly and approachable",
            Tone::Technical => "technical and detailed",
            Tone::Creative => "creative and engaging",
            Tone::Minimalist => "concise and to-the-point",
            Tone::Enthusiastic => "enthusiastic and energetic",
            Tone::Humorous => "humorous and funny",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Friendly => "Friendly",
            Tone::Technical => "Technical",
            Tone::Creative => "Creative",
            Tone::Minimalist => "Minimalist",
            Tone::Enthusiastic => "Enthusiastic",
            Tone::Humorous => "Humorous",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Tone::ALL
            .iter()
            .find(|tone| tone.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown tone '{}' (expected one of: Professional, Friendly, Technical, Creative, Minimalist, Enthusiastic, Humorous)", s))
    }
}
