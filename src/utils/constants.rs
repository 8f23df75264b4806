//! Constants Module - Single Source of Truth
//!
//! Every literal the scoring pipeline depends on lives here: the
//! normalization anchors, the linear weights, the bias, the decision
//! threshold and the two canned explanations. Other modules reference
//! these by name; nothing is re-typed inline.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "WDBC Scorer";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shown next to every result
pub const DISCLAIMER: &str =
    "This tool is for educational and research purposes only and is not a medical device or diagnosis.";

// ============================================
// NORMALIZATION ANCHORS (offset, scale)
// Rough WDBC ranges, not fitted statistics
// ============================================

pub const RADIUS_OFFSET: f64 = 14.0;
pub const RADIUS_SCALE: f64 = 6.0;

pub const TEXTURE_OFFSET: f64 = 19.0;
pub const TEXTURE_SCALE: f64 = 7.0;

pub const SMOOTHNESS_OFFSET: f64 = 0.1;
pub const SMOOTHNESS_SCALE: f64 = 0.05;

pub const COMPACTNESS_OFFSET: f64 = 0.1;
pub const COMPACTNESS_SCALE: f64 = 0.08;

// ============================================
// LINEAR MODEL (positive weights push toward malignant)
// ============================================

pub const RADIUS_WEIGHT: f64 = 0.9;
pub const TEXTURE_WEIGHT: f64 = 0.6;
pub const SMOOTHNESS_WEIGHT: f64 = 0.7;
pub const COMPACTNESS_WEIGHT: f64 = 0.8;

pub const BIAS: f64 = -0.2;

/// Probabilities at or above this are labelled malignant
pub const DECISION_THRESHOLD: f64 = 0.5;

// ============================================
// EXPLANATIONS
// ============================================

pub const MALIGNANT_EXPLANATION: &str =
    "Inputs indicate higher values on features often associated with malignant tumors.";

pub const BENIGN_EXPLANATION: &str =
    "Inputs align more closely with patterns commonly seen in benign tumors.";

// ============================================
// INPUT FIELDS
// ============================================

/// The four measurements, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    MeanRadius,
    Texture,
    Smoothness,
    Compactness,
}

impl Field {
    /// All fields in form order
    pub const ALL: [Field; 4] = [
        Field::MeanRadius,
        Field::Texture,
        Field::Smoothness,
        Field::Compactness,
    ];

    /// Index into fixed-size per-field arrays
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Self::MeanRadius => 0,
            Self::Texture => 1,
            Self::Smoothness => 2,
            Self::Compactness => 3,
        }
    }

    /// Wire key used by the JSON API and the CLI
    pub fn key(&self) -> &'static str {
        match self {
            Self::MeanRadius => "mean_radius",
            Self::Texture => "texture",
            Self::Smoothness => "smoothness",
            Self::Compactness => "compactness",
        }
    }

    /// Metadata for this field
    pub fn spec(&self) -> &'static FieldSpec {
        &FIELD_SPECS[self.index()]
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Display metadata for one input field.
///
/// `reference_min`/`reference_max` are hints shown to users. They are
/// never used to reject or clamp a value.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub reference_min: f64,
    pub reference_max: f64,
}

pub const FIELD_SPECS: [FieldSpec; 4] = [
    FieldSpec {
        field: Field::MeanRadius,
        label: "Mean radius",
        placeholder: "e.g., 14.5",
        reference_min: 6.0,
        reference_max: 28.0,
    },
    FieldSpec {
        field: Field::Texture,
        label: "Texture",
        placeholder: "e.g., 19.3",
        reference_min: 9.0,
        reference_max: 40.0,
    },
    FieldSpec {
        field: Field::Smoothness,
        label: "Smoothness",
        placeholder: "e.g., 0.1",
        reference_min: 0.05,
        reference_max: 0.2,
    },
    FieldSpec {
        field: Field::Compactness,
        label: "Compactness",
        placeholder: "e.g., 0.12",
        reference_min: 0.02,
        reference_max: 0.4,
    },
];

/// One-line hint listing every reference range
pub fn reference_ranges_hint() -> String {
    let parts: Vec<String> = FIELD_SPECS
        .iter()
        .map(|s| {
            let name = match s.field {
                Field::MeanRadius => "radius",
                other => other.key(),
            };
            format!("{} {}–{}", name, s.reference_min, s.reference_max)
        })
        .collect();
    format!("Example ranges: {}", parts.join(", "))
}
