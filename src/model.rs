//! # Data model
//!
//! Plain data handed to the engine by the surrounding application:
//! normalized parameters per dimension, citation records and the material
//! that owns both.
//!
//! The Maturity parameter (M) lives once on [`ParameterSet`] and every
//! dimension reads it from there, so CR/CC/RU can never disagree about it
//! for the same material snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::confidence::ConfidenceLevel;
use crate::error::ScoringError;

/// One of the three public sustainability indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "CR")]
    Recyclability,
    #[serde(rename = "CC")]
    Compostability,
    #[serde(rename = "RU")]
    Reusability,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [
        Dimension::Recyclability,
        Dimension::Compostability,
        Dimension::Reusability,
    ];

    /// Short code used in parameter keys and method versions ("CR", "CC", "RU").
    pub fn code(self) -> &'static str {
        match self {
            Dimension::Recyclability => "CR",
            Dimension::Compostability => "CC",
            Dimension::Reusability => "RU",
        }
    }

    /// Raw parameter keys for this dimension, including the shared `M_value`.
    pub fn raw_parameter_keys(self) -> &'static [&'static str] {
        match self {
            Dimension::Recyclability => {
                &["Y_value", "D_value", "C_value", MATURITY_KEY, "E_value"]
            }
            Dimension::Compostability => &["B_value", "N_value", "T_value", "H_value", MATURITY_KEY],
            Dimension::Reusability => &["L_value", "R_value", "U_value", "C_RU_value", MATURITY_KEY],
        }
    }

    /// Composite output keys a source may cite (e.g. `CR_practical_mean`).
    pub fn composite_keys(self) -> [String; 2] {
        [
            format!("{}_practical_mean", self.code()),
            format!("{}_theoretical_mean", self.code()),
        ]
    }

    /// Raw keys followed by composite keys.
    pub fn parameter_keys(self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .raw_parameter_keys()
            .iter()
            .map(|k| k.to_string())
            .collect();
        keys.extend(self.composite_keys());
        keys
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Parameter key of the shared Maturity parameter.
pub const MATURITY_KEY: &str = "M_value";

/// Deduplicated union of every dimension's keys, in dimension order.
pub fn default_tracked_parameters() -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for d in Dimension::ALL {
        for k in d.parameter_keys() {
            if !out.contains(&k) {
                out.push(k);
            }
        }
    }
    out
}

/// Real-world infrastructure vs. ideal conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Practical,
    Theoretical,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Practical => f.write_str("practical"),
            Mode::Theoretical => f.write_str("theoretical"),
        }
    }
}

/// CR inputs (besides M): yield, design for disassembly, collection.
///
/// `E` travels with the CR group and is range-checked like the others, but
/// the CR product does not read it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecyclabilityParams {
    #[serde(rename = "Y")]
    pub yield_rate: f64,
    #[serde(rename = "D")]
    pub disassembly: f64,
    #[serde(rename = "C")]
    pub collection: f64,
    #[serde(rename = "E", default, skip_serializing_if = "Option::is_none")]
    pub e_factor: Option<f64>,
}

/// CC inputs (besides M). `toxicity` is inverted: higher means less toxic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompostabilityParams {
    #[serde(rename = "B")]
    pub biodegradation: f64,
    #[serde(rename = "N")]
    pub nutrient_balance: f64,
    #[serde(rename = "T")]
    pub toxicity: f64,
    #[serde(rename = "H")]
    pub habitat: f64,
}

/// RU inputs (besides M). `contamination` is inverted: higher means less susceptible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReusabilityParams {
    #[serde(rename = "L")]
    pub lifetime: f64,
    #[serde(rename = "R")]
    pub repairability: f64,
    #[serde(rename = "U")]
    pub upgradability: f64,
    #[serde(rename = "C_RU")]
    pub contamination: f64,
}

/// All normalized inputs of one material snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Shared circular-economy infrastructure availability (M).
    #[serde(rename = "M")]
    pub maturity: f64,
    #[serde(rename = "CR", default, skip_serializing_if = "Option::is_none")]
    pub recyclability: Option<RecyclabilityParams>,
    #[serde(rename = "CC", default, skip_serializing_if = "Option::is_none")]
    pub compostability: Option<CompostabilityParams>,
    #[serde(rename = "RU", default, skip_serializing_if = "Option::is_none")]
    pub reusability: Option<ReusabilityParams>,
}

impl ParameterSet {
    pub fn new(maturity: f64) -> Self {
        Self {
            maturity,
            recyclability: None,
            compostability: None,
            reusability: None,
        }
    }

    pub fn with_recyclability(mut self, p: RecyclabilityParams) -> Self {
        self.recyclability = Some(p);
        self
    }

    pub fn with_compostability(mut self, p: CompostabilityParams) -> Self {
        self.compostability = Some(p);
        self
    }

    pub fn with_reusability(mut self, p: ReusabilityParams) -> Self {
        self.reusability = Some(p);
        self
    }

    pub fn has(&self, dimension: Dimension) -> bool {
        match dimension {
            Dimension::Recyclability => self.recyclability.is_some(),
            Dimension::Compostability => self.compostability.is_some(),
            Dimension::Reusability => self.reusability.is_some(),
        }
    }

    /// Reject any present parameter outside `[0,1]`, naming the first offender.
    pub fn validate(&self) -> Result<(), ScoringError> {
        check_unit("M", self.maturity)?;
        for d in Dimension::ALL {
            if self.has(d) {
                self.validate_dimension(d)?;
            }
        }
        Ok(())
    }

    /// Check M plus one dimension's group; a missing group is an error here.
    pub fn validate_dimension(&self, dimension: Dimension) -> Result<(), ScoringError> {
        check_unit("M", self.maturity)?;
        let missing = ScoringError::MissingParameters { dimension };
        match dimension {
            Dimension::Recyclability => {
                let p = self.recyclability.as_ref().ok_or(missing)?;
                check_unit("CR.Y", p.yield_rate)?;
                check_unit("CR.D", p.disassembly)?;
                check_unit("CR.C", p.collection)?;
                if let Some(e) = p.e_factor {
                    check_unit("CR.E", e)?;
                }
            }
            Dimension::Compostability => {
                let p = self.compostability.as_ref().ok_or(missing)?;
                check_unit("CC.B", p.biodegradation)?;
                check_unit("CC.N", p.nutrient_balance)?;
                check_unit("CC.T", p.toxicity)?;
                check_unit("CC.H", p.habitat)?;
            }
            Dimension::Reusability => {
                let p = self.reusability.as_ref().ok_or(missing)?;
                check_unit("RU.L", p.lifetime)?;
                check_unit("RU.R", p.repairability)?;
                check_unit("RU.U", p.upgradability)?;
                check_unit("RU.C_RU", p.contamination)?;
            }
        }
        Ok(())
    }
}

/// `Ok(())` when `value` is finite and inside `[0,1]`.
pub(crate) fn check_unit(field: &str, value: f64) -> Result<(), ScoringError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ScoringError::OutOfRange {
            field: field.to_string(),
            value,
        })
    }
}

/// Coarse provenance category of a citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    PeerReviewed,
    Government,
    Industrial,
    Ngo,
    Internal,
}

impl SourceKind {
    /// Policy weight band for this category.
    pub fn default_weight(self) -> f64 {
        match self {
            SourceKind::PeerReviewed => 1.0,
            SourceKind::Government => 0.9,
            SourceKind::Industrial => 0.7,
            SourceKind::Ngo => 0.6,
            SourceKind::Internal => 0.3,
        }
    }
}

fn default_source_weight() -> f64 {
    1.0
}

/// A single citation backing one or more parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SourceKind>,
    /// Reliability multiplier; any positive value is accepted.
    #[serde(default = "default_source_weight")]
    pub weight: f64,
    /// Parameter keys this source supports (raw or composite).
    #[serde(default)]
    pub parameters: Vec<String>,
}

impl Source {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: None,
            year: None,
            doi: None,
            url: None,
            kind: None,
            weight: default_source_weight(),
            parameters: Vec::new(),
        }
    }

    /// Set the category and take its band weight.
    pub fn kind(mut self, kind: SourceKind) -> Self {
        self.kind = Some(kind);
        self.weight = kind.default_weight();
        self
    }

    pub fn weighted(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn supporting<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn supports(&self, key: &str) -> bool {
        self.parameters.iter().any(|p| p == key)
    }
}

/// Sum of member weights.
pub fn total_weight(sources: &[Source]) -> f64 {
    sources.iter().map(|s| s.weight).sum()
}

/// A material snapshot as handed over by the editing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub parameters: ParameterSet,
    /// Absent ledgers deserialize as empty.
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<ConfidenceLevel>,
}

impl Material {
    pub fn new(id: impl Into<String>, parameters: ParameterSet) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            parameters,
            sources: Vec::new(),
            confidence_level: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_confidence(mut self, level: ConfidenceLevel) -> Self {
        self.confidence_level = Some(level);
        self
    }
}
