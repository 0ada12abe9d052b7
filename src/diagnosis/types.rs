use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Free-form pet attributes, in the order the client sent them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetProfile(Map<String, Value>);

impl PetProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts only JSON objects.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// One candidate diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub name: String,
    /// Percentage in `[0, 100]`.
    #[serde(serialize_with = "serialize_likelihood")]
    pub likelihood: f64,
    pub explanation: String,
}

impl Condition {
    pub fn new(name: impl Into<String>, likelihood: f64, explanation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            likelihood,
            explanation: explanation.into(),
        }
    }

    /// `Name (X%)`
    pub fn label(&self) -> String {
        format!("{} ({}%)", self.name, format_likelihood(self.likelihood))
    }
}

/// Whole percentages print without a fractional part.
pub fn format_likelihood(likelihood: f64) -> String {
    if likelihood.fract() == 0.0 {
        format!("{}", likelihood as i64)
    } else {
        format!("{}", likelihood)
    }
}

fn serialize_likelihood<S: Serializer>(likelihood: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if likelihood.fract() == 0.0 {
        serializer.serialize_i64(*likelihood as i64)
    } else {
        serializer.serialize_f64(*likelihood)
    }
}

/// The structured part of a diagnosis reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisResult {
    pub conditions: Vec<Condition>,
    pub urgent: bool,
    pub consult: String,
    pub homecare: String,
}

/// Client-supplied detail lookup, before defaults are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailsRequest {
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
}

/// Memoization key for veterinary detail lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DetailQuery {
    pub diagnosis: String,
    pub species: String,
    pub breed: String,
}

impl DetailQuery {
    pub const DEFAULT_SPECIES: &'static str = "Unknown";
    pub const DEFAULT_BREED: &'static str = "Mixed";

    pub fn new(
        diagnosis: impl Into<String>,
        species: impl Into<String>,
        breed: impl Into<String>,
    ) -> Self {
        Self {
            diagnosis: diagnosis.into(),
            species: species.into(),
            breed: breed.into(),
        }
    }
}

impl DetailsRequest {
    /// `None` when the diagnosis is missing or empty.
    pub fn into_query(self) -> Option<DetailQuery> {
        let diagnosis = self.diagnosis.filter(|d| !d.is_empty())?;
        Some(DetailQuery {
            diagnosis,
            species: self
                .species
                .unwrap_or_else(|| DetailQuery::DEFAULT_SPECIES.to_string()),
            breed: self
                .breed
                .unwrap_or_else(|| DetailQuery::DEFAULT_BREED.to_string()),
        })
    }
}

/// Free-form veterinary information about one diagnosis.
pub type VeterinaryDetail = Map<String, Value>;
