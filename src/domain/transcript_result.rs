use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Response contract for a completed transcription.
///
/// `summary`, `iab_categories_result.summary` and `utterances` are checked
/// and exposed as typed fields. Serialization always writes the service
/// payload exactly as it was received.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptResult {
    pub summary: Option<String>,
    pub iab_categories: Option<IabCategories>,
    pub utterances: Option<Vec<Utterance>>,
    payload: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IabCategories {
    #[serde(default)]
    pub summary: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Utterance {
    pub speaker: String,
    pub text: String,
}

#[derive(Deserialize)]
struct ContractFields {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default, rename = "iab_categories_result")]
    iab_categories: Option<IabCategories>,
    #[serde(default)]
    utterances: Option<Vec<Utterance>>,
}

impl TranscriptResult {
    /// Fails when one of the contract fields has the wrong shape. Absent and
    /// `null` fields are both accepted.
    pub fn from_payload(payload: Value) -> Result<Self, serde_json::Error> {
        let fields = ContractFields::deserialize(&payload)?;
        Ok(Self {
            summary: fields.summary,
            iab_categories: fields.iab_categories,
            utterances: fields.utterances,
            payload,
        })
    }

    pub fn topics(&self) -> Option<&BTreeMap<String, f64>> {
        self.iab_categories.as_ref().map(|c| &c.summary)
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

impl Serialize for TranscriptResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.payload.serialize(serializer)
    }
}
