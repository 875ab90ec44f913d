//! Trip planning request and response shapes

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Body of `POST /api/trip-plan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    /// Where the traveler departs from
    pub origin: String,
    /// Candidate destinations; a single string is accepted as one city
    #[serde(deserialize_with = "one_or_many")]
    pub cities: Vec<String>,
    /// Free-form travel dates, e.g. "June 1 - June 8"
    pub date_range: String,
    /// Free-form traveler interests
    pub interests: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TripRequestError {
    #[error("Field '{0}' must not be empty")]
    Empty(&'static str),
}

impl TripRequest {
    pub fn new(
        origin: impl Into<String>,
        cities: Vec<String>,
        date_range: impl Into<String>,
        interests: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            cities,
            date_range: date_range.into(),
            interests: interests.into(),
        }
    }

    /// Check that the fields the prompts depend on carry content
    pub fn validate(&self) -> Result<(), TripRequestError> {
        if self.cities.iter().all(|c| c.trim().is_empty()) {
            return Err(TripRequestError::Empty("cities"));
        }
        if self.date_range.trim().is_empty() {
            return Err(TripRequestError::Empty("date_range"));
        }
        Ok(())
    }
}

/// Body returned by `POST /api/trip-plan`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripPlan {
    pub result: String,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(city) => vec![city],
        OneOrMany::Many(cities) => cities,
    })
}
