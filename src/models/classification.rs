//! Classification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::AppError;

pub const URL_REQUIRED: &str = "URL is required";
pub const ADD_DATA_FIELDS_REQUIRED: &str = "URL, probability, and isPhishing are required";

/// A persisted classification, returned as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ClassificationRecord {
    pub id: i64,
    pub url: String,
    pub is_phishing: bool,
    pub probability: f64,
    pub timestamp: DateTime<Utc>,
}

/// A record about to be appended. The store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClassification {
    pub url: String,
    pub is_phishing: bool,
    pub probability: f64,
}

/// Outcome of classifying a single URL
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub is_phishing: bool,
    pub probability: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DetectPhishingRequest {
    #[validate(required, length(min = 1))]
    pub url: Option<String>,
}

impl DetectPhishingRequest {
    pub fn into_url(self) -> Result<String, AppError> {
        self.validate()
            .map_err(|_| AppError::ValidationError(URL_REQUIRED.to_string()))?;
        self.url
            .ok_or_else(|| AppError::ValidationError(URL_REQUIRED.to_string()))
    }
}

/// Manual insert. Fields are trusted as given, `is_phishing` is not
/// reconciled with `probability`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddDataRequest {
    #[validate(required, length(min = 1))]
    pub url: Option<String>,

    #[validate(required)]
    pub probability: Option<f64>,

    #[serde(rename = "isPhishing")]
    #[validate(required)]
    pub is_phishing: Option<bool>,
}

impl AddDataRequest {
    pub fn into_new_classification(self) -> Result<NewClassification, AppError> {
        let missing = || AppError::ValidationError(ADD_DATA_FIELDS_REQUIRED.to_string());

        self.validate().map_err(|_| missing())?;

        match (self.url, self.is_phishing, self.probability) {
            (Some(url), Some(is_phishing), Some(probability)) => Ok(NewClassification {
                url,
                is_phishing,
                probability,
            }),
            _ => Err(missing()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddDataResponse {
    pub message: String,
}
