//! Classification Service
//!
//! score -> threshold -> persist. A verdict is only returned once it has
//! been stored; a store failure after a successful score fails the whole
//! call. Nothing is retried.

use std::sync::Arc;

use crate::error::{ClassificationError, ScoringError};
use crate::models::{NewClassification, Verdict, URL_REQUIRED};

use super::scoring::Scorer;
use super::store::ResultStore;
use super::threshold::ThresholdConfig;

#[derive(Clone)]
pub struct ClassificationService {
    scorer: Arc<dyn Scorer>,
    store: Arc<dyn ResultStore>,
    threshold: ThresholdConfig,
}

impl ClassificationService {
    pub fn new(scorer: Arc<dyn Scorer>, store: Arc<dyn ResultStore>, threshold: ThresholdConfig) -> Self {
        Self {
            scorer,
            store,
            threshold,
        }
    }

    pub fn threshold(&self) -> ThresholdConfig {
        self.threshold
    }

    pub async fn classify(&self, url: &str) -> Result<Verdict, ClassificationError> {
        if url.is_empty() {
            return Err(ClassificationError::Validation(URL_REQUIRED.to_string()));
        }

        let probabilities = self.scorer.score(&[url.to_string()]).await?;
        let probability = probabilities.first().copied().ok_or_else(|| {
            ScoringError::MalformedOutput("Scorer returned no probability".to_string())
        })?;

        let is_phishing = self.threshold.is_phishing(probability);

        self.store
            .insert(&NewClassification {
                url: url.to_string(),
                is_phishing,
                probability,
            })
            .await?;

        Ok(Verdict {
            is_phishing,
            probability,
        })
    }
}
