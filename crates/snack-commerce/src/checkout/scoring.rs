//! Reliability scoring collaborator and its wire types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::ProductId;

/// Predicted fulfillment confidence for one product, in `[0, 1]`.
///
/// Lower is worse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityScore {
    pub product_id: ProductId,
    pub score: f64,
}

impl ReliabilityScore {
    pub fn new(product_id: impl Into<ProductId>, score: f64) -> Self {
        Self {
            product_id: product_id.into(),
            score,
        }
    }
}

/// Body of a scoring request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub product_ids: Vec<ProductId>,
}

/// Body of a scoring response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predictions: Vec<ReliabilityScore>,
}

/// Scores products for fulfillment reliability.
///
/// Implementations return exactly one score per requested id, in any order.
/// Any error means "no predictions available"; callers never treat it as
/// fatal.
#[async_trait]
pub trait ReliabilityScorer: Send + Sync {
    async fn predict(&self, product_ids: &[ProductId])
        -> Result<Vec<ReliabilityScore>, CommerceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_wire_format() {
        let json = r#"{"predictions":[{"product_id":101,"score":0.35}]}"#;
        let response: PredictionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.predictions, vec![ReliabilityScore::new(101, 0.35)]);
    }

    #[test]
    fn test_request_wire_format() {
        let request = PredictionRequest {
            product_ids: vec![ProductId::new(101), ProductId::new(102)],
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"product_ids":[101,102]}"#
        );
    }
}
