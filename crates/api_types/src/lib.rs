use serde::{Deserialize, Serialize};

/// Generic `{"status": ...}` acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub mod transaction {
    use super::*;

    /// Body of `PUT /transactionservice/transaction/{id}`.
    ///
    /// The id itself travels in the path.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TransactionRequest {
        /// Strictly positive, at most two decimals.
        pub amount: f64,
        #[serde(rename = "type")]
        pub kind: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub parent_id: Option<i64>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TransactionResponse {
        pub amount: f64,
        #[serde(rename = "type")]
        pub kind: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub parent_id: Option<i64>,
    }

    /// Amount of a transaction plus all of its transitive descendants.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct SumResponse {
        pub sum: f64,
    }
}

#[cfg(test)]
mod tests {
    use super::transaction::*;

    #[test]
    fn request_uses_type_key_and_optional_parent() {
        let req: TransactionRequest =
            serde_json::from_str(r#"{"amount": 5000, "type": "cars"}"#).unwrap();
        assert_eq!(req.kind, "cars");
        assert_eq!(req.parent_id, None);

        let req: TransactionRequest =
            serde_json::from_str(r#"{"amount": 10.5, "type": "shopping", "parent_id": 1}"#)
                .unwrap();
        assert_eq!(req.parent_id, Some(1));
    }

    #[test]
    fn response_omits_missing_parent() {
        let body = serde_json::to_value(TransactionResponse {
            amount: 5000.0,
            kind: "cars".to_string(),
            parent_id: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"amount": 5000.0, "type": "cars"}));
    }
}
