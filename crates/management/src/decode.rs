//! Boundary decoding for campaign service responses.
//!
//! The service is trusted but loosely typed. Everything it returns passes
//! through here before reaching the controller; anything malformed becomes a
//! `CampaignError::Decode` instead of leaking into the aggregates.

use campaign_core::error::{CampaignError, CampaignResult};
use campaign_core::types::{Campaign, CampaignStats, CreateCampaignReceipt, LoginResponse};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parse a response body. An empty body reads as `null`.
pub fn parse_body(bytes: &[u8]) -> CampaignResult<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|e| CampaignError::Decode(format!("invalid JSON: {}", e)))
}

/// Decode the list payload. A non-array payload is an empty list; an array
/// with any malformed entry is rejected as a whole.
pub fn campaign_list(value: Value) -> CampaignResult<Vec<Campaign>> {
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| CampaignError::Decode(format!("campaign #{}: {}", index, e)))
        })
        .collect()
}

pub fn campaign(value: Value) -> CampaignResult<Campaign> {
    decode("campaign", value)
}

pub fn receipt(value: Value) -> CampaignResult<CreateCampaignReceipt> {
    decode("create receipt", value)
}

pub fn stats(value: Value) -> CampaignResult<CampaignStats> {
    decode("campaign stats", value)
}

pub fn login_token(value: Value) -> CampaignResult<String> {
    decode::<LoginResponse>("login response", value).map(|resp| resp.token)
}

fn decode<T: DeserializeOwned>(what: &str, value: Value) -> CampaignResult<T> {
    serde_json::from_value(value).map_err(|e| CampaignError::Decode(format!("{}: {}", what, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_body_is_null() {
        assert_eq!(parse_body(b"").unwrap(), Value::Null);
        assert_eq!(parse_body(b"  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_garbage_body_is_decode_error() {
        let err = parse_body(b"<html>502</html>").unwrap_err();
        assert!(matches!(err, CampaignError::Decode(_)));
    }

    #[test]
    fn test_non_array_list_is_empty() {
        assert!(campaign_list(json!({"campaigns": []})).unwrap().is_empty());
        assert!(campaign_list(Value::Null).unwrap().is_empty());
        assert!(campaign_list(json!("nope")).unwrap().is_empty());
    }

    #[test]
    fn test_list_keeps_order() {
        let list = campaign_list(json!([
            {"_id": "b", "title": "Second"},
            {"_id": "a", "title": "First", "sentCount": 3}
        ]))
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "b");
        assert_eq!(list[1].sent_count, 3);
    }

    #[test]
    fn test_malformed_entry_rejects_list() {
        let err = campaign_list(json!([
            {"_id": "a"},
            {"_id": "b", "sentCount": "lots"}
        ]))
        .unwrap_err();
        match err {
            CampaignError::Decode(msg) => assert!(msg.starts_with("campaign #1")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_odd_created_at_keeps_list() {
        let list = campaign_list(json!([
            {"_id": "a", "createdAt": "2024-03-01T10:00:00Z"},
            {"_id": "b", "createdAt": "2024-03-01"},
            {"_id": "c", "createdAt": 1709251200000u64},
            {"_id": "d", "createdAt": "not a date"}
        ]))
        .unwrap();
        assert_eq!(list.len(), 4);
        assert!(list[0].created_at.is_some());
        assert_eq!(list[1].created_at, list[2].created_at);
        assert!(list[1].created_at.is_some());
        assert!(list[3].created_at.is_none());
    }

    #[test]
    fn test_entry_without_id_is_kept() {
        let list = campaign_list(json!([
            {"title": "Orphan", "sentCount": 4},
            {"_id": "b", "title": "Second"}
        ]))
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "");
        assert_eq!(list[0].title, "Orphan");
        assert_eq!(list[1].id, "b");
    }

    #[test]
    fn test_negative_counter_rejected() {
        assert!(campaign_list(json!([{"_id": "a", "failedCount": -1}])).is_err());
    }

    #[test]
    fn test_receipt_keeps_extra_fields() {
        let receipt = receipt(json!({
            "campaignId": "c-9",
            "audienceSize": 420,
            "message": "Campaign created"
        }))
        .unwrap();
        assert_eq!(receipt.campaign_id.as_deref(), Some("c-9"));
        assert_eq!(receipt.audience_size, Some(420));
        assert_eq!(receipt.extra["message"], "Campaign created");
    }

    #[test]
    fn test_login_token_requires_token() {
        assert_eq!(login_token(json!({"token": "abc"})).unwrap(), "abc");
        assert!(login_token(json!({"ok": true})).is_err());
    }
}
