//! Conversion of AWS SDK listing outputs into raw pages.
//!
//! Pages keep the provider's PascalCase field names so the normalizers read the same shape
//! regardless of which transport produced it.

pub mod backup;
pub mod ec2;

use chrono::{DateTime, Utc};

/// Render an SDK timestamp as an RFC 3339 string value
pub(crate) fn timestamp_to_json(timestamp: &aws_smithy_types::DateTime) -> Option<serde_json::Value> {
    DateTime::<Utc>::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
        .map(|t| serde_json::Value::String(t.to_rfc3339()))
}

pub(crate) fn insert_next_token(
    page: &mut serde_json::Map<String, serde_json::Value>,
    next_token: &Option<String>,
) {
    if let Some(token) = next_token {
        page.insert(
            super::aws_client::NEXT_TOKEN_KEY.to_string(),
            serde_json::Value::String(token.clone()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_to_json_is_rfc3339() {
        let timestamp = aws_smithy_types::DateTime::from_secs(1_700_000_000);
        assert_eq!(
            timestamp_to_json(&timestamp),
            Some(serde_json::Value::String("2023-11-14T22:13:20+00:00".to_string()))
        );
    }

    #[test]
    fn test_next_token_only_when_present() {
        let mut page = serde_json::Map::new();
        insert_next_token(&mut page, &None);
        assert!(page.is_empty());

        insert_next_token(&mut page, &Some("t-1".to_string()));
        assert_eq!(page.get("NextToken").and_then(|v| v.as_str()), Some("t-1"));
    }
}
