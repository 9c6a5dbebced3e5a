use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::BinId;

/// A stored JSON document keyed by its generated identifier.
///
/// `json` is always the escaped form as it sits in the backing store; the
/// codec restores the client's keys on the way out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    #[serde(rename = "binId")]
    pub bin_id: BinId,
    pub json: Value,
}

impl Bin {
    pub fn new(bin_id: BinId, json: Value) -> Self {
        Self { bin_id, json }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn persisted_field_names() {
        let bin = Bin::new(BinId::parse("x1").unwrap(), json!({"a": 1}));
        let value = serde_json::to_value(&bin).unwrap();
        assert_eq!(value, json!({"binId": "x1", "json": {"a": 1}}));
    }

    #[test]
    fn deserialize_rejects_invalid_id() {
        let res: Result<Bin, _> = serde_json::from_value(json!({"binId": "", "json": []}));
        assert!(res.is_err());
    }
}
