//! Receipt shapes as delivered by the billing client.

use serde::{Deserialize, Serialize};

/// A signed purchase receipt: the payload and its base64 signature.
///
/// `signed_data` must be the exact text the signer produced. It is verified
/// over its UTF-8 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedReceipt {
    #[serde(alias = "originalJson", alias = "signedData")]
    pub signed_data: String,

    pub signature: String,
}

impl SignedReceipt {
    pub fn new(signed_data: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            signed_data: signed_data.into(),
            signature: signature.into(),
        }
    }

    /// Parse the signed payload for display.
    ///
    /// Only meaningful after the receipt has been verified; the verdict never
    /// depends on this.
    pub fn payload(&self) -> Result<PurchasePayload, serde_json::Error> {
        serde_json::from_str(&self.signed_data)
    }
}

/// Purchase state as encoded in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum PurchaseState {
    Purchased,
    Canceled,
    Pending,
    Unknown(i64),
}

impl From<i64> for PurchaseState {
    fn from(value: i64) -> Self {
        match value {
            0 => Self::Purchased,
            1 => Self::Canceled,
            2 => Self::Pending,
            other => Self::Unknown(other),
        }
    }
}

impl From<PurchaseState> for i64 {
    fn from(value: PurchaseState) -> Self {
        match value {
            PurchaseState::Purchased => 0,
            PurchaseState::Canceled => 1,
            PurchaseState::Pending => 2,
            PurchaseState::Unknown(other) => other,
        }
    }
}

/// Fields of the signed purchase JSON. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub product_ids: Vec<String>,

    /// Milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_time: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_state: Option<PurchaseState>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,

    #[serde(default)]
    pub acknowledged: bool,
}

impl PurchasePayload {
    /// Product identifiers, whichever field the client used.
    pub fn products(&self) -> Vec<&str> {
        let mut products: Vec<&str> = self.product_ids.iter().map(String::as_str).collect();
        if let Some(id) = &self.product_id {
            if !products.contains(&id.as_str()) {
                products.push(id);
            }
        }
        products
    }
}
