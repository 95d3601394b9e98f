//! Customer details collected at checkout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Recipient and contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    /// Full name.
    pub full_name: String,

    /// Contact phone number.
    pub phone: String,

    /// Contact e-mail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Delivery address.
    pub address: String,

    /// Note for the shop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A required customer field was left blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} is required")]
pub struct MissingCustomerField(pub &'static str);

impl CustomerInfo {
    /// Check that the required fields are filled in.
    ///
    /// # Errors
    ///
    /// Returns the first blank required field.
    pub fn validate(&self) -> Result<(), MissingCustomerField> {
        let required = [
            ("full name", &self.full_name),
            ("phone", &self.phone),
            ("address", &self.address),
        ];

        match required.into_iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(MissingCustomerField(field)),
            None => Ok(()),
        }
    }
}
