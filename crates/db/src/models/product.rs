//! Row and request shapes for the `products` table.
//!
//! Wire field names keep the PascalCase of the external catalog format
//! (`ProductType`, `CustomsDetails`, ...); only the identity is lowercase
//! `id`.

use merx_core::types::ProductId;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Customs information attached to a product (CN codes and UN numbers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomsDetails {
    #[serde(rename = "CNCode")]
    pub cn_code: Vec<String>,
    #[serde(rename = "UNNumber")]
    pub un_number: Vec<String>,
}

/// A stored product, decoded for the read path.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "ProductType")]
    pub product_type: String,
    #[serde(rename = "ProductCode")]
    pub product_code: String,
    #[serde(rename = "ProductGroup", skip_serializing_if = "Option::is_none")]
    pub product_group: Option<String>,
    #[serde(rename = "ProductDescription")]
    pub product_description: String,
    #[serde(rename = "ProductNumberCode")]
    pub product_number_code: String,
    #[serde(rename = "CustomsDetails", skip_serializing_if = "Option::is_none")]
    pub customs_details: Option<sqlx::types::Json<CustomsDetails>>,
}

/// Incoming product-create record, as posted to the API or carried in a
/// bus batch message.
///
/// Decoding is lenient (missing fields become empty) so that structural
/// problems surface as field validation errors, not deserialization
/// failures. The stream path skips [`Validate`] entirely and relies on the
/// table constraints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateProduct {
    #[serde(rename = "ProductType", default)]
    #[validate(custom(function = validate_product_type))]
    pub product_type: String,

    #[serde(rename = "ProductCode", default)]
    #[validate(length(min = 1, message = "Field token cannot be empty or is missing"))]
    pub product_code: String,

    #[serde(rename = "ProductGroup", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "Must be between 1 and 50 characters"))]
    pub product_group: Option<String>,

    #[serde(rename = "ProductDescription", default)]
    #[validate(length(min = 2, max = 200, message = "Must be between 2 and 200 characters"))]
    pub product_description: String,

    #[serde(rename = "ProductNumberCode", default)]
    #[validate(length(min = 1, max = 60, message = "Must be between 1 and 60 characters"))]
    pub product_number_code: String,

    #[serde(rename = "CustomsDetails", default, skip_serializing_if = "Option::is_none")]
    pub customs_details: Option<CustomsDetails>,
}

fn validate_product_type(value: &str) -> Result<(), ValidationError> {
    match value {
        "P" | "S" | "O" => Ok(()),
        _ => Err(ValidationError::new("product_type").with_message("Must be P|S|O".into())),
    }
}

/// Identity assigned to a freshly created product.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductCreated {
    pub id: String,
}

/// One page of catalog results plus the unpaginated match count.
#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub total: i64,
    pub per_page: i64,
    pub page: i64,
    pub items: Vec<Product>,
}

/// Result of an unordered bulk insert.
///
/// `inserted_ids` holds the identities actually persisted, in the order
/// the store processed them; with per-item rejects it can be shorter than
/// the input batch, and callers must not assume index alignment with it.
#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub inserted_ids: Vec<ProductId>,
    pub rejects: Vec<BulkReject>,
}

/// Diagnostic for a single item the store refused inside a batch.
///
/// Rejects are observability data only; they are logged by callers and
/// never promoted to a hard error.
#[derive(Debug, Clone, Serialize)]
pub struct BulkReject {
    /// Position of the rejected item in the input batch.
    pub index: usize,
    /// Field the rejection points at, empty when unattributable.
    pub field: String,
    pub reason: String,
}
