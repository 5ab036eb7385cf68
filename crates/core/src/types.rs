/// Catalog identities are UUIDs (v7, assigned by the store at insert time).
pub type ProductId = uuid::Uuid;
