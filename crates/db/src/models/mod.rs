pub mod product;

pub use product::{
    BulkOutcome, BulkReject, CreateProduct, CustomsDetails, Product, ProductCreated, ProductPage,
};
