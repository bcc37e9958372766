//! Service layer providing business-oriented operations on top of models.
//! - One module per table or bucket concern; handlers call them directly.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Blob storage, catalogue filtering, XLSX export and admin auth live here too.

pub mod errors;
pub mod pagination;
pub mod serde_ext;
pub mod storage;
pub mod catalog;
pub mod export;
pub mod auth;

pub mod category_service;
pub mod product_service;
pub mod attribute_service;
pub mod news_service;
pub mod testimonial_service;
pub mod company_service;
pub mod settings_service;
pub mod media_service;

#[cfg(test)]
pub mod test_support;
