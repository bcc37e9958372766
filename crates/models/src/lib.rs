pub mod errors;
pub mod db;
pub mod validation;
pub mod category;
pub mod product;
pub mod color;
pub mod cap_pattern;
pub mod tiedye_pattern;
pub mod news;
pub mod testimonial;
pub mod company_info;
pub mod setting;
pub mod media_library;
pub mod admin_user;
pub mod admin_credentials;

#[cfg(test)]
mod tests;
