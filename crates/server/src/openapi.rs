use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::catalog::list_products,
        crate::routes::catalog::featured_products,
        crate::routes::catalog::get_product,
        crate::routes::catalog::whatsapp_link,
        crate::routes::catalog::list_categories,
        crate::routes::catalog::get_category,
        crate::routes::catalog::list_attributes,
        crate::routes::content::list_published_news,
        crate::routes::content::get_published_news,
        crate::routes::content::list_active_testimonials,
        crate::routes::content::get_company,
        crate::routes::content::get_setting,
        crate::routes::catalog::admin_list_products,
        crate::routes::catalog::admin_create_product,
        crate::routes::catalog::admin_update_product,
        crate::routes::catalog::admin_delete_product,
        crate::routes::catalog::admin_adjust_stock,
        crate::routes::catalog::admin_create_category,
        crate::routes::catalog::admin_delete_category,
        crate::routes::catalog::admin_create_attribute,
        crate::routes::content::admin_create_news,
        crate::routes::content::admin_update_news,
        crate::routes::content::admin_put_company,
        crate::routes::content::admin_put_setting,
        crate::routes::media::list_media,
        crate::routes::media::upload_media,
        crate::routes::media::update_alt_text,
        crate::routes::media::delete_media,
        crate::routes::media::sync_media,
        crate::routes::media::list_objects,
        crate::routes::media::transfer_object,
        crate::routes::media::delete_object,
        crate::routes::export::export_products,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            crate::routes::auth::LoginOutput,
            crate::routes::auth::MeOutput,
            crate::routes::catalog::WhatsappLink,
            crate::routes::catalog::StockAdjustment,
            crate::routes::content::SettingValue,
            crate::routes::content::SettingWrite,
            crate::routes::media::AltTextUpdate,
            crate::routes::media::TransferRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "storefront"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
