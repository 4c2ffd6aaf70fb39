use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketplace Service API",
        version = "1.0.0",
        description = "Second-hand marketplace backend for buyers, sellers and administrators.\n\n**Authentication:** `PUT /user/{email}` returns a JWT. Send it as `Authorization: Bearer <token>`.\n\n**Roles:** Buyer, Seller and Admin routes check the role stored on the user record, not the token.",
    ),
    paths(
        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Users
        crate::api::users::upsert_user,
        crate::api::users::check_admin,
        crate::api::users::check_seller,
        crate::api::users::check_buyer,
        crate::api::users::check_verified,

        // Catalog
        crate::api::catalog::list_categories,
        crate::api::catalog::category_products,
        crate::api::catalog::advertised_products,

        // Buyer
        crate::api::bookings::create_booking,
        crate::api::bookings::update_booking_status,
        crate::api::bookings::my_orders,
        crate::api::bookings::complete_order,

        // Seller
        crate::api::products::add_product,
        crate::api::products::my_products,
        crate::api::products::delete_product,
        crate::api::products::advertise,
        crate::api::products::remove_advertise,

        // Reports
        crate::api::reports::report_product,

        // Admin
        crate::api::admin::reported_items,
        crate::api::admin::all_sellers,
        crate::api::admin::all_buyers,
        crate::api::admin::verify_user,
        crate::api::admin::delete_user,
        crate::api::admin::delete_item,
        crate::api::admin::delete_report,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,

            crate::database::InsertAck,
            crate::database::UpdateAck,
            crate::database::DeleteAck,

            crate::models::Role,
            crate::models::user::AdminCheck,
            crate::models::user::SellerCheck,
            crate::models::user::BuyerCheck,
            crate::models::user::VerifiedCheck,
            crate::services::user_service::ProfileResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness, database health and request counters."),
        (name = "Users", description = "Profile upsert (issues the access token) and public role checks."),
        (name = "Catalog", description = "Public browsing of categories and advertised products."),
        (name = "Buyer", description = "Bookings and orders. Requires a Buyer account."),
        (name = "Seller", description = "Listing management. Requires a Seller account."),
        (name = "Reports", description = "Report a product. Any signed-in user."),
        (name = "Admin", description = "Moderation and user management. Requires an Admin account."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by PUT /user/{email}"))
                        .build()
                ),
            );
        }
    }
}
