use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "RedLife Service API",
        version = "1.0.0",
        description = "Backend API for the RedLife blood-donation platform.\n\n**Authentication:** Gated endpoints require a Firebase ID token as Bearer token.\n\n**Features:**\n- Login-or-register user upsert with admin role/status control\n- Blood donation request lifecycle (pending → inprogress → done/canceled)\n- Funds and Stripe payment intents\n- Blog drafting and publishing",
        contact(
            name = "RedLife Team"
        )
    ),
    paths(
        // Health
        crate::api::health::health_check,

        // Users
        crate::api::users::add_user,
        crate::api::users::get_user,
        crate::api::users::search_donors,

        // Donations
        crate::api::donations::create,
        crate::api::donations::list,

        // Funds & Payments
        crate::api::funds::list,
        crate::api::funds::total,
        crate::api::payments::create_payment_intent,

        // Blogs
        crate::api::blogs::list_all,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::models::AddUserRequest,
            crate::models::UpdateProfileRequest,
            crate::models::UpdateRoleRequest,
            crate::models::UpdateStatusRequest,
            crate::models::CreateDonationRequest,
            crate::models::PatchDonationRequest,
            crate::models::UpdateDonationStatusRequest,
            crate::models::CreateFundRequest,
            crate::models::CreatePaymentIntentRequest,
            crate::models::PaymentIntentResponse,
            crate::models::CreateBlogRequest,
            crate::models::UpdateBlogStatusRequest,
            crate::models::UserRole,
            crate::models::UserStatus,
            crate::models::DonationStatus,
            crate::models::BlogStatus,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint for monitoring service status."),
        (name = "Users", description = "Login-or-register upsert, profiles, donor search and admin role/status control."),
        (name = "Donations", description = "Blood donation request lifecycle endpoints."),
        (name = "Funds", description = "Fund records and funding analytics."),
        (name = "Payments", description = "Stripe payment intent creation."),
        (name = "Blogs", description = "Blog drafting, publishing and administration."),
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
                        .description(Some("Firebase ID token"))
                        .build(),
                ),
            );
        }
    }
}
