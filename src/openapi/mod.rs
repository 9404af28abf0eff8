use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Autogarage API",
        version = "1.0.0",
        description = r#"
# Autogarage Shop Management API

Backend for a garage and auto-detailing shop.

## Features

- **Masters**: Services, PPF films with roll stock, accessories and vehicle types
- **Job Cards**: Priced work orders with line-item snapshots
- **Invoices**: Issued from completed job cards, one per job
- **Inquiries**: Customer quotes with markup
- **Appointments** and **Technicians**
- **Dashboard**: Sales, job and stock summaries

## Authentication

Log in with `POST /api/login`. The response sets an HTTP-only session cookie
that must accompany every other `/api` request.

## Error Handling

Errors share one body shape:

```json
{
  "error": "Bad Request",
  "message": "Validation error: phone_number: length",
  "request_id": "req-abc123xyz",
  "timestamp": "2026-01-09T10:30:00Z"
}
```

Money values are serialized as decimal strings.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "auth", description = "Login, logout and the current user"),
        (name = "dashboard", description = "Shop summary"),
        (name = "masters", description = "Service, PPF, accessory and vehicle type catalogs"),
        (name = "technicians", description = "Technician roster"),
        (name = "job-cards", description = "Job card lifecycle and pricing"),
        (name = "inquiries", description = "Customer quotes"),
        (name = "invoices", description = "Invoices issued from completed job cards"),
        (name = "appointments", description = "Appointment booking")
    ),
    paths(
        // Auth
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::auth::current_user,
        crate::handlers::auth::update_current_user,

        // Dashboard
        crate::handlers::dashboard::get_dashboard,

        // Masters
        crate::handlers::masters::list_services,
        crate::handlers::masters::create_service,
        crate::handlers::masters::update_service,
        crate::handlers::masters::delete_service,
        crate::handlers::masters::list_ppfs,
        crate::handlers::masters::create_ppf,
        crate::handlers::masters::update_ppf,
        crate::handlers::masters::delete_ppf,
        crate::handlers::masters::list_accessories,
        crate::handlers::masters::create_accessory,
        crate::handlers::masters::update_accessory,
        crate::handlers::masters::delete_accessory,
        crate::handlers::masters::list_categories,
        crate::handlers::masters::create_category,
        crate::handlers::masters::rename_category,
        crate::handlers::masters::delete_category,
        crate::handlers::masters::list_category_accessories,
        crate::handlers::masters::list_vehicle_types,
        crate::handlers::masters::create_vehicle_type,
        crate::handlers::masters::update_vehicle_type,
        crate::handlers::masters::delete_vehicle_type,

        // Technicians
        crate::handlers::technicians::list_technicians,
        crate::handlers::technicians::get_technician,
        crate::handlers::technicians::create_technician,
        crate::handlers::technicians::update_technician,
        crate::handlers::technicians::delete_technician,

        // Job cards
        crate::handlers::job_cards::list_job_cards,
        crate::handlers::job_cards::get_job_card,
        crate::handlers::job_cards::create_job_card,
        crate::handlers::job_cards::update_job_card,
        crate::handlers::job_cards::delete_job_card,
        crate::handlers::job_cards::generate_invoice,

        // Inquiries
        crate::handlers::inquiries::list_inquiries,
        crate::handlers::inquiries::create_inquiry,
        crate::handlers::inquiries::delete_inquiry,

        // Invoices
        crate::handlers::invoices::list_invoices,
        crate::handlers::invoices::get_invoice,

        // Appointments
        crate::handlers::appointments::list_appointments,
        crate::handlers::appointments::get_appointment,
        crate::handlers::appointments::create_appointment,
        crate::handlers::appointments::update_appointment,
        crate::handlers::appointments::delete_appointment,
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,
            crate::handlers::common::Deleted,

            // Auth
            crate::services::users::LoginRequest,
            crate::services::users::UpdateProfileRequest,
            crate::services::users::UserProfile,
            crate::handlers::auth::LoginResponse,

            // Masters
            crate::entities::service_master::Model,
            crate::entities::ppf_master::Model,
            crate::entities::accessory_master::Model,
            crate::entities::accessory_category::Model,
            crate::entities::vehicle_type::Model,
            crate::models::VehiclePrice,
            crate::models::WarrantyOption,
            crate::models::PpfVehiclePricing,
            crate::models::PpfRoll,
            crate::models::PpfRollInput,
            crate::services::service_masters::CreateServiceMasterRequest,
            crate::services::service_masters::UpdateServiceMasterRequest,
            crate::services::ppf_masters::CreatePpfMasterRequest,
            crate::services::ppf_masters::UpdatePpfMasterRequest,
            crate::services::accessories::CreateAccessoryRequest,
            crate::services::accessories::UpdateAccessoryRequest,
            crate::services::accessories::CategoryRequest,
            crate::services::vehicle_types::VehicleTypeRequest,

            // Technicians
            crate::entities::technician::Model,
            crate::entities::technician::TechnicianStatus,
            crate::services::technicians::CreateTechnicianRequest,
            crate::services::technicians::UpdateTechnicianRequest,

            // Job cards
            crate::entities::job_card::Model,
            crate::entities::job_card::JobStatus,
            crate::models::ServiceLine,
            crate::models::PpfLine,
            crate::models::AccessoryLine,
            crate::services::job_cards::LineItemInput,
            crate::services::job_cards::CreateJobCardRequest,
            crate::services::job_cards::UpdateJobCardRequest,

            // Inquiries
            crate::entities::inquiry::Model,
            crate::models::InquiryServiceLine,
            crate::models::InquiryAccessoryLine,
            crate::services::inquiries::CreateInquiryRequest,
            crate::services::inquiries::InquiryView,

            // Invoices
            crate::entities::invoice::Model,
            crate::models::InvoiceItem,
            crate::services::invoices::GenerateInvoiceRequest,
            crate::services::invoices::InvoiceList,

            // Appointments
            crate::entities::appointment::Model,
            crate::entities::appointment::AppointmentStatus,
            crate::services::appointments::CreateAppointmentRequest,
            crate::services::appointments::UpdateAppointmentRequest,

            // Dashboard
            crate::services::dashboard::DashboardSnapshot,
            crate::services::dashboard::DailySales,
            crate::services::dashboard::StatusCount,
            crate::services::dashboard::WeeklyCustomers,
            crate::services::dashboard::PpfStock,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
