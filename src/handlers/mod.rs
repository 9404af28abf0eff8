pub mod appointments;
pub mod auth;
pub mod common;
pub mod dashboard;
pub mod inquiries;
pub mod invoices;
pub mod job_cards;
pub mod masters;
pub mod technicians;

use crate::{
    config::AppConfig,
    db::DbPool,
    events::EventSender,
    logging::component_logger,
    services::{
        accessories::AccessoryService, appointments::AppointmentService,
        dashboard::DashboardService, inquiries::InquiryService, invoices::InvoiceService,
        job_cards::JobCardService, ppf_masters::PpfMasterService,
        service_masters::ServiceMasterService, technicians::TechnicianService,
        users::UserService, vehicle_types::VehicleTypeService,
    },
};
use slog::Logger;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<UserService>,
    pub service_masters: Arc<ServiceMasterService>,
    pub ppf_masters: Arc<PpfMasterService>,
    pub accessories: Arc<AccessoryService>,
    pub vehicle_types: Arc<VehicleTypeService>,
    pub technicians: Arc<TechnicianService>,
    pub job_cards: Arc<JobCardService>,
    pub inquiries: Arc<InquiryService>,
    pub invoices: Arc<InvoiceService>,
    pub appointments: Arc<AppointmentService>,
    pub dashboard: Arc<DashboardService>,
}

impl AppServices {
    /// Builds every service over one pool, each with its own component logger.
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        config: &AppConfig,
        root_logger: &Logger,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(
                db_pool.clone(),
                component_logger(root_logger, "user_service"),
            )),
            service_masters: Arc::new(ServiceMasterService::new(
                db_pool.clone(),
                component_logger(root_logger, "service_master_service"),
            )),
            ppf_masters: Arc::new(PpfMasterService::new(
                db_pool.clone(),
                component_logger(root_logger, "ppf_master_service"),
            )),
            accessories: Arc::new(AccessoryService::new(
                db_pool.clone(),
                component_logger(root_logger, "accessory_service"),
            )),
            vehicle_types: Arc::new(VehicleTypeService::new(
                db_pool.clone(),
                component_logger(root_logger, "vehicle_type_service"),
            )),
            technicians: Arc::new(TechnicianService::new(
                db_pool.clone(),
                component_logger(root_logger, "technician_service"),
            )),
            job_cards: Arc::new(JobCardService::new(
                db_pool.clone(),
                event_sender.clone(),
                config.default_gst(),
                component_logger(root_logger, "job_card_service"),
            )),
            inquiries: Arc::new(InquiryService::new(
                db_pool.clone(),
                event_sender.clone(),
                component_logger(root_logger, "inquiry_service"),
            )),
            invoices: Arc::new(InvoiceService::new(
                db_pool.clone(),
                event_sender.clone(),
                config.default_business.clone(),
                component_logger(root_logger, "invoice_service"),
            )),
            appointments: Arc::new(AppointmentService::new(
                db_pool.clone(),
                event_sender,
                component_logger(root_logger, "appointment_service"),
            )),
            dashboard: Arc::new(DashboardService::new(db_pool)),
        }
    }
}
