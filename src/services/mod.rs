// Master data
pub mod accessories;
pub mod ppf_masters;
pub mod service_masters;
pub mod technicians;
pub mod vehicle_types;

// Transactional records
pub mod appointments;
pub mod inquiries;
pub mod invoices;
pub mod job_cards;

// Record numbering shared by job cards and invoices
pub mod sequences;

pub mod dashboard;
pub mod users;
