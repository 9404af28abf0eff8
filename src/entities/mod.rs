pub mod accessory_category;
pub mod accessory_master;
pub mod appointment;
pub mod inquiry;
pub mod invoice;
pub mod job_card;
pub mod ppf_master;
pub mod sequence;
pub mod service_master;
pub mod technician;
pub mod user;
pub mod vehicle_type;
