// Value types stored as JSON columns on the entities
pub mod line_items;
pub mod pricing_rows;

pub use line_items::{
    AccessoryLine, AccessoryLines, InquiryAccessoryLine, InquiryAccessoryLines,
    InquiryServiceLine, InquiryServiceLines, InvoiceItem, InvoiceItems, PpfLine, PpfLines,
    ServiceLine, ServiceLines,
};
pub use pricing_rows::{
    PpfPricing, PpfRoll, PpfRollInput, PpfRolls, PpfVehiclePricing, VehiclePrice, VehiclePrices,
    WarrantyOption,
};
