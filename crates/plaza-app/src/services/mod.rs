//! # Service Module
//!
//! One service per screen of the shell. Each service owns the business
//! flow, delegates SQL to plaza-db, math to plaza-core, and takes the
//! acting `Session` explicitly wherever records are attributed or scoped.

pub mod auth;
pub mod bathroom;
pub mod checkout;
pub mod inventory;
pub mod package;
pub mod parking;
pub mod report;

pub use auth::{AuthService, NewUser};
pub use bathroom::BathroomService;
pub use checkout::{CheckoutService, SaleDraftLine};
pub use inventory::{InventoryService, ProductInput};
pub use package::PackageService;
pub use parking::{ParkingQuote, ParkingService};
pub use report::ReportService;
