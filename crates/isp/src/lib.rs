//! ISP customer book: customers and the zones they are wired into.

pub mod customer;
pub mod zone;

pub use customer::{
    Customer, CustomerPatch, CustomerStatus, IdDocument, NetworkCredentials, NewCustomer,
};
pub use zone::{NewZone, Zone, normalize_name};
