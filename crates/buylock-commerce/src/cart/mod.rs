//! Guest cart module.
//!
//! Contains the cart store and its line types.

mod cart;
mod line;

pub use cart::GuestCart;
pub use line::{Appointment, CartLine, CatalogSnapshot, NewCartLine};
