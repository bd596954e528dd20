//! Domain model: aggregates, value objects and events.

pub mod cart;
pub mod category;
pub mod discount;
pub mod events;
pub mod product;
pub mod sale;
pub mod value_objects;

pub use cart::{Cart, CartError, CartLine, CartOwner};
pub use category::Category;
pub use discount::{Discount, DiscountError};
pub use product::{Product, ProductError};
pub use sale::{CustomerInfo, PaymentMethod, Sale, SaleError, SaleStatus, StatusJob};
pub use value_objects::{Money, Percent, Quantity};
