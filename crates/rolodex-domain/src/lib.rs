pub mod contact;
pub mod generate;

pub use contact::{Contact, ContactId};
pub use generate::ContactGenerator;
