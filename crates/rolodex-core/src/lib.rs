pub mod error;
pub mod key;
pub mod page;
pub mod result;

pub use error::RolodexError;
pub use key::{IndexKey, KeyPart};
pub use page::{Direction, PageRequest, PageResponse, PageSource};
pub use result::RolodexResult;
