use crate::error::RolodexError;

pub type RolodexResult<T> = Result<T, RolodexError>;
