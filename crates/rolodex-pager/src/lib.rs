pub mod descriptor;
pub mod paginator;
pub mod projection;
pub mod registry;
pub mod service;

pub use descriptor::WindowDescriptor;
pub use paginator::{FetchCommand, Paginator};
pub use projection::{ListEntry, ListView, ViewSnapshot};
pub use registry::{FetchState, Registry, Window, WindowId};
pub use service::{PagerHandle, PagerService};
