pub use crate::error::{Error, ErrorKind, ResultExt};
pub use crate::request_options::*;
pub use crate::{Continuable, HttpClient, Pageable};
