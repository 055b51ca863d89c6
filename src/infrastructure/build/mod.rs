//! External site builders

mod command;

pub use command::{CommandSiteBuilder, RELEASE_ID_VAR};
