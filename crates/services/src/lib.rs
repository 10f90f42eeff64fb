//! # services
//!
//! Use cases for each process plus the container the binaries are wired with.
//! Services hold their collaborators as `Arc<dyn Port>` and never touch HTTP
//! or SQL directly.

pub mod container;
pub mod gateway;
pub mod media;
pub mod posts;
pub mod token;
pub mod users;

pub use container::{Container, ServiceKey};
pub use gateway::Gateway;
pub use media::{DownloadService, MediaService};
pub use posts::PostService;
pub use token::TokenService;
pub use users::UserService;
