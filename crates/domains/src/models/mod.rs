pub mod media;
pub mod post;
pub mod user;

pub use media::Media;
pub use post::Post;
pub use user::User;
