pub mod auth;
pub mod daemon;
pub mod health;
pub mod init;
pub mod logout;
pub mod ls;
pub mod register;
pub mod rm;
pub mod upload;
pub mod version;

pub use auth::Auth;
pub use daemon::Daemon;
pub use health::Health;
pub use init::Init;
pub use logout::Logout;
pub use ls::Ls;
pub use register::Register;
pub use rm::Rm;
pub use upload::Upload;
pub use version::Version;
