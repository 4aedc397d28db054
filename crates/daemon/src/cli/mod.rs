pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Auth, Daemon, Health, Init, Logout, Ls, Register, Rm, Upload, Version};
