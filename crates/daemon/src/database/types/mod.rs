mod dbool;
mod duuid;

pub use dbool::DBool;
pub use duuid::DUuid;
