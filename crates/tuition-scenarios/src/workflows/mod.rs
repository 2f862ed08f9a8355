pub mod intake;
pub mod scenario;
