pub mod steps;
mod world;

pub use world::{CertWorld, ADMIN_TOKEN, USER_TOKEN};
