pub mod plans;
pub mod profiles;
