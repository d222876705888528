pub mod company;
pub mod email;
