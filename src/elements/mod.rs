// Face element modules
pub mod accessories;
pub mod eyes;
