pub mod countdown;
pub mod fixture;
