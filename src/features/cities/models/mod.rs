mod city;
mod membership;

pub use city::City;
pub use membership::{AccessibleCity, CityMember, CityMembership};
