pub mod city_admin_handler;
pub mod operator_handler;

pub use city_admin_handler::{
    create_city, list_cities, list_members, remove_member, upsert_member,
};
pub use operator_handler::operator_landing;
