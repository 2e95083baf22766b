pub mod admin_seed;
pub mod item_form;
pub mod password;
pub mod uploads;
