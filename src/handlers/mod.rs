pub mod clients;
pub mod projects;
pub mod time_entries;
pub mod token;
pub mod users;
