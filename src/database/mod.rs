pub mod connection;
pub mod users;

#[cfg(test)]
pub mod memory;
