pub mod errors;
pub mod db;
pub mod user;
pub mod user_credentials;
pub mod gist;

#[cfg(test)]
mod tests;
