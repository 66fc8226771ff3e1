pub mod follows;
pub mod memberships;
pub mod projects;
pub mod users;

#[cfg(test)]
pub mod fixtures;
