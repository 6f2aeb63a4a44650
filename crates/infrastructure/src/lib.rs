//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_permission_repository;
mod in_memory_role_repository;
mod json_file_role_seed_source;
mod postgres_permission_repository;
mod postgres_role_repository;

pub use in_memory_permission_repository::InMemoryPermissionRepository;
pub use in_memory_role_repository::InMemoryRoleRepository;
pub use json_file_role_seed_source::JsonFileRoleSeedSource;
pub use postgres_permission_repository::PostgresPermissionRepository;
pub use postgres_role_repository::PostgresRoleRepository;
