pub mod fs_vault;
pub mod library;
pub mod naming;
