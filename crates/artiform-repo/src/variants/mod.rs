//! Repository variants, one module per class

pub mod local;
pub mod remote;
pub mod virtual_repo;
