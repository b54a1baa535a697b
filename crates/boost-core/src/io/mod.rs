//! IO modules - side effects (network, filesystem, processes)

pub mod download;
pub mod extract;
pub mod fs;
pub mod manifest;
