//! Document store adapters

pub mod memory;
pub mod protocol;
pub mod remote;

pub use memory::MemoryDirectory;
pub use remote::RemoteDirectory;
