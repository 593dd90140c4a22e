pub mod entries;
#[cfg(test)]
pub mod memory;
pub mod pool;

pub use pool::create_pool;
