// Engine orchestration: store generations, precache, lifecycle operations.

pub mod cache;
pub mod notify;
pub mod precache;
pub mod stats;
pub mod worker;
