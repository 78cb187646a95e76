// HTTP gateway front for the offline worker.

pub mod handler;
