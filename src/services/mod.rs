pub mod speech;
pub mod storage;
pub mod transport;
