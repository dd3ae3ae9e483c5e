#![allow(dead_code)]

pub mod frame_server;

pub use frame_server::{FrameServer, dead_addr, wait_until};
