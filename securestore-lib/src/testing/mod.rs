//! Testing utilities for secure storage clients.
//!
//! This module provides in-process implementations of [`RemoteChannel`]
//! so the client can be exercised without a host runtime:
//!
//! - [`RecordingChannel`]: records every invocation and answers from a script
//! - [`MemoryHost`]: a fake host that keeps entries in a map
//!
//! Neither encrypts anything. Use them in tests and demos only.
//!
//! # Usage
//!
//! ```rust
//! use securestore_lib::testing::RecordingChannel;
//! use securestore_lib::SecureStorage;
//!
//! # tokio_test_block_on(async {
//! let channel = RecordingChannel::new();
//! let storage = SecureStorage::new(channel.clone());
//!
//! storage.set("token", "abc123").await.unwrap();
//! assert_eq!(channel.invocation_count(), 1);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```
//!
//! [`RemoteChannel`]: crate::channel::RemoteChannel

mod memory_host;
mod recording;

pub use memory_host::MemoryHost;
pub use recording::{Invocation, RecordingChannel};
