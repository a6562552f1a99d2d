// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bounded concurrency gate for analyzer runs.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Caps the number of analyzer subprocesses running at the same time.
///
/// Cheap to clone; clones share the same slots. Capacity is fixed for the
/// lifetime of the limiter. Waiters are served in the order tokio's
/// semaphore grants permits.
#[derive(Debug, Clone)]
pub struct ProcessingLimiter {
	semaphore: Arc<Semaphore>,
	capacity: usize,
}

/// A held analyzer slot. The slot is returned when this is dropped.
#[derive(Debug)]
pub struct ProcessingPermit {
	_permit: OwnedSemaphorePermit,
}

impl ProcessingLimiter {
	/// Create a limiter with `capacity` slots. A capacity of zero would block
	/// every crash forever, so it is raised to one.
	pub fn new(capacity: usize) -> Self {
		let capacity = capacity.max(1);
		Self {
			semaphore: Arc::new(Semaphore::new(capacity)),
			capacity,
		}
	}

	/// Wait for a free slot.
	pub async fn acquire(&self) -> ProcessingPermit {
		// The semaphore is never closed, so acquiring cannot fail.
		let permit = match Arc::clone(&self.semaphore).acquire_owned().await {
			Ok(permit) => permit,
			Err(_) => unreachable!("processing limiter semaphore closed"),
		};
		ProcessingPermit { _permit: permit }
	}

	/// Take a slot only if one is free right now.
	pub fn try_acquire(&self) -> Option<ProcessingPermit> {
		Arc::clone(&self.semaphore)
			.try_acquire_owned()
			.ok()
			.map(|permit| ProcessingPermit { _permit: permit })
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Slots not currently held.
	pub fn available(&self) -> usize {
		self.semaphore.available_permits()
	}
}

impl Default for ProcessingLimiter {
	fn default() -> Self {
		Self::new(1)
	}
}
