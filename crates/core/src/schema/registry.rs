// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Process-wide cache of type descriptors.
//!
//! Descriptors are keyed by `TypeId` and built on first use. Two tasks
//! resolving the same type concurrently may both build a descriptor; the
//! first insert wins and every caller receives that instance.

use std::{
	any::{Any, TypeId},
	sync::Arc,
};

use dashmap::DashMap;
use tracing::{debug, instrument};

use super::{descriptor::TypeDescriptor, field::Record};
use crate::Result;

type Entry = Arc<dyn Any + Send + Sync>;

#[derive(Clone, Default)]
pub struct TypeRegistry(Arc<TypeRegistryInner>);

#[derive(Default)]
pub struct TypeRegistryInner {
	cache: DashMap<TypeId, Entry>,
}

impl std::ops::Deref for TypeRegistry {
	type Target = TypeRegistryInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl TypeRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the descriptor of `R`, building it on first use.
	///
	/// A schema that fails validation is not cached; the error is returned
	/// again on the next call.
	#[instrument(name = "registry::resolve", level = "trace", skip(self), fields(record = std::any::type_name::<R>()))]
	pub fn resolve<R: Record>(&self) -> Result<Arc<TypeDescriptor<R>>> {
		let key = TypeId::of::<R>();

		if let Some(entry) = self.cache.get(&key) {
			if let Some(descriptor) = downcast::<R>(entry.value()) {
				return Ok(descriptor);
			}
		}

		// Built outside the shard lock; a concurrent builder may win the insert.
		let built = Arc::new(TypeDescriptor::<R>::build()?);
		let entry = self.cache.entry(key).or_insert_with(|| built.clone() as Entry).value().clone();

		let descriptor = downcast::<R>(&entry).unwrap_or(built);
		debug!(table = descriptor.table(), columns = descriptor.columns().len(), "descriptor registered");
		Ok(descriptor)
	}

	pub fn contains<R: Record>(&self) -> bool {
		self.cache.contains_key(&TypeId::of::<R>())
	}

	pub fn len(&self) -> usize {
		self.cache.len()
	}

	pub fn is_empty(&self) -> bool {
		self.cache.is_empty()
	}
}

fn downcast<R: Record>(entry: &Entry) -> Option<Arc<TypeDescriptor<R>>> {
	entry.clone().downcast::<TypeDescriptor<R>>().ok()
}

#[cfg(test)]
mod tests {
	use std::thread;

	use super::*;
	use crate::{
		Error,
		schema::{Field, RecordSchema},
	};

	struct Person {
		name: String,
		age: i32,
	}

	impl Record for Person {
		fn schema() -> RecordSchema<Self> {
			RecordSchema::new()
				.field(Field::new("name", |p: &Person| &p.name).distinct())
				.field(Field::new("age", |p: &Person| &p.age))
		}
	}

	struct Order {
		id: i64,
	}

	impl Record for Order {
		fn schema() -> RecordSchema<Self> {
			RecordSchema::new().table("orders").field(Field::new("id", |o: &Order| &o.id))
		}
	}

	struct Broken;

	impl Record for Broken {
		fn schema() -> RecordSchema<Self> {
			RecordSchema::new()
		}
	}

	#[test]
	fn test_resolve_is_cached() {
		let registry = TypeRegistry::new();
		assert!(!registry.contains::<Person>());

		let first = registry.resolve::<Person>().unwrap();
		let second = registry.resolve::<Person>().unwrap();

		assert!(Arc::ptr_eq(&first, &second));
		assert!(registry.contains::<Person>());
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn test_types_are_kept_apart() {
		let registry = TypeRegistry::new();
		assert_eq!(registry.resolve::<Person>().unwrap().table(), "Person");
		assert_eq!(registry.resolve::<Order>().unwrap().table(), "orders");
		assert_eq!(registry.len(), 2);
	}

	#[test]
	fn test_invalid_schema_is_not_cached() {
		let registry = TypeRegistry::new();
		assert!(matches!(registry.resolve::<Broken>(), Err(Error::EmptySchema { .. })));
		assert!(registry.is_empty());
	}

	#[test]
	fn test_clones_share_cache() {
		let registry = TypeRegistry::new();
		let clone = registry.clone();
		let first = clone.resolve::<Person>().unwrap();
		assert!(Arc::ptr_eq(&first, &registry.resolve::<Person>().unwrap()));
	}

	#[test]
	fn test_concurrent_first_use() {
		let registry = TypeRegistry::new();

		let handles: Vec<_> = (0..8)
			.map(|_| {
				let registry = registry.clone();
				thread::spawn(move || registry.resolve::<Person>().unwrap())
			})
			.collect();

		let descriptors: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
		for descriptor in &descriptors[1..] {
			assert!(Arc::ptr_eq(&descriptors[0], descriptor));
		}
		assert_eq!(registry.len(), 1);
	}
}
