use std::marker::PhantomData;

/// Opaque key into an [`Arena`]
pub trait ArenaId: Copy {
	fn from_index(index: usize) -> Self;
	fn index(self) -> usize;
}

/// Declares a copyable ID type referencing nodes of one kind
macro_rules! define_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
		pub struct $name {
			id: usize,
		}

		impl $crate::arena::ArenaId for $name {
			fn from_index(index: usize) -> Self {
				Self { id: index }
			}

			fn index(self) -> usize {
				self.id
			}
		}
	};
}

pub(crate) use define_id;

/// Append-only storage for AST nodes.
///
/// Nodes are never moved out or removed, so every ID handed out stays valid
/// for as long as the arena lives. Dropping the arena frees all nodes at once.
#[derive(Debug)]
pub struct Arena<I: ArenaId, T> {
	items: Vec<T>,
	_marker: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<I: ArenaId, T> Arena<I, T> {
	pub fn new() -> Self {
		Self {
			items: Vec::new(),
			_marker: PhantomData,
		}
	}

	/// Stores a node and returns its ID
	pub fn alloc(&mut self, item: T) -> I {
		let id = I::from_index(self.items.len());
		self.items.push(item);
		id
	}

	/// # Panics
	///
	/// Panics if the ID was not produced by this arena.
	pub fn get(&self, id: I) -> &T {
		&self.items[id.index()]
	}

	/// # Panics
	///
	/// Panics if the ID was not produced by this arena.
	pub fn get_mut(&mut self, id: I) -> &mut T {
		&mut self.items[id.index()]
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	define_id!(TestId);

	#[test]
	fn ids_are_stable() {
		let mut arena: Arena<TestId, String> = Arena::new();
		let a = arena.alloc("a".into());
		let b = arena.alloc("b".into());
		for i in 0..100 {
			arena.alloc(format!("filler{}", i));
		}

		assert_eq!(arena.get(a), "a");
		assert_eq!(arena.get(b), "b");
		assert_eq!(arena.len(), 102);
	}

	#[test]
	fn get_mut_updates_in_place() {
		let mut arena: Arena<TestId, Vec<u32>> = Arena::new();
		let id = arena.alloc(vec![]);
		arena.get_mut(id).push(4);
		arena.get_mut(id).push(2);
		assert_eq!(arena.get(id), &vec![4, 2]);
	}
}
