//! Persistence conventions.
//!
//! A convention binds an id type to the converter that maps it onto its
//! stored (provider) value and the comparer used for equality, hashing and
//! snapshotting. Generated code implements [`ValueConverter`] and
//! [`ValueComparer`]; applications collect the bindings in a
//! [`ConventionRegistry`].

use std::any::{type_name, TypeId};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use thiserror::Error;

/// Maps a model value to and from its stored representation.
pub trait ValueConverter {
    /// The id type.
    type Model;
    /// The value actually stored.
    type Provider;

    fn to_provider(&self, model: &Self::Model) -> Self::Provider;

    fn from_provider(&self, provider: Self::Provider) -> Self::Model;
}

/// Equality, hashing and snapshotting of stored values.
///
/// Ids are immutable values, so the defaults compare with `Eq`, hash with
/// `Hash` and snapshot by copy.
pub trait ValueComparer {
    type Value: Copy + Eq + Hash;

    fn equals(&self, left: &Self::Value, right: &Self::Value) -> bool {
        left == right
    }

    fn hash_code(&self, value: &Self::Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn snapshot(&self, value: &Self::Value) -> Self::Value {
        *value
    }
}

/// Errors raised by [`ConventionRegistry`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A convention for the model type is already registered.
    #[error("a convention for `{model}` is already registered")]
    Duplicate { model: &'static str },
}

/// One registered binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Convention {
    pub model: &'static str,
    pub provider: &'static str,
    pub converter: &'static str,
    pub comparer: &'static str,
    model_id: TypeId,
}

impl Convention {
    /// Describe the binding of `C` and `K`.
    pub fn of<C, K>() -> Self
    where
        C: ValueConverter + 'static,
        C::Model: 'static,
        K: ValueComparer<Value = C::Model> + 'static,
    {
        Self {
            model: type_name::<C::Model>(),
            provider: type_name::<C::Provider>(),
            converter: type_name::<C>(),
            comparer: type_name::<K>(),
            model_id: TypeId::of::<C::Model>(),
        }
    }

    pub fn model_id(&self) -> TypeId {
        self.model_id
    }

    /// Whether this convention binds `T`.
    pub fn is_for<T: 'static>(&self) -> bool {
        self.model_id == TypeId::of::<T>()
    }
}

/// Registration-ordered collection of conventions, at most one per model.
#[derive(Debug, Default, Clone)]
pub struct ConventionRegistry {
    conventions: Vec<Convention>,
    index: HashMap<TypeId, usize>,
}

impl ConventionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a convention. A model that is already registered keeps its
    /// first convention.
    pub fn register<C, K>(&mut self) -> &mut Self
    where
        C: ValueConverter + 'static,
        C::Model: 'static,
        K: ValueComparer<Value = C::Model> + 'static,
    {
        if !self.contains::<C::Model>() {
            self.insert(Convention::of::<C, K>());
        }
        self
    }

    /// Register a convention, failing if the model is already registered.
    pub fn try_register<C, K>(&mut self) -> Result<&Convention, RegistryError>
    where
        C: ValueConverter + 'static,
        C::Model: 'static,
        K: ValueComparer<Value = C::Model> + 'static,
    {
        let convention = Convention::of::<C, K>();
        if self.index.contains_key(&convention.model_id) {
            return Err(RegistryError::Duplicate {
                model: convention.model,
            });
        }
        let position = self.insert(convention);
        Ok(&self.conventions[position])
    }

    fn insert(&mut self, convention: Convention) -> usize {
        let position = self.conventions.len();
        self.index.insert(convention.model_id, position);
        self.conventions.push(convention);
        position
    }

    /// The convention registered for `T`.
    pub fn get<T: 'static>(&self) -> Option<&Convention> {
        self.index
            .get(&TypeId::of::<T>())
            .and_then(|&position| self.conventions.get(position))
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.index.contains_key(&TypeId::of::<T>())
    }

    /// Conventions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Convention> {
        self.conventions.iter()
    }

    pub fn len(&self) -> usize {
        self.conventions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conventions.is_empty()
    }
}

impl<'a> IntoIterator for &'a ConventionRegistry {
    type Item = &'a Convention;
    type IntoIter = std::slice::Iter<'a, Convention>;

    fn into_iter(self) -> Self::IntoIter {
        self.conventions.iter()
    }
}
