//! Contract registry of a single setup cycle

use crate::{ContractId, error::Error};
use std::{
    any::Any,
    collections::{HashMap, HashSet},
    fmt::Debug,
    hash::{BuildHasherDefault, Hasher},
    sync::Arc
};

/// Type-erased instance. Always holds an `Arc<C>` for its contract `C`,
/// which keeps trait object contracts such as `dyn Clock` storable.
pub(crate) type ArcService = Arc<
    dyn Any
    + Send
    + Sync
>;

/// Where a registry entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Registered directly via [`Registry::register`]
    Manual,
    /// Produced by a provider declaration
    Provider {
        owner: &'static str,
        method: &'static str
    }
}

struct Entry {
    instance: ArcService,
    source: Source
}

impl Debug for Entry {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

type EntryMap = HashMap<
    ContractId,
    Entry,
    BuildHasherDefault<TypeIdHasher>
>;

/// Set of contracts hashed the same way as the registry
pub(crate) type ContractSet = HashSet<
    ContractId,
    BuildHasherDefault<TypeIdHasher>
>;

#[derive(Default)]
pub(crate) struct TypeIdHasher(u64);

impl Hasher for TypeIdHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[cold]
    fn write(&mut self, _: &[u8]) {
        unreachable!("TypeId calls write_u64");
    }

    #[inline]
    fn write_u64(&mut self, id: u64) {
        self.0 = id;
    }
}

/// Maps each contract to a single resolved instance.
///
/// A registry is created empty for every setup cycle and dropped when the cycle ends.
#[derive(Debug, Default)]
pub struct Registry {
    entries: EntryMap
}

impl Registry {
    /// Creates an empty registry
    #[inline]
    pub fn new() -> Self {
        Self { entries: EntryMap::default() }
    }

    /// Registers an instance of `T`, replacing whatever was registered for `T` before
    pub fn register<T: Send + Sync + 'static>(&mut self, instance: T) {
        self.register_shared(Arc::new(instance));
    }

    /// Registers a shared instance of `T`, replacing whatever was registered for `T` before.
    ///
    /// `T` may be a trait object, e.g. `Arc<dyn Clock>`.
    pub fn register_shared<T: ?Sized + Send + Sync + 'static>(&mut self, instance: Arc<T>) {
        let entry = Entry {
            instance: Arc::new(instance),
            source: Source::Manual
        };
        self.entries.insert(ContractId::of::<T>(), entry);
    }

    /// Registers the result of a provider declaration.
    ///
    /// Fails with [`Error::NullProviderResult`] when `instance` is `None`
    /// and with [`Error::DuplicateProvider`] when `contract` is already registered.
    pub(crate) fn register_from_provider(
        &mut self,
        contract: ContractId,
        instance: Option<ArcService>,
        owner: &'static str,
        method: &'static str
    ) -> Result<(), Error> {
        let Some(instance) = instance else {
            return Err(Error::NullProviderResult { owner, method, contract: contract.name() });
        };
        if self.entries.contains_key(&contract) {
            return Err(Error::DuplicateProvider { owner, method, contract: contract.name() });
        }

        let source = Source::Provider { owner, method };
        self.entries.insert(contract, Entry { instance, source });
        Ok(())
    }

    /// Copies every entry of `other` into this registry, overwriting existing ones
    pub(crate) fn overlay(&mut self, other: &Registry) {
        for (contract, entry) in other.entries.iter() {
            let entry = Entry {
                instance: entry.instance.clone(),
                source: entry.source
            };
            self.entries.insert(*contract, entry);
        }
    }

    /// Returns the type-erased instance registered for `contract`
    #[inline]
    pub(crate) fn get(&self, contract: &ContractId) -> Option<&ArcService> {
        self.entries
            .get(contract)
            .map(|entry| &entry.instance)
    }

    /// Resolves the instance registered for `T`, or `None` if there is none
    #[inline]
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.get(&ContractId::of::<T>())
            .and_then(|service| service.downcast_ref::<Arc<T>>())
            .cloned()
    }

    /// Checks whether anything is registered for `contract`
    #[inline]
    pub fn contains(&self, contract: &ContractId) -> bool {
        self.entries.contains_key(contract)
    }

    /// Returns where the entry for `contract` came from
    #[inline]
    pub fn source(&self, contract: &ContractId) -> Option<Source> {
        self.entries
            .get(contract)
            .map(|entry| entry.source)
    }

    /// Iterates over every registered contract, in no particular order
    #[inline]
    pub fn contracts(&self) -> impl Iterator<Item = ContractId> + '_ {
        self.entries.keys().copied()
    }

    /// Returns the number of registered contracts
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
