//! Targets and their provider and injection declarations

use crate::{
    ContractId,
    error::{Error, Missing},
    registry::{ArcService, Registry, TypeIdHasher}
};
use self::slot::{FieldSlot, PropertySlot, Slot};
use smallvec::SmallVec;
use std::{
    any::{Any, TypeId, type_name},
    cell::RefCell,
    collections::HashMap,
    hash::BuildHasherDefault,
    rc::Rc,
    sync::Arc
};

pub use self::{
    method::{InjectArgs, InjectFn},
    slot::SlotKind
};

pub mod method;
mod slot;

type DeclarationMap = HashMap<
    TypeId,
    Rc<dyn Any>,
    BuildHasherDefault<TypeIdHasher>
>;

thread_local! {
    /// Declarations built so far, one per target type
    static DECLARATIONS: RefCell<DeclarationMap> = RefCell::default();
}

/// A component instance managed by the [`Injector`](crate::Injector).
///
/// Instead of marking members with attributes, a target describes its providers
/// and injection points once per type in [`Target::declare`].
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use wireup::{Declarations, Target};
///
/// struct Clock(u64);
///
/// struct ClockProvider;
///
/// impl Target for ClockProvider {
///     fn declare(decl: &mut Declarations<Self>) {
///         decl.provide("clock", |_| Arc::new(Clock(1)));
///     }
/// }
///
/// #[derive(Default)]
/// struct Scheduler {
///     clock: Option<Arc<Clock>>
/// }
///
/// impl Target for Scheduler {
///     fn declare(decl: &mut Declarations<Self>) {
///         decl.field("clock", |s| &mut s.clock);
///     }
/// }
/// ```
pub trait Target: Any + Sized {
    /// Declares the providers and injection points of `Self`
    fn declare(decl: &mut Declarations<Self>);
}

/// Object-safe view of a [`Target`], as handed out by a [`TargetCollector`](crate::TargetCollector).
///
/// Implemented for every [`Target`]; there is no need to implement it manually.
pub trait DynTarget: Any {
    /// Type name of the target, used in diagnostics
    fn type_name(&self) -> &'static str;

    /// Contracts this target declares providers for, without invoking them
    fn provided_contracts(&self) -> SmallVec<[ContractId; 4]>;

    /// Returns `true` if the target declares at least one injection point
    fn is_injectable(&self) -> bool;

    /// Invokes every provider and registers the results. Returns the number of registered contracts.
    fn register_providers(&self, registry: &mut Registry) -> Result<usize, Error>;

    /// Fills unset slots and calls injection methods. Returns the number of applied injection points.
    fn inject(&mut self, registry: &Registry) -> Result<usize, Error>;

    /// Lists unset slots whose contract is not available
    fn missing(&mut self, is_available: &dyn Fn(&ContractId) -> bool) -> Vec<Missing>;

    /// Resets every slot to unset
    fn teardown(&mut self);
}

impl dyn DynTarget {
    /// Returns `true` if the target is of type `T`
    #[inline]
    pub fn is<T: Target>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    /// Returns a reference to the concrete target if it is of type `T`
    #[inline]
    pub fn downcast_ref<T: Target>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Returns a mutable reference to the concrete target if it is of type `T`
    #[inline]
    pub fn downcast_mut<T: Target>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}

impl<T: Target> DynTarget for T {
    #[inline]
    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn provided_contracts(&self) -> SmallVec<[ContractId; 4]> {
        Declarations::<T>::cached()
            .providers
            .iter()
            .map(|provider| provider.contract)
            .collect()
    }

    #[inline]
    fn is_injectable(&self) -> bool {
        Declarations::<T>::cached().is_injectable()
    }

    #[inline]
    fn register_providers(&self, registry: &mut Registry) -> Result<usize, Error> {
        Declarations::<T>::cached().register_providers(self, registry)
    }

    #[inline]
    fn inject(&mut self, registry: &Registry) -> Result<usize, Error> {
        Declarations::<T>::cached().inject(self, registry)
    }

    #[inline]
    fn missing(&mut self, is_available: &dyn Fn(&ContractId) -> bool) -> Vec<Missing> {
        Declarations::<T>::cached().missing(self, is_available)
    }

    #[inline]
    fn teardown(&mut self) {
        Declarations::<T>::cached().teardown(self)
    }
}

struct ProviderDecl<T> {
    method: &'static str,
    contract: ContractId,
    call: Box<dyn Fn(&T) -> Option<ArcService>>
}

struct SlotDecl<T> {
    name: &'static str,
    kind: SlotKind,
    contract: ContractId,
    access: Box<dyn Slot<T>>
}

struct MethodDecl<T> {
    name: &'static str,
    params: SmallVec<[ContractId; 4]>,
    invoke: Box<dyn Fn(&mut T, &[ArcService]) -> bool>
}

/// Provider declarations and injection points of a target type `T`
pub struct Declarations<T> {
    providers: Vec<ProviderDecl<T>>,
    slots: Vec<SlotDecl<T>>,
    methods: Vec<MethodDecl<T>>
}

impl<T> std::fmt::Debug for Declarations<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Declarations")
            .field("target", &type_name::<T>())
            .field("providers", &self.providers.iter().map(|p| (p.method, p.contract)).collect::<Vec<_>>())
            .field("slots", &self.slots.iter().map(|s| (s.name, s.kind, s.contract)).collect::<Vec<_>>())
            .field("methods", &self.methods.iter().map(|m| (m.name, &m.params)).collect::<Vec<_>>())
            .finish()
    }
}

impl<T: Target> Declarations<T> {
    /// Collects the declarations of `T`
    #[inline]
    pub fn of() -> Self {
        let mut decl = Self {
            providers: Vec::new(),
            slots: Vec::new(),
            methods: Vec::new()
        };
        T::declare(&mut decl);
        decl
    }

    /// Returns the declarations of `T`, running [`Target::declare`] only once per type and thread
    pub(crate) fn cached() -> Rc<Self> {
        let id = TypeId::of::<T>();
        let cached = DECLARATIONS
            .with_borrow(|map| map.get(&id).cloned())
            .and_then(|decl| decl.downcast::<Self>().ok());
        if let Some(decl) = cached {
            return decl;
        }

        // built outside of the borrow, so `declare` may look up other types
        let decl = Rc::new(Self::of());
        DECLARATIONS.with_borrow_mut(|map| {
            map.insert(id, decl.clone() as Rc<dyn Any>);
        });

        #[cfg(feature = "tracing")]
        tracing::trace!("declarations of {} cached", type_name::<T>());
        decl
    }
}

impl<T: 'static> Declarations<T> {
    /// Declares a provider of contract `C`.
    ///
    /// Providers run before any injection of the same cycle and never have
    /// their own target's injection points resolved first,
    /// so a provider must not rely on injected members.
    pub fn provide<C, F>(&mut self, method: &'static str, provider: F) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&T) -> Arc<C> + 'static
    {
        self.try_provide(method, move |target: &T| Some(provider(target)))
    }

    /// Declares a provider of contract `C` that may produce nothing.
    ///
    /// Returning `None` fails the setup cycle with [`Error::NullProviderResult`].
    pub fn try_provide<C, F>(&mut self, method: &'static str, provider: F) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&T) -> Option<Arc<C>> + 'static
    {
        let call = move |target: &T| provider(target)
            .map(|instance| Arc::new(instance) as ArcService);
        self.providers.push(ProviderDecl {
            method,
            contract: ContractId::of::<C>(),
            call: Box::new(call)
        });
        self
    }

    /// Declares a field-like injection point reached through `access`
    pub fn field<C, F>(&mut self, name: &'static str, access: F) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&mut T) -> &mut Option<Arc<C>> + 'static
    {
        self.slots.push(SlotDecl {
            name,
            kind: SlotKind::Field,
            contract: ContractId::of::<C>(),
            access: Box::new(FieldSlot::<C, F>::new::<T>(access))
        });
        self
    }

    /// Declares a property-like injection point behind a getter/setter pair
    pub fn property<C, G, S>(&mut self, name: &'static str, get: G, set: S) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        G: Fn(&T) -> Option<Arc<C>> + 'static,
        S: Fn(&mut T, Option<Arc<C>>) + 'static
    {
        self.slots.push(SlotDecl {
            name,
            kind: SlotKind::Property,
            contract: ContractId::of::<C>(),
            access: Box::new(PropertySlot::<C, G, S>::new::<T>(get, set))
        });
        self
    }

    /// Declares a method-like injection point.
    ///
    /// The method is called once per setup cycle with every parameter resolved.
    /// It takes `&mut T` followed by zero to five `Arc<C>` parameters;
    /// a method without parameters is called on every cycle.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use wireup::{Declarations, Target};
    ///
    /// struct Config;
    /// struct Logger;
    ///
    /// #[derive(Default)]
    /// struct Worker {
    ///     ready: bool
    /// }
    ///
    /// impl Target for Worker {
    ///     fn declare(decl: &mut Declarations<Self>) {
    ///         decl.method("configure", |w: &mut Worker, _config: Arc<Config>, _logger: Arc<Logger>| {
    ///             w.ready = true;
    ///         });
    ///     }
    /// }
    /// ```
    pub fn method<Args, F>(&mut self, name: &'static str, method: F) -> &mut Self
    where
        Args: InjectArgs,
        F: InjectFn<T, Args>
    {
        let invoke = move |target: &mut T, services: &[ArcService]| {
            match Args::from_services(services) {
                Some(args) => {
                    method.call(target, args);
                    true
                },
                None => false
            }
        };
        self.methods.push(MethodDecl {
            name,
            params: Args::contracts(),
            invoke: Box::new(invoke)
        });
        self
    }

    /// Returns `true` if the target declares at least one injection point
    #[inline]
    pub fn is_injectable(&self) -> bool {
        !self.slots.is_empty() || !self.methods.is_empty()
    }

    pub(crate) fn register_providers(&self, target: &T, registry: &mut Registry) -> Result<usize, Error> {
        let owner = type_name::<T>();
        for provider in self.providers.iter() {
            let instance = (provider.call)(target);
            registry.register_from_provider(provider.contract, instance, owner, provider.method)?;

            #[cfg(feature = "tracing")]
            tracing::debug!("registered {} from {owner}::{}", provider.contract, provider.method);
        }
        Ok(self.providers.len())
    }

    pub(crate) fn inject(&self, target: &mut T, registry: &Registry) -> Result<usize, Error> {
        let owner = type_name::<T>();
        let mut applied = 0;

        for slot in self.slots.iter() {
            if slot.access.is_set(target) {
                #[cfg(feature = "tracing")]
                tracing::trace!("skipping {owner}::{}: already set", slot.name);
                continue;
            }

            let unresolved = || Error::UnresolvedDependency {
                owner,
                slot: slot.name,
                contract: slot.contract.name()
            };
            let service = registry
                .get(&slot.contract)
                .ok_or_else(unresolved)?;
            // entries are keyed by type, so a mismatch means nothing usable is registered
            if !slot.access.assign(target, service) {
                return Err(unresolved());
            }
            applied += 1;

            #[cfg(feature = "tracing")]
            tracing::debug!("injected {} into {owner}::{}", slot.contract, slot.name);
        }

        for method in self.methods.iter() {
            let mut services = SmallVec::<[ArcService; 4]>::new();
            let mut unresolved = Vec::new();
            for contract in method.params.iter() {
                match registry.get(contract) {
                    Some(service) => services.push(service.clone()),
                    None => unresolved.push(contract.name())
                }
            }

            if unresolved.is_empty() && (method.invoke)(target, services.as_slice()) {
                applied += 1;

                #[cfg(feature = "tracing")]
                tracing::debug!("invoked {owner}::{} with {} dependencies", method.name, services.len());
                continue;
            }

            if unresolved.is_empty() {
                unresolved.extend(method.params.iter().map(ContractId::name));
            }
            return Err(Error::UnresolvedMethodDependency {
                owner,
                method: method.name,
                contracts: unresolved
            });
        }

        Ok(applied)
    }

    pub(crate) fn missing(&self, target: &mut T, is_available: &dyn Fn(&ContractId) -> bool) -> Vec<Missing> {
        let owner = type_name::<T>();
        self.slots
            .iter()
            .filter(|slot| !is_available(&slot.contract) && !slot.access.is_set(target))
            .map(|slot| Missing {
                owner,
                slot: slot.name,
                contract: slot.contract.name()
            })
            .collect()
    }

    pub(crate) fn teardown(&self, target: &mut T) {
        for slot in self.slots.iter() {
            slot.access.clear(target);
        }
    }
}
