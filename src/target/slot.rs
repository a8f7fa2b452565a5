//! Field-like and property-like injection slots

use crate::registry::ArcService;
use std::{marker::PhantomData, sync::Arc};

/// Distinguishes how a slot is reached on its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// A plain `Option<Arc<C>>` member
    Field,
    /// A member behind a getter/setter pair
    Property
}

/// Typed access to a single slot of `T`
pub(crate) trait Slot<T> {
    /// Checks whether the slot currently holds a value
    fn is_set(&self, target: &mut T) -> bool;

    /// Stores `service` into the slot. Returns `false` if it has an unexpected type.
    fn assign(&self, target: &mut T, service: &ArcService) -> bool;

    /// Resets the slot to unset
    fn clear(&self, target: &mut T);
}

pub(crate) struct FieldSlot<C: ?Sized, F> {
    access: F,
    _contract: PhantomData<fn() -> Arc<C>>
}

impl<C: ?Sized, F> FieldSlot<C, F> {
    #[inline]
    pub(crate) fn new<T>(access: F) -> Self
    where
        F: Fn(&mut T) -> &mut Option<Arc<C>>
    {
        Self { access, _contract: PhantomData }
    }
}

impl<T, C, F> Slot<T> for FieldSlot<C, F>
where
    C: ?Sized + Send + Sync + 'static,
    F: Fn(&mut T) -> &mut Option<Arc<C>>
{
    #[inline]
    fn is_set(&self, target: &mut T) -> bool {
        (self.access)(target).is_some()
    }

    #[inline]
    fn assign(&self, target: &mut T, service: &ArcService) -> bool {
        match service.downcast_ref::<Arc<C>>() {
            Some(instance) => {
                *(self.access)(target) = Some(instance.clone());
                true
            },
            None => false
        }
    }

    #[inline]
    fn clear(&self, target: &mut T) {
        *(self.access)(target) = None;
    }
}

pub(crate) struct PropertySlot<C: ?Sized, G, S> {
    get: G,
    set: S,
    _contract: PhantomData<fn() -> Arc<C>>
}

impl<C: ?Sized, G, S> PropertySlot<C, G, S> {
    #[inline]
    pub(crate) fn new<T>(get: G, set: S) -> Self
    where
        G: Fn(&T) -> Option<Arc<C>>,
        S: Fn(&mut T, Option<Arc<C>>)
    {
        Self { get, set, _contract: PhantomData }
    }
}

impl<T, C, G, S> Slot<T> for PropertySlot<C, G, S>
where
    C: ?Sized + Send + Sync + 'static,
    G: Fn(&T) -> Option<Arc<C>>,
    S: Fn(&mut T, Option<Arc<C>>)
{
    #[inline]
    fn is_set(&self, target: &mut T) -> bool {
        (self.get)(&*target).is_some()
    }

    #[inline]
    fn assign(&self, target: &mut T, service: &ArcService) -> bool {
        match service.downcast_ref::<Arc<C>>() {
            Some(instance) => {
                (self.set)(target, Some(instance.clone()));
                true
            },
            None => false
        }
    }

    #[inline]
    fn clear(&self, target: &mut T) {
        (self.set)(target, None);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::registry::ArcService;
    use super::{FieldSlot, PropertySlot, Slot};

    struct Config(u32);

    #[derive(Default)]
    struct Holder {
        config: Option<Arc<Config>>,
        hidden: Option<Arc<Config>>
    }

    impl Holder {
        fn hidden(&self) -> Option<Arc<Config>> {
            self.hidden.clone()
        }

        fn set_hidden(&mut self, value: Option<Arc<Config>>) {
            self.hidden = value;
        }
    }

    fn config(value: u32) -> ArcService {
        Arc::new(Arc::new(Config(value)))
    }

    #[test]
    fn it_assigns_and_clears_field() {
        let slot = FieldSlot::new(|h: &mut Holder| &mut h.config);
        let mut holder = Holder::default();

        assert!(!slot.is_set(&mut holder));
        assert!(slot.assign(&mut holder, &config(7)));
        assert!(slot.is_set(&mut holder));
        assert_eq!(holder.config.as_ref().unwrap().0, 7);

        slot.clear(&mut holder);

        assert!(holder.config.is_none());
    }

    #[test]
    fn it_assigns_and_clears_property() {
        let slot = PropertySlot::new(Holder::hidden, Holder::set_hidden);
        let mut holder = Holder::default();

        assert!(slot.assign(&mut holder, &config(3)));
        assert!(slot.is_set(&mut holder));
        assert_eq!(holder.hidden().unwrap().0, 3);

        slot.clear(&mut holder);

        assert!(!slot.is_set(&mut holder));
    }

    #[test]
    fn it_refuses_service_of_another_type() {
        let slot = FieldSlot::new(|h: &mut Holder| &mut h.config);
        let mut holder = Holder::default();
        let other: ArcService = Arc::new(Arc::new(String::from("nope")));

        assert!(!slot.assign(&mut holder, &other));
        assert!(holder.config.is_none());
    }
}
