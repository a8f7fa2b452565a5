//! Generic arguments of method-like injection points

use crate::ContractId;
use smallvec::{SmallVec, smallvec};
use std::{any::Any, sync::Arc};

/// A tuple of `Arc<C>` arguments a method-like injection point requires.
///
/// Implemented for `()` and tuples of up to five `Arc<C>`.
pub trait InjectArgs: Sized + 'static {
    /// Contracts of every parameter, in declared order
    fn contracts() -> SmallVec<[ContractId; 4]>;

    /// Builds the tuple from resolved instances given in declared order.
    ///
    /// Returns `None` if an instance is missing or has an unexpected type.
    fn from_services(services: &[Arc<dyn Any + Send + Sync>]) -> Option<Self>;
}

/// A trait that describes a method which accepts resolved dependencies
pub trait InjectFn<T, Args>: 'static {
    /// Calls the method on `target` with resolved arguments
    fn call(&self, target: &mut T, args: Args);
}

impl InjectArgs for () {
    #[inline]
    fn contracts() -> SmallVec<[ContractId; 4]> {
        SmallVec::new()
    }

    #[inline]
    fn from_services(_: &[Arc<dyn Any + Send + Sync>]) -> Option<Self> {
        Some(())
    }
}

macro_rules! define_inject_args {
    ($($T: ident),*) => {
        impl<$($T: ?Sized + Send + Sync + 'static),+> InjectArgs for ($(Arc<$T>,)+) {
            #[inline]
            fn contracts() -> SmallVec<[ContractId; 4]> {
                smallvec![$(ContractId::of::<$T>()),+]
            }

            #[inline]
            fn from_services(services: &[Arc<dyn Any + Send + Sync>]) -> Option<Self> {
                let mut services = services.iter();
                let tuple = (
                    $(
                    services.next()?.downcast_ref::<Arc<$T>>()?.clone(),
                    )*
                );
                Some(tuple)
            }
        }
    }
}

define_inject_args! { T1 }
define_inject_args! { T1, T2 }
define_inject_args! { T1, T2, T3 }
define_inject_args! { T1, T2, T3, T4 }
define_inject_args! { T1, T2, T3, T4, T5 }

macro_rules! define_inject_fn ({ $($param:ident)* } => {
    impl<T, F, $($param: ?Sized,)*> InjectFn<T, ($(Arc<$param>,)*)> for F
    where
        F: Fn(&mut T, $(Arc<$param>),*) + 'static
    {
        #[inline]
        #[allow(non_snake_case)]
        fn call(&self, target: &mut T, ($($param,)*): ($(Arc<$param>,)*)) {
            (self)(target, $($param,)*)
        }
    }
});

define_inject_fn! {}
define_inject_fn! { T1 }
define_inject_fn! { T1 T2 }
define_inject_fn! { T1 T2 T3 }
define_inject_fn! { T1 T2 T3 T4 }
define_inject_fn! { T1 T2 T3 T4 T5 }

#[cfg(test)]
mod tests {
    use std::{any::Any, sync::Arc};
    use crate::ContractId;
    use super::{InjectArgs, InjectFn};

    #[derive(Debug, PartialEq)]
    struct Config(u32);

    #[derive(Debug, PartialEq)]
    struct Logger(&'static str);

    #[derive(Default)]
    struct Sink {
        seen: Vec<String>
    }

    fn service<T: Send + Sync + 'static>(value: T) -> Arc<dyn Any + Send + Sync> {
        Arc::new(Arc::new(value))
    }

    fn call<Args, F: InjectFn<Sink, Args>>(sink: &mut Sink, f: F, args: Args) {
        f.call(sink, args);
    }

    #[test]
    fn it_lists_contracts_in_parameter_order() {
        let contracts = <(Arc<Config>, Arc<Logger>)>::contracts();

        assert_eq!(contracts.as_slice(), &[ContractId::of::<Config>(), ContractId::of::<Logger>()]);
    }

    #[test]
    fn it_builds_args_from_services() {
        let services = [service(Config(1)), service(Logger("main"))];

        let (config, logger) = <(Arc<Config>, Arc<Logger>)>::from_services(&services).unwrap();

        assert_eq!(*config, Config(1));
        assert_eq!(*logger, Logger("main"));
    }

    #[test]
    fn it_does_not_build_args_from_wrong_services() {
        let services = [service(Logger("main")), service(Config(1))];

        assert!(<(Arc<Config>, Arc<Logger>)>::from_services(&services).is_none());
        assert!(<(Arc<Config>, Arc<Logger>)>::from_services(&services[..1]).is_none());
    }

    #[test]
    fn it_builds_empty_args() {
        assert!(<()>::contracts().is_empty());
        assert_eq!(<()>::from_services(&[]), Some(()));
    }

    #[test]
    fn it_calls_method_without_args() {
        let mut sink = Sink::default();

        call(&mut sink, |s: &mut Sink| s.seen.push("reset".into()), ());

        assert_eq!(sink.seen, vec!["reset"]);
    }

    #[test]
    fn it_calls_method_with_args() {
        let mut sink = Sink::default();

        call(
            &mut sink,
            |s: &mut Sink, config: Arc<Config>, logger: Arc<Logger>| {
                s.seen.push(format!("{}:{}", config.0, logger.0));
            },
            (Arc::new(Config(2)), Arc::new(Logger("aux")))
        );

        assert_eq!(sink.seen, vec!["2:aux"]);
    }
}
