//! Two-phase setup cycle over the targets of a collector

use crate::{
    ContractId, DynTarget, InjectorConfig, Registry, TargetCollector,
    error::{Error, Missing},
    registry::ContractSet
};
use std::{
    fmt::{Display, Formatter},
    sync::Arc
};

/// Progress of the current setup cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SetupState {
    /// No cycle has run, or the last one was torn down
    #[default]
    Idle,
    /// Every provider was invoked and registered, injection has not finished
    ProvidersRegistered,
    /// Every injection point was satisfied
    Injected,
    /// The last cycle stopped on an error
    Failed
}

/// Counts of the last successful setup cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummary {
    /// Number of collected targets
    pub targets: usize,
    /// Number of contracts registered by providers
    pub provided: usize,
    /// Number of contracts in the cycle registry, manual registrations included
    pub registered: usize,
    /// Number of applied injection points
    pub injected: usize
}

impl Display for CycleSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} targets, {} provided, {} registered, {} injected",
            self.targets, self.provided, self.registered, self.injected
        )
    }
}

/// Wires the targets of a [`TargetCollector`] together.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use wireup::{Declarations, DynTarget, Injector, SetupState, Target};
///
/// struct Config(&'static str);
///
/// struct Settings;
///
/// impl Target for Settings {
///     fn declare(decl: &mut Declarations<Self>) {
///         decl.provide("config", |_| Arc::new(Config("dev")));
///     }
/// }
///
/// #[derive(Default)]
/// struct Service {
///     config: Option<Arc<Config>>
/// }
///
/// impl Target for Service {
///     fn declare(decl: &mut Declarations<Self>) {
///         decl.field("config", |s| &mut s.config);
///     }
/// }
///
/// let targets: Vec<Box<dyn DynTarget>> = vec![
///     Box::new(Settings),
///     Box::new(Service::default())
/// ];
/// let mut injector = Injector::new(targets);
///
/// injector.setup().unwrap();
///
/// let service = injector.collector()[1].downcast_ref::<Service>().unwrap();
/// assert_eq!(service.config.as_ref().unwrap().0, "dev");
/// assert_eq!(injector.state(), SetupState::Injected);
/// ```
#[derive(Debug)]
pub struct Injector<C> {
    collector: C,
    overrides: Registry,
    config: InjectorConfig,
    state: SetupState,
    summary: Option<CycleSummary>
}

impl<C: TargetCollector> Injector<C> {
    /// Creates an injector over `collector` with the default configuration
    #[inline]
    pub fn new(collector: C) -> Self {
        Self::with_config(collector, InjectorConfig::default())
    }

    /// Creates an injector over `collector` with a specific configuration
    #[inline]
    pub fn with_config(collector: C, config: InjectorConfig) -> Self {
        Self {
            collector,
            overrides: Registry::new(),
            config,
            state: SetupState::Idle,
            summary: None
        }
    }

    /// Registers an instance of `T` for every following setup cycle.
    ///
    /// Manual registrations are applied after providers, so they replace
    /// a provided instance of the same contract. Re-registering replaces the previous one.
    ///
    /// The contract is the type of `instance` as given: passing an `Arc<Config>` registers
    /// the contract `Arc<Config>`, not `Config`. Use [`register_shared`](Self::register_shared)
    /// to register an instance that is already behind an `Arc`.
    pub fn register<T: Send + Sync + 'static>(&mut self, instance: T) -> &mut Self {
        self.overrides.register(instance);
        self
    }

    /// Registers a shared instance of `T` for every following setup cycle.
    ///
    /// `T` may be a trait object, e.g. `Arc<dyn Clock>`.
    pub fn register_shared<T: ?Sized + Send + Sync + 'static>(&mut self, instance: Arc<T>) -> &mut Self {
        self.overrides.register_shared(instance);
        self
    }

    /// Runs a setup cycle.
    ///
    /// Every provider of every target is invoked and registered first,
    /// then manual registrations are applied on top, then every injection point
    /// is resolved. The first error stops the cycle; injections applied
    /// before it stay in place.
    pub fn setup(&mut self) -> Result<(), Error> {
        self.state = SetupState::Idle;
        self.summary = None;
        match self.run_cycle() {
            Ok(summary) => {
                #[cfg(feature = "tracing")]
                tracing::info!("setup completed: {summary}");

                self.summary = Some(summary);
                Ok(())
            },
            Err(err) => {
                self.state = SetupState::Failed;

                #[cfg(feature = "tracing")]
                tracing::error!("setup failed: {err}");
                Err(err)
            }
        }
    }

    /// Lists every unset field or property whose contract no provider declares.
    ///
    /// Providers are not invoked and manual registrations are not taken into account.
    /// Nothing is mutated.
    pub fn validate(&mut self) -> Vec<Missing> {
        let mut targets = self.collector.collect();
        collect_missing(&mut targets, None)
    }

    /// Resets every field and property of every target to unset.
    ///
    /// Manual registrations are kept for the next cycle.
    pub fn teardown(&mut self) {
        for target in self.collector.collect() {
            target.teardown();
        }
        self.state = SetupState::Idle;
        self.summary = None;

        #[cfg(feature = "tracing")]
        tracing::debug!("injected members were reset");
    }

    /// Returns the state of the current setup cycle
    #[inline]
    pub fn state(&self) -> SetupState {
        self.state
    }

    /// Returns the counts of the last setup cycle, or `None` if it failed,
    /// was torn down or never ran
    #[inline]
    pub fn summary(&self) -> Option<&CycleSummary> {
        self.summary.as_ref()
    }

    /// Returns the configuration of this injector
    #[inline]
    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    /// Returns manual registrations applied on every setup cycle
    #[inline]
    pub fn registrations(&self) -> &Registry {
        &self.overrides
    }

    /// Returns a reference to the collector
    #[inline]
    pub fn collector(&self) -> &C {
        &self.collector
    }

    /// Returns a mutable reference to the collector
    #[inline]
    pub fn collector_mut(&mut self) -> &mut C {
        &mut self.collector
    }

    /// Consumes the injector and returns the collector
    #[inline]
    pub fn into_inner(self) -> C {
        self.collector
    }

    fn run_cycle(&mut self) -> Result<CycleSummary, Error> {
        let mut targets = self.collector.collect();

        if self.config.strict_validation() {
            let missing = collect_missing(&mut targets, Some(&self.overrides));
            if !missing.is_empty() {
                #[cfg(feature = "tracing")]
                for miss in missing.iter() {
                    tracing::warn!("{miss}");
                }
                return Err(Error::InvalidDependencies(missing));
            }
        }

        let mut registry = Registry::new();
        let mut provided = 0;
        for target in targets.iter() {
            provided += target.register_providers(&mut registry)?;
        }
        registry.overlay(&self.overrides);
        self.state = SetupState::ProvidersRegistered;

        let mut injected = 0;
        for target in targets.iter_mut() {
            if !target.is_injectable() {
                continue;
            }
            injected += target.inject(&registry)?;
        }
        self.state = SetupState::Injected;

        Ok(CycleSummary {
            targets: targets.len(),
            provided,
            registered: registry.len(),
            injected
        })
    }
}

/// Checks every target against contracts declared by providers,
/// and against `registrations` if given
fn collect_missing(targets: &mut [&mut dyn DynTarget], registrations: Option<&Registry>) -> Vec<Missing> {
    let mut provided = ContractSet::default();
    for target in targets.iter() {
        provided.extend(target.provided_contracts());
    }

    let is_available = |contract: &ContractId| {
        provided.contains(contract) || registrations.is_some_and(|r| r.contains(contract))
    };
    targets
        .iter_mut()
        .flat_map(|target| target.missing(&is_available))
        .collect()
}
