//! # Wireup
//!
//! > Small provider/inject container that wires runtime component instances together
//! > without them knowing about each other's construction.
//!
//! ## Features
//! * Providers and injection points declared once per type with typed closures
//! * Field-like, property-like and method-like injection points
//! * Trait object contracts such as `dyn Clock`
//! * Duplicate detection and specific diagnostics for every failure
//! * Teardown and re-setup
//!
//! ## Example
//! ```toml
//! [dependencies]
//! wireup = "0.1.0"
//! ```
//! ```
//! use std::sync::Arc;
//! use wireup::{Declarations, DynTarget, Injector, Target};
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct SystemClock;
//!
//! impl Clock for SystemClock {
//!     fn now(&self) -> u64 { 42 }
//! }
//!
//! struct Services;
//!
//! impl Target for Services {
//!     fn declare(decl: &mut Declarations<Self>) {
//!         decl.provide("clock", |_| -> Arc<dyn Clock> { Arc::new(SystemClock) });
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Scheduler {
//!     clock: Option<Arc<dyn Clock>>
//! }
//!
//! impl Target for Scheduler {
//!     fn declare(decl: &mut Declarations<Self>) {
//!         decl.field("clock", |s| &mut s.clock);
//!     }
//! }
//!
//! let targets: Vec<Box<dyn DynTarget>> = vec![
//!     Box::new(Scheduler::default()),
//!     Box::new(Services)
//! ];
//! let mut injector = Injector::new(targets);
//! injector.setup().unwrap();
//!
//! let scheduler = injector.collector()[0].downcast_ref::<Scheduler>().unwrap();
//! assert_eq!(scheduler.clock.as_ref().unwrap().now(), 42);
//! ```

#![forbid(unsafe_code)]
#![deny(unreachable_pub)]

pub mod error;
pub mod registry;
pub mod target;
pub mod collector;
pub mod config;
pub mod injector;
mod contract;

pub use crate::{
    collector::TargetCollector,
    config::InjectorConfig,
    contract::ContractId,
    error::{Error, Missing},
    injector::{CycleSummary, Injector, SetupState},
    registry::{Registry, Source},
    target::{Declarations, DynTarget, InjectArgs, InjectFn, SlotKind, Target}
};
