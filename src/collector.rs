//! Source of the targets taking part in a setup cycle

use crate::DynTarget;

/// Produces the current sequence of targets on demand.
///
/// How the targets are gathered (a scene graph, a static registry, a test fixture)
/// is up to the implementor. The order only matters for which error is reported first.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use wireup::{Declarations, DynTarget, Target, TargetCollector};
///
/// struct Config;
///
/// struct Settings;
///
/// impl Target for Settings {
///     fn declare(decl: &mut Declarations<Self>) {
///         decl.provide("config", |_| Arc::new(Config));
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
/// struct Scene {
///     settings: Settings,
///     service: Service
/// }
///
/// impl TargetCollector for Scene {
///     fn collect(&mut self) -> Vec<&mut dyn DynTarget> {
///         vec![&mut self.settings, &mut self.service]
///     }
/// }
/// ```
pub trait TargetCollector {
    /// Returns every target of the current cycle, in scan order
    fn collect(&mut self) -> Vec<&mut dyn DynTarget>;
}

impl TargetCollector for Vec<Box<dyn DynTarget>> {
    #[inline]
    fn collect(&mut self) -> Vec<&mut dyn DynTarget> {
        self.iter_mut()
            .map(|target| target.as_mut())
            .collect()
    }
}

impl<C: TargetCollector + ?Sized> TargetCollector for &mut C {
    #[inline]
    fn collect(&mut self) -> Vec<&mut dyn DynTarget> {
        (**self).collect()
    }
}
