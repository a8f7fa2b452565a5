//! Configuration of an [`Injector`](crate::Injector)

/// Represents an injector configuration
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InjectorConfig {
    /// Specifies whether every field and property is checked for availability
    /// before any provider runs
    ///
    /// Default: `false`
    strict_validation: bool,
}

impl InjectorConfig {
    /// Creates a default injector configuration
    ///
    /// Defaults:
    /// - strict_validation: `false`
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the injector to validate all fields and properties up front.
    ///
    /// Contracts declared by providers and manually registered contracts count as available.
    /// Any miss fails the setup cycle with [`Error::InvalidDependencies`](crate::Error::InvalidDependencies)
    /// before a single provider is invoked.
    ///
    /// Default: `false`
    pub fn with_strict_validation(mut self) -> Self {
        self.strict_validation = true;
        self
    }

    /// Returns `true` if strict validation is enabled
    #[inline]
    pub fn strict_validation(&self) -> bool {
        self.strict_validation
    }
}
