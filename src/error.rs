//! Describes dependency injection errors

use std::fmt::{Display, Formatter};

/// Errors raised by a setup cycle.
///
/// Every variant is fatal for the [`setup`](crate::Injector::setup) call that produced it.
/// Injections applied before the failure are not rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A second provider declared a contract that is already provided
    DuplicateProvider {
        owner: &'static str,
        method: &'static str,
        contract: &'static str
    },
    /// A provider returned nothing
    NullProviderResult {
        owner: &'static str,
        method: &'static str,
        contract: &'static str
    },
    /// A field or property contract is absent from the registry
    UnresolvedDependency {
        owner: &'static str,
        slot: &'static str,
        contract: &'static str
    },
    /// One or more method parameters are absent from the registry
    UnresolvedMethodDependency {
        owner: &'static str,
        method: &'static str,
        contracts: Vec<&'static str>
    },
    /// Strict pre-validation found unsatisfiable injection points
    InvalidDependencies(Vec<Missing>)
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DuplicateProvider { owner, method, contract } => write!(
                f,
                "Injection Error: provider method '{method}' in '{owner}' duplicates an already provided '{contract}'"
            ),
            Error::NullProviderResult { owner, method, contract } => write!(
                f,
                "Injection Error: provider method '{method}' in '{owner}' returned nothing when providing '{contract}'"
            ),
            Error::UnresolvedDependency { owner, slot, contract } => write!(
                f,
                "Injection Error: failed to inject '{contract}' into '{slot}' of '{owner}'"
            ),
            Error::UnresolvedMethodDependency { owner, method, contracts } => write!(
                f,
                "Injection Error: failed to inject method '{method}' of '{owner}', unresolved: {}",
                contracts.join(", ")
            ),
            Error::InvalidDependencies(missing) => {
                f.write_str("Injection Error: invalid dependency list: ")?;
                for (i, miss) in missing.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{miss}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {}

/// An injection point that no known provider can satisfy.
///
/// Returned by [`validate`](crate::Injector::validate), never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Missing {
    /// Type name of the target that owns the slot
    pub owner: &'static str,
    /// Name of the field or property
    pub slot: &'static str,
    /// Type name of the required contract
    pub contract: &'static str
}

impl Display for Missing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[Validation] {} is missing dependency {} for '{}'", self.owner, self.contract, self.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, Missing};

    #[test]
    fn it_lists_all_unresolved_method_contracts() {
        let err = Error::UnresolvedMethodDependency {
            owner: "S",
            method: "configure",
            contracts: vec!["Logger", "Clock"]
        };

        assert_eq!(
            err.to_string(),
            "Injection Error: failed to inject method 'configure' of 'S', unresolved: Logger, Clock"
        );
    }

    #[test]
    fn it_formats_unresolved_dependency() {
        let err = Error::UnresolvedDependency { owner: "R", slot: "config", contract: "Config" };

        assert_eq!(err.to_string(), "Injection Error: failed to inject 'Config' into 'config' of 'R'");
    }

    #[test]
    fn it_joins_validation_misses() {
        let err = Error::InvalidDependencies(vec![
            Missing { owner: "R", slot: "config", contract: "Config" },
            Missing { owner: "Q", slot: "clock", contract: "Clock" }
        ]);

        assert_eq!(
            err.to_string(),
            "Injection Error: invalid dependency list: \
            [Validation] R is missing dependency Config for 'config', \
            [Validation] Q is missing dependency Clock for 'clock'"
        );
    }
}
