//! Contract type identifiers

use std::{
    any::{TypeId, type_name},
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher}
};

/// Identifies an abstract dependency by its Rust type.
///
/// Two ids are equal when they were made from the same type. The type name
/// is only kept for diagnostics.
#[derive(Clone, Copy)]
pub struct ContractId {
    id: TypeId,
    name: &'static str
}

impl ContractId {
    /// Creates a contract id for `T`, which may be a trait object such as `dyn Clock`
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>()
        }
    }

    /// Returns the underlying [`TypeId`]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Returns the full type name of the contract
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ContractId {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ContractId {}

impl Hash for ContractId {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for ContractId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

impl Display for ContractId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}
