use std::fmt;

/// Named collections in the document store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Agents,
    Customers,
    Orders,
    Products,
    Territories,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Agents,
        Collection::Customers,
        Collection::Orders,
        Collection::Products,
        Collection::Territories,
    ];

    /// Path of the collection in the store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Collection::Agents => "agents",
            Collection::Customers => "customers",
            Collection::Orders => "orders",
            Collection::Products => "products",
            Collection::Territories => "territories",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Collection {
    type Error = crate::EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == value.trim())
            .ok_or_else(|| crate::EngineError::KeyNotFound(format!("collection {value}")))
    }
}
