use std::borrow::Cow;

#[cfg(test)]
#[path = "./compare_tests.rs"]
mod tests;

/// How section names, keys and boolean keywords are compared.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub enum Comparison {
    /// Exact, byte-for-byte comparison.
    Ordinal,
    /// Case-insensitive for ASCII letters only.
    IgnoreAsciiCase,
    /// Case-insensitive using Unicode lowercase mapping.
    #[default]
    IgnoreCase,
}

impl Comparison {
    /// Compares two names under this policy.
    pub fn equals(self, a: &str, b: &str) -> bool {
        match self {
            Self::Ordinal => a == b,
            Self::IgnoreAsciiCase => a.eq_ignore_ascii_case(b),
            Self::IgnoreCase => a == b || self.fold(a) == self.fold(b),
        }
    }

    /// Maps `name` to a form where equal names under this policy are
    /// byte-identical, for use as a hash key.
    pub fn fold(self, name: &str) -> Cow<'_, str> {
        match self {
            Self::Ordinal => Cow::Borrowed(name),
            Self::IgnoreAsciiCase if !name.bytes().any(|b| b.is_ascii_uppercase()) => {
                Cow::Borrowed(name)
            }
            Self::IgnoreAsciiCase => Cow::Owned(name.to_ascii_lowercase()),
            Self::IgnoreCase => {
                let lower = name.to_lowercase();
                if lower == name {
                    Cow::Borrowed(name)
                } else {
                    Cow::Owned(lower)
                }
            }
        }
    }

    /// Returns `true` if this policy ignores letter case.
    pub fn is_case_insensitive(self) -> bool {
        !matches!(self, Self::Ordinal)
    }
}
