use indexmap::IndexMap;
use num_bigint::BigUint;
use num_traits::ToPrimitive;

/// A satisfying assignment: variable name → nonnegative integer value, in
/// the declaration order of the [`LinearSystem`](crate::LinearSystem) that
/// produced it.
///
/// Values are stored as [`BigUint`] so that variables of any declared width
/// are represented exactly; [`Model::get_u128`] is a convenience accessor
/// for the common case of widths that fit in a native integer.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Model {
    values: IndexMap<String, BigUint>,
}

impl Model {
    pub(crate) fn new() -> Self {
        Self { values: IndexMap::new() }
    }

    pub(crate) fn insert(&mut self, name: String, value: BigUint) {
        self.values.insert(name, value);
    }

    /// The value assigned to `name`, or `None` if `name` was not declared in
    /// the system this model was produced from.
    pub fn get(&self, name: &str) -> Option<&BigUint> {
        self.values.get(name)
    }

    /// [`Self::get`], converted to `u128`. Returns `None` if the value does
    /// not fit (i.e. the variable's width exceeds 128 bits).
    pub fn get_u128(&self, name: &str) -> Option<u128> {
        self.values.get(name).and_then(BigUint::to_u128)
    }

    /// Iterate over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BigUint)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The number of variables this model assigns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` iff this model assigns no variables (only possible for a
    /// system with zero declared variables).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
