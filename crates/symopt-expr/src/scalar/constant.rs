//! Constant scalars.

/// A real constant. Degree 0, references no variables.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct K(pub f64);

impl K {
    pub const ZERO: K = K(0.0);
    pub const ONE: K = K(1.0);

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for K {
    fn from(value: f64) -> Self {
        K(value)
    }
}

impl From<K> for f64 {
    fn from(value: K) -> Self {
        value.0
    }
}

impl std::fmt::Display for K {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::K;

    #[test]
    fn display_drops_trailing_zero() {
        assert_eq!(K(5.0).to_string(), "5");
        assert_eq!(K(-2.5).to_string(), "-2.5");
    }

    #[test]
    fn converts_from_and_to_f64() {
        let k: K = 3.0.into();
        assert_eq!(f64::from(k), 3.0);
    }
}
