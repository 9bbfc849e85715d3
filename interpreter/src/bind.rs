use std::collections::HashMap;

/// Values for named symbols, as taken by [`crate::Expr::bind`].
pub type Bindings = HashMap<String, f64>;

pub trait IntoBindings {
    fn bindings(self) -> Bindings;
}

impl<N: Into<String>> IntoBindings for (N, f64) {
    fn bindings(self) -> Bindings {
        let (name, value) = self;
        let mut map = HashMap::new();
        map.insert(name.into(), value);
        map
    }
}

impl<N: Into<String> + Clone> IntoBindings for &[(N, f64)] {
    fn bindings(self) -> Bindings {
        self.iter()
            .map(|(name, value)| (name.clone().into(), *value))
            .collect()
    }
}

impl IntoBindings for Bindings {
    fn bindings(self) -> Bindings {
        self
    }
}

/// Parses `name=value`.
pub fn parse_binding(s: &str) -> Option<(String, f64)> {
    let (name, value) = s.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().parse().ok()?))
}
