/// Query input: one identifier or an ordered list of them.
///
/// Every translator call echoes this shape in its result: `One` in gives
/// [`Shaped::One`] out, `Many` of length N gives [`Shaped::Many`] of length N,
/// in input order. A one-element `Many` stays a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ids {
    One(String),
    Many(Vec<String>),
}

impl Ids {
    pub fn len(&self) -> usize {
        match self {
            Ids::One(_) => 1,
            Ids::Many(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let (one, many) = match self {
            Ids::One(s) => (Some(s.as_str()), &[][..]),
            Ids::Many(v) => (None, v.as_slice()),
        };
        one.into_iter().chain(many.iter().map(|s| s.as_str()))
    }

    /// Apply `f` to every identifier, keeping the input shape.
    pub fn map<T>(&self, mut f: impl FnMut(&str) -> T) -> Shaped<T> {
        match self {
            Ids::One(s) => Shaped::One(f(s)),
            Ids::Many(v) => Shaped::Many(v.iter().map(|s| f(s)).collect()),
        }
    }
}

impl From<&str> for Ids {
    fn from(s: &str) -> Self {
        Ids::One(s.to_string())
    }
}

impl From<String> for Ids {
    fn from(s: String) -> Self {
        Ids::One(s)
    }
}

impl From<&String> for Ids {
    fn from(s: &String) -> Self {
        Ids::One(s.clone())
    }
}

impl From<Vec<String>> for Ids {
    fn from(v: Vec<String>) -> Self {
        Ids::Many(v)
    }
}

impl From<Vec<&str>> for Ids {
    fn from(v: Vec<&str>) -> Self {
        Ids::Many(v.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Ids {
    fn from(v: &[&str]) -> Self {
        Ids::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&[String]> for Ids {
    fn from(v: &[String]) -> Self {
        Ids::Many(v.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Ids {
    fn from(v: [&str; N]) -> Self {
        Ids::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

/// Output echoing the shape of an [`Ids`] input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shaped<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Shaped<T> {
    pub fn len(&self) -> usize {
        match self {
            Shaped::One(_) => 1,
            Shaped::Many(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Shaped::One(_))
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Shaped::One(x) => vec![x],
            Shaped::Many(v) => v,
        }
    }

    /// The scalar value, if this came from a scalar input.
    pub fn into_one(self) -> Option<T> {
        match self {
            Shaped::One(x) => Some(x),
            Shaped::Many(_) => None,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Shaped<U> {
        match self {
            Shaped::One(x) => Shaped::One(f(x)),
            Shaped::Many(v) => Shaped::Many(v.into_iter().map(f).collect()),
        }
    }
}

/// Result for a single input identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// `select_one` result.
    One(String),

    /// Full candidate list (`select_one == false`). Never empty, except for
    /// synonym lookups of genes without synonyms.
    All(Vec<String>),

    /// Nothing matched; carries the null id in effect for the call.
    Missing(Option<String>),
}

impl Translation {
    pub fn is_found(&self) -> bool {
        !matches!(self, Translation::Missing(_))
    }

    /// First translated value, or the null id for a miss.
    pub fn value(&self) -> Option<&str> {
        match self {
            Translation::One(s) => Some(s.as_str()),
            Translation::All(v) => v.first().map(|s| s.as_str()),
            Translation::Missing(null) => null.as_deref(),
        }
    }

    /// All translated values; empty for a miss.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Translation::One(s) => vec![s.as_str()],
            Translation::All(v) => v.iter().map(|s| s.as_str()).collect(),
            Translation::Missing(_) => Vec::new(),
        }
    }
}

impl Shaped<Translation> {
    /// Feed results into another query.
    ///
    /// Misses become empty identifiers, which never resolve, so a miss stays
    /// a miss at the same position. Multi-valued results contribute their
    /// first value.
    pub fn to_ids(&self) -> Ids {
        let pick = |t: &Translation| match t {
            Translation::Missing(_) => String::new(),
            found => found.value().unwrap_or_default().to_string(),
        };
        match self {
            Shaped::One(t) => Ids::One(pick(t)),
            Shaped::Many(v) => Ids::Many(v.iter().map(pick).collect()),
        }
    }
}
