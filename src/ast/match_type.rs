/// What an expression's match yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchType {
    /// The nodes themselves
    #[default]
    Node,
    /// Node names
    Name,
    /// Node values
    Value,
    /// Number of matched nodes
    Count,
    /// Node positions as [`crate::tree::Dna`]
    Path,
}

impl MatchType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "node" => Some(MatchType::Node),
            "name" => Some(MatchType::Name),
            "value" => Some(MatchType::Value),
            "count" => Some(MatchType::Count),
            "path" => Some(MatchType::Path),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Node => "node",
            MatchType::Name => "name",
            MatchType::Value => "value",
            MatchType::Count => "count",
            MatchType::Path => "path",
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
