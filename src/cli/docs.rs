//! Documentation content for the p5x CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Iterators,
    Logicals,
    Groups,
    Types,
    Values,
    Regex,
    References,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "iterators" | "iterator" => Some(Self::Iterators),
            "logicals" | "logical" | "operators" | "ops" => Some(Self::Logicals),
            "groups" | "group" => Some(Self::Groups),
            "types" | "type" | "casts" => Some(Self::Types),
            "values" | "value" | "valued" => Some(Self::Values),
            "regex" | "regexes" => Some(Self::Regex),
            "references" | "reference" | "ref" => Some(Self::References),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"P5X DOCUMENTATION

p5x evaluates path-like expressions against node trees. Every node has a
name, an optional value and ordered children. An expression starts at a seed
node and pushes it through a pipeline of iterators separated by '/'.

DOCUMENTATION CATEGORIES

  syntax            Expression structure, quoting and escaping
  iterators         Every iterator and what it yields
  logicals          | & ^ ! and how results are combined
  groups            Nested ( ) groups and caching
  types             ?node ?name ?value ?count ?path and casts
  values            Matching on values, typed values
  regex             Name and value regexes and their flags
  references        # iterator and @ reference expressions

QUICK REFERENCE

  /*                All children
  /name             Nodes named 'name'
  /=value           Nodes whose value is 'value'
  /..               Root
  /**               Node and all descendants
  /a|/b             Union
  (/a|/b)           Nested group
  ?value            Return values

Run 'p5x doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_str(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Iterators) => Ok(ITERATORS_DOC),
        Some(DocCategory::Logicals) => Ok(LOGICALS_DOC),
        Some(DocCategory::Groups) => Ok(GROUPS_DOC),
        Some(DocCategory::Types) => Ok(TYPES_DOC),
        Some(DocCategory::Values) => Ok(VALUES_DOC),
        Some(DocCategory::Regex) => Ok(REGEX_DOC),
        Some(DocCategory::References) => Ok(REFERENCES_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Expression Structure

BASIC FORM
  /iterator/iterator/...?type

  An expression must start with '/' or '?'. The empty expression is valid
  and yields the seed node itself.

CONTROL CHARACTERS
  /   next iterator
  |   OR        &   AND        ^   XOR        !   NOT
  (   open group               )   close group
  ?   type declaration, must come last

  Whitespace around segments is ignored.

EMPTY NAMES
  A '/' followed directly by another '/', '?', '(', ')' or a logical
  selects nodes with an empty name:

    /*//         children, then nodes named ""
    /*/?name     same as /*/""?name

QUOTING
  Segments containing control characters must be quoted:

    /"a/b"                 node named a/b
    /"/^_/"                regex, see 'p5x doc regex'
    /@"line one
    line two"              multi-line literal, "" is a literal quote

  Escapes in "...": \" \' \\ \a \b \f \t \v \n \r \xHHHH

ESCAPING
  \name      named iterator, even if 'name' looks like another iterator
  =\:text    value iterator for text starting with ':'
"#;

const ITERATORS_DOC: &str = r#"ITERATORS - Pipeline Stages

Each iterator consumes the nodes produced by the one before it.

STRUCTURE
  *          all children
  **         the node itself, then all descendants, depth first
  .          parent
  ..         root of the first node
  ..name     nearest ancestor named 'name'
  n          child number n (zero based)
  <          previous node in document order
  >          next node in document order
  -  -n      previous sibling, n siblings back
  +  +n      next sibling, n siblings forward

FILTERS
  name       nodes named 'name'
  =value     nodes whose value equals 'value'
  %n         every n-th node, starting with the first
  [a,b]      nodes at positions a up to (not including) b
  [a,]       from position a to the end
  [,b]       the first b nodes

  Running off the end of a sibling list, or asking for a parent of the
  root, silently yields nothing.

Examples:
  /*/_data/*            children of '_data'
  /**/=foo              anywhere below, with value 'foo'
  /*/%2                 every other child
  /*/[1,3]              second and third child
"#;

const LOGICALS_DOC: &str = r#"LOGICALS - Combining Pipelines

Each logical starts a new pipeline at the group root and combines its
result with everything to its left.

  |   OR    union, left items first, duplicates dropped
  &   AND   left items also found on the right
  ^   XOR   items found on exactly one side
  !   NOT   left items not found on the right

Logicals are evaluated strictly left to right, there is no precedence:

  /*/_a|/*/_b&/*/=x     (_a OR _b) AND value x

Membership is node identity. Two distinct nodes with equal names and values
are different items.
"#;

const GROUPS_DOC: &str = r#"GROUPS - Nested Scopes

  /*/_data/*(/_a|/_b)?name

A group is entered with the nodes reaching '('. Every logical inside the
group starts from those same nodes. The group's result continues the
outer pipeline.

Groups nest:

  /*(/_a(/*/x|/*/y)|/_b)

A group remembers its first result. Evaluating a parsed expression always
creates fresh groups, so results never leak between evaluations.
"#;

const TYPES_DOC: &str = r#"TYPES - What an Expression Returns

  ?node      the matched nodes (default)
  ?name      their names
  ?value     their values
  ?count     the number of matched nodes
  ?path      their positions, e.g. 0-2-1

CASTS
  ?value.int      converts every value
  ?count.string
  ?node.string    renders nodes as outlines

  Type names: string int long float double decimal bool path x
"#;

const VALUES_DOC: &str = r#"VALUES - Matching on Values

  =foo           value is the string 'foo'
  =:int:5        value is the integer 5
  =:bool:true    value is the boolean true
  =:decimal:1.5  value is the decimal 1.5
  =:path:0-1     value is the path 0-1
  =\:foo         value is the string ':foo'

Values compare by type and content: =5 never matches an integer 5.
A typed value that does not convert is rejected when the expression is
parsed.
"#;

const REGEX_DOC: &str = r#"REGEX - Name and Value Patterns

  /"/pattern/flags"      nodes whose name matches
  /"=/pattern/flags"     nodes whose value, as text, matches

Regexes contain '/', so they must be quoted.

FLAGS
  i   case insensitive
  m   multi line
  s   dot matches new line
  w   ignore pattern whitespace
  d   distinct, only the first node for each matched text
  c e r   accepted, no effect

Unknown flags and invalid patterns are rejected when the expression is
parsed. Nodes without a value never match a value regex.
"#;

const REFERENCES_DOC: &str = r#"REFERENCES - Following Values

ITERATOR
  #    follows the node's value:
         a node value     that node
         a path value     the node at that path
         a path string    e.g. "0-1", the node at that path

REFERENCE EXPRESSIONS
  @/*/_exp?value

A leading '@' makes a value or name expression follow expression values:
every matched node whose value is an expression (type 'x') is replaced by
the result of that expression, evaluated from the node. References may
nest up to 32 levels deep.
"#;
