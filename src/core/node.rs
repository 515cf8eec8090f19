//! Structural, schema-tolerant view over vendor replies.
//!
//! Replies arrive as XML-derived documents where the same logical value can be
//! carried either as an attribute (`"@value": "10"`) or as a child element
//! (`"value": "10"`), and where a repeated element with a single occurrence
//! collapses into a lone object. [`Response`] hides both quirks behind one
//! capability; [`lookup`] is the ordered resolver every reader goes through.

use serde_json::Value;

/// Prefix the XML-to-JSON mapping uses for attributes.
pub(crate) const ATTRIBUTE_PREFIX: char = '@';

/// Uniform read access over a reply node, whatever its physical representation.
pub trait Response {
    /// Typed attribute access (`@name` in the JSON rendering of the reply).
    fn attribute(&self, name: &str) -> Option<&Self>;

    /// Mapping-key access (a child element or plain object key).
    fn key(&self, name: &str) -> Option<&Self>;

    /// Sequence view: a list yields its items, an absent/null node yields nothing,
    /// and any other node is a sequence of one.
    fn items(&self) -> Vec<&Self>;

    /// Whether this node carries no value at all.
    fn is_null(&self) -> bool;

    /// Scalar rendering of the node; `None` for null.
    fn text(&self) -> Option<String>;

    /// Integer reading of the node, accepting numeric strings.
    fn integer(&self) -> Option<i64>;

    /// Whether the node is a typed number or boolean rather than text.
    fn is_bare_literal(&self) -> bool;

    /// Named children, in document order, for structural traversal.
    fn children(&self) -> Vec<(Option<&str>, &Self)>;
}

impl Response for Value {
    fn attribute(&self, name: &str) -> Option<&Self> {
        let obj = self.as_object()?;
        obj.iter()
            .find(|(k, _)| {
                k.strip_prefix(ATTRIBUTE_PREFIX)
                    .is_some_and(|bare| bare == name)
            })
            .map(|(_, v)| v)
    }

    fn key(&self, name: &str) -> Option<&Self> {
        self.as_object()?.get(name)
    }

    fn items(&self) -> Vec<&Self> {
        match self {
            Value::Null => Vec::new(),
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        }
    }

    fn is_null(&self) -> bool {
        Value::is_null(self)
    }

    fn text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            other => Some(other.to_string()),
        }
    }

    fn integer(&self) -> Option<i64> {
        match self {
            #[allow(clippy::cast_possible_truncation)]
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn is_bare_literal(&self) -> bool {
        matches!(self, Value::Number(_) | Value::Bool(_))
    }

    fn children(&self) -> Vec<(Option<&str>, &Self)> {
        match self {
            Value::Object(obj) => obj.iter().map(|(k, v)| (Some(k.as_str()), v)).collect(),
            Value::Array(items) => items.iter().map(|v| (None, v)).collect(),
            _ => Vec::new(),
        }
    }
}

/// Resolves the first non-null value among `names`, trying attribute access and then
/// key access for each name in turn.
pub fn lookup<'a, R: Response + ?Sized>(node: &'a R, names: &[&str]) -> Option<&'a R> {
    names.iter().find_map(|name| {
        node.attribute(name)
            .filter(|v| !v.is_null())
            .or_else(|| node.key(name).filter(|v| !v.is_null()))
    })
}

/// Like [`lookup`], but yields the first candidate whose text is non-empty.
pub fn lookup_text<R: Response + ?Sized>(node: &R, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        lookup(node, &[name])
            .and_then(Response::text)
            .filter(|s| !s.is_empty())
    })
}

/// Follows a chain of names from `node`, resolving each step through [`lookup`].
pub fn path<'a, R: Response + ?Sized>(node: &'a R, steps: &[&str]) -> Option<&'a R> {
    steps
        .iter()
        .try_fold(node, |cur, step| lookup(cur, &[step]))
}

/// Guards for [`find_first`].
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    /// Maximum nesting depth visited below the root.
    pub max_depth: usize,
    /// Maximum number of nodes visited overall.
    pub max_nodes: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth: 8,
            max_nodes: 4096,
        }
    }
}

/// Depth-first search for the first node named by one of `names` (bare or attribute
/// form) whose text is non-empty. Traversal stops at the depth and node budgets.
pub fn find_first<R: Response + ?Sized>(
    root: &R,
    names: &[&str],
    limits: SearchLimits,
) -> Option<String> {
    let mut stack: Vec<(&R, usize)> = vec![(root, 0)];
    let mut visited = 0usize;

    while let Some((node, depth)) = stack.pop() {
        visited += 1;
        if visited > limits.max_nodes {
            return None;
        }
        let children = node.children();
        for (name, child) in &children {
            let Some(name) = *name else { continue };
            let bare = name.strip_prefix(ATTRIBUTE_PREFIX).unwrap_or(name);
            if names.contains(&bare)
                && let Some(text) = child.text().filter(|s| !s.is_empty())
                && child.children().is_empty()
            {
                return Some(text);
            }
        }
        if depth < limits.max_depth {
            // reversed so the first child is explored first
            for (_, child) in children.into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }
    None
}
