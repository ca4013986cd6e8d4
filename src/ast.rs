use serde::{Deserialize, Serialize};

/// A node of the input program.
///
/// Every node owns its children; dropping a node drops its whole subtree.
/// The JSON form is internally tagged by `kind`, and any tag not listed here
/// deserializes to [`Node::Unknown`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Node {
    /// Numeric literal, kept as written (`"5"`, `"7.9"`, `"1e2"`).
    Number { value: String },
    /// String literal contents, without quotes.
    String { value: String },
    Boolean { value: bool },
    Identifier { name: String },
    Operator {
        op: BinOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    Assignment { target: String, value: Box<Node> },
    /// A statement followed by the rest of the chain.
    Sequence {
        first: Box<Node>,
        #[serde(default)]
        next: Option<Box<Node>>,
    },
    If {
        cond: Box<Node>,
        body: Box<Node>,
        #[serde(default)]
        alternative: Option<Alternative>,
    },
    While { cond: Box<Node>, body: Box<Node> },
    For {
        init: Box<Node>,
        cond: Box<Node>,
        step: Box<Node>,
        body: Box<Node>,
    },
    #[serde(other)]
    Unknown,
}

/// The `else` or `elif` branch attached to an `if`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Alternative {
    Else { body: Box<Node> },
    Elif { body: Box<Node> },
}

impl Alternative {
    pub fn body(&self) -> &Node {
        match self {
            Alternative::Else { body } | Alternative::Elif { body } => body,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Alternative::Else { .. } => NodeKind::Else,
            Alternative::Elif { .. } => NodeKind::Elif,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<BinOp> {
        Some(match symbol {
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "==" => BinOp::Eq,
            "!=" => BinOp::Ne,
            "<" => BinOp::Lt,
            ">" => BinOp::Gt,
            "<=" => BinOp::Le,
            ">=" => BinOp::Ge,
            _ => return None,
        })
    }

    pub fn is_comparison(&self) -> bool {
        !matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div)
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat discriminant of a node, used in diagnostics and traces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Number,
    String,
    Boolean,
    Operator,
    Identifier,
    Assignment,
    Sequence,
    If,
    Else,
    Elif,
    While,
    For,
    Unknown,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeKind::Number => "number",
            NodeKind::String => "string",
            NodeKind::Boolean => "boolean",
            NodeKind::Operator => "operator",
            NodeKind::Identifier => "identifier",
            NodeKind::Assignment => "assignment",
            NodeKind::Sequence => "sequence",
            NodeKind::If => "if",
            NodeKind::Else => "else",
            NodeKind::Elif => "elif",
            NodeKind::While => "while",
            NodeKind::For => "for",
            NodeKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

// Constructors, mostly for building trees in code and tests.
impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Number { .. } => NodeKind::Number,
            Node::String { .. } => NodeKind::String,
            Node::Boolean { .. } => NodeKind::Boolean,
            Node::Identifier { .. } => NodeKind::Identifier,
            Node::Operator { .. } => NodeKind::Operator,
            Node::Assignment { .. } => NodeKind::Assignment,
            Node::Sequence { .. } => NodeKind::Sequence,
            Node::If { .. } => NodeKind::If,
            Node::While { .. } => NodeKind::While,
            Node::For { .. } => NodeKind::For,
            Node::Unknown => NodeKind::Unknown,
        }
    }

    pub fn number(value: impl Into<String>) -> Node {
        Node::Number {
            value: value.into(),
        }
    }

    pub fn string(value: impl Into<String>) -> Node {
        Node::String {
            value: value.into(),
        }
    }

    pub fn boolean(value: bool) -> Node {
        Node::Boolean { value }
    }

    pub fn ident(name: impl Into<String>) -> Node {
        Node::Identifier { name: name.into() }
    }

    pub fn binary(op: BinOp, lhs: Node, rhs: Node) -> Node {
        Node::Operator {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn assign(target: impl Into<String>, value: Node) -> Node {
        Node::Assignment {
            target: target.into(),
            value: Box::new(value),
        }
    }

    /// Chain statements into nested `Sequence` nodes, first statement outermost.
    /// Returns `None` for an empty list.
    pub fn block(stmts: Vec<Node>) -> Option<Node> {
        stmts.into_iter().rev().fold(None, |next, stmt| {
            Some(Node::Sequence {
                first: Box::new(stmt),
                next: next.map(Box::new),
            })
        })
    }

    pub fn if_(cond: Node, body: Node, alternative: Option<Alternative>) -> Node {
        Node::If {
            cond: Box::new(cond),
            body: Box::new(body),
            alternative,
        }
    }

    pub fn while_(cond: Node, body: Node) -> Node {
        Node::While {
            cond: Box::new(cond),
            body: Box::new(body),
        }
    }

    pub fn for_(init: Node, cond: Node, step: Node, body: Node) -> Node {
        Node::For {
            init: Box::new(init),
            cond: Box::new(cond),
            step: Box::new(step),
            body: Box::new(body),
        }
    }

    /// Parse a tree from its JSON interchange form.
    pub fn from_json(text: &str) -> Result<Node, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl Alternative {
    pub fn else_(body: Node) -> Alternative {
        Alternative::Else {
            body: Box::new(body),
        }
    }

    pub fn elif(body: Node) -> Alternative {
        Alternative::Elif {
            body: Box::new(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_chains_in_order() {
        let seq = Node::block(vec![Node::ident("a"), Node::ident("b")]).unwrap();
        match seq {
            Node::Sequence { first, next } => {
                assert_eq!(*first, Node::ident("a"));
                let next = next.unwrap();
                match *next {
                    Node::Sequence { first, next } => {
                        assert_eq!(*first, Node::ident("b"));
                        assert!(next.is_none());
                    }
                    other => panic!("expected sequence, got {:?}", other),
                }
            }
            other => panic!("expected sequence, got {:?}", other),
        }
        assert!(Node::block(Vec::new()).is_none());
    }

    #[test]
    fn test_json_assignment() {
        let node = Node::from_json(
            r#"{"kind":"Assignment","target":"x","value":{"kind":"Number","value":"5"}}"#,
        )
        .unwrap();
        assert_eq!(node, Node::assign("x", Node::number("5")));
    }

    #[test]
    fn test_json_operator_symbols() {
        let node = Node::from_json(
            r#"{"kind":"Operator","op":"<=","lhs":{"kind":"Identifier","name":"i"},"rhs":{"kind":"Number","value":"3"}}"#,
        )
        .unwrap();
        assert_eq!(
            node,
            Node::binary(BinOp::Le, Node::ident("i"), Node::number("3"))
        );
    }

    #[test]
    fn test_json_if_with_else() {
        let node = Node::from_json(
            r#"{"kind":"If",
                "cond":{"kind":"Boolean","value":true},
                "body":{"kind":"String","value":"yes"},
                "alternative":{"kind":"Else","body":{"kind":"String","value":"no"}}}"#,
        )
        .unwrap();
        let expected = Node::if_(
            Node::boolean(true),
            Node::string("yes"),
            Some(Alternative::else_(Node::string("no"))),
        );
        assert_eq!(node, expected);
    }

    #[test]
    fn test_json_unrecognized_kind_is_unknown() {
        let node = Node::from_json(r#"{"kind":"Lambda","params":[]}"#).unwrap();
        assert_eq!(node, Node::Unknown);
        assert_eq!(node.kind(), NodeKind::Unknown);
    }

    #[test]
    fn test_json_sequence_without_next() {
        let node = Node::from_json(r#"{"kind":"Sequence","first":{"kind":"Identifier","name":"a"}}"#)
            .unwrap();
        assert_eq!(node, Node::block(vec![Node::ident("a")]).unwrap());
    }

    #[test]
    fn test_binop_symbols() {
        for op in [
            BinOp::Add,
            BinOp::Sub,
            BinOp::Mul,
            BinOp::Div,
            BinOp::Eq,
            BinOp::Ne,
            BinOp::Lt,
            BinOp::Gt,
            BinOp::Le,
            BinOp::Ge,
        ] {
            assert_eq!(BinOp::from_symbol(op.as_str()), Some(op));
        }
        assert_eq!(BinOp::from_symbol("%"), None);
        assert!(BinOp::Ne.is_comparison());
        assert!(!BinOp::Div.is_comparison());
    }

    #[test]
    fn test_alternative_kind() {
        let alt = Alternative::elif(Node::ident("x"));
        assert_eq!(alt.kind(), NodeKind::Elif);
        assert_eq!(alt.body(), &Node::ident("x"));
    }
}
