//! The syntax tree handed to semantic analysis.
//!
//! One [`Node`] per grammar construct, built by the parser's per-production
//! construction rules during reduction. Nodes own their children exclusively
//! (a tree, never a DAG); the root of a source unit is returned to the caller
//! and owned by semantic analysis from then on.
//!
//! Productions without a registered typed rule fold into [`NodeKind::Seq`],
//! a generic sequence tagged with the nonterminal's name. List productions
//! (import lists, statement lists, argument lists, ...) also use `Seq`, with
//! left-recursive chains flattened by the construction rules.

use std::fmt;
use std::fmt::Write as _;

use crate::{Position, Token};

/// A syntax tree node: a position plus a typed payload.
///
/// The position is the (line, column) of the node's first token, or
/// [`Position::UNKNOWN`] for nodes reduced from an empty right-hand side.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Node {
    pub pos: Position,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(pos: Position, kind: NodeKind) -> Self {
        Node { pos, kind }
    }

    /// Wrap a token as a terminal leaf.
    pub fn terminal(token: Token) -> Self {
        Node {
            pos: token.pos,
            kind: NodeKind::Terminal(token),
        }
    }

    /// The terminal token, for leaf nodes.
    pub fn as_terminal(&self) -> Option<&Token> {
        match &self.kind {
            NodeKind::Terminal(tok) => Some(tok),
            _ => None,
        }
    }

    /// Render the tree with two-space indentation, one node per line.
    ///
    /// Debug/driver output only; the format is not stable.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        match &self.kind {
            NodeKind::Terminal(tok) => {
                let _ = writeln!(out, "{} {:?}", tok.kind, tok.lexeme);
            }
            NodeKind::Seq { symbol, children } => {
                let _ = writeln!(out, "{symbol}");
                for child in children {
                    child.render_into(out, depth + 1);
                }
            }
            other => {
                let _ = writeln!(out, "{}", other.name());
                for child in other.children() {
                    child.render_into(out, depth + 1);
                }
            }
        }
    }
}

/// Tagged union over all grammar constructs.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NodeKind {
    /// A raw token shifted onto the parse stack.
    Terminal(Token),
    /// Generic fold for productions without a typed construction rule,
    /// and for flattened list productions.
    Seq {
        symbol: String,
        children: Vec<Node>,
    },

    // === Literals and names ===
    /// `42`, `'a'`, `"s"`, `true`, `false`, `null`.
    Literal { token: Token },
    /// A single identifier used as a name.
    SimpleName { id: Token },
    /// `qualifier.id`.
    QualifiedName { qualifier: Box<Node>, id: Token },

    // === Types ===
    /// `int`, `boolean`, `char`, `byte`, `short`.
    PrimitiveType { keyword: Token },
    /// A class or interface type named by a (possibly qualified) name.
    SimpleType { name: Box<Node> },
    /// `element[]`.
    ArrayType { element: Box<Node> },

    // === Expressions ===
    /// `lhs op rhs`.
    InfixExpr {
        op: Token,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    /// `op operand` (`-x`, `!x`, `~x`).
    PrefixExpr { op: Token, operand: Box<Node> },
    /// `target = value`.
    Assignment { target: Box<Node>, value: Box<Node> },
    /// `object.field`.
    FieldAccess { object: Box<Node>, field: Token },
    /// `array[index]`.
    ArrayAccess { array: Box<Node>, index: Box<Node> },
    /// `new element[length]`.
    ArrayCreation {
        element: Box<Node>,
        length: Box<Node>,
    },
    /// `(Type) operand`.
    CastExpr {
        target: Box<Node>,
        operand: Box<Node>,
    },
    /// `operand instanceof Type`.
    InstanceofExpr { operand: Box<Node>, tested: Box<Node> },
    /// `this`.
    ThisExpr,
    /// `new Class(args...)`.
    ClassInstanceCreation { class: Box<Node>, args: Vec<Node> },
    /// `receiver.name(args...)` or `name(args...)` with no receiver.
    MethodInvocation {
        receiver: Option<Box<Node>>,
        name: Box<Node>,
        args: Vec<Node>,
    },
    /// `( inner )` kept explicit so later passes can distinguish
    /// `(Name)` casts from parenthesized reads.
    ParenExpr { inner: Box<Node> },

    // === Statements ===
    /// `{ statements... }`.
    Block { statements: Vec<Node> },
    /// `if (condition) then_branch [else else_branch]`.
    IfStmt {
        condition: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Option<Box<Node>>,
    },
    /// `while (condition) body`.
    WhileStmt { condition: Box<Node>, body: Box<Node> },
    /// `for (init; condition; update) body`, any header part optional.
    ForStmt {
        init: Option<Box<Node>>,
        condition: Option<Box<Node>>,
        update: Option<Box<Node>>,
        body: Box<Node>,
    },
    /// `return [value];`.
    ReturnStmt { value: Option<Box<Node>> },
    /// `;`.
    EmptyStmt,
    /// An expression in statement position.
    ExprStmt { expr: Box<Node> },
    /// `Type name [= initializer];`.
    LocalVarDecl {
        var_type: Box<Node>,
        name: Token,
        initializer: Option<Box<Node>>,
    },

    // === Declarations ===
    /// One whole source unit.
    CompilationUnit {
        package: Option<Box<Node>>,
        imports: Vec<Node>,
        types: Vec<Node>,
    },
    /// `package name;`.
    PackageDecl { name: Box<Node> },
    /// `import name;` or `import name.*;`.
    ImportDecl { name: Box<Node>, on_demand: bool },
    /// `modifiers class name [extends s] [implements i...] { body }`.
    ClassDecl {
        modifiers: Vec<Node>,
        name: Token,
        superclass: Option<Box<Node>>,
        interfaces: Vec<Node>,
        body: Vec<Node>,
    },
    /// `modifiers interface name [extends e...] { body }`.
    InterfaceDecl {
        modifiers: Vec<Node>,
        name: Token,
        extends: Vec<Node>,
        body: Vec<Node>,
    },
    /// `modifiers Type name [= initializer];`.
    FieldDecl {
        modifiers: Vec<Node>,
        field_type: Box<Node>,
        name: Token,
        initializer: Option<Box<Node>>,
    },
    /// A method or constructor. Constructors have no return type.
    MethodDecl {
        modifiers: Vec<Node>,
        return_type: Option<Box<Node>>,
        name: Token,
        params: Vec<Node>,
        body: Option<Box<Node>>,
    },
    /// `Type name` in a formal parameter list.
    Param { param_type: Box<Node>, name: Token },
    /// A single modifier keyword (`public`, `static`, ...).
    Modifier { token: Token },
}

impl NodeKind {
    /// Construct name used by the tree renderer.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Terminal(_) => "Terminal",
            NodeKind::Seq { .. } => "Seq",
            NodeKind::Literal { .. } => "Literal",
            NodeKind::SimpleName { .. } => "SimpleName",
            NodeKind::QualifiedName { .. } => "QualifiedName",
            NodeKind::PrimitiveType { .. } => "PrimitiveType",
            NodeKind::SimpleType { .. } => "SimpleType",
            NodeKind::ArrayType { .. } => "ArrayType",
            NodeKind::InfixExpr { .. } => "InfixExpr",
            NodeKind::PrefixExpr { .. } => "PrefixExpr",
            NodeKind::Assignment { .. } => "Assignment",
            NodeKind::FieldAccess { .. } => "FieldAccess",
            NodeKind::ArrayAccess { .. } => "ArrayAccess",
            NodeKind::ArrayCreation { .. } => "ArrayCreation",
            NodeKind::CastExpr { .. } => "CastExpr",
            NodeKind::InstanceofExpr { .. } => "InstanceofExpr",
            NodeKind::ThisExpr => "ThisExpr",
            NodeKind::ClassInstanceCreation { .. } => "ClassInstanceCreation",
            NodeKind::MethodInvocation { .. } => "MethodInvocation",
            NodeKind::ParenExpr { .. } => "ParenExpr",
            NodeKind::Block { .. } => "Block",
            NodeKind::IfStmt { .. } => "IfStmt",
            NodeKind::WhileStmt { .. } => "WhileStmt",
            NodeKind::ForStmt { .. } => "ForStmt",
            NodeKind::ReturnStmt { .. } => "ReturnStmt",
            NodeKind::EmptyStmt => "EmptyStmt",
            NodeKind::ExprStmt { .. } => "ExprStmt",
            NodeKind::LocalVarDecl { .. } => "LocalVarDecl",
            NodeKind::CompilationUnit { .. } => "CompilationUnit",
            NodeKind::PackageDecl { .. } => "PackageDecl",
            NodeKind::ImportDecl { .. } => "ImportDecl",
            NodeKind::ClassDecl { .. } => "ClassDecl",
            NodeKind::InterfaceDecl { .. } => "InterfaceDecl",
            NodeKind::FieldDecl { .. } => "FieldDecl",
            NodeKind::MethodDecl { .. } => "MethodDecl",
            NodeKind::Param { .. } => "Param",
            NodeKind::Modifier { .. } => "Modifier",
        }
    }

    /// All direct children, in source order.
    ///
    /// Used by the renderer and by generic tree walks; typed consumers
    /// match on the variant instead.
    pub fn children(&self) -> Vec<&Node> {
        fn opt(n: &Option<Box<Node>>) -> Option<&Node> {
            n.as_deref()
        }
        match self {
            NodeKind::Terminal(_)
            | NodeKind::Literal { .. }
            | NodeKind::SimpleName { .. }
            | NodeKind::PrimitiveType { .. }
            | NodeKind::ThisExpr
            | NodeKind::EmptyStmt
            | NodeKind::Modifier { .. } => Vec::new(),
            NodeKind::Seq { children, .. } => children.iter().collect(),
            NodeKind::QualifiedName { qualifier, .. } => vec![qualifier],
            NodeKind::SimpleType { name } => vec![name],
            NodeKind::ArrayType { element } => vec![element],
            NodeKind::InfixExpr { lhs, rhs, .. } => vec![lhs, rhs],
            NodeKind::PrefixExpr { operand, .. } => vec![operand],
            NodeKind::Assignment { target, value } => vec![target, value],
            NodeKind::FieldAccess { object, .. } => vec![object],
            NodeKind::ArrayAccess { array, index } => vec![array, index],
            NodeKind::ArrayCreation { element, length } => vec![element, length],
            NodeKind::CastExpr { target, operand } => vec![target, operand],
            NodeKind::InstanceofExpr { operand, tested } => vec![operand, tested],
            NodeKind::ClassInstanceCreation { class, args } => {
                let mut out: Vec<&Node> = vec![class];
                out.extend(args.iter());
                out
            }
            NodeKind::MethodInvocation {
                receiver,
                name,
                args,
            } => {
                let mut out: Vec<&Node> = Vec::new();
                out.extend(opt(receiver));
                out.push(name);
                out.extend(args.iter());
                out
            }
            NodeKind::ParenExpr { inner } => vec![inner],
            NodeKind::Block { statements } => statements.iter().collect(),
            NodeKind::IfStmt {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut out: Vec<&Node> = vec![condition, then_branch];
                out.extend(opt(else_branch));
                out
            }
            NodeKind::WhileStmt { condition, body } => vec![condition, body],
            NodeKind::ForStmt {
                init,
                condition,
                update,
                body,
            } => {
                let mut out: Vec<&Node> = Vec::new();
                out.extend(opt(init));
                out.extend(opt(condition));
                out.extend(opt(update));
                out.push(body);
                out
            }
            NodeKind::ReturnStmt { value } => opt(value).into_iter().collect(),
            NodeKind::ExprStmt { expr } => vec![expr],
            NodeKind::LocalVarDecl {
                var_type,
                initializer,
                ..
            } => {
                let mut out: Vec<&Node> = vec![var_type];
                out.extend(opt(initializer));
                out
            }
            NodeKind::CompilationUnit {
                package,
                imports,
                types,
            } => {
                let mut out: Vec<&Node> = Vec::new();
                out.extend(opt(package));
                out.extend(imports.iter());
                out.extend(types.iter());
                out
            }
            NodeKind::PackageDecl { name } => vec![name],
            NodeKind::ImportDecl { name, .. } => vec![name],
            NodeKind::ClassDecl {
                modifiers,
                superclass,
                interfaces,
                body,
                ..
            } => {
                let mut out: Vec<&Node> = modifiers.iter().collect();
                out.extend(opt(superclass));
                out.extend(interfaces.iter());
                out.extend(body.iter());
                out
            }
            NodeKind::InterfaceDecl {
                modifiers,
                extends,
                body,
                ..
            } => {
                let mut out: Vec<&Node> = modifiers.iter().collect();
                out.extend(extends.iter());
                out.extend(body.iter());
                out
            }
            NodeKind::FieldDecl {
                modifiers,
                field_type,
                initializer,
                ..
            } => {
                let mut out: Vec<&Node> = modifiers.iter().collect();
                out.push(field_type);
                out.extend(opt(initializer));
                out
            }
            NodeKind::MethodDecl {
                modifiers,
                return_type,
                params,
                body,
                ..
            } => {
                let mut out: Vec<&Node> = modifiers.iter().collect();
                out.extend(opt(return_type));
                out.extend(params.iter());
                out.extend(opt(body));
                out
            }
            NodeKind::Param { param_type, .. } => vec![param_type],
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Seq { symbol, .. } => write!(f, "{symbol} ({})", self.pos),
            other => write!(f, "{} ({})", other.name(), self.pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SourceId, TokenKind};
    use pretty_assertions::assert_eq;

    fn tok(kind: TokenKind, lexeme: &str) -> Token {
        Token::new(SourceId(0), kind, lexeme, Position::new(1, 1))
    }

    #[test]
    fn terminal_leaf_takes_token_position() {
        let t = Token::new(SourceId(0), TokenKind::Id, "x", Position::new(4, 2));
        let node = Node::terminal(t.clone());
        assert_eq!(node.pos, Position::new(4, 2));
        assert_eq!(node.as_terminal(), Some(&t));
    }

    #[test]
    fn render_indents_children() {
        let inner = Node::terminal(tok(TokenKind::IntLiteral, "42"));
        let root = Node::new(
            Position::new(1, 1),
            NodeKind::Seq {
                symbol: "E".to_owned(),
                children: vec![inner],
            },
        );
        assert_eq!(root.render(), "E\n  INTLITERAL \"42\"\n");
    }

    #[test]
    fn children_follow_source_order() {
        let cond = Node::terminal(tok(TokenKind::True, "true"));
        let body = Node::new(Position::new(1, 1), NodeKind::EmptyStmt);
        let stmt = NodeKind::WhileStmt {
            condition: Box::new(cond.clone()),
            body: Box::new(body.clone()),
        };
        assert_eq!(stmt.children(), vec![&cond, &body]);
    }
}
