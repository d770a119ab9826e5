//! Per-production syntax tree construction.
//!
//! Rules are registered by left-hand-side nonterminal name and resolved to
//! production indices when the parser binds to a table, so dispatch during
//! parsing is a plain indexed lookup. Each rule declares the right-hand-side
//! lengths it can build; a table whose productions disagree is rejected at
//! bind time rather than mid-parse.
//!
//! Productions with no registered rule fold into [`NodeKind::Seq`], with
//! left-recursive chains of the same nonterminal flattened in place. Rules
//! that consume such folds ([`items`], [`first_item`]) dissolve them
//! recursively and drop the terminal separators and keywords they carry.

use joos_ir::{Node, NodeKind, Position, Token, TokenKind};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// A construction rule failed against the children actually on the stack.
///
/// Arity is checked when the parser binds to a table, so this means the
/// table's productions disagree with the rule's expected child shapes.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConstructError {
    message: String,
}

impl ConstructError {
    fn new(message: impl Into<String>) -> Self {
        ConstructError {
            message: message.into(),
        }
    }
}

/// Builds the node for one reduction. `pos` is the position of the leftmost
/// right-hand-side value, or [`Position::UNKNOWN`] for epsilon productions.
pub(crate) type BuildFn = fn(Position, Vec<Node>) -> Result<Node, ConstructError>;

/// A registered construction rule for one nonterminal.
pub(crate) struct Rule {
    /// Right-hand-side lengths this rule accepts.
    pub arities: &'static [usize],
    pub build: BuildFn,
}

/// Generic fold for productions without a typed rule.
///
/// A child that is itself a fold of the same nonterminal is spliced in
/// place, which flattens left-recursive list productions as they reduce.
pub(crate) fn fold_seq(symbol: &str, pos: Position, children: Vec<Node>) -> Node {
    let mut flat = Vec::with_capacity(children.len());
    for child in children {
        if let NodeKind::Seq {
            symbol: child_symbol,
            children: inner,
        } = child.kind
        {
            if child_symbol == symbol {
                flat.extend(inner);
            } else {
                flat.push(Node::new(
                    child.pos,
                    NodeKind::Seq {
                        symbol: child_symbol,
                        children: inner,
                    },
                ));
            }
        } else {
            flat.push(child);
        }
    }
    Node::new(
        pos,
        NodeKind::Seq {
            symbol: symbol.to_owned(),
            children: flat,
        },
    )
}

/// The rule registry, keyed by nonterminal name.
///
/// Names follow the reference Joos grammar; a table using other names for
/// these constructs simply gets generic folds instead.
pub(crate) fn registry() -> FxHashMap<&'static str, Rule> {
    let mut map: FxHashMap<&'static str, Rule> = FxHashMap::default();
    let mut add = |name: &'static str, arities: &'static [usize], build: BuildFn| {
        map.insert(name, Rule { arities, build });
    };

    // Unit productions that exist only to encode precedence or grouping.
    for name in [
        "Name",
        "Type",
        "ReferenceType",
        "ClassType",
        "InterfaceType",
        "Expression",
        "AssignmentExpression",
        "LeftHandSide",
        "Primary",
        "StatementExpression",
        "Statement",
        "StatementNoShortIf",
        "BlockStatement",
        "ImportDeclaration",
        "TypeDeclaration",
        "ClassBodyDeclaration",
        "ClassMemberDeclaration",
        "InterfaceMemberDeclaration",
    ] {
        add(name, &[1], pass_through);
    }

    // Literals and names.
    add("Literal", &[1], literal);
    add("SimpleName", &[1], simple_name);
    add("QualifiedName", &[3], qualified_name);

    // Types.
    add("PrimitiveType", &[1], primitive_type);
    add("ClassOrInterfaceType", &[1], class_or_interface_type);
    add("ArrayType", &[3], array_type);

    // Expressions.
    add("PrimaryNoNewArray", &[1, 3], primary_no_new_array);
    add("ClassInstanceCreationExpression", &[5], class_instance_creation);
    add("ArrayCreationExpression", &[3], array_creation);
    add("DimExpr", &[3], dim_expr);
    add("FieldAccess", &[3], field_access);
    add("MethodInvocation", &[4, 6], method_invocation);
    add("ArrayAccess", &[4], array_access);
    add("UnaryExpression", &[1, 2], unary);
    add("UnaryExpressionNotPlusMinus", &[1, 2], unary);
    add("CastExpression", &[4, 6], cast);
    add("Assignment", &[3], assignment);
    for name in [
        "MultiplicativeExpression",
        "AdditiveExpression",
        "ShiftExpression",
        "RelationalExpression",
        "EqualityExpression",
        "AndExpression",
        "ExclusiveOrExpression",
        "InclusiveOrExpression",
        "ConditionalAndExpression",
        "ConditionalOrExpression",
    ] {
        add(name, &[1, 3], infix);
    }

    // Statements.
    add("Block", &[3], block);
    add("EmptyStatement", &[1], empty_statement);
    add("ExpressionStatement", &[2], expression_statement);
    add("IfThenStatement", &[5], if_then);
    add("IfThenElseStatement", &[7], if_then_else);
    add("IfThenElseStatementNoShortIf", &[7], if_then_else);
    add("WhileStatement", &[5], while_statement);
    add("WhileStatementNoShortIf", &[5], while_statement);
    add("ForStatement", &[9], for_statement);
    add("ForStatementNoShortIf", &[9], for_statement);
    add("ReturnStatement", &[2, 3], return_statement);
    add("LocalVariableDeclarationStatement", &[2], local_var_statement);
    add("LocalVariableDeclaration", &[4], local_var_declaration);

    // Declarations.
    add("Modifier", &[1], modifier);
    add("PackageDeclaration", &[3], package_declaration);
    add("SingleTypeImportDeclaration", &[3], single_import);
    add("TypeImportOnDemandDeclaration", &[5], on_demand_import);
    add("CompilationUnit", &[3], compilation_unit);
    add("ClassDeclaration", &[6], class_declaration);
    add("InterfaceDeclaration", &[5], interface_declaration);
    add("FieldDeclaration", &[4, 6], field_declaration);
    add("FormalParameter", &[2], formal_parameter);
    add("MethodDeclarator", &[4], method_declarator);
    add("ConstructorDeclarator", &[4], method_declarator);
    add("MethodHeader", &[3], method_header);
    add("MethodDeclaration", &[2], method_declaration);
    add("AbstractMethodDeclaration", &[2], abstract_method_declaration);
    add("ConstructorDeclaration", &[3], constructor_declaration);

    map
}

// === Child extraction helpers ===

fn take<const N: usize>(children: Vec<Node>) -> Result<[Node; N], ConstructError> {
    let len = children.len();
    <[Node; N]>::try_from(children)
        .map_err(|_| ConstructError::new(format!("expected {N} children, found {len}")))
}

fn token(node: Node) -> Result<Token, ConstructError> {
    match node.kind {
        NodeKind::Terminal(tok) => Ok(tok),
        other => Err(ConstructError::new(format!(
            "expected a terminal, found {}",
            other.name()
        ))),
    }
}

/// An identifier in a position where some grammars keep the raw terminal
/// and others have already reduced it to a simple name.
fn name_token(node: Node) -> Result<Token, ConstructError> {
    match node.kind {
        NodeKind::Terminal(tok) | NodeKind::SimpleName { id: tok } => Ok(tok),
        other => Err(ConstructError::new(format!(
            "expected an identifier, found {}",
            other.name()
        ))),
    }
}

/// Dissolve generic folds into their contents, dropping the fixed-lexeme
/// terminals (punctuation, keywords, operators) they carry. Typed nodes and
/// value-carrying terminals (literals, identifiers) pass through as items,
/// so an operand that reaches a fold unreduced is never lost.
fn items(node: Node) -> Vec<Node> {
    match node.kind {
        NodeKind::Seq { children, .. } => children.into_iter().flat_map(items).collect(),
        NodeKind::Terminal(ref tok) if tok.kind.fixed_lexeme().is_some() => Vec::new(),
        _ => vec![node],
    }
}

/// First typed item of an optional construct, `None` for an empty fold.
fn first_item(node: Node) -> Option<Box<Node>> {
    items(node).into_iter().next().map(Box::new)
}

fn is_keyword(node: &Node, kind: TokenKind) -> bool {
    node.as_terminal().map_or(false, |t| t.kind == kind)
}

// === Literals and names ===

fn pass_through(_pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [child] = take::<1>(children)?;
    Ok(child)
}

fn literal(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [child] = take::<1>(children)?;
    Ok(Node::new(pos, NodeKind::Literal { token: token(child)? }))
}

fn simple_name(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [id] = take::<1>(children)?;
    Ok(Node::new(pos, NodeKind::SimpleName { id: token(id)? }))
}

fn qualified_name(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [qualifier, _dot, id] = take::<3>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::QualifiedName {
            qualifier: Box::new(qualifier),
            id: name_token(id)?,
        },
    ))
}

// === Types ===

fn primitive_type(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [keyword] = take::<1>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::PrimitiveType {
            keyword: token(keyword)?,
        },
    ))
}

fn class_or_interface_type(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [name] = take::<1>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::SimpleType {
            name: Box::new(name),
        },
    ))
}

fn array_type(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [element, _lbracket, _rbracket] = take::<3>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::ArrayType {
            element: Box::new(element),
        },
    ))
}

// === Expressions ===

fn primary_no_new_array(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    if children.len() == 3 {
        let [_lparen, inner, _rparen] = take::<3>(children)?;
        return Ok(Node::new(
            pos,
            NodeKind::ParenExpr {
                inner: Box::new(inner),
            },
        ));
    }
    let [only] = take::<1>(children)?;
    if is_keyword(&only, TokenKind::This) {
        Ok(Node::new(pos, NodeKind::ThisExpr))
    } else {
        Ok(only)
    }
}

fn class_instance_creation(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [_new, class, _lparen, args, _rparen] = take::<5>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::ClassInstanceCreation {
            class: Box::new(class),
            args: items(args),
        },
    ))
}

fn array_creation(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [_new, element, length] = take::<3>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::ArrayCreation {
            element: Box::new(element),
            length: Box::new(length),
        },
    ))
}

fn dim_expr(_pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [_lbracket, expr, _rbracket] = take::<3>(children)?;
    Ok(expr)
}

fn field_access(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [object, _dot, field] = take::<3>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::FieldAccess {
            object: Box::new(object),
            field: token(field)?,
        },
    ))
}

fn method_invocation(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    if children.len() == 6 {
        let [receiver, _dot, name, _lparen, args, _rparen] = take::<6>(children)?;
        let id = token(name)?;
        let name_pos = id.pos;
        return Ok(Node::new(
            pos,
            NodeKind::MethodInvocation {
                receiver: Some(Box::new(receiver)),
                name: Box::new(Node::new(name_pos, NodeKind::SimpleName { id })),
                args: items(args),
            },
        ));
    }
    let [name, _lparen, args, _rparen] = take::<4>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::MethodInvocation {
            receiver: None,
            name: Box::new(name),
            args: items(args),
        },
    ))
}

fn array_access(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [array, _lbracket, index, _rbracket] = take::<4>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::ArrayAccess {
            array: Box::new(array),
            index: Box::new(index),
        },
    ))
}

fn unary(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    if children.len() == 1 {
        return pass_through(pos, children);
    }
    let [op, operand] = take::<2>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::PrefixExpr {
            op: token(op)?,
            operand: Box::new(operand),
        },
    ))
}

fn cast(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    if children.len() == 6 {
        // `(T[]) operand`: the brackets make the target an array type.
        let [_lparen, element, _lbracket, _rbracket, _rparen, operand] = take::<6>(children)?;
        let target = Node::new(
            element.pos,
            NodeKind::ArrayType {
                element: Box::new(element),
            },
        );
        return Ok(Node::new(
            pos,
            NodeKind::CastExpr {
                target: Box::new(target),
                operand: Box::new(operand),
            },
        ));
    }
    let [_lparen, target, _rparen, operand] = take::<4>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::CastExpr {
            target: Box::new(target),
            operand: Box::new(operand),
        },
    ))
}

fn infix(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    if children.len() == 1 {
        return pass_through(pos, children);
    }
    let [lhs, op, rhs] = take::<3>(children)?;
    let op = token(op)?;
    if op.kind == TokenKind::Instanceof {
        return Ok(Node::new(
            pos,
            NodeKind::InstanceofExpr {
                operand: Box::new(lhs),
                tested: Box::new(rhs),
            },
        ));
    }
    Ok(Node::new(
        pos,
        NodeKind::InfixExpr {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
    ))
}

fn assignment(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [target, _eq, value] = take::<3>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::Assignment {
            target: Box::new(target),
            value: Box::new(value),
        },
    ))
}

// === Statements ===

fn block(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [_lbrace, body, _rbrace] = take::<3>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::Block {
            statements: items(body),
        },
    ))
}

fn empty_statement(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [_semicolon] = take::<1>(children)?;
    Ok(Node::new(pos, NodeKind::EmptyStmt))
}

fn expression_statement(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [expr, _semicolon] = take::<2>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::ExprStmt {
            expr: Box::new(expr),
        },
    ))
}

fn if_then(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [_if, _lparen, condition, _rparen, then_branch] = take::<5>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::IfStmt {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: None,
        },
    ))
}

fn if_then_else(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [_if, _lparen, condition, _rparen, then_branch, _else, else_branch] =
        take::<7>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::IfStmt {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Some(Box::new(else_branch)),
        },
    ))
}

fn while_statement(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [_while, _lparen, condition, _rparen, body] = take::<5>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::WhileStmt {
            condition: Box::new(condition),
            body: Box::new(body),
        },
    ))
}

fn for_statement(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [_for, _lparen, init, _semi1, condition, _semi2, update, _rparen, body] =
        take::<9>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::ForStmt {
            init: first_item(init),
            condition: first_item(condition),
            update: first_item(update),
            body: Box::new(body),
        },
    ))
}

fn return_statement(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    if children.len() == 2 {
        let [_return, _semicolon] = take::<2>(children)?;
        return Ok(Node::new(pos, NodeKind::ReturnStmt { value: None }));
    }
    let [_return, value, _semicolon] = take::<3>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::ReturnStmt {
            value: first_item(value),
        },
    ))
}

fn local_var_statement(_pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [declaration, _semicolon] = take::<2>(children)?;
    Ok(declaration)
}

fn local_var_declaration(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [var_type, name, _eq, initializer] = take::<4>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::LocalVarDecl {
            var_type: Box::new(var_type),
            name: name_token(name)?,
            initializer: Some(Box::new(initializer)),
        },
    ))
}

// === Declarations ===

fn modifier(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [keyword] = take::<1>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::Modifier {
            token: token(keyword)?,
        },
    ))
}

fn package_declaration(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [_package, name, _semicolon] = take::<3>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::PackageDecl {
            name: Box::new(name),
        },
    ))
}

fn single_import(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [_import, name, _semicolon] = take::<3>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::ImportDecl {
            name: Box::new(name),
            on_demand: false,
        },
    ))
}

fn on_demand_import(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [_import, name, _dot, _star, _semicolon] = take::<5>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::ImportDecl {
            name: Box::new(name),
            on_demand: true,
        },
    ))
}

fn compilation_unit(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [package, imports, types] = take::<3>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::CompilationUnit {
            package: first_item(package),
            imports: items(imports),
            types: items(types),
        },
    ))
}

fn class_declaration(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [modifiers, _class, name, superclass, interfaces, body] = take::<6>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::ClassDecl {
            modifiers: items(modifiers),
            name: name_token(name)?,
            superclass: first_item(superclass),
            interfaces: items(interfaces),
            body: items(body),
        },
    ))
}

fn interface_declaration(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [modifiers, _interface, name, extends, body] = take::<5>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::InterfaceDecl {
            modifiers: items(modifiers),
            name: name_token(name)?,
            extends: items(extends),
            body: items(body),
        },
    ))
}

fn field_declaration(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    if children.len() == 6 {
        let [modifiers, field_type, name, _eq, initializer, _semicolon] = take::<6>(children)?;
        return Ok(Node::new(
            pos,
            NodeKind::FieldDecl {
                modifiers: items(modifiers),
                field_type: Box::new(field_type),
                name: name_token(name)?,
                initializer: Some(Box::new(initializer)),
            },
        ));
    }
    let [modifiers, field_type, name, _semicolon] = take::<4>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::FieldDecl {
            modifiers: items(modifiers),
            field_type: Box::new(field_type),
            name: name_token(name)?,
            initializer: None,
        },
    ))
}

fn formal_parameter(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [param_type, name] = take::<2>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::Param {
            param_type: Box::new(param_type),
            name: name_token(name)?,
        },
    ))
}

/// `name(params)`: the declarator carries the name and parameter list; the
/// surrounding header or constructor declaration fills in the rest.
fn method_declarator(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [name, _lparen, params, _rparen] = take::<4>(children)?;
    Ok(Node::new(
        pos,
        NodeKind::MethodDecl {
            modifiers: Vec::new(),
            return_type: None,
            name: name_token(name)?,
            params: items(params),
            body: None,
        },
    ))
}

fn method_header(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [modifiers, return_type, declarator] = take::<3>(children)?;
    let return_type = if is_keyword(&return_type, TokenKind::Void) {
        None
    } else {
        Some(Box::new(return_type))
    };
    match declarator.kind {
        NodeKind::MethodDecl { name, params, .. } => Ok(Node::new(
            pos,
            NodeKind::MethodDecl {
                modifiers: items(modifiers),
                return_type,
                name,
                params,
                body: None,
            },
        )),
        other => Err(ConstructError::new(format!(
            "expected a method declarator, found {}",
            other.name()
        ))),
    }
}

fn method_declaration(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [header, body] = take::<2>(children)?;
    attach_body(pos, header, body)
}

fn abstract_method_declaration(
    _pos: Position,
    children: Vec<Node>,
) -> Result<Node, ConstructError> {
    let [header, _semicolon] = take::<2>(children)?;
    Ok(header)
}

fn constructor_declaration(pos: Position, children: Vec<Node>) -> Result<Node, ConstructError> {
    let [modifiers, declarator, body] = take::<3>(children)?;
    match declarator.kind {
        NodeKind::MethodDecl { name, params, .. } => Ok(Node::new(
            pos,
            NodeKind::MethodDecl {
                modifiers: items(modifiers),
                return_type: None,
                name,
                params,
                body: Some(Box::new(body)),
            },
        )),
        other => Err(ConstructError::new(format!(
            "expected a constructor declarator, found {}",
            other.name()
        ))),
    }
}

fn attach_body(pos: Position, header: Node, body: Node) -> Result<Node, ConstructError> {
    match header.kind {
        NodeKind::MethodDecl {
            modifiers,
            return_type,
            name,
            params,
            ..
        } => Ok(Node::new(
            pos,
            NodeKind::MethodDecl {
                modifiers,
                return_type,
                name,
                params,
                body: Some(Box::new(body)),
            },
        )),
        other => Err(ConstructError::new(format!(
            "expected a method header, found {}",
            other.name()
        ))),
    }
}
