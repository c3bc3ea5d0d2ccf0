use std::fmt::{self, Write};

use crate::{expr::Expr, stmt::Stmt};

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                write!(f, "({} {left} {right})", operator.lexeme)
            }
            Expr::Grouping { expression } => {
                write!(f, "(group {expression})")
            }
            Expr::LiteralExpr { value } => {
                write!(f, "{value}")
            }
            Expr::Unary { operator, right } => {
                write!(f, "({} {right})", operator.lexeme)
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expression { expression } => write!(f, "(; {expression})"),
            Stmt::Print { expression } => write!(f, "(print {expression})"),
        }
    }
}

/// Renders an indented tree of node kinds, one node per line.
pub trait TreeDump {
    fn dump(&self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.dump_into(&mut out, "", "");
        out
    }

    /// `lead` prefixes this node's own line, `indent` prefixes its children.
    fn dump_into(&self, out: &mut String, lead: &str, indent: &str) -> fmt::Result;
}

fn node(out: &mut String, lead: &str, label: impl fmt::Display) -> fmt::Result {
    writeln!(out, "{lead}{label}")
}

/// Writes `children` below a parent whose children are indented by `indent`.
fn children(out: &mut String, indent: &str, children: &[&dyn TreeDump]) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        let (branch, rest) = if i + 1 == children.len() {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        child.dump_into(out, &format!("{indent}{branch}"), &format!("{indent}{rest}"))?;
    }
    Ok(())
}

/// Leaf label, e.g. the rendered value of a literal or an operator name.
struct Label<'a, T: fmt::Display>(&'a T, &'a [&'a dyn TreeDump]);

impl<T: fmt::Display> TreeDump for Label<'_, T> {
    fn dump_into(&self, out: &mut String, lead: &str, indent: &str) -> fmt::Result {
        node(out, lead, self.0)?;
        children(out, indent, self.1)
    }
}

impl TreeDump for Expr {
    fn dump_into(&self, out: &mut String, lead: &str, indent: &str) -> fmt::Result {
        match self {
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                node(out, lead, "BinaryExpr")?;
                let operands: [&dyn TreeDump; 2] = [&**left, &**right];
                children(out, indent, &[&Label(&operator.typ, &operands)])
            }
            Expr::Grouping { expression } => {
                node(out, lead, "GroupingExpr")?;
                children(out, indent, &[&**expression])
            }
            Expr::LiteralExpr { value } => {
                node(out, lead, "LiteralExpr")?;
                children(out, indent, &[&Label(value, &[])])
            }
            Expr::Unary { operator, right } => {
                node(out, lead, "UnaryExpr")?;
                let operand: [&dyn TreeDump; 1] = [&**right];
                children(out, indent, &[&Label(&operator.typ, &operand)])
            }
        }
    }
}

impl TreeDump for Stmt {
    fn dump_into(&self, out: &mut String, lead: &str, indent: &str) -> fmt::Result {
        let (label, expression) = match self {
            Stmt::Expression { expression } => ("ExpressionStmt", expression),
            Stmt::Print { expression } => ("PrintStmt", expression),
        };
        node(out, lead, label)?;
        children(out, indent, &[&**expression])
    }
}
