use std::rc::Rc;

use log::info;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use ast::ast::{BinOp, Decl, Expr, Literal, Type};
use ast::ident::Ident;

use crate::error::ParsingError;
use crate::error::ParsingError::GrammarError;
use crate::info_parse;

#[derive(Parser)]
#[grammar = "./grammar.pest"]
struct LexicalCamlet;

pub fn build_ast(source: &str) -> Result<Vec<Decl>, ParsingError> {
    let mut pairs = LexicalCamlet::parse(Rule::program, source)?;
    let program = pairs.next().ok_or(GrammarError)?;
    let decls = program
        .into_inner()
        .filter(|p| p.as_rule() != Rule::EOI)
        .map(parse_decl)
        .collect::<Result<Vec<_>, _>>()?;
    info!("Found {} decls", decls.len());
    Ok(decls)
}

/// Keywords show up as pairs because they are atomic rules. Only `rec`
/// carries information, the rest are dropped before walking a node's
/// children.
fn significant(pair: &Pair<Rule>) -> bool {
    !matches!(
        pair.as_rule(),
        Rule::kw_val
            | Rule::kw_type
            | Rule::kw_module
            | Rule::kw_struct
            | Rule::kw_end
            | Rule::kw_fn
            | Rule::kw_if
            | Rule::kw_then
            | Rule::kw_else
    )
}

fn parse_decl(decl: Pair<Rule>) -> Result<Decl, ParsingError> {
    info_parse!("Declaration", &decl);
    match decl.as_rule() {
        Rule::type_alias => {
            let mut inner = decl.into_inner().filter(significant);
            let name = Ident::new(next(&mut inner)?.as_str());
            let ty = parse_type(next(&mut inner)?)?;
            Ok(Decl::TypeAlias(name, ty))
        }
        Rule::module_decl => {
            let mut inner = decl.into_inner().filter(significant);
            let name = Ident::new(next(&mut inner)?.as_str());
            let decls = inner.map(parse_decl).collect::<Result<Vec<_>, _>>()?;
            Ok(Decl::Module(name, decls))
        }
        Rule::val_decl => {
            let mut inner = decl.into_inner().filter(significant).peekable();
            let rec = inner
                .peek()
                .is_some_and(|p| p.as_rule() == Rule::kw_rec);
            if rec {
                inner.next();
            }
            let name = Ident::new(next(&mut inner)?.as_str());
            let ty = match inner.peek() {
                Some(p) if p.as_rule() == Rule::fun_ty => Some(parse_type(next(&mut inner)?)?),
                _ => None,
            };
            let def = parse_expr(next(&mut inner)?)?;
            Ok(Decl::Val { name, rec, ty, def })
        }
        Rule::expr_stmt => {
            let mut inner = decl.into_inner();
            Ok(Decl::SExpr(parse_expr(next(&mut inner)?)?))
        }
        _ => Err(GrammarError),
    }
}

fn parse_expr(expr: Pair<Rule>) -> Result<Rc<Expr>, ParsingError> {
    info_parse!("Expression", &expr);
    match expr.as_rule() {
        Rule::lambda => {
            let mut inner = expr.into_inner().filter(significant);
            let var = next(&mut inner)?.as_str().to_string();
            let ty = parse_type(next(&mut inner)?)?;
            let body = parse_expr(next(&mut inner)?)?;
            Ok(Expr::lam(var.as_str(), ty, body))
        }
        Rule::cond => {
            let mut inner = expr.into_inner().filter(significant);
            let c = parse_expr(next(&mut inner)?)?;
            let t = parse_expr(next(&mut inner)?)?;
            let e = parse_expr(next(&mut inner)?)?;
            Ok(Rc::new(Expr::If(c, t, e)))
        }
        Rule::iff_expr | Rule::or_expr | Rule::and_expr => parse_right_chain(expr),
        Rule::cmp_expr | Rule::add_expr | Rule::mul_expr => parse_left_chain(expr),
        Rule::app_expr => {
            let mut inner = expr.into_inner();
            let mut acc = parse_expr(next(&mut inner)?)?;
            for arg in inner {
                acc = Expr::app(acc, parse_expr(arg)?);
            }
            Ok(acc)
        }
        Rule::proj_expr => {
            let mut inner = expr.into_inner();
            let mut acc = parse_expr(next(&mut inner)?)?;
            for ix in inner {
                let index = ix.as_str().parse().map_err(|_| GrammarError)?;
                acc = Expr::proj(acc, index);
            }
            Ok(acc)
        }
        Rule::number => {
            let n = expr.as_str().parse().map_err(|_| GrammarError)?;
            Ok(Expr::int(n))
        }
        Rule::boolean => {
            let b = expr.as_str().parse().map_err(|_| GrammarError)?;
            Ok(Expr::bool(b))
        }
        Rule::string => {
            let mut inner = expr.into_inner();
            let raw = next(&mut inner)?;
            Ok(Rc::new(Expr::Literal(Literal::Str(unescape(raw.as_str())?))))
        }
        Rule::var_name => Ok(Expr::var(expr.as_str())),
        Rule::annot_expr => {
            let mut inner = expr.into_inner();
            let e = parse_expr(next(&mut inner)?)?;
            let ty = parse_type(next(&mut inner)?)?;
            Ok(Rc::new(Expr::Annot(e, ty)))
        }
        Rule::seq_expr => {
            let mut parts = expr
                .into_inner()
                .map(parse_expr)
                .collect::<Result<Vec<_>, _>>()?;
            let mut acc = parts.pop().ok_or(GrammarError)?;
            while let Some(l) = parts.pop() {
                acc = Expr::binop(l, BinOp::Seq, acc);
            }
            Ok(acc)
        }
        Rule::tuple_expr => {
            let es = expr
                .into_inner()
                .map(parse_expr)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::tuple(es))
        }
        Rule::paren_expr => {
            let mut inner = expr.into_inner();
            parse_expr(next(&mut inner)?)
        }
        _ => Err(GrammarError),
    }
}

/// Arithmetic chains associate to the left; a comparison chain has at most
/// one operator so the direction is moot.
fn parse_left_chain(chain: Pair<Rule>) -> Result<Rc<Expr>, ParsingError> {
    let mut inner = chain.into_inner();
    let mut acc = parse_expr(next(&mut inner)?)?;
    while let Some(op) = inner.next() {
        let op = parse_binop(op)?;
        let rhs = parse_expr(next(&mut inner)?)?;
        acc = Expr::binop(acc, op, rhs);
    }
    Ok(acc)
}

fn parse_right_chain(chain: Pair<Rule>) -> Result<Rc<Expr>, ParsingError> {
    let mut inner = chain.into_inner();
    let mut operands = vec![parse_expr(next(&mut inner)?)?];
    let mut ops = vec![];
    while let Some(op) = inner.next() {
        ops.push(parse_binop(op)?);
        operands.push(parse_expr(next(&mut inner)?)?);
    }
    let mut acc = operands.pop().ok_or(GrammarError)?;
    while let Some(op) = ops.pop() {
        let lhs = operands.pop().ok_or(GrammarError)?;
        acc = Expr::binop(lhs, op, acc);
    }
    Ok(acc)
}

fn parse_binop(op: Pair<Rule>) -> Result<BinOp, ParsingError> {
    info_parse!("Binary Operation", &op);
    match op.as_str() {
        "+" => Ok(BinOp::Add),
        "-" => Ok(BinOp::Sub),
        "*" => Ok(BinOp::Mul),
        "/" => Ok(BinOp::Div),
        "<" => Ok(BinOp::Lt),
        "<=" => Ok(BinOp::Le),
        "==" => Ok(BinOp::Eq),
        ">=" => Ok(BinOp::Ge),
        ">" => Ok(BinOp::Gt),
        "!=" => Ok(BinOp::Neq),
        "&&" => Ok(BinOp::And),
        "||" => Ok(BinOp::Or),
        "<->" => Ok(BinOp::Iff),
        _ => Err(GrammarError),
    }
}

fn parse_type(ty: Pair<Rule>) -> Result<Rc<Type>, ParsingError> {
    info_parse!("Type", &ty);
    match ty.as_rule() {
        Rule::fun_ty => {
            let mut parts = ty
                .into_inner()
                .map(parse_type)
                .collect::<Result<Vec<_>, _>>()?;
            let mut acc = parts.pop().ok_or(GrammarError)?;
            while let Some(dom) = parts.pop() {
                acc = Type::arrow(dom, acc);
            }
            Ok(acc)
        }
        Rule::tuple_ty => {
            let mut parts = ty
                .into_inner()
                .map(parse_type)
                .collect::<Result<Vec<_>, _>>()?;
            if parts.len() == 1 {
                parts.pop().ok_or(GrammarError)
            } else {
                Ok(Type::tuple(parts))
            }
        }
        Rule::type_name => match ty.as_str() {
            "Int" => Ok(Type::int()),
            "Bool" => Ok(Type::bool()),
            "String" => Ok(Type::string()),
            name => Ok(Type::named(name)),
        },
        Rule::paren_ty => {
            let mut inner = ty.into_inner();
            parse_type(next(&mut inner)?)
        }
        _ => Err(GrammarError),
    }
}

fn unescape(raw: &str) -> Result<String, ParsingError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            _ => return Err(GrammarError),
        }
    }
    Ok(out)
}

fn next<'a, I>(pairs: &mut I) -> Result<Pair<'a, Rule>, ParsingError>
where
    I: Iterator<Item = Pair<'a, Rule>>,
{
    pairs.next().ok_or(GrammarError)
}
