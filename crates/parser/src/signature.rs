//! Parser for ABI type strings (`uint256`, `bytes32[2][]`, `(address,(uint256,bool))[]`).

use abi_bind_data::{Composite, Primitive, TypeRef};
use chumsky::prelude::*;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    #[error("{message}\n{pointer}")]
    Syntax { message: String, pointer: String },
    #[error("unknown type `{0}`")]
    UnknownType(String),
    #[error("invalid width in `{0}`")]
    InvalidWidth(String),
    #[error("`tuple` requires components")]
    MissingComponents,
    #[error("components given for non-tuple type")]
    UnexpectedComponents,
    #[error("`payable` is only valid on `address`")]
    PayableNonAddress,
}

/// Unresolved syntax tree of a type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr<'src> {
    Name { name: &'src str, payable: bool, span: SimpleSpan },
    Tuple(Vec<TypeExpr<'src>>),
    Array(Box<TypeExpr<'src>>, Option<usize>),
}

type ParserError<'src> = extra::Err<Rich<'src, char>>;

fn type_expr<'src>() -> impl Parser<'src, &'src str, TypeExpr<'src>, ParserError<'src>> + Clone {
    recursive(|ty| {
        let name = any()
            .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
            .repeated()
            .at_least(1)
            .to_slice()
            .then(just(" payable").or_not())
            .map_with(|(name, payable), e| TypeExpr::Name {
                name,
                payable: payable.is_some(),
                span: e.span(),
            });

        let tuple = ty
            .padded()
            .separated_by(just(','))
            .collect::<Vec<_>>()
            .delimited_by(just('('), just(')'))
            .map(TypeExpr::Tuple);

        let dim = text::int(10)
            .try_map(|digits: &str, span| match digits.parse::<usize>() {
                Ok(0) => Err(Rich::custom(span, "fixed array length must be positive")),
                Ok(len) => Ok(len),
                Err(err) => Err(Rich::custom(span, err)),
            })
            .or_not()
            .delimited_by(just('['), just(']'));

        choice((tuple, name)).then(dim.repeated().collect::<Vec<_>>()).map(|(base, dims)| {
            dims.into_iter().fold(base, |inner, len| TypeExpr::Array(Box::new(inner), len))
        })
    })
}

/// Parses `source` into a syntax tree without validating type names.
pub fn parse_expr(source: &str) -> Result<TypeExpr<'_>, TypeParseError> {
    type_expr().then_ignore(end()).parse(source).into_result().map_err(|errs| {
        let err = &errs[0];
        TypeParseError::Syntax {
            message: err.to_string(),
            pointer: highlight_span(source, err.span().start, err.span().end),
        }
    })
}

/// Parses a type string that contains no `tuple` keyword.
pub fn parse_type(source: &str) -> Result<TypeRef, TypeParseError> {
    parse_type_with_components(source, None)
}

/// Parses a type string whose `tuple` base, if any, is described by `components`.
pub fn parse_type_with_components(
    source: &str,
    components: Option<Composite>,
) -> Result<TypeRef, TypeParseError> {
    let expr = parse_expr(source)?;
    let mut components = components;
    let ty = lower(&expr, &mut components)?;
    if components.is_some() {
        return Err(TypeParseError::UnexpectedComponents);
    }
    Ok(ty)
}

fn lower(expr: &TypeExpr<'_>, components: &mut Option<Composite>) -> Result<TypeRef, TypeParseError> {
    match expr {
        TypeExpr::Name { name: "tuple", payable: false, .. } => {
            components.take().map(TypeRef::Composite).ok_or(TypeParseError::MissingComponents)
        }
        TypeExpr::Name { name, payable, .. } => {
            if *payable && *name != "address" {
                return Err(TypeParseError::PayableNonAddress);
            }
            parse_primitive(name).map(TypeRef::Primitive)
        }
        TypeExpr::Tuple(members) => {
            let components = members
                .iter()
                .map(|member| {
                    let ty = lower(member, &mut None)?;
                    Ok(abi_bind_data::Param::new("", ty))
                })
                .collect::<Result<Vec<_>, TypeParseError>>()?;
            Ok(TypeRef::Composite(Composite { label: None, components }))
        }
        TypeExpr::Array(inner, len) => Ok(TypeRef::array(lower(inner, components)?, *len)),
    }
}

fn parse_primitive(name: &str) -> Result<Primitive, TypeParseError> {
    let primitive = match name {
        "address" => Primitive::Address,
        "bool" => Primitive::Bool,
        "string" => Primitive::String,
        "bytes" => Primitive::Bytes,
        "function" => Primitive::Function,
        "byte" => Primitive::FixedBytes(1),
        "uint" => Primitive::Uint(256),
        "int" => Primitive::Int(256),
        _ => {
            let invalid = || TypeParseError::InvalidWidth(name.to_owned());
            if let Some(bits) = numeric_suffix(name, "uint") {
                Primitive::Uint(parse_width(bits, 8, 256, 8).ok_or_else(invalid)?)
            } else if let Some(bits) = numeric_suffix(name, "int") {
                Primitive::Int(parse_width(bits, 8, 256, 8).ok_or_else(invalid)?)
            } else if let Some(size) = numeric_suffix(name, "bytes") {
                Primitive::FixedBytes(parse_width(size, 1, 32, 1).ok_or_else(invalid)? as u8)
            } else {
                return Err(TypeParseError::UnknownType(name.to_owned()));
            }
        }
    };
    Ok(primitive)
}

fn numeric_suffix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    name.strip_prefix(prefix)
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_width(digits: &str, min: u16, max: u16, step: u16) -> Option<u16> {
    if digits.starts_with('0') {
        return None;
    }
    let width: u16 = digits.parse().ok()?;
    (min..=max).contains(&width).then_some(width).filter(|width| width % step == 0)
}

fn highlight_span(source: &str, start: usize, end: usize) -> String {
    let mut out = format!("  {source}\n  ");
    out.extend(std::iter::repeat_n(' ', start));
    out.extend(std::iter::repeat_n('^', end.saturating_sub(start).max(1)));
    out
}
