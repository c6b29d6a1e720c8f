use std::str::FromStr;

use pest::error::{Error, ErrorVariant};
use pest::Span;
use pest_consume::{match_nodes, Parser};
use strum::VariantArray;

use super::resolve::{self, Argument, ArgumentValue, Suffix};
use super::{Context, Statement};
use crate::ir::{
    ArrayConstructor, ArrayConstructorValue, Assignment, BinaryOp, CharLength,
    Constant, DefinedOperator, DynamicType, Expr, Kind, ParamValue, Scalar,
    Triplet, TypeCategory, UnaryOp,
};

const DEFAULT_KIND: Kind = 4;
const DEFAULT_CHARACTER_KIND: Kind = 1;

#[derive(Parser)]
#[grammar = "parser/syntax.pest"]
pub struct FortranParser;

pub(super) type ParseResult<T> = Result<T, Error<Rule>>;
type Node<'i, 'c> = pest_consume::Node<'i, Rule, &'c Context>;

#[pest_consume::parser]
impl FortranParser {
    fn EOI(_input: Node) -> ParseResult<()> {
        Ok(())
    }

    pub(super) fn expression_line(input: Node) -> ParseResult<Expr> {
        Ok(match_nodes!(input.into_children();
            [expr(expr), EOI(_)] => expr,
        ))
    }

    pub(super) fn statement_line(input: Node) -> ParseResult<Statement> {
        Ok(match_nodes!(input.into_children();
            [statement(statement), EOI(_)] => statement,
        ))
    }

    fn statement(input: Node) -> ParseResult<Statement> {
        Ok(match_nodes!(input.into_children();
            [pointer_statement(assignment)] => Statement::Assignment(assignment),
            [call_statement(assignment)] => Statement::Assignment(assignment),
            [assignment_statement(assignment)] => {
                Statement::Assignment(assignment)
            },
            [expr(expr)] => Statement::Expr(expr),
        ))
    }

    fn assignment_statement(input: Node) -> ParseResult<Assignment> {
        Ok(match_nodes!(input.into_children();
            [designator(lhs), expr(rhs)] => Assignment::Intrinsic { lhs, rhs },
        ))
    }

    fn call_kwd(_input: Node) -> ParseResult<()> {
        Ok(())
    }

    fn call_statement(input: Node) -> ParseResult<Assignment> {
        let span = input.as_span();

        match_nodes!(input.into_children();
            [call_kwd(_), designator(call)] => match call {
                Expr::FunctionRef(call) => Ok(Assignment::Defined(*call)),
                _ => Err(custom_error(span, "expected a subroutine reference")),
            },
        )
    }

    fn pointer_target(input: Node) -> ParseResult<Expr> {
        let span = input.as_span();
        let cx = *input.user_data();

        match_nodes!(input.into_children();
            [name(name), component_part(parts)..] => {
                resolve::designator(cx, span, &name, parts.map(Suffix::Component))
            },
        )
    }

    fn bound(input: Node) -> ParseResult<(Expr, Option<Expr>)> {
        Ok(match_nodes!(input.into_children();
            [expr(lower)] => (lower, None),
            [expr(lower), expr(upper)] => (lower, Some(upper)),
        ))
    }

    fn bounds(input: Node) -> ParseResult<Vec<(Expr, Option<Expr>)>> {
        Ok(match_nodes!(input.into_children();
            [bound(bounds)..] => bounds.collect(),
        ))
    }

    fn pointer_statement(input: Node) -> ParseResult<Assignment> {
        let span = input.as_span();

        match_nodes!(input.into_children();
            [pointer_target(lhs), expr(rhs)] => {
                Ok(Assignment::BoundsSpec { lhs, rhs, bounds: Vec::new() })
            },
            [pointer_target(lhs), bounds(bounds), expr(rhs)] => {
                resolve::pointer_assignment(span, lhs, rhs, bounds)
            },
        )
    }

    fn expr(input: Node) -> ParseResult<Expr> {
        fold_left(input)
    }

    fn equiv_expr(input: Node) -> ParseResult<Expr> {
        fold_left(input)
    }

    fn or_expr(input: Node) -> ParseResult<Expr> {
        fold_left(input)
    }

    fn and_expr(input: Node) -> ParseResult<Expr> {
        fold_left(input)
    }

    fn not_op(_input: Node) -> ParseResult<()> {
        Ok(())
    }

    fn not_expr(input: Node) -> ParseResult<Expr> {
        Ok(match_nodes!(input.into_children();
            [rel_expr(expr)] => expr,
            [not_op(_), rel_expr(expr)] => Expr::unary(UnaryOp::Not, expr),
        ))
    }

    fn rel_expr(input: Node) -> ParseResult<Expr> {
        fold_left(input)
    }

    fn concat_expr(input: Node) -> ParseResult<Expr> {
        fold_left(input)
    }

    fn sign(input: Node) -> ParseResult<bool> {
        Ok(input.as_str() == "-")
    }

    /// Only the first operand of a level-2 expression may carry a sign,
    /// which then applies to the whole add-operand.
    fn add_expr(input: Node) -> ParseResult<Expr> {
        let span = input.as_span();
        let mut children: Vec<_> = input.into_children().collect();

        let negate = if children.first().map(|node| node.as_rule())
            == Some(Rule::sign)
        {
            FortranParser::sign(children.remove(0))?
        } else {
            false
        };

        let mut children = children.into_iter();
        let mut expr = operand(next_child(span, &mut children)?)?;

        if negate {
            expr = Expr::unary(UnaryOp::Negate, expr);
        }

        fold_operations(span, expr, children)
    }

    fn mult_expr(input: Node) -> ParseResult<Expr> {
        fold_left(input)
    }

    fn power_op(_input: Node) -> ParseResult<()> {
        Ok(())
    }

    fn power_expr(input: Node) -> ParseResult<Expr> {
        Ok(match_nodes!(input.into_children();
            [unary_expr(base)] => base,
            [unary_expr(base), power_op(_), power_expr(exponent)] => {
                Expr::binary(BinaryOp::Power, base, exponent)
            },
        ))
    }

    fn defined_op(input: Node) -> ParseResult<DefinedOperator> {
        Ok(DefinedOperator::new(input.as_str()))
    }

    fn unary_expr(input: Node) -> ParseResult<Expr> {
        Ok(match_nodes!(input.into_children();
            [primary(expr)] => expr,
            [defined_op(op), primary(expr)] => {
                Expr::unary(UnaryOp::Defined(op), expr)
            },
        ))
    }

    fn primary(input: Node) -> ParseResult<Expr> {
        Ok(match_nodes!(input.into_children();
            [complex_literal(constant)] => Expr::Constant(constant),
            [real_literal(constant)] => Expr::Constant(constant),
            [char_literal(constant)] => Expr::Constant(constant),
            [unsigned_literal(constant)] => Expr::Constant(constant),
            [int_literal(constant)] => Expr::Constant(constant),
            [logical_literal(constant)] => Expr::Constant(constant),
            [boz_literal(value)] => Expr::BozLiteral(value),
            [null_pointer(_)] => Expr::NullPointer,
            [array_constructor(array)] => Expr::ArrayConstructor(array),
            [designator(expr)] => expr,
            [parenthesized(expr)] => expr,
            [complex_constructor(expr)] => expr,
        ))
    }

    fn parenthesized(input: Node) -> ParseResult<Expr> {
        Ok(match_nodes!(input.into_children();
            [expr(expr)] => Expr::unary(UnaryOp::Parentheses, expr),
        ))
    }

    fn complex_constructor(input: Node) -> ParseResult<Expr> {
        Ok(match_nodes!(input.into_children();
            [expr(re), expr(im)] => {
                Expr::binary(BinaryOp::ComplexConstructor, re, im)
            },
        ))
    }

    fn name(input: Node) -> ParseResult<String> {
        Ok(input.as_str().to_string())
    }

    fn keyword(input: Node) -> ParseResult<String> {
        Ok(input.as_str().to_ascii_lowercase())
    }

    fn designator(input: Node) -> ParseResult<Expr> {
        let span = input.as_span();
        let cx = *input.user_data();

        match_nodes!(input.into_children();
            [name(name), part(parts)..] => {
                resolve::designator(cx, span, &name, parts)
            },
        )
    }

    fn part(input: Node) -> ParseResult<Suffix> {
        Ok(match_nodes!(input.into_children();
            [component_part(name)] => Suffix::Component(name),
            [argument_list(arguments)] => Suffix::Arguments(arguments),
        ))
    }

    fn component_part(input: Node) -> ParseResult<String> {
        Ok(match_nodes!(input.into_children();
            [name(name)] => name,
        ))
    }

    fn argument_list(input: Node) -> ParseResult<Vec<Argument>> {
        Ok(match_nodes!(input.into_children();
            [argument(arguments)..] => arguments.collect(),
        ))
    }

    fn argument(input: Node) -> ParseResult<Argument> {
        let (keyword, value) = match_nodes!(input.into_children();
            [keyword(keyword), triplet(triplet)] => {
                (Some(keyword), ArgumentValue::Triplet(triplet))
            },
            [keyword(keyword), expr(expr)] => {
                (Some(keyword), ArgumentValue::Expr(expr))
            },
            [triplet(triplet)] => (None, ArgumentValue::Triplet(triplet)),
            [expr(expr)] => (None, ArgumentValue::Expr(expr)),
        );

        Ok(Argument { keyword, value })
    }

    fn lower(input: Node) -> ParseResult<Expr> {
        Ok(match_nodes!(input.into_children();
            [expr(expr)] => expr,
        ))
    }

    fn upper(input: Node) -> ParseResult<Expr> {
        Ok(match_nodes!(input.into_children();
            [expr(expr)] => expr,
        ))
    }

    fn stride(input: Node) -> ParseResult<Expr> {
        Ok(match_nodes!(input.into_children();
            [expr(expr)] => expr,
        ))
    }

    fn triplet(input: Node) -> ParseResult<Triplet> {
        let (lower, upper, stride) = match_nodes!(input.into_children();
            [] => (None, None, None),
            [lower(l)] => (Some(l), None, None),
            [upper(u)] => (None, Some(u), None),
            [stride(s)] => (None, None, Some(s)),
            [lower(l), upper(u)] => (Some(l), Some(u), None),
            [lower(l), stride(s)] => (Some(l), None, Some(s)),
            [upper(u), stride(s)] => (None, Some(u), Some(s)),
            [lower(l), upper(u), stride(s)] => (Some(l), Some(u), Some(s)),
        );

        Ok(Triplet {
            lower,
            upper,
            stride,
        })
    }

    fn intrinsic_type(input: Node) -> ParseResult<TypeCategory> {
        match input.as_str().to_ascii_lowercase().as_str() {
            "integer" => Ok(TypeCategory::Integer),
            "unsigned" => Ok(TypeCategory::Unsigned),
            "real" => Ok(TypeCategory::Real),
            "complex" => Ok(TypeCategory::Complex),
            "logical" => Ok(TypeCategory::Logical),
            _ => Err(custom_error(input.as_span(), "unknown intrinsic type")),
        }
    }

    fn char_length(input: Node) -> ParseResult<CharLength> {
        let text = input.as_str().trim();
        let span = input.as_span();

        match_nodes!(input.into_children();
            [int_literal(len)] => match len.as_scalar() {
                Some(&Scalar::Integer(len)) => i64::try_from(len)
                    .map(CharLength::Known)
                    .map_err(|_| custom_error(span, "length out of range")),
                _ => Err(custom_error(span, "expected a character length")),
            },
            [] => Ok(CharLength::Param(if text == ":" {
                ParamValue::Deferred
            } else {
                ParamValue::Assumed
            })),
        )
    }

    fn char_type(input: Node) -> ParseResult<DynamicType> {
        Ok(match_nodes!(input.into_children();
            [kind_value(kind)] => DynamicType::character(kind, None),
            [kind_value(kind), char_length(len)] => {
                DynamicType::character(kind, Some(len))
            },
        ))
    }

    fn type_spec(input: Node) -> ParseResult<DynamicType> {
        Ok(match_nodes!(input.into_children();
            [char_type(ty)] => ty,
            [intrinsic_type(category), kind_value(kind)] => {
                DynamicType::Intrinsic(category, kind)
            },
        ))
    }

    /// An array constructor without a type-spec is given a character type
    /// of unknown length, which is written without one.
    fn array_constructor(input: Node) -> ParseResult<ArrayConstructor> {
        let (ty, values) = match_nodes!(input.into_children();
            [type_spec(ty), expr(values)..] => (ty, values.collect()),
            [expr(values)..] => {
                let ty = DynamicType::character(DEFAULT_CHARACTER_KIND, None);

                (ty, values.collect::<Vec<_>>())
            },
        );

        Ok(ArrayConstructor {
            ty,
            values: values.into_iter().map(ArrayConstructorValue::Expr).collect(),
        })
    }

    fn null_pointer(_input: Node) -> ParseResult<()> {
        Ok(())
    }

    fn digits(input: Node) -> ParseResult<u128> {
        parse_node(&input)
    }

    fn kind_value(input: Node) -> ParseResult<Kind> {
        parse_node(&input)
    }

    fn kind(input: Node) -> ParseResult<Kind> {
        let span = input.as_span();

        input.as_str()[1..]
            .parse()
            .map_err(|_| custom_error(span, "invalid kind"))
    }

    fn int_literal(input: Node) -> ParseResult<Constant> {
        let span = input.as_span();

        let (value, kind) = match_nodes!(input.into_children();
            [digits(value)] => (value, DEFAULT_KIND),
            [digits(value), kind(kind)] => (value, kind),
        );

        let value = i128::try_from(value)
            .map_err(|_| custom_error(span, "integer literal out of range"))?;

        Ok(Constant::integer(value, kind))
    }

    fn unsigned_literal(input: Node) -> ParseResult<Constant> {
        Ok(match_nodes!(input.into_children();
            [digits(value)] => Constant::unsigned(value, DEFAULT_KIND),
            [digits(value), kind(kind)] => Constant::unsigned(value, kind),
        ))
    }

    /// The value together with the kind implied by its exponent letter.
    fn real_digits(input: Node) -> ParseResult<(f64, Kind)> {
        let text = input.as_str();
        let kind = if text.contains(['d', 'D']) { 8 } else { DEFAULT_KIND };
        let value = text
            .replace(['d', 'D'], "e")
            .parse()
            .map_err(|_| custom_error(input.as_span(), "invalid real literal"))?;

        Ok((value, kind))
    }

    fn real_literal(input: Node) -> ParseResult<Constant> {
        let (value, kind) = match_nodes!(input.into_children();
            [real_digits((value, kind))] => (value, kind),
            [real_digits((value, _)), kind(kind)] => (value, kind),
        );

        Ok(Constant::real(round_to_kind(value, kind), kind))
    }

    fn signed_number(input: Node) -> ParseResult<Constant> {
        Ok(match_nodes!(input.into_children();
            [real_literal(value)] => value,
            [int_literal(value)] => value,
            [sign(negate), real_literal(value)] => negate_if(negate, value),
            [sign(negate), int_literal(value)] => negate_if(negate, value),
        ))
    }

    fn complex_literal(input: Node) -> ParseResult<Constant> {
        let span = input.as_span();

        match_nodes!(input.into_children();
            [signed_number(re), signed_number(im)] => {
                let kind = [&re, &im]
                    .into_iter()
                    .find(|part| part.ty().category() == Some(TypeCategory::Real))
                    .and_then(|part| part.ty().kind())
                    .unwrap_or(DEFAULT_KIND);

                match (real_part(&re), real_part(&im)) {
                    (Some(re), Some(im)) => Ok(Constant::complex(
                        round_to_kind(re, kind),
                        round_to_kind(im, kind),
                        kind,
                    )),
                    _ => Err(custom_error(span, "invalid complex literal")),
                }
            },
        )
    }

    fn true_kwd(_input: Node) -> ParseResult<()> {
        Ok(())
    }

    fn false_kwd(_input: Node) -> ParseResult<()> {
        Ok(())
    }

    fn logical_literal(input: Node) -> ParseResult<Constant> {
        Ok(match_nodes!(input.into_children();
            [true_kwd(_)] => Constant::logical(true, DEFAULT_KIND),
            [true_kwd(_), kind(kind)] => Constant::logical(true, kind),
            [false_kwd(_)] => Constant::logical(false, DEFAULT_KIND),
            [false_kwd(_), kind(kind)] => Constant::logical(false, kind),
        ))
    }

    fn char_kind(input: Node) -> ParseResult<Kind> {
        Ok(match_nodes!(input.into_children();
            [kind_value(kind)] => kind,
        ))
    }

    fn quoted(input: Node) -> ParseResult<String> {
        let span = input.as_span();

        resolve::unquote(input.as_str())
            .ok_or_else(|| custom_error(span, "invalid character literal"))
    }

    fn char_literal(input: Node) -> ParseResult<Constant> {
        Ok(match_nodes!(input.into_children();
            [quoted(value)] => Constant::character(value, DEFAULT_CHARACTER_KIND),
            [char_kind(kind), quoted(value)] => Constant::character(value, kind),
        ))
    }

    fn boz_literal(input: Node) -> ParseResult<u128> {
        let text = input.as_str();
        let radix = match text.as_bytes()[0].to_ascii_lowercase() {
            b'b' => 2,
            b'o' => 8,
            _ => 16,
        };

        u128::from_str_radix(&text[2..text.len() - 1], radix)
            .map_err(|_| custom_error(input.as_span(), "BOZ value out of range"))
    }
}

fn binary_operator(input: &Node) -> ParseResult<BinaryOp> {
    let spelling = input.as_str();

    let op = match input.as_rule() {
        Rule::power_op => BinaryOp::Power,
        Rule::mult_op if spelling == "*" => BinaryOp::Multiply,
        Rule::mult_op => BinaryOp::Divide,
        Rule::add_op if spelling == "+" => BinaryOp::Add,
        Rule::add_op => BinaryOp::Subtract,
        Rule::concat_op => BinaryOp::Concat,
        Rule::rel_op => BinaryOp::Relational(spelled(input)?),
        Rule::and_op | Rule::or_op | Rule::equiv_op => {
            BinaryOp::Logical(spelled(input)?)
        }
        Rule::defined_op => BinaryOp::Defined(DefinedOperator::new(spelling)),
        _ => return Err(custom_error(input.as_span(), "expected an operator")),
    };

    Ok(op)
}

/// The operator of type `T` spelled like `input`, ignoring case.
fn spelled<T>(input: &Node) -> ParseResult<T>
where
    T: VariantArray + Copy + Into<&'static str>,
{
    T::VARIANTS
        .iter()
        .copied()
        .find(|&op| {
            let name: &str = op.into();

            name.eq_ignore_ascii_case(input.as_str())
        })
        .ok_or_else(|| custom_error(input.as_span(), "unknown operator"))
}

/// Parses an operand of a binary operator at any precedence level.
fn operand(input: Node) -> ParseResult<Expr> {
    match input.as_rule() {
        Rule::expr => FortranParser::expr(input),
        Rule::equiv_expr => FortranParser::equiv_expr(input),
        Rule::or_expr => FortranParser::or_expr(input),
        Rule::and_expr => FortranParser::and_expr(input),
        Rule::not_expr => FortranParser::not_expr(input),
        Rule::rel_expr => FortranParser::rel_expr(input),
        Rule::concat_expr => FortranParser::concat_expr(input),
        Rule::add_expr => FortranParser::add_expr(input),
        Rule::mult_expr => FortranParser::mult_expr(input),
        Rule::power_expr => FortranParser::power_expr(input),
        _ => Err(custom_error(input.as_span(), "expected an operand")),
    }
}

fn next_child<'i, 'c, I>(
    span: Span<'i>,
    children: &mut I,
) -> ParseResult<Node<'i, 'c>>
where
    I: Iterator<Item = Node<'i, 'c>>,
{
    children
        .next()
        .ok_or_else(|| custom_error(span, "expected an operand"))
}

/// Folds `operand (operator operand)*` into left-associated operations.
fn fold_left(input: Node) -> ParseResult<Expr> {
    let span = input.as_span();
    let mut children = input.into_children();
    let first = operand(next_child(span, &mut children)?)?;

    fold_operations(span, first, children)
}

fn fold_operations<'i, 'c, I>(
    span: Span<'i>,
    mut expr: Expr,
    mut children: I,
) -> ParseResult<Expr>
where
    I: Iterator<Item = Node<'i, 'c>>,
{
    while let Some(op) = children.next() {
        let op = binary_operator(&op)?;
        let right = operand(next_child(span, &mut children)?)?;

        expr = Expr::binary(op, expr, right);
    }

    Ok(expr)
}

fn negate_if(negate: bool, constant: Constant) -> Constant {
    if !negate {
        return constant;
    }

    let ty = constant.ty().clone();

    match constant.as_scalar() {
        Some(Scalar::Integer(value)) => {
            Constant::scalar(ty, Scalar::Integer(-value))
        }
        Some(Scalar::Real(value)) => Constant::scalar(ty, Scalar::Real(-value)),
        _ => constant,
    }
}

fn real_part(constant: &Constant) -> Option<f64> {
    match constant.as_scalar()? {
        Scalar::Integer(value) => Some(*value as f64),
        Scalar::Real(value) => Some(*value),
        _ => None,
    }
}

/// Rounds `value` to the precision of a real of kind `kind`.
fn round_to_kind(value: f64, kind: Kind) -> f64 {
    if kind <= 4 {
        f64::from(value as f32)
    } else {
        value
    }
}

pub(super) fn custom_error<M>(span: Span, message: M) -> Error<Rule>
where
    M: Into<String>,
{
    Error::new_from_span(
        ErrorVariant::CustomError {
            message: message.into(),
        },
        span,
    )
}

fn parse_node<T>(input: &Node) -> ParseResult<T>
where
    T: FromStr,
    T::Err: ToString,
{
    input.as_str().parse().map_err(|err: T::Err| {
        custom_error(input.as_span(), err.to_string())
    })
}
