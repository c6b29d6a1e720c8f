//! Resolution of names and argument lists into designators, procedure
//! references and operations.

use pest::Span;

use super::grammar::{custom_error, ParseResult};
use super::Context;
use crate::ir::{
    ActualArgument, ArgumentBody, ArrayRef, Assignment, BinaryOp, Component,
    ComplexPart, Convert, DataRef, Designator, Expr, Kind, NamedEntity,
    Ordering, Part, ProcedureDesignator, ProcedureRef, Scalar,
    SpecificIntrinsic, Subscript, SymbolDetails, Triplet, TypeCategory,
    UnaryOp,
};

const UNEXPECTED_SUFFIX: &str = "unexpected suffix after a function reference";

/// Intrinsic procedures recognized by name when not shadowed by a
/// declaration.
const INTRINSICS: &[&str] = &[
    "abs", "achar", "aimag", "cmplx", "cos", "exp", "iachar", "int", "lbound",
    "len", "log", "logical", "max", "min", "mod", "rank", "real", "reshape",
    "shape", "sin", "size", "sqrt", "transfer", "ubound", "uint",
];

pub enum Suffix {
    Component(String),
    Arguments(Vec<Argument>),
}

pub enum ArgumentValue {
    Expr(Expr),
    Triplet(Triplet),
}

pub struct Argument {
    pub keyword: Option<String>,
    pub value: ArgumentValue,
}

impl Argument {
    fn is_triplet(&self) -> bool {
        matches!(self.value, ArgumentValue::Triplet(_))
    }
}

/// A designator under construction.
enum Partial {
    Entity(NamedEntity),
    Ref(DataRef),
    Done(Expr),
}

pub fn designator<I>(
    cx: &Context,
    span: Span,
    name: &str,
    suffixes: I,
) -> ParseResult<Expr>
where
    I: IntoIterator<Item = Suffix>,
{
    let mut suffixes = suffixes.into_iter().peekable();

    let arguments = match suffixes.peek() {
        Some(Suffix::Arguments(arguments)) => Some(arguments),
        _ => None,
    };
    let called =
        arguments.is_some_and(|args| !args.iter().any(Argument::is_triplet));

    let lower = name.to_ascii_lowercase();
    let intrinsic_name = INTRINSICS.contains(&lower.as_str());

    if called && intrinsic_name && cx.lookup(name).is_none() {
        let Some(Suffix::Arguments(arguments)) = suffixes.next() else {
            unreachable!("intrinsic reference without arguments");
        };

        if suffixes.next().is_some() {
            return Err(custom_error(span, UNEXPECTED_SUFFIX));
        }

        return intrinsic(span, lower, arguments);
    }

    let details = if called {
        SymbolDetails::Procedure
    } else {
        SymbolDetails::Object
    };
    let symbol = cx.lookup_or_declare(name, details);

    let mut partial = Partial::Entity(NamedEntity::Symbol(symbol));

    for suffix in suffixes {
        partial = match (partial, suffix) {
            (Partial::Done(_), _) => {
                return Err(custom_error(span, UNEXPECTED_SUFFIX));
            }
            (Partial::Entity(base), Suffix::Component(name)) => {
                component(cx, DataRef::from(base), &name)
            }
            (Partial::Ref(base), Suffix::Component(name)) => {
                component(cx, base, &name)
            }
            (Partial::Entity(base), Suffix::Arguments(arguments)) => {
                subscripts_or_call(cx, span, base, arguments)?
            }
            (Partial::Ref(_), Suffix::Arguments(_)) => {
                let message = "array section cannot be subscripted";

                return Err(custom_error(span, message));
            }
        };
    }

    Ok(match partial {
        Partial::Entity(entity) => Expr::from(DataRef::from(entity)),
        Partial::Ref(data_ref) => Expr::from(data_ref),
        Partial::Done(expr) => expr,
    })
}

fn component(cx: &Context, base: DataRef, name: &str) -> Partial {
    let part = match name.to_ascii_lowercase().as_str() {
        "re" => Some(Part::Re),
        "im" => Some(Part::Im),
        _ => None,
    };

    if let Some(part) = part {
        let complex = ComplexPart {
            complex: base,
            part,
        };

        let designator = Designator::ComplexPart(Box::new(complex));

        return Partial::Done(Expr::from(designator));
    }

    let symbol = cx.lookup_or_declare(name, SymbolDetails::Component);
    let component = Component { base, symbol };

    Partial::Entity(NamedEntity::Component(Box::new(component)))
}

fn subscripts_or_call(
    cx: &Context,
    span: Span,
    base: NamedEntity,
    arguments: Vec<Argument>,
) -> ParseResult<Partial> {
    let proc = match &base {
        NamedEntity::Symbol(symbol) if cx.is_procedure(*symbol) => {
            Some(ProcedureDesignator::Symbol(*symbol))
        }
        NamedEntity::Component(component)
            if cx.is_procedure(component.symbol) =>
        {
            Some(ProcedureDesignator::Component(component.clone()))
        }
        _ => None,
    };

    if let Some(proc) = proc {
        let call = ProcedureRef::new(proc, actual_arguments(span, arguments)?);

        return Ok(Partial::Done(Expr::from(call)));
    }

    let subscripts = arguments
        .into_iter()
        .map(|arg| match (arg.keyword, arg.value) {
            (Some(_), _) => {
                Err(custom_error(span, "keyword in a subscript list"))
            }
            (None, ArgumentValue::Expr(expr)) => Ok(Subscript::Expr(expr)),
            (None, ArgumentValue::Triplet(triplet)) => {
                Ok(Subscript::Triplet(triplet))
            }
        })
        .collect::<ParseResult<_>>()?;
    let array = ArrayRef { base, subscripts };

    Ok(Partial::Ref(DataRef::ArrayRef(Box::new(array))))
}

fn actual_arguments(
    span: Span,
    arguments: Vec<Argument>,
) -> ParseResult<Vec<Option<ActualArgument>>> {
    arguments
        .into_iter()
        .map(|arg| {
            let ArgumentValue::Expr(expr) = arg.value else {
                let message = "section triplet in an argument list";

                return Err(custom_error(span, message));
            };

            let argument = ActualArgument::expr(expr);

            Ok(Some(match arg.keyword {
                Some(keyword) => argument.with_keyword(keyword),
                None => argument,
            }))
        })
        .collect()
}

/// Parses a reference to an intrinsic procedure, recognizing the spellings
/// of operations and kind conversions.
fn intrinsic(
    span: Span,
    name: String,
    arguments: Vec<Argument>,
) -> ParseResult<Expr> {
    let arguments = actual_arguments(span, arguments)?;

    if let Some(expr) = operation(&name, &arguments) {
        return Ok(expr);
    }

    let proc = ProcedureDesignator::Intrinsic(SpecificIntrinsic { name });

    Ok(Expr::from(ProcedureRef::new(proc, arguments)))
}

fn operation(name: &str, arguments: &[Option<ActualArgument>]) -> Option<Expr> {
    match (name, positional(arguments).as_deref()) {
        ("min", Some([a, b])) => {
            return Some(Expr::binary(
                BinaryOp::Extremum(Ordering::Less),
                a.clone(),
                b.clone(),
            ));
        }
        ("max", Some([a, b])) => {
            return Some(Expr::binary(
                BinaryOp::Extremum(Ordering::Greater),
                a.clone(),
                b.clone(),
            ));
        }
        ("real", Some([z])) => {
            return Some(Expr::unary(
                UnaryOp::ComplexComponent { imaginary: false },
                z.clone(),
            ));
        }
        ("aimag", Some([z])) => {
            return Some(Expr::unary(
                UnaryOp::ComplexComponent { imaginary: true },
                z.clone(),
            ));
        }
        _ => {}
    }

    let (operand, kind) = kind_conversion(arguments)?;

    let (category, operand) = match name {
        "int" => (TypeCategory::Integer, operand.clone()),
        "uint" => (TypeCategory::Unsigned, operand.clone()),
        "real" => (TypeCategory::Real, operand.clone()),
        "cmplx" => (TypeCategory::Complex, operand.clone()),
        "logical" => (TypeCategory::Logical, operand.clone()),
        "achar" => (TypeCategory::Character, iachar_operand(operand)?.clone()),
        _ => return None,
    };

    Some(Expr::Convert(Convert::new(category, kind, operand)))
}

/// The argument expressions, if none of them has a keyword.
fn positional(arguments: &[Option<ActualArgument>]) -> Option<Vec<Expr>> {
    arguments
        .iter()
        .map(|arg| match arg {
            Some(ActualArgument {
                body: ArgumentBody::Expr(expr),
                keyword: None,
                ..
            }) => Some(expr.clone()),
            _ => None,
        })
        .collect()
}

/// Matches `(x,kind=K)` with a constant integer `K`.
fn kind_conversion(
    arguments: &[Option<ActualArgument>],
) -> Option<(&Expr, Kind)> {
    let [Some(operand), Some(kind)] = arguments else {
        return None;
    };

    let ArgumentBody::Expr(operand_expr) = &operand.body else {
        return None;
    };
    let ArgumentBody::Expr(kind_expr) = &kind.body else {
        return None;
    };

    if operand.keyword.is_some() || kind.keyword.as_deref() != Some("kind") {
        return None;
    }

    match kind_expr.as_constant()?.as_scalar()? {
        Scalar::Integer(value) => {
            Some((operand_expr, Kind::try_from(*value).ok()?))
        }
        _ => None,
    }
}

/// The operand of `iachar(x)`.
fn iachar_operand(expr: &Expr) -> Option<&Expr> {
    let Expr::FunctionRef(call) = expr else {
        return None;
    };

    match (call.proc(), call.arguments()) {
        (ProcedureDesignator::Intrinsic(intrinsic), [Some(arg)])
            if intrinsic.name == "iachar" && arg.keyword.is_none() =>
        {
            match &arg.body {
                ArgumentBody::Expr(expr) => Some(expr),
                _ => None,
            }
        }
        _ => None,
    }
}

pub fn pointer_assignment(
    span: Span,
    lhs: Expr,
    rhs: Expr,
    bounds: Vec<(Expr, Option<Expr>)>,
) -> ParseResult<Assignment> {
    if bounds.iter().all(|(_, upper)| upper.is_none()) {
        let bounds = bounds.into_iter().map(|(lower, _)| lower).collect();

        return Ok(Assignment::BoundsSpec { lhs, rhs, bounds });
    }

    let bounds = bounds
        .into_iter()
        .map(|(lower, upper)| upper.map(|upper| (lower, upper)))
        .collect::<Option<_>>()
        .ok_or_else(|| {
            custom_error(span, "bounds-spec and bounds-remapping cannot be mixed")
        })?;

    Ok(Assignment::BoundsRemapping { lhs, rhs, bounds })
}

/// Decodes a quoted character literal, undoing doubled delimiters and, in
/// double-quoted literals, backslash escapes. Returns `None` if the decoded
/// bytes are not UTF-8.
pub fn unquote(text: &str) -> Option<String> {
    let delimiter = text.chars().next()?;
    let body = &text[1..text.len() - 1];

    if delimiter == '\'' {
        return Some(body.replace("''", "'"));
    }

    let bytes = body.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        i += 1;

        if byte == b'"' {
            // Doubled quote.
            out.push(b'"');
            i += 1;
            continue;
        }

        if byte != b'\\' || i == bytes.len() {
            out.push(byte);
            continue;
        }

        let escape = bytes[i];
        i += 1;

        let decoded = match escape {
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'v' => 0x0b,
            b'0'..=b'7' => {
                let mut value = u32::from(escape - b'0');
                let mut digits = 1;

                while digits < 3
                    && i < bytes.len()
                    && matches!(bytes[i], b'0'..=b'7')
                {
                    value = value * 8 + u32::from(bytes[i] - b'0');
                    digits += 1;
                    i += 1;
                }

                u8::try_from(value).ok()?
            }
            other => other,
        };

        out.push(decoded);
    }

    String::from_utf8(out).ok()
}
