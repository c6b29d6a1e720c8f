//! Unparsing generated trees and parsing the result back.
//!
//! Trees are compared after dropping parentheses, folding negated literals
//! into negative constants and spelling rank-one array constants as array
//! constructors, since none of these survive the trip through source.

use super::{FortranParser, Statement};
use crate::ir::{
    ActualArgument, ArgumentBody, ArrayConstructor, ArrayConstructorValue,
    ArrayRef, Assignment, BinaryOp, CharLength, Component, ComplexPart,
    Constant, Convert, DataRef, DefinedOperator, Designator, DynamicType, Expr,
    LogicalOperator, NamedEntity, Operation, Ordering, Part,
    ProcedureDesignator, ProcedureRef, RelationalOperator, Scalar,
    SpecificIntrinsic, Subscript, SymbolDetails, SymbolIdx, SymbolTable,
    Triplet, TypeCategory, UnaryOp,
};
use crate::unparse::{AsFortran, Unparser};

const CASES: usize = 600;
const DEPTH: u32 = 4;

/// Characters of generated literals: delimiters, escapes and a multi-byte
/// character. Digits are left out so that an octal escape is never
/// followed by one.
const ALPHABET: &[char] =
    &['a', 'Z', ' ', '\'', '"', '\\', '\t', '\u{1}', 'é'];

struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;

        x.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }

    fn chance(&mut self, percent: u64) -> bool {
        self.next() % 100 < percent
    }

    fn pick<T: Clone>(&mut self, items: &[T]) -> T {
        items[self.below(items.len())].clone()
    }
}

struct Names {
    scalars: [SymbolIdx; 3],
    complex: SymbolIdx,
    strings: [SymbolIdx; 2],
    flags: [SymbolIdx; 2],
    arrays: [SymbolIdx; 2],
    functions: [SymbolIdx; 2],
    object: SymbolIdx,
    field: SymbolIdx,
    pointer: SymbolIdx,
}

impl Names {
    fn declare(symbols: &mut SymbolTable) -> Names {
        let mut object =
            |name: &str| symbols.declare(name, SymbolDetails::Object);

        let scalars = [object("a"), object("b"), object("c")];
        let complex = object("z");
        let strings = [object("s"), object("t")];
        let flags = [object("p"), object("q")];
        let arrays = [object("v"), object("w")];
        let obj = object("obj");
        let pointer = object("ptr");

        Names {
            scalars,
            complex,
            strings,
            flags,
            arrays,
            functions: [
                symbols.declare("f", SymbolDetails::Procedure),
                symbols.declare("g", SymbolDetails::Procedure),
            ],
            object: obj,
            field: symbols.declare("next", SymbolDetails::Component),
            pointer,
        }
    }
}

/// Generates trees whose source form parses back unambiguously: character
/// and arithmetic operations are not mixed, and relations are never
/// operands of relations.
struct Generator {
    rng: Rng,
    names: Names,
}

impl Generator {
    fn statement(&mut self) -> Statement {
        match self.rng.below(8) {
            0 => Statement::Assignment(Assignment::Intrinsic {
                lhs: self.variable(),
                rhs: self.numeric(DEPTH),
            }),
            1 => {
                let call = self.call(self.names.functions[1], DEPTH);

                Statement::Assignment(Assignment::Defined(call))
            }
            2 => Statement::Assignment(self.pointer_assignment()),
            3 | 4 => Statement::Expr(self.logical(DEPTH)),
            5 => Statement::Expr(self.character(DEPTH)),
            _ => Statement::Expr(self.numeric(DEPTH)),
        }
    }

    fn pointer_assignment(&mut self) -> Assignment {
        let lhs = if self.rng.chance(50) {
            Expr::symbol(self.names.pointer)
        } else {
            self.field()
        };
        let rhs = Expr::symbol(self.rng.pick(&self.names.arrays));
        let rank = self.rng.below(3);

        if self.rng.chance(50) {
            let bounds = (0..rank).map(|_| self.numeric(1)).collect();

            Assignment::BoundsSpec { lhs, rhs, bounds }
        } else {
            let bounds = (0..rank.max(1))
                .map(|_| (self.numeric(1), self.numeric(1)))
                .collect();

            Assignment::BoundsRemapping { lhs, rhs, bounds }
        }
    }

    fn variable(&mut self) -> Expr {
        match self.rng.below(3) {
            0 => Expr::symbol(self.rng.pick(&self.names.scalars)),
            1 => self.array_ref(1),
            _ => self.field(),
        }
    }

    fn field(&mut self) -> Expr {
        let component = Component {
            base: DataRef::Symbol(self.names.object),
            symbol: self.names.field,
        };

        Expr::from(DataRef::Component(Box::new(component)))
    }

    fn array_ref(&mut self, depth: u32) -> Expr {
        let count = 1 + self.rng.below(2);
        let subscripts = (0..count)
            .map(|_| {
                if self.rng.chance(60) {
                    Subscript::Expr(self.numeric(depth))
                } else {
                    Subscript::Triplet(Triplet {
                        lower: self.maybe_numeric(depth),
                        upper: self.maybe_numeric(depth),
                        stride: self.maybe_numeric(depth),
                    })
                }
            })
            .collect();

        let array = ArrayRef {
            base: NamedEntity::Symbol(self.rng.pick(&self.names.arrays)),
            subscripts,
        };

        Expr::from(DataRef::ArrayRef(Box::new(array)))
    }

    fn maybe_numeric(&mut self, depth: u32) -> Option<Expr> {
        self.rng.chance(50).then(|| self.numeric(depth))
    }

    fn call(&mut self, proc: SymbolIdx, depth: u32) -> ProcedureRef {
        let count = self.rng.below(3);
        let mut arguments: Vec<_> = (0..count)
            .map(|_| Some(ActualArgument::expr(self.numeric(depth))))
            .collect();

        if self.rng.chance(30) {
            let argument = ActualArgument::expr(self.numeric(depth));

            arguments.push(Some(argument.with_keyword("dim")));
        }

        ProcedureRef::new(ProcedureDesignator::Symbol(proc), arguments)
    }

    fn numeric(&mut self, depth: u32) -> Expr {
        if depth == 0 || self.rng.chance(25) {
            return self.numeric_primary();
        }

        let d = depth - 1;

        match self.rng.below(16) {
            0 => Expr::binary(BinaryOp::Add, self.numeric(d), self.numeric(d)),
            1 => Expr::binary(
                BinaryOp::Subtract,
                self.numeric(d),
                self.numeric(d),
            ),
            2 => Expr::binary(
                BinaryOp::Multiply,
                self.numeric(d),
                self.numeric(d),
            ),
            3 => Expr::binary(
                BinaryOp::Divide,
                self.numeric(d),
                self.numeric(d),
            ),
            4 => Expr::binary(
                BinaryOp::Power,
                self.numeric(d),
                self.numeric(d),
            ),
            5 | 6 => Expr::unary(UnaryOp::Negate, self.numeric(d)),
            7 => {
                let ordering =
                    self.rng.pick(&[Ordering::Less, Ordering::Greater]);

                Expr::binary(
                    BinaryOp::Extremum(ordering),
                    self.numeric(d),
                    self.numeric(d),
                )
            }
            8 => Expr::unary(
                UnaryOp::ComplexComponent {
                    imaginary: self.rng.chance(50),
                },
                self.numeric(d),
            ),
            9 => Expr::unary(UnaryOp::Parentheses, self.numeric(d)),
            10 => {
                let name = self.rng.pick(&[".inv.", ".neg."]);
                let op = DefinedOperator::new(name);

                Expr::unary(UnaryOp::Defined(op), self.numeric(d))
            }
            11 => {
                let name = self.rng.pick(&[".cross.", ".dot."]);
                let op = BinaryOp::Defined(DefinedOperator::new(name));

                Expr::binary(op, self.numeric(d), self.numeric(d))
            }
            12 => Expr::from(self.call(self.names.functions[0], d)),
            13 => {
                let name = self.rng.pick(&["sqrt", "abs", "exp"]).to_string();
                let proc =
                    ProcedureDesignator::Intrinsic(SpecificIntrinsic { name });
                let argument = ActualArgument::expr(self.numeric(d));

                Expr::from(ProcedureRef::new(proc, vec![Some(argument)]))
            }
            14 => {
                let category = self.rng.pick(&[
                    TypeCategory::Integer,
                    TypeCategory::Unsigned,
                    TypeCategory::Real,
                    TypeCategory::Complex,
                ]);
                let kind = self.rng.pick(&[4, 8]);

                Expr::Convert(Convert::new(category, kind, self.numeric(d)))
            }
            _ => {
                // A literal real part would read back as a complex literal.
                let re = Expr::symbol(self.rng.pick(&self.names.scalars));

                Expr::binary(BinaryOp::ComplexConstructor, re, self.numeric(d))
            }
        }
    }

    fn numeric_primary(&mut self) -> Expr {
        match self.rng.below(12) {
            0 | 1 => {
                let value = self.rng.below(1000) as i128;
                let value = if self.rng.chance(20) { -value } else { value };

                let kind = self.rng.pick(&[4, 8]);

                Expr::Constant(Constant::integer(value, kind))
            }
            2 => {
                let value = self.rng.below(100) as u128;

                let kind = self.rng.pick(&[1, 2]);

                Expr::Constant(Constant::unsigned(value, kind))
            }
            3 => {
                let value = self.quarter();
                let kind = self.rng.pick(&[4, 8]);

                Expr::Constant(Constant::real(value, kind))
            }
            4 => {
                let (re, im) = (self.quarter(), self.quarter());

                Expr::Constant(Constant::complex(re, im, 4))
            }
            5 => {
                let count = self.rng.below(3);
                let values = (0..count)
                    .map(|_| Scalar::Integer(self.rng.below(9) as i128 - 4))
                    .collect();

                Expr::Constant(Constant::array(
                    DynamicType::integer(8),
                    values,
                    &[count as i64],
                ))
            }
            6 => {
                let values = (0..1 + self.rng.below(2))
                    .map(|_| ArrayConstructorValue::Expr(self.numeric(0)))
                    .collect();

                Expr::ArrayConstructor(ArrayConstructor {
                    ty: DynamicType::real(4),
                    values,
                })
            }
            7 => self.array_ref(0),
            8 => self.field(),
            9 => {
                let complex = ComplexPart {
                    complex: DataRef::Symbol(self.names.complex),
                    part: self.rng.pick(&[Part::Re, Part::Im]),
                };

                Expr::from(Designator::ComplexPart(Box::new(complex)))
            }
            _ => Expr::symbol(self.rng.pick(&self.names.scalars)),
        }
    }

    /// A multiple of 1/4, exact at every real kind.
    fn quarter(&mut self) -> f64 {
        (self.rng.below(41) as f64 - 20.0) / 4.0
    }

    fn string(&mut self, len: usize) -> String {
        (0..len).map(|_| self.rng.pick(ALPHABET)).collect()
    }

    fn character(&mut self, depth: u32) -> Expr {
        if depth == 0 || self.rng.chance(30) {
            return self.character_primary();
        }

        let d = depth - 1;

        match self.rng.below(4) {
            0 => Expr::Convert(Convert::new(
                TypeCategory::Character,
                self.rng.pick(&[1, 4]),
                self.character(d),
            )),
            _ => Expr::binary(
                BinaryOp::Concat,
                self.character(d),
                self.character(d),
            ),
        }
    }

    fn character_primary(&mut self) -> Expr {
        match self.rng.below(5) {
            0 | 1 => {
                let len = self.rng.below(4);
                let value = self.string(len);

                let kind = self.rng.pick(&[1, 4]);

                Expr::Constant(Constant::character(value, kind))
            }
            2 => {
                let len = 1 + self.rng.below(2);
                let values = (0..2)
                    .map(|_| Scalar::Character(self.string(len)))
                    .collect();
                let len = CharLength::Known(len as i64);
                let ty = DynamicType::character(1, Some(len));

                Expr::Constant(Constant::array(ty, values, &[2]))
            }
            3 => {
                let len = self.rng.chance(50).then(|| CharLength::Known(2));
                let values = self
                    .names
                    .strings
                    .iter()
                    .map(|&s| ArrayConstructorValue::Expr(Expr::symbol(s)))
                    .collect();

                Expr::ArrayConstructor(ArrayConstructor {
                    ty: DynamicType::character(1, len),
                    values,
                })
            }
            _ => Expr::symbol(self.rng.pick(&self.names.strings)),
        }
    }

    fn logical(&mut self, depth: u32) -> Expr {
        if depth == 0 || self.rng.chance(20) {
            return self.logical_primary();
        }

        let d = depth - 1;

        match self.rng.below(8) {
            0 | 1 => {
                let op = self.rng.pick(&[
                    LogicalOperator::And,
                    LogicalOperator::Or,
                    LogicalOperator::Eqv,
                    LogicalOperator::Neqv,
                ]);

                Expr::binary(
                    BinaryOp::Logical(op),
                    self.logical(d),
                    self.logical(d),
                )
            }
            2 => Expr::unary(UnaryOp::Not, self.logical(d)),
            3 => Expr::Convert(Convert::new(
                TypeCategory::Logical,
                self.rng.pick(&[1, 8]),
                self.logical(d),
            )),
            4 => {
                let op = self.relational_operator();

                Expr::binary(op, self.character(d), self.character(d))
            }
            _ => {
                let op = self.relational_operator();

                Expr::binary(op, self.numeric(d), self.numeric(d))
            }
        }
    }

    fn relational_operator(&mut self) -> BinaryOp {
        BinaryOp::Relational(self.rng.pick(&[
            RelationalOperator::Lt,
            RelationalOperator::Le,
            RelationalOperator::Eq,
            RelationalOperator::Ne,
            RelationalOperator::Ge,
            RelationalOperator::Gt,
        ]))
    }

    fn logical_primary(&mut self) -> Expr {
        if self.rng.chance(50) {
            Expr::symbol(self.rng.pick(&self.names.flags))
        } else {
            let value = self.rng.chance(50);

            Expr::Constant(Constant::logical(value, self.rng.pick(&[4, 8])))
        }
    }
}

fn normalize_statement(statement: &Statement) -> Statement {
    match statement {
        Statement::Expr(expr) => Statement::Expr(normalize(expr)),
        Statement::Assignment(assignment) => {
            Statement::Assignment(normalize_assignment(assignment))
        }
    }
}

fn normalize_assignment(assignment: &Assignment) -> Assignment {
    match assignment {
        Assignment::Intrinsic { lhs, rhs } => Assignment::Intrinsic {
            lhs: normalize(lhs),
            rhs: normalize(rhs),
        },
        Assignment::Defined(call) => Assignment::Defined(normalize_call(call)),
        Assignment::BoundsSpec { lhs, rhs, bounds } => Assignment::BoundsSpec {
            lhs: normalize(lhs),
            rhs: normalize(rhs),
            bounds: bounds.iter().map(normalize).collect(),
        },
        Assignment::BoundsRemapping { lhs, rhs, bounds } => {
            Assignment::BoundsRemapping {
                lhs: normalize(lhs),
                rhs: normalize(rhs),
                bounds: bounds
                    .iter()
                    .map(|(lower, upper)| (normalize(lower), normalize(upper)))
                    .collect(),
            }
        }
    }
}

fn normalize_call(call: &ProcedureRef) -> ProcedureRef {
    let arguments = call
        .arguments()
        .iter()
        .map(|arg| {
            arg.clone().map(|mut arg| {
                if let ArgumentBody::Expr(expr) = &arg.body {
                    arg.body = ArgumentBody::Expr(normalize(expr));
                }

                arg
            })
        })
        .collect();

    ProcedureRef::new(call.proc().clone(), arguments)
}

fn normalize(expr: &Expr) -> Expr {
    match expr {
        Expr::Operation(Operation::Unary { op, operand }) => {
            let operand = normalize(operand);

            match op {
                UnaryOp::Parentheses => operand,
                UnaryOp::Negate => match negated_literal(&operand) {
                    Some(constant) => Expr::Constant(constant),
                    None => Expr::unary(UnaryOp::Negate, operand),
                },
                _ => Expr::unary(op.clone(), operand),
            }
        }
        Expr::Operation(Operation::Binary { op, left, right }) => {
            Expr::binary(op.clone(), normalize(left), normalize(right))
        }
        Expr::Convert(convert) => Expr::Convert(Convert::new(
            convert.category(),
            convert.kind(),
            normalize(convert.operand()),
        )),
        Expr::FunctionRef(call) => Expr::from(normalize_call(call)),
        Expr::Designator(Designator::DataRef(DataRef::ArrayRef(array))) => {
            let subscripts = array
                .subscripts
                .iter()
                .map(|subscript| match subscript {
                    Subscript::Expr(expr) => Subscript::Expr(normalize(expr)),
                    Subscript::Triplet(triplet) => Subscript::Triplet(Triplet {
                        lower: triplet.lower.as_ref().map(normalize),
                        upper: triplet.upper.as_ref().map(normalize),
                        stride: triplet.stride.as_ref().map(normalize),
                    }),
                })
                .collect();
            let array = ArrayRef {
                base: array.base.clone(),
                subscripts,
            };

            Expr::from(DataRef::ArrayRef(Box::new(array)))
        }
        Expr::ArrayConstructor(array) => {
            let values = array
                .values
                .iter()
                .map(|value| match value {
                    ArrayConstructorValue::Expr(expr) => {
                        ArrayConstructorValue::Expr(normalize(expr))
                    }
                    other => other.clone(),
                })
                .collect();

            Expr::ArrayConstructor(ArrayConstructor {
                ty: array.ty.clone(),
                values,
            })
        }
        Expr::Constant(constant) if constant.rank() == 1 => {
            Expr::ArrayConstructor(array_constant(constant))
        }
        other => other.clone(),
    }
}

fn negated_literal(expr: &Expr) -> Option<Constant> {
    let constant = expr.as_constant()?;
    let ty = constant.ty().clone();

    match constant.as_scalar()? {
        Scalar::Integer(value) if *value >= 0 => {
            Some(Constant::scalar(ty, Scalar::Integer(-value)))
        }
        Scalar::Real(value) if value.is_sign_positive() => {
            Some(Constant::scalar(ty, Scalar::Real(-value)))
        }
        _ => None,
    }
}

fn array_constant(constant: &Constant) -> ArrayConstructor {
    let ty = match constant.ty() {
        DynamicType::Character { kind, .. } => DynamicType::character(
            *kind,
            constant.char_length().map(CharLength::Known),
        ),
        ty => ty.clone(),
    };

    let values = constant
        .values()
        .iter()
        .map(|value| {
            let element = match (value, &ty) {
                (
                    Scalar::Character(value),
                    DynamicType::Character { kind, .. },
                ) => Constant::character(value.clone(), *kind),
                _ => Constant::scalar(ty.clone(), value.clone()),
            };

            ArrayConstructorValue::Expr(Expr::Constant(element))
        })
        .collect();

    ArrayConstructor { ty, values }
}

fn reparse(text: &str, symbols: &mut SymbolTable) -> Statement {
    FortranParser::parse_statement(text, symbols)
        .unwrap_or_else(|err| panic!("failed to parse `{text}`:\n{err}"))
}

#[test]
fn generated_trees_round_trip() {
    let mut symbols = SymbolTable::new();
    let names = Names::declare(&mut symbols);
    let mut generator = Generator {
        rng: Rng(0x5eed_f0e7_2a11_c0de),
        names,
    };

    for _ in 0..CASES {
        let statement = generator.statement();
        let text = statement.to_fortran(&Unparser::new(&symbols));
        let parsed = reparse(&text, &mut symbols);

        assert_eq!(
            normalize_statement(&parsed),
            normalize_statement(&statement),
            "{text}"
        );

        // The output of the parser is already in canonical form.
        let canonical = parsed.to_fortran(&Unparser::new(&symbols));
        let again = reparse(&canonical, &mut symbols);

        assert_eq!(again.to_fortran(&Unparser::new(&symbols)), canonical);
    }
}
