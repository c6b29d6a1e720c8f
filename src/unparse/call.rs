//! Procedure references and assignment statements.

use std::fmt::{self, Write};

use super::{write_list, AsFortran, Unparser};
use crate::ir::{
    ActualArgument, ArgumentBody, Assignment, PercentForm, ProcedureDesignator,
    ProcedureRef,
};

impl AsFortran for ProcedureDesignator {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        match self {
            ProcedureDesignator::Intrinsic(intrinsic) => {
                w.write_str(&intrinsic.name)
            }
            ProcedureDesignator::Symbol(symbol) => symbol.as_fortran(cx, w),
            ProcedureDesignator::Component(component) => {
                component.as_fortran(cx, w)
            }
        }
    }
}

impl AsFortran for ArgumentBody {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        match self {
            ArgumentBody::Expr(expr) => expr.as_fortran(cx, w),
            ArgumentBody::AssumedType(symbol) => symbol.as_fortran(cx, w),
            ArgumentBody::Label(label) => write!(w, "*{label}"),
        }
    }
}

impl AsFortran for ActualArgument {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        if let Some(keyword) = &self.keyword {
            write!(w, "{keyword}=")?;
        }

        match self.percent {
            Some(PercentForm::Val) => w.write_str("%VAL(")?,
            Some(PercentForm::Ref) => w.write_str("%REF(")?,
            None => {}
        }

        self.body.as_fortran(cx, w)?;

        if self.percent.is_some() {
            w.write_char(')')?;
        }

        Ok(())
    }
}

/// Writes `obj%proc<<<grid,block>>>(args)`. The passed object, if any, is
/// written ahead of the designator and dropped from the argument list.
/// Omitted arguments are skipped. The parentheses are always written.
impl AsFortran for ProcedureRef {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        if let Some(object) = self.passed_object() {
            object.body.as_fortran(cx, w)?;
            w.write_char('%')?;
        }

        self.proc().as_fortran(cx, w)?;

        if !self.chevrons().is_empty() {
            w.write_str("<<<")?;
            write_list(cx, w, self.chevrons())?;
            w.write_str(">>>")?;
        }

        let arguments = self
            .arguments()
            .iter()
            .flatten()
            .filter(|arg| !arg.passed_object);

        w.write_char('(')?;
        write_list(cx, w, arguments)?;
        w.write_char(')')
    }
}

impl AsFortran for Assignment {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        match self {
            Assignment::Intrinsic { lhs, rhs } => {
                lhs.as_fortran(cx, w)?;
                w.write_char('=')?;
                rhs.as_fortran(cx, w)
            }
            Assignment::Defined(call) => {
                w.write_str("CALL ")?;
                call.as_fortran(cx, w)
            }
            Assignment::BoundsSpec { lhs, rhs, bounds } => {
                lhs.as_fortran(cx, w)?;

                for (i, lower) in bounds.iter().enumerate() {
                    w.write_char(if i == 0 { '(' } else { ',' })?;
                    lower.as_fortran(cx, w)?;
                    w.write_char(':')?;
                }

                if !bounds.is_empty() {
                    w.write_char(')')?;
                }

                w.write_str("=>")?;
                rhs.as_fortran(cx, w)
            }
            Assignment::BoundsRemapping { lhs, rhs, bounds } => {
                lhs.as_fortran(cx, w)?;

                for (i, (lower, upper)) in bounds.iter().enumerate() {
                    w.write_char(if i == 0 { '(' } else { ',' })?;
                    lower.as_fortran(cx, w)?;
                    w.write_char(':')?;
                    upper.as_fortran(cx, w)?;
                }

                if !bounds.is_empty() {
                    w.write_char(')')?;
                }

                w.write_str("=>")?;
                rhs.as_fortran(cx, w)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{
        BinaryOp, Component, DataRef, Expr, SpecificIntrinsic, SymbolDetails,
        SymbolIdx, SymbolTable,
    };

    struct Fixture {
        symbols: SymbolTable,
        f: SymbolIdx,
        x: SymbolIdx,
        p: SymbolIdx,
        obj: SymbolIdx,
        area: SymbolIdx,
    }

    fn fixture() -> Fixture {
        let mut symbols = SymbolTable::new();

        Fixture {
            f: symbols.declare("f", SymbolDetails::Procedure),
            x: symbols.declare("x", SymbolDetails::Object),
            p: symbols.declare("p", SymbolDetails::Object),
            obj: symbols.declare("obj", SymbolDetails::Object),
            area: symbols.declare("area", SymbolDetails::Procedure),
            symbols,
        }
    }

    #[test]
    fn empty_call() {
        let fx = fixture();
        let cx = Unparser::new(&fx.symbols);
        let call = ProcedureRef::new(ProcedureDesignator::Symbol(fx.f), vec![]);

        assert_eq!(call.to_fortran(&cx), "f()");
    }

    #[test]
    fn arguments() {
        let fx = fixture();
        let cx = Unparser::new(&fx.symbols);
        let call = ProcedureRef::new(
            ProcedureDesignator::Symbol(fx.f),
            vec![
                Some(ActualArgument::expr(Expr::symbol(fx.x))),
                None,
                Some(
                    ActualArgument::expr(Expr::integer(1))
                        .with_keyword("dim")
                        .with_percent(PercentForm::Val),
                ),
                Some(ActualArgument::new(ArgumentBody::Label(100))),
                Some(ActualArgument::new(ArgumentBody::AssumedType(fx.p))),
            ],
        );

        assert_eq!(call.to_fortran(&cx), "f(x,dim=%VAL(1_4),*100,p)");
    }

    #[test]
    fn intrinsic_reference() {
        let fx = fixture();
        let cx = Unparser::new(&fx.symbols);
        let sum =
            Expr::binary(BinaryOp::Add, Expr::symbol(fx.x), Expr::integer(1));
        let call = ProcedureRef::new(
            ProcedureDesignator::Intrinsic(SpecificIntrinsic {
                name: "sqrt".into(),
            }),
            vec![Some(ActualArgument::expr(sum))],
        );

        assert_eq!(Expr::from(call).to_fortran(&cx), "sqrt(x+1_4)");
    }

    #[test]
    fn passed_object_and_chevrons() {
        let fx = fixture();
        let cx = Unparser::new(&fx.symbols);
        let binding = ProcedureRef::new(
            ProcedureDesignator::Symbol(fx.area),
            vec![
                Some(ActualArgument::expr(Expr::symbol(fx.obj)).passed_object()),
                Some(ActualArgument::expr(Expr::symbol(fx.x))),
            ],
        );
        let kernel = ProcedureRef::new(ProcedureDesignator::Symbol(fx.f), vec![])
            .with_chevrons(vec![Expr::integer(1), Expr::integer(32)]);

        assert_eq!(binding.to_fortran(&cx), "obj%area(x)");
        assert_eq!(kernel.to_fortran(&cx), "f<<<1_4,32_4>>>()");
    }

    #[test]
    fn component_designator() {
        let fx = fixture();
        let cx = Unparser::new(&fx.symbols);
        let proc = ProcedureDesignator::Component(Box::new(Component {
            base: DataRef::Symbol(fx.obj),
            symbol: fx.area,
        }));

        assert_eq!(
            ProcedureRef::new(proc, vec![]).to_fortran(&cx),
            "obj%area()"
        );
    }

    #[test]
    #[should_panic(expected = "more than one passed-object argument")]
    fn two_passed_objects() {
        let fx = fixture();
        let object = || {
            Some(ActualArgument::expr(Expr::symbol(fx.obj)).passed_object())
        };
        let proc = ProcedureDesignator::Symbol(fx.f);

        ProcedureRef::new(proc, vec![object(), object()]);
    }

    #[test]
    #[should_panic(expected = "passed object is not a designator")]
    fn passed_object_expression() {
        let fx = fixture();
        let sum = Expr::binary(
            BinaryOp::Add,
            Expr::symbol(fx.x),
            Expr::symbol(fx.obj),
        );
        let object = ActualArgument::expr(sum).passed_object();

        let proc = ProcedureDesignator::Symbol(fx.area);

        ProcedureRef::new(proc, vec![Some(object)]);
    }

    #[test]
    fn assignments() {
        let fx = fixture();
        let cx = Unparser::new(&fx.symbols);
        let (x, p) = (Expr::symbol(fx.x), Expr::symbol(fx.p));

        let intrinsic = Assignment::Intrinsic {
            lhs: x.clone(),
            rhs: Expr::integer(2),
        };
        assert_eq!(intrinsic.to_fortran(&cx), "x=2_4");

        let defined = Assignment::Defined(ProcedureRef::new(
            ProcedureDesignator::Symbol(fx.f),
            vec![
                Some(ActualArgument::expr(x.clone())),
                Some(ActualArgument::expr(p.clone())),
            ],
        ));
        assert_eq!(defined.to_fortran(&cx), "CALL f(x,p)");

        let plain = Assignment::BoundsSpec {
            lhs: p.clone(),
            rhs: x.clone(),
            bounds: vec![],
        };
        assert_eq!(plain.to_fortran(&cx), "p=>x");

        let spec = Assignment::BoundsSpec {
            lhs: p.clone(),
            rhs: x.clone(),
            bounds: vec![Expr::integer(0), Expr::integer(2)],
        };
        assert_eq!(spec.to_fortran(&cx), "p(0_4:,2_4:)=>x");

        let remap = Assignment::BoundsRemapping {
            lhs: p,
            rhs: x,
            bounds: vec![(Expr::integer(1), Expr::integer(10))],
        };
        assert_eq!(remap.to_fortran(&cx), "p(1_4:10_4)=>x");
    }

    #[test]
    fn display_adapter() {
        let fx = fixture();
        let cx = Unparser::new(&fx.symbols);
        let call = ProcedureRef::new(ProcedureDesignator::Symbol(fx.f), vec![]);

        assert_eq!(format!("y = {}", call.fortran(&cx)), "y = f()");
    }
}
