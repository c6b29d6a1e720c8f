//! Procedure references.

use super::expr::Expr;
use super::symbols::SymbolIdx;
use super::variable::Component;

#[derive(Clone, Debug, PartialEq)]
pub struct SpecificIntrinsic {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProcedureDesignator {
    Intrinsic(SpecificIntrinsic),
    Symbol(SymbolIdx),
    /// A procedure pointer component or a type-bound procedure binding.
    Component(Box<Component>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PercentForm {
    Val,
    Ref,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ArgumentBody {
    Expr(Expr),
    /// An assumed-type (`TYPE(*)`) dummy argument passed along.
    AssumedType(SymbolIdx),
    /// An alternate return label.
    Label(u64),
}

impl ArgumentBody {
    /// Whether the argument can be written ahead of `%` as an object.
    pub fn is_designator(&self) -> bool {
        matches!(
            self,
            ArgumentBody::Expr(Expr::Designator(_))
                | ArgumentBody::AssumedType(_)
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActualArgument {
    pub body: ArgumentBody,
    pub keyword: Option<String>,
    pub passed_object: bool,
    pub percent: Option<PercentForm>,
}

impl ActualArgument {
    pub fn new(body: ArgumentBody) -> ActualArgument {
        ActualArgument {
            body,
            keyword: None,
            passed_object: false,
            percent: None,
        }
    }

    pub fn expr(expr: Expr) -> ActualArgument {
        ActualArgument::new(ArgumentBody::Expr(expr))
    }

    pub fn with_keyword<S: Into<String>>(mut self, keyword: S) -> ActualArgument {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_percent(mut self, percent: PercentForm) -> ActualArgument {
        self.percent = Some(percent);
        self
    }

    pub fn passed_object(mut self) -> ActualArgument {
        self.passed_object = true;
        self
    }
}

/// A function or subroutine reference. Omitted optional arguments are
/// `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcedureRef {
    proc: ProcedureDesignator,
    arguments: Vec<Option<ActualArgument>>,
    chevrons: Vec<Expr>,
}

impl ProcedureRef {
    /// # Panics
    ///
    /// Panics if more than one argument is the passed object, or if the
    /// passed object is not a designator.
    pub fn new(
        proc: ProcedureDesignator,
        arguments: Vec<Option<ActualArgument>>,
    ) -> ProcedureRef {
        let passed: Vec<_> = arguments
            .iter()
            .flatten()
            .filter(|arg| arg.passed_object)
            .collect();

        assert!(passed.len() <= 1, "more than one passed-object argument");
        assert!(
            passed.iter().all(|arg| arg.body.is_designator()),
            "passed object is not a designator"
        );

        ProcedureRef {
            proc,
            arguments,
            chevrons: Vec::new(),
        }
    }

    /// Adds a kernel launch configuration, printed as `<<<...>>>`.
    pub fn with_chevrons(mut self, chevrons: Vec<Expr>) -> ProcedureRef {
        self.chevrons = chevrons;
        self
    }

    pub fn proc(&self) -> &ProcedureDesignator {
        &self.proc
    }

    pub fn arguments(&self) -> &[Option<ActualArgument>] {
        &self.arguments
    }

    pub fn chevrons(&self) -> &[Expr] {
        &self.chevrons
    }

    pub fn passed_object(&self) -> Option<&ActualArgument> {
        self.arguments
            .iter()
            .flatten()
            .find(|arg| arg.passed_object)
    }
}
