//! # Semantic actions
//!
//! [`apply`] computes the value of a production from the already evaluated
//! values of its right-hand side. It is a plain function of the production
//! ID, the children and the binding environment, so it can be exercised
//! without a parser.
//!
//! Only two productions touch the environment: `Unit -> ident` reads it
//! and `Line -> ident = Expr` writes it. Everything else is arithmetic on
//! [`Complex`].
//!
//! ## Example
//! ```rust
//! # use cxcalc::{actions, Bindings, CalcToken, Complex, ProdID, TokenID, TokenValue};
//! let mut env = Bindings::new();
//! let num = |z| CalcToken { token_id: TokenID::Expr, value: TokenValue::Number(z), span: None };
//! let plus = CalcToken { token_id: TokenID::Plus, value: TokenValue::None, span: None };
//! let args = [num(Complex::ONE), plus, num(Complex::I)];
//! let z = actions::apply(ProdID::Add, &args, &mut env).unwrap();
//! assert_eq!(z, Complex::new(1.0, 1.0));
//! ```

use crate::{Bindings, CalcToken, Complex, ProdID, SemanticError, TokenValue};

fn number(prod_id: ProdID, args: &[CalcToken], index: usize) -> Result<Complex, SemanticError> {
    args.get(index)
        .and_then(CalcToken::number)
        .ok_or(SemanticError::Operand {
            production: prod_id.label(),
            index,
        })
}

fn name(prod_id: ProdID, args: &[CalcToken], index: usize) -> Result<&str, SemanticError> {
    match args.get(index) {
        Some(CalcToken {
            value: TokenValue::Ident(name),
            ..
        }) => Ok(name.as_str()),
        _ => Err(SemanticError::Operand {
            production: prod_id.label(),
            index,
        }),
    }
}

/// Evaluates production `prod_id` over its children `args`, which are in
/// right-hand-side order.
///
/// # Errors
/// [`SemanticError::Unbound`] when `Unit -> ident` names an unbound
/// identifier.
pub fn apply(
    prod_id: ProdID,
    args: &[CalcToken],
    env: &mut Bindings,
) -> Result<Complex, SemanticError> {
    let n = |index| number(prod_id, args, index);
    let value = match prod_id {
        // Line -> ident = Expr
        ProdID::Assign => {
            let value = n(2)?;
            env.set(name(prod_id, args, 0)?, value);
            value
        }

        // Expr -> Expr + Term
        ProdID::Add => n(0)? + n(2)?,
        // Expr -> Expr - Term
        ProdID::Sub => n(0)? - n(2)?,
        // Term -> Term * Factor
        ProdID::Mul => n(0)? * n(2)?,
        // Term -> Term / Factor
        ProdID::Div => n(0)? / n(2)?,

        // Factor -> + InnerFactor
        ProdID::Plus => n(1)?,
        // Factor -> - InnerFactor
        ProdID::Neg => -n(1)?,

        // InnerFactor -> ( Expr )
        ProdID::Paren => n(1)?,
        // InnerFactor -> func ( Expr )
        ProdID::Abs => n(2)?.abs(),
        ProdID::Arg => n(2)?.arg(),
        ProdID::Norm => n(2)?.norm(),
        ProdID::Conj => n(2)?.conj(),

        // Unit -> ident
        ProdID::Variable => env.lookup(name(prod_id, args, 0)?)?,

        // Single-child passthrough
        ProdID::Start
        | ProdID::Eval
        | ProdID::ExprTerm
        | ProdID::TermFactor
        | ProdID::FactorInner
        | ProdID::InnerUnit
        | ProdID::Number
        | ProdID::Imaginary => n(0)?,
    };
    Ok(value)
}
