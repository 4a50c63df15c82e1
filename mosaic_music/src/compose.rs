// Function composition, used to apply a whole move sequence in one pass.

use crate::error::MosaicError;
use crate::grid::Matrix;
use crate::operators::{Operations, Operator};

/// Compose right to left: `compose(vec![f, g, h])(x) == f(g(h(x)))`.
///
/// No functions gives the identity. Heterogeneous closures can be mixed by
/// boxing them as `Box<dyn Fn(T) -> T>`.
pub fn compose<T, F>(functions: Vec<F>) -> impl Fn(T) -> T
where
    F: Fn(T) -> T,
{
    move |x: T| functions.iter().rev().fold(x, |acc, f| f(acc))
}

/// Compose the operators named by `symbols`, in the order written.
///
/// `"@~"` applies `~` first and then `@`, like the written composition.
pub fn compose_symbols(
    operations: &Operations,
    symbols: &str,
) -> Result<impl Fn(Matrix) -> Matrix + use<>, MosaicError> {
    let steps = symbols
        .chars()
        .map(|symbol| {
            operations
                .get(&symbol)
                .copied()
                .ok_or(MosaicError::UnknownOperator(symbol))
        })
        .collect::<Result<Vec<Operator>, _>>()?;
    Ok(compose(
        steps
            .into_iter()
            .map(|op| move |grid: Matrix| op(&grid))
            .collect(),
    ))
}
