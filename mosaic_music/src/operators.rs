// Puzzle operators: the moves the algebraic generator makes on a grid.
//
// Each operator is built from plain linear algebra. A grid is multiplied by
// a 0/1 permutation matrix (which reorders columns) and optionally
// transposed. Because the multiplier is always a permutation matrix, the
// product only relocates indices and never creates, drops or duplicates one.
//
// Two operators are registered:
// - `@` rotation: reverse every row, then transpose. A 90° turn of the grid;
//   a (w, h) grid comes back as (h, w).
// - `~` slice turn: cycle the first row one step left, leaving every other
//   row where it was. Like turning one slice of a Rubik's cube.
//
// The helper matrices are square with side equal to the grid's row length,
// so the product is defined for every grid shape, not only square ones.

use crate::grid::{Dimensions, Matrix, Vector, dimensions};
use std::collections::BTreeMap;

/// A grid transform. Takes the grid by reference and returns a fresh one.
pub type Operator = fn(&[Vector]) -> Matrix;

/// Registry from move symbol to transform. Ordered, so a seeded choice over
/// its keys is reproducible.
pub type Operations = BTreeMap<char, Operator>;

pub const ROTATE: char = '@';
pub const PERMUTE: char = '~';

/// Standard matrix product. `left` is h×k, `right` is k×w.
pub fn matmul(left: &[Vector], right: &[Vector]) -> Matrix {
    let (columns, _) = dimensions(right);
    left.iter()
        .map(|row| {
            (0..columns)
                .map(|j| row.iter().zip(right).map(|(a, r)| a * r[j]).sum::<usize>())
                .collect()
        })
        .collect()
}

pub fn transpose(matrix: &[Vector]) -> Matrix {
    let (width, _) = dimensions(matrix);
    (0..width)
        .map(|j| matrix.iter().map(|row| row[j]).collect())
        .collect()
}

/// Anti-diagonal identity: row i (counting from 1) has its 1 at column
/// `width - i`. Right-multiplying by it reverses each row.
pub fn create_rotation_matrix(dimensions: Dimensions) -> Matrix {
    let (width, _) = dimensions;
    let mut rotation = vec![vec![0; width]; width];
    for (i, row) in rotation.iter_mut().enumerate() {
        row[width - 1 - i] = 1;
    }
    rotation
}

/// The rotation matrix with rows 1.. reversed and row 0 kept on top.
/// Right-multiplying by it cycles a row one step to the left.
///
/// For width 3 this is `[[0,0,1],[1,0,0],[0,1,0]]`.
pub fn create_permutation_matrix(dimensions: Dimensions) -> Matrix {
    let rotation = create_rotation_matrix(dimensions);
    let mut permutation: Matrix = Vec::with_capacity(rotation.len());
    if let Some(first) = rotation.first() {
        permutation.push(first.clone());
    }
    permutation.extend(rotation.iter().skip(1).rev().cloned());
    permutation
}

pub fn apply_rotation(matrix: &[Vector]) -> Matrix {
    let rotation = create_rotation_matrix(dimensions(matrix));
    transpose(&matmul(matrix, &rotation))
}

/// Permute the whole grid, then keep only row `row` of the result.
///
/// Every other row of the returned grid is an untouched copy of the input.
/// A `row` past the last row returns an unchanged copy.
pub fn apply_row_permutation(matrix: &[Vector], row: usize) -> Matrix {
    let mut resultant = matrix.to_vec();
    let permutation = create_permutation_matrix(dimensions(matrix));
    let permuted = matmul(matrix, &permutation);
    let committed = permuted.into_iter().nth(row);
    if let (Some(target), Some(source)) = (resultant.get_mut(row), committed) {
        *target = source;
    }
    resultant
}

fn permute_first_row(matrix: &[Vector]) -> Matrix {
    apply_row_permutation(matrix, 0)
}

/// The fixed move set: `@` rotates, `~` turns the first row.
pub fn operations() -> Operations {
    Operations::from([
        (ROTATE, apply_rotation as Operator),
        (PERMUTE, permute_first_row as Operator),
    ])
}
