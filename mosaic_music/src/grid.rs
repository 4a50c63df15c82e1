// The puzzle grid: the state the algebraic generator evolves.
//
// A grid is a rectangle of indices. The identity grid for dimensions (w, h)
// holds `0..w*h` laid out row-major, and every operator in `operators.rs`
// only ever moves those indices around. The indices themselves carry no
// musical meaning; a `Values` map overlays one (pitch numbers, note names)
// when the facade turns a grid into note events.
//
// Any factorisation of N works as dimensions: 36 elements can be (6, 6),
// (9, 4), (12, 3), (18, 2) or their transposes.

use crate::error::MosaicError;
use crate::events::NoteValue;
use std::collections::BTreeMap;

/// (width, height): row length and row count.
pub type Dimensions = (usize, usize);

/// A flat, row-major run of indices.
pub type Vector = Vec<usize>;

/// Rows of equal length. Valid grids hold each of `0..N` exactly once.
pub type Matrix = Vec<Vector>;

/// Overlay from grid index to the musical value it stands for.
pub type Values = BTreeMap<usize, NoteValue>;

/// Number of elements a grid of these dimensions holds.
///
/// Fails with `DimensionMismatch` when the count does not fit in `usize`.
pub fn element_count(dimensions: Dimensions) -> Result<usize, MosaicError> {
    let (width, height) = dimensions;
    width
        .checked_mul(height)
        .ok_or(MosaicError::DimensionMismatch {
            width,
            height,
            len: 0,
        })
}

/// Slice a flat vector into `height` rows of `width`, top to bottom.
///
/// Fails with `DimensionMismatch` unless the vector holds exactly
/// `width * height` elements. Zero-area dimensions give an empty matrix.
pub fn to_matrix(dimensions: Dimensions, vector: &[usize]) -> Result<Matrix, MosaicError> {
    let (width, height) = dimensions;
    if element_count(dimensions).ok() != Some(vector.len()) {
        return Err(MosaicError::DimensionMismatch {
            width,
            height,
            len: vector.len(),
        });
    }
    if vector.is_empty() {
        return Ok(Matrix::new());
    }
    Ok(vector.chunks(width).map(<[usize]>::to_vec).collect())
}

/// The starting grid: `0..N` in row-major order.
///
/// Zero-area dimensions give an empty matrix, as in `to_matrix`. So do
/// dimensions `element_count` rejects; check those first.
pub fn identity(dimensions: Dimensions) -> Matrix {
    if matches!(element_count(dimensions), Ok(0) | Err(_)) {
        return Matrix::new();
    }
    let (width, height) = dimensions;
    (0..height)
        .map(|row| (row * width..(row + 1) * width).collect())
        .collect()
}

/// `(row_length, row_count)`; `(0, 0)` for an empty matrix.
pub fn dimensions(matrix: &[Vector]) -> Dimensions {
    match matrix.first() {
        Some(row) => (row.len(), matrix.len()),
        None => (0, 0),
    }
}

/// Flatten row-major. Left inverse of `to_matrix`.
pub fn to_vector(matrix: &[Vector]) -> Vector {
    matrix.iter().flatten().copied().collect()
}

/// True if the matrix is rectangular and holds each of `0..N` exactly once.
pub fn is_valid(matrix: &[Vector]) -> bool {
    let (width, _) = dimensions(matrix);
    if matrix.iter().any(|row| row.len() != width) {
        return false;
    }
    let mut flat = to_vector(matrix);
    flat.sort_unstable();
    flat.iter().enumerate().all(|(i, &v)| i == v)
}

/// Render the grid through a values map, one line per row.
pub fn pretty(matrix: &[Vector], values: &Values) -> Result<String, MosaicError> {
    let mut out = String::new();
    for row in matrix {
        for &index in row {
            let value = values
                .get(&index)
                .ok_or(MosaicError::MissingValueMapping(index))?;
            out.push_str(&value.to_string());
            out.push(' ');
        }
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_is_rejected() {
        let err = to_matrix((2, 2), &[0, 1, 2]).unwrap_err();
        assert!(matches!(
            err,
            MosaicError::DimensionMismatch {
                width: 2,
                height: 2,
                len: 3
            }
        ));
        assert!(to_matrix((2, 2), &[0, 1, 2, 3, 4]).is_err());
    }

    #[test]
    fn test_overflowing_dimensions_are_rejected() {
        let huge = (1usize << (usize::BITS - 1), 4);
        assert!(matches!(
            element_count(huge),
            Err(MosaicError::DimensionMismatch { height: 4, len: 0, .. })
        ));
        assert!(matches!(
            to_matrix(huge, &[0, 1, 2]),
            Err(MosaicError::DimensionMismatch { len: 3, .. })
        ));
        assert_eq!(identity(huge), Matrix::new());
        assert_eq!(element_count((3, 2)).unwrap(), 6);
    }

    #[test]
    fn test_empty_matrix() {
        assert_eq!(to_matrix((0, 0), &[]).unwrap(), Matrix::new());
        assert_eq!(to_matrix((3, 0), &[]).unwrap(), Matrix::new());
        assert_eq!(dimensions(&Matrix::new()), (0, 0));
    }

    #[test]
    fn test_shapes() {
        assert_eq!(to_matrix((1, 1), &[0]).unwrap(), vec![vec![0]]);
        assert_eq!(
            to_matrix((2, 2), &[0, 1, 2, 3]).unwrap(),
            vec![vec![0, 1], vec![2, 3]]
        );
        assert_eq!(
            to_matrix((2, 3), &[0, 1, 2, 3, 4, 5]).unwrap(),
            vec![vec![0, 1], vec![2, 3], vec![4, 5]]
        );
        assert_eq!(
            to_matrix((3, 2), &[0, 1, 2, 3, 4, 5]).unwrap(),
            vec![vec![0, 1, 2], vec![3, 4, 5]]
        );
        // Column vector by swapping the dimensions.
        assert_eq!(
            to_matrix((1, 4), &[1, 2, 3, 4]).unwrap(),
            vec![vec![1], vec![2], vec![3], vec![4]]
        );
    }

    #[test]
    fn test_round_trip() {
        for dims in [(1, 1), (2, 2), (3, 2), (2, 3), (4, 1), (1, 5), (5, 5)] {
            let vector: Vector = (0..element_count(dims).unwrap()).rev().collect();
            let matrix = to_matrix(dims, &vector).unwrap();
            assert_eq!(dimensions(&matrix), dims);
            assert_eq!(to_vector(&matrix), vector);
        }
    }

    #[test]
    fn test_identity_matches_to_matrix() {
        for dims in [(0, 0), (0, 3), (3, 0), (1, 1), (3, 3), (4, 2), (2, 4)] {
            let range: Vector = (0..element_count(dims).unwrap()).collect();
            assert_eq!(identity(dims), to_matrix(dims, &range).unwrap());
            assert!(is_valid(&identity(dims)));
        }
    }

    #[test]
    fn test_validity() {
        assert!(is_valid(&[vec![1, 3], vec![0, 2]]));
        assert!(!is_valid(&[vec![0, 0], vec![2, 3]]));
        assert!(!is_valid(&[vec![0, 1], vec![2]]));
        assert!(!is_valid(&[vec![0, 1], vec![2, 4]]));
    }

    #[test]
    fn test_pretty() {
        let values: Values = [
            (0, NoteValue::Name("C4".into())),
            (1, NoteValue::Name("E4".into())),
            (2, NoteValue::Number(67)),
            (3, NoteValue::Name("C5".into())),
        ]
        .into_iter()
        .collect();
        let matrix = [vec![1, 3], vec![0, 2]];
        assert_eq!(pretty(&matrix, &values).unwrap(), "E4 C5 \nC4 67 \n");

        let partial: Values = [(0, NoteValue::Number(60))].into_iter().collect();
        assert!(matches!(
            pretty(&matrix, &partial),
            Err(MosaicError::MissingValueMapping(1))
        ));
    }
}
