//! Movement vectors per piece kind.
//!
//! Vectors are `(dfile, drank)` displacements from origin to destination in
//! board coordinates, where a positive `drank` moves towards rank 1.

use crate::board::{Color, PieceKind};

/// A `(dfile, drank)` displacement.
pub type Delta = (i8, i8);

/// How a piece applies its vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Vector applied once; the landing square must be the destination.
    Jump,
    /// Vector applied repeatedly until the edge or the first occupied square.
    Slide,
}

const KNIGHT: [Delta; 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const DIAGONAL: [Delta; 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const ORTHOGONAL: [Delta; 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

const ALL_WAYS: [Delta; 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

// Forward one, forward two, and the two capture diagonals.
const WHITE_PAWN: [Delta; 4] = [(0, -1), (0, -2), (1, -1), (-1, -1)];
const BLACK_PAWN: [Delta; 4] = [(0, 1), (0, 2), (1, 1), (-1, 1)];

/// Whether `kind` jumps or slides.
pub const fn motion(kind: PieceKind) -> Motion {
    match kind {
        PieceKind::Pawn | PieceKind::Knight | PieceKind::King => Motion::Jump,
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => Motion::Slide,
    }
}

/// The movement vectors of a piece.
///
/// Only pawns depend on `color`. The pawn set includes the two-square advance
/// and the capture diagonals; when those apply is decided by the pawn rules,
/// not by this table.
pub const fn directions(kind: PieceKind, color: Color) -> &'static [Delta] {
    match (kind, color) {
        (PieceKind::Pawn, Color::White) => &WHITE_PAWN,
        (PieceKind::Pawn, Color::Black) => &BLACK_PAWN,
        (PieceKind::Knight, _) => &KNIGHT,
        (PieceKind::Bishop, _) => &DIAGONAL,
        (PieceKind::Rook, _) => &ORTHOGONAL,
        (PieceKind::Queen | PieceKind::King, _) => &ALL_WAYS,
    }
}
