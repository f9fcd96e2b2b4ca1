use log::trace;
use tinyvec::ArrayVec;

use crate::{
    board::Board,
    piece::{Color, PieceKind},
    position::Position,
};

/// A queen in the middle of an empty board reaches 27 squares
pub type Destinations = ArrayVec<[Position; 32]>;

#[rustfmt::skip]
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    ( 1, -2), ( 1, 2), ( 2, -1), ( 2, 1),
];
#[rustfmt::skip]
const DIAGONAL_OFFSETS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
#[rustfmt::skip]
const STRAIGHT_OFFSETS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
#[rustfmt::skip]
const ALL_OFFSETS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1), (0, -1),
    ( 0,  1), ( 1, -1), ( 1, 0), (1,  1),
];

/// How a kind of piece finds the squares it can reach in one move
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum MoveStrategy {
    Pawn,
    /// Jumps straight to each offset
    Leap(&'static [(i8, i8)]),
    /// Repeats each offset until something is in the way
    Slide(&'static [(i8, i8)]),
}

impl PieceKind {
    pub fn strategy(self) -> MoveStrategy {
        match self {
            PieceKind::Pawn => MoveStrategy::Pawn,
            PieceKind::Knight => MoveStrategy::Leap(&KNIGHT_OFFSETS),
            PieceKind::Bishop => MoveStrategy::Slide(&DIAGONAL_OFFSETS),
            PieceKind::Rook => MoveStrategy::Slide(&STRAIGHT_OFFSETS),
            PieceKind::Queen => MoveStrategy::Slide(&ALL_OFFSETS),
            PieceKind::King => MoveStrategy::Leap(&ALL_OFFSETS),
        }
    }
}

impl MoveStrategy {
    /// Every square a piece of `color` standing on `source` can move to, captures included.
    /// Squares holding a piece of the same color are never returned.
    pub fn generate(self, board: &Board, source: Position, color: Color) -> Destinations {
        let mut result = Destinations::new();

        match self {
            MoveStrategy::Pawn => generate_pawn(board, source, color, &mut result),
            MoveStrategy::Leap(offsets) => {
                for (df, dr) in offsets {
                    let Some(target) = source.offset(*df, *dr) else {
                        continue;
                    };

                    match board.piece_at(target) {
                        Some(piece) if piece.color == color => {}
                        _ => result.push(target),
                    }
                }
            }
            MoveStrategy::Slide(offsets) => {
                for (df, dr) in offsets {
                    let mut cur = source;
                    while let Some(target) = cur.offset(*df, *dr) {
                        match board.piece_at(target) {
                            None => result.push(target),
                            Some(piece) => {
                                if piece.color != color {
                                    result.push(target);
                                }
                                break;
                            }
                        }

                        cur = target;
                    }
                }
            }
        }

        result
    }
}

fn generate_pawn(board: &Board, source: Position, color: Color, result: &mut Destinations) {
    let forward = color.forward();

    if let Some(one_step) = source.offset(0, forward) {
        if board.is_empty_at(one_step) {
            result.push(one_step);

            if source.rank() == color.pawn_rank() {
                if let Some(two_step) = source.offset(0, forward * 2) {
                    if board.is_empty_at(two_step) {
                        result.push(two_step);
                    }
                }
            }
        }
    }

    for side in [-1, 1] {
        let Some(target) = source.offset(side, forward) else {
            continue;
        };

        if let Some(piece) = board.piece_at(target) {
            if piece.color != color {
                result.push(target);
            }
        }
    }
}

/// Destinations for whatever piece is on source. An empty square has none.
pub fn generate_path(board: &Board, source: Position) -> Destinations {
    match board.piece_at(source) {
        Some(piece) => {
            let destinations = piece.kind.strategy().generate(board, source, piece.color);
            trace!("{} on {source} can reach {:?}", piece, destinations.as_slice());
            destinations
        }
        None => Destinations::new(),
    }
}
