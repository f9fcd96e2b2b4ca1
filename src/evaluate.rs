use std::fmt::Display;

use crate::{
    board::Board,
    piece::{Color, PieceKind},
    position::BOARD_SIZE,
};

/// A pawn sharing its file with another pawn of the same color counts this much
const DOUBLED_PAWN_SCORE: f64 = 0.5;

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Scores {
    pub white: f64,
    pub black: f64,
}

impl Scores {
    pub fn of(&self, color: Color) -> f64 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    /// None when both sides are even
    pub fn leader(&self) -> Option<Color> {
        if self.white > self.black {
            Some(Color::White)
        } else if self.black > self.white {
            Some(Color::Black)
        } else {
            None
        }
    }
}

impl Display for Scores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "white {:.1} black {:.1}", self.white, self.black)
    }
}

impl Board {
    /// Material of one side. Pawns on a file holding two or more of that side's pawns count half.
    pub fn score(&self, color: Color) -> f64 {
        let mut pawns_per_file = [0u8; BOARD_SIZE as usize];
        let mut total = 0.0;

        for (position, piece) in self.pieces().filter(|(_, p)| p.color == color) {
            if piece.kind == PieceKind::Pawn {
                pawns_per_file[position.file() as usize] += 1;
            } else {
                total += piece.score();
            }
        }

        for count in pawns_per_file {
            total += match count {
                0 => 0.0,
                1 => PieceKind::Pawn.score(),
                n => n as f64 * DOUBLED_PAWN_SCORE,
            };
        }

        total
    }

    pub fn scores(&self) -> Scores {
        Scores {
            white: self.score(Color::White),
            black: self.score(Color::Black),
        }
    }
}

#[cfg(test)]
mod eval_tests {
    use crate::position::Position;

    use super::*;

    fn pos(notation: &str) -> Position {
        Position::parse(notation).unwrap()
    }

    #[test]
    pub fn starting_position_is_38_each() {
        let scores = Board::initial().scores();

        assert_eq!(38.0, scores.white);
        assert_eq!(38.0, scores.black);
        assert_eq!(None, scores.leader());
    }

    #[test]
    pub fn missing_rook_and_queen() {
        let mut board = Board::initial();
        let rook = board.remove(pos("a1")).unwrap();
        let queen = board.remove(pos("d8")).unwrap();

        assert_eq!(PieceKind::Rook, rook.kind);
        assert_eq!(PieceKind::Queen, queen.kind);
        assert_eq!(38.0 - 5.0, board.score(Color::White));
        assert_eq!(38.0 - 9.0, board.score(Color::Black));
        assert_eq!(Some(Color::White), board.scores().leader());
    }

    #[test]
    pub fn doubled_pawns_count_half() {
        let board = Board::from_fen("4k3/8/8/8/8/P7/P7/4K3").unwrap();

        assert_eq!(1.0, board.score(Color::White));
        assert_eq!(0.0, board.score(Color::Black));
    }

    #[test]
    pub fn tripled_and_single_pawns() {
        let board = Board::from_fen("4k3/2p5/2p5/2p4p/8/8/8/4K3").unwrap();

        assert_eq!(2.5, board.score(Color::Black));
    }

    #[test]
    pub fn pawns_of_the_other_color_do_not_double() {
        let board = Board::from_fen("4k3/8/8/p7/P7/8/8/4K3").unwrap();

        assert_eq!(1.0, board.score(Color::White));
        assert_eq!(1.0, board.score(Color::Black));
    }

    #[test]
    pub fn capture_into_a_pawn_file() {
        let mut board = Board::initial();
        board.move_piece(pos("b2"), pos("b4")).unwrap();
        board.move_piece(pos("a7"), pos("a5")).unwrap();
        board.move_piece(pos("b4"), pos("a5")).unwrap();

        // a2 and a5 now share the a-file
        assert_eq!(38.0 - 1.0, board.score(Color::White));
        assert_eq!(38.0 - 1.0, board.score(Color::Black));
        assert_eq!(
            Scores {
                white: 37.0,
                black: 37.0
            },
            board.scores()
        );
    }

    #[test]
    pub fn kings_are_worth_nothing() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3").unwrap();

        assert_eq!(0.0, board.score(Color::White));
        assert_eq!("white 0.0 black 0.0", board.scores().to_string());
    }
}
