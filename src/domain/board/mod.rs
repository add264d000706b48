// 盤面関連のドメイン層

pub mod board;
pub mod cell;
pub mod generator;

pub use board::{Board, Marks, Pos};
pub use cell::{Cell, Designation, Piece, Restriction};
