use crate::{Board, Cell, Direction, Quadrant, Side, NUM_CELLS};

impl quickcheck::Arbitrary for Side {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        *g.choose(&[Side::Dark, Side::Light]).unwrap()
    }
}

impl quickcheck::Arbitrary for Cell {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        *g.choose(&[Cell::Empty, Cell::Dark, Cell::Light]).unwrap()
    }
}

impl quickcheck::Arbitrary for Quadrant {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        *g.choose(&Quadrant::ALL).unwrap()
    }
}

impl quickcheck::Arbitrary for Direction {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        *g.choose(&Direction::ALL).unwrap()
    }
}

impl quickcheck::Arbitrary for Board {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        // Uniform cells make long runs rare, so sometimes leave the board
        // sparse and sometimes fill it with a single dominant color.
        let bias = *g.choose(&[None, Some(Cell::Empty), Some(Cell::Dark), Some(Cell::Light)]).unwrap();
        let mut board = Board::new();
        for idx in 0..NUM_CELLS {
            let cell = match bias {
                Some(cell) if bool::arbitrary(g) => cell,
                _ => Cell::arbitrary(g),
            };
            board.set(idx, cell);
        }
        board
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let board = *self;
        Box::new(
            (0..NUM_CELLS)
                .filter(move |&idx| !board[idx].is_empty())
                .map(move |idx| {
                    let mut smaller = board;
                    smaller.set(idx, Cell::Empty);
                    smaller
                }),
        )
    }
}
