use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Cell::new(self.x + dx, self.y + dy)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    /// Whether a turn from `self` to `to` is allowed. A vertical move is only
    /// accepted while travelling horizontally and vice versa, so both reversals
    /// and same-axis re-presses are rejected.
    pub fn allows_turn_to(self, to: Direction) -> bool {
        let (dx, dy) = self.delta();
        match to {
            Up | Down => dy == 0,
            Left | Right => dx == 0,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn head_char(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

/// Snake body, head first.
#[derive(Clone, Debug)]
pub struct Snake {
    body: Vec<Cell>,
}

impl Snake {
    /// Lays out `size` cells behind `head`, opposite to `direction`.
    pub fn new(head: Cell, size: usize, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..size as i32)
            .map(|i| Cell::new(head.x - dx * i, head.y - dy * i))
            .collect();
        Snake { body }
    }

    #[cfg(test)]
    pub fn from_cells(body: Vec<Cell>) -> Self {
        Snake { body }
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Prepends `new_head`. Unless `grow` is set the tail is dropped and returned.
    pub fn advance(&mut self, new_head: Cell, grow: bool) -> Option<Cell> {
        self.body.insert(0, new_head);
        if grow {
            None
        } else {
            self.body.pop()
        }
    }

    /// True when the head sits on any other segment.
    pub fn head_hits_body(&self) -> bool {
        let head = self.head();
        self.body[1..].contains(&head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_layout() {
        let snake = Snake::new(Cell::new(10, 10), 3, Right);
        assert_eq!(snake.body(), &[Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)]);

        let snake = Snake::new(Cell::new(4, 4), 2, Up);
        assert_eq!(snake.body(), &[Cell::new(4, 4), Cell::new(4, 5)]);
    }

    #[test]
    fn test_advance_and_grow() {
        let mut snake = Snake::new(Cell::new(5, 5), 3, Right);

        let tail = snake.advance(Cell::new(6, 5), false);
        assert_eq!(tail, Some(Cell::new(3, 5)));
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Cell::new(6, 5));

        assert_eq!(snake.advance(Cell::new(7, 5), true), None);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.body()[3], Cell::new(4, 5));
    }

    #[test]
    fn test_turn_guard() {
        assert!(Right.allows_turn_to(Up));
        assert!(Right.allows_turn_to(Down));
        assert!(!Right.allows_turn_to(Left));
        assert!(!Right.allows_turn_to(Right));
        assert!(Up.allows_turn_to(Left));
        assert!(!Up.allows_turn_to(Down));
        assert!(!Down.allows_turn_to(Down));
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Up.opposite(), Down);
        assert_eq!(Down.opposite(), Up);
        assert_eq!(Left.opposite(), Right);
        assert_eq!(Right.opposite(), Left);
    }

    #[test]
    fn test_head_hits_body() {
        let mut snake = Snake::new(Cell::new(5, 5), 5, Right);
        assert!(!snake.head_hits_body());

        // Fold back onto itself: (5,5) -> (5,6) -> (4,6) -> (4,5)
        snake.advance(Cell::new(5, 6), false);
        snake.advance(Cell::new(4, 6), false);
        snake.advance(Cell::new(4, 5), false);
        assert!(snake.head_hits_body());
    }

    #[test]
    fn test_cell_step() {
        let c = Cell::new(0, 0);
        assert_eq!(c.step(Up), Cell::new(0, -1));
        assert_eq!(c.step(Down), Cell::new(0, 1));
        assert_eq!(c.step(Left), Cell::new(-1, 0));
        assert_eq!(c.step(Right), Cell::new(1, 0));
    }
}
