use crate::snake::Cell;
use crate::state::{GameStatus, Snapshot};

use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{bail, Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

pub type TermInt = u16;
pub type Coords = (TermInt, TermInt);

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

// Row 0 holds the score line, the bordered board starts below it
const BOARD_TOP: TermInt = 1;

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let stdout = stdout();
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("Error hiding cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Error disabling raw mode")?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("Error leaving alt screen")?;
        Ok(())
    }

    /// Fails when the terminal cannot fit a `board_width` x `board_height` grid.
    pub fn ensure_fits(&self, board_width: i32, board_height: i32) -> Result<()> {
        let need_w = board_width.saturating_add(2);
        let need_h = board_height.saturating_add(2 + BOARD_TOP as i32);
        if (self.width as i32) < need_w || (self.height as i32) < need_h {
            bail!(
                "Terminal is {}x{}, but a {}x{} board needs at least {}x{}",
                self.width, self.height, board_width, board_height, need_w, need_h
            );
        }
        Ok(())
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read().context("Error reading terminal event")? {
                return Ok(ev);
            }
        }
    }

    /// Drains pending key events, waiting at most `timeout` for the first one.
    pub fn read_key_events_queue(&self, timeout: Duration) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait).context("Error polling terminal events")? {
            if let Event::Key(ev) = read().context("Error reading terminal event")? {
                events.push(ev);
            }
            wait = Duration::from_millis(0);
        }

        Ok(events)
    }

    pub fn draw_borders(&mut self, board_width: TermInt, board_height: TermInt) {
        let (width, height) = (board_width + 2, board_height + 2);
        let end_x = width - 1;
        let end_y = BOARD_TOP + height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            self.print_at((x, BOARD_TOP), ch);
            self.print_at((x, end_y), ch);
        }

        for y in BOARD_TOP + 1..end_y {
            self.print_at((0, y), '|');
            self.print_at((end_x, y), '|');
        }
    }

    /// Redraws the whole board and score line from a snapshot.
    pub fn draw_snapshot(&mut self, snap: &Snapshot) {
        for y in 0..snap.height {
            for x in 0..snap.width {
                if let Some(pos) = board_coords(snap, Cell::new(x, y)) {
                    self.print_at(pos, ' ');
                }
            }
        }

        if let Some(pos) = board_coords(snap, snap.food) {
            self.print_at(pos, FOOD_CHAR);
        }

        let dead = snap.status == GameStatus::Over;
        for (i, cell) in snap.snake.iter().enumerate().rev() {
            let ch = match (dead, i) {
                (true, _) => DEAD_SNAKE_CHAR,
                (false, 0) => snap.direction.head_char(),
                _ => SNAKE_BODY_CHAR,
            };
            // A head that went through the wall has no place on screen
            if let Some(pos) = board_coords(snap, *cell) {
                self.print_at(pos, ch);
            }
        }

        let status = format!("Score: {:<6} High Score: {}", snap.score, snap.high_score);
        self.print_line(0, &status);
        self.flush();
    }

    pub fn show_message(&mut self, lines: &[&str]) {
        if self.has_message() {
            self.hide_message();
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ');
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch);
            }
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.flush();
    }

    pub fn hide_message(&mut self) {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return,
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let (x, y) = (top_left.0 + x_diff, top_left.1 + y_diff);
                if let Some(&ch) = self.screen.get(self.width as usize * y as usize + x as usize) {
                    self.print_at_no_save((x, y), ch);
                }
            }
        }

        self.flush();
    }

    pub fn print_at(&mut self, pos: Coords, ch: char) {
        self.print_at_no_save(pos, ch);
        if let Some(slot) = self.screen.get_mut(self.width as usize * pos.1 as usize + pos.0 as usize) {
            *slot = ch;
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Error clearing")?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) {
        if let Err(e) = self.stdout.flush() {
            log::error!("Error flushing terminal: {}", e);
        }
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn print_line(&mut self, y: TermInt, text: &str) {
        let padded = format!("{:<width$}", text, width = self.width as usize);
        for (x, ch) in padded.chars().take(self.width as usize).enumerate() {
            self.print_at((x as TermInt, y), ch);
        }
    }

    fn print_at_no_save(&mut self, pos: Coords, ch: char) {
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        if let Err(e) = queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch)) {
            log::error!("Error writing to terminal: {}", e);
        }
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: Coords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Coords {
        self.top_left
    }
}

/// Screen position of a board cell, inside the border. `None` when off the board.
fn board_coords(snap: &Snapshot, cell: Cell) -> Option<Coords> {
    if cell.x < 0 || cell.x >= snap.width || cell.y < 0 || cell.y >= snap.height {
        return None;
    }
    Some((cell.x as TermInt + 1, cell.y as TermInt + BOARD_TOP + 1))
}
