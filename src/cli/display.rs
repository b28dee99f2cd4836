//! Terminal display and UI rendering
//!
//! Features:
//! - Quiz prompts with reveal color coding
//! - Match board and timer rendering
//! - Camera preview with landmark overlay
//! - Session summaries with stars

#[allow(unused_imports)]
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{stdout, Write};

use crate::recognize::{Frame, Hand, Prediction};
use crate::session::MatchBoard;

/// Brightness ramp for the camera preview, darkest first.
const LUMA_RAMP: &[u8] = b" .:-=+*#%@";
/// Camera preview grid side in cells; rows are halved for terminal aspect.
const VIEW_SIDE: usize = 32;
/// First terminal row of the camera preview.
const VIEW_ORIGIN_ROW: u16 = 4;

/// Terminal display manager
pub struct Display {
    /// Whether we're using alternate screen
    use_alternate_screen: bool,
}

impl Display {
    /// Create display without alternate screen (simpler mode)
    pub fn simple() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Display {
            use_alternate_screen: false,
        })
    }

    /// Clear screen
    pub fn clear(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        Ok(())
    }

    /// Screen title with a rule underneath
    pub fn show_title(&self, title: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Cyan),
            Print(title),
            ResetColor,
            cursor::MoveTo(0, 1),
            SetForegroundColor(Color::Blue),
            Print("─".repeat(50)),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Question or instruction line
    pub fn show_prompt(&self, text: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 2),
            terminal::Clear(ClearType::CurrentLine),
            Print(text)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Numbered letter choices. After a guess, `reveal` carries
    /// (guessed, target): the target turns green, a wrong guess red, and the
    /// rest fade out.
    pub fn show_letter_choices(
        &self,
        choices: &[char],
        reveal: Option<(char, char)>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 4),
            terminal::Clear(ClearType::CurrentLine)
        )?;

        for (i, &choice) in choices.iter().enumerate() {
            let color = match reveal {
                Some((_, target)) if choice == target => Color::Green,
                Some((guessed, _)) if choice == guessed => Color::Red,
                Some(_) => Color::DarkGrey,
                None => Color::White,
            };
            execute!(
                stdout,
                Print(format!("{}) ", i + 1)),
                SetForegroundColor(color),
                Print(choice),
                ResetColor,
                Print("   ")
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Round counter with score and streak
    pub fn show_round_progress(
        &self,
        round_no: u32,
        total: u32,
        score: u32,
        streak: u32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 6),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Magenta),
            Print("Round: "),
            ResetColor,
            Print(format!("{}/{}", round_no, total)),
            Print("  |  "),
            Print(format!("Score: {}", score)),
            Print("  |  "),
            Print(format!("Streak: {} 🔥", streak)),
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Countdown line with score and streak, colored by remaining time
    pub fn show_timer_status(
        &self,
        time_left: u32,
        score: u32,
        streak: u32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 6),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Magenta),
            Print("Time: "),
            SetForegroundColor(if time_left > 10 {
                Color::Green
            } else if time_left > 5 {
                Color::Yellow
            } else {
                Color::Red
            }),
            Print(format!("{}s", time_left)),
            ResetColor,
            Print("  |  "),
            Print(format!("Score: {}", score)),
            Print("  |  "),
            Print(format!("Streak: {} 🔥", streak)),
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Feedback line, green for good news and red otherwise
    pub fn show_feedback(
        &self,
        row: u16,
        text: &str,
        good: bool,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(if good { Color::Green } else { Color::Red }),
            Print(text),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Key legend or a faded hint line
    pub fn show_help(&self, row: u16, text: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::DarkGrey),
            Print(text),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Star rating for a finished game
    pub fn show_stars(&self, stars: u32) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 4),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print("⭐".repeat(stars as usize)),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Both match columns, one pair row per line. Sign entries show their
    /// emoji stand-in, word entries the text.
    pub fn show_match_board(&self, board: &MatchBoard) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();

        for (i, (image, word)) in board
            .image_column()
            .iter()
            .zip(board.word_column().iter())
            .enumerate()
        {
            execute!(
                stdout,
                cursor::MoveTo(0, 4 + i as u16),
                terminal::Clear(ClearType::CurrentLine),
                Print(format!("{}) ", i + 1)),
                SetForegroundColor(self.match_color(
                    board,
                    image.word,
                    board.image_flashing(image.word),
                    board.selected_image() == Some(image.word),
                )),
                Print(format!("{:4}", image.emoji)),
                ResetColor,
                Print("   |   "),
                Print(format!("{}) ", (b'a' + i as u8) as char)),
                SetForegroundColor(self.match_color(
                    board,
                    word.word,
                    board.word_flashing(word.word),
                    board.selected_word() == Some(word.word),
                )),
                Print(word.word),
                ResetColor
            )?;
            if board.is_matched(word.word) {
                execute!(stdout, SetForegroundColor(Color::Green), Print(" ✓"), ResetColor)?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    fn match_color(&self, board: &MatchBoard, word: &str, flashing: bool, selected: bool) -> Color {
        if board.is_matched(word) {
            Color::Green
        } else if flashing {
            Color::Red
        } else if selected {
            Color::Yellow
        } else {
            Color::White
        }
    }

    /// Match progress counters
    pub fn show_match_progress(&self, board: &MatchBoard) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 10),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Magenta),
            Print("Matched: "),
            ResetColor,
            Print(format!("{}/{}", board.matched_count(), board.pair_count())),
            Print(format!("  |  Tries: {}", board.attempts())),
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Large card line with a faded subtitle underneath
    pub fn show_card_detail(
        &self,
        line: &str,
        subtitle: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 4),
            terminal::Clear(ClearType::CurrentLine),
            Print(line),
            cursor::MoveTo(0, 5),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::DarkGrey),
            Print(subtitle),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Horizontal picker strip with the selection bracketed
    pub fn show_strip(
        &self,
        items: &[String],
        selected: usize,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 7),
            terminal::Clear(ClearType::CurrentLine)
        )?;
        for (i, item) in items.iter().enumerate() {
            if i == selected {
                execute!(
                    stdout,
                    SetForegroundColor(Color::Yellow),
                    Print(format!("[{}]", item)),
                    ResetColor,
                    Print(" ")
                )?;
            } else {
                execute!(stdout, Print(format!(" {} ", item)), Print(" "))?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    /// Plain lines, one per row
    pub fn show_lines(
        &self,
        items: &[String],
        start_row: u16,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        for (i, item) in items.iter().enumerate() {
            execute!(
                stdout,
                cursor::MoveTo(0, start_row + i as u16),
                terminal::Clear(ClearType::CurrentLine),
                Print(item)
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Current practice target with its example count
    pub fn show_capture_status(
        &self,
        target: char,
        examples: usize,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 2),
            terminal::Clear(ClearType::CurrentLine),
            Print("Show the sign for: "),
            SetForegroundColor(Color::Cyan),
            Print(target),
            ResetColor,
            Print(format!("   ({} examples trained)", examples)),
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Camera preview: brightness ramp cells, keypoints in red, bounding box
    /// corners in green. Two grid rows share one terminal row.
    pub fn show_capture_view(
        &self,
        frame: &Frame,
        hands: &[Hand],
    ) -> Result<(), Box<dyn std::error::Error>> {
        if frame.width == 0 || frame.height == 0 {
            return Ok(());
        }
        let mut stdout = stdout();
        let grid = frame.downsample(VIEW_SIDE);

        let mut landmark_cells = vec![false; VIEW_SIDE * VIEW_SIDE];
        let mut corner_cells = vec![false; VIEW_SIDE * VIEW_SIDE];
        let to_cell = |x: f32, y: f32| {
            let col = ((x / frame.width as f32) * VIEW_SIDE as f32).max(0.0) as usize;
            let row = ((y / frame.height as f32) * VIEW_SIDE as f32).max(0.0) as usize;
            (col.min(VIEW_SIDE - 1), row.min(VIEW_SIDE - 1))
        };
        for hand in hands {
            let (min_x, min_y, max_x, max_y) = hand.bounding_box();
            for (x, y) in [(min_x, min_y), (max_x, min_y), (min_x, max_y), (max_x, max_y)] {
                let (col, row) = to_cell(x, y);
                corner_cells[row * VIEW_SIDE + col] = true;
            }
            for point in &hand.landmarks {
                let (col, row) = to_cell(point[0], point[1]);
                landmark_cells[row * VIEW_SIDE + col] = true;
            }
        }

        for out_row in 0..VIEW_SIDE / 2 {
            let top = out_row * 2;
            let bottom = top + 1;
            execute!(
                stdout,
                cursor::MoveTo(0, VIEW_ORIGIN_ROW + out_row as u16),
                terminal::Clear(ClearType::CurrentLine)
            )?;
            for col in 0..VIEW_SIDE {
                let a = top * VIEW_SIDE + col;
                let b = bottom * VIEW_SIDE + col;
                if landmark_cells[a] || landmark_cells[b] {
                    execute!(
                        stdout,
                        SetForegroundColor(Color::Red),
                        Print('●'),
                        ResetColor
                    )?;
                } else if corner_cells[a] || corner_cells[b] {
                    execute!(
                        stdout,
                        SetForegroundColor(Color::Green),
                        Print('+'),
                        ResetColor
                    )?;
                } else {
                    let luma = (grid[a] + grid[b]) / 2.0;
                    let idx = ((luma * (LUMA_RAMP.len() - 1) as f32).max(0.0) as usize)
                        .min(LUMA_RAMP.len() - 1);
                    execute!(stdout, Print(LUMA_RAMP[idx] as char))?;
                }
            }
        }
        stdout.flush()?;
        Ok(())
    }

    /// Latest recognition with per-label vote shares
    pub fn show_prediction(
        &self,
        prediction: Option<&Prediction>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, VIEW_ORIGIN_ROW + (VIEW_SIDE / 2) as u16),
            terminal::Clear(ClearType::CurrentLine),
        )?;

        let prediction = match prediction {
            Some(p) => p,
            None => {
                execute!(
                    stdout,
                    SetForegroundColor(Color::DarkGrey),
                    Print("I see: ..."),
                    ResetColor
                )?;
                stdout.flush()?;
                return Ok(());
            }
        };

        execute!(
            stdout,
            Print("I see: "),
            SetForegroundColor(Color::Cyan),
            Print(&prediction.label),
            ResetColor,
            Print("   ")
        )?;
        let mut labels: Vec<&String> = prediction.confidences.keys().collect();
        labels.sort();
        for label in labels {
            let share = prediction.confidences.get(label).copied().unwrap_or(0.0);
            let color = if *label == prediction.label {
                Color::Green
            } else {
                Color::DarkGrey
            };
            execute!(
                stdout,
                SetForegroundColor(color),
                Print(format!("{}:{:.0}% ", label, share * 100.0)),
                ResetColor
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Reset terminal state and cleanup
    pub fn shutdown(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();

        if self.use_alternate_screen {
            execute!(stdout, LeaveAlternateScreen, cursor::Show,)?;
        }

        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Default for Display {
    fn default() -> Self {
        // Return simple display that doesn't use alternate screen
        Display {
            use_alternate_screen: false,
        }
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        // Best effort cleanup
        let _ = self.shutdown();
    }
}
